use std::sync::Arc;

use axum::{
    extract::{Path, Query, State, Extension},
    Json,
};
use axum_extra::TypedHeader;
use chrono::{NaiveDate, Utc};
use headers::{Authorization, authorization::Bearer};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::DayAvailability;
use crate::services::availability::{AvailabilityQuery, AvailabilityReport, AvailabilityService};

#[derive(Debug, Default, Deserialize)]
pub struct AvailableSlotsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub days: Option<u32>,
    pub duration_minutes: Option<u32>,
    pub step_minutes: Option<u32>,
    /// Also list working days with nothing left to book.
    pub include_empty: Option<bool>,
}

impl AvailableSlotsQuery {
    fn to_availability_query(&self) -> AvailabilityQuery {
        AvailabilityQuery {
            from: self.from,
            to: self.to,
            days: self.days,
            duration_minutes: self.duration_minutes,
            step_minutes: self.step_minutes,
        }
    }
}

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_available_slots_public(
    State(state): State<Arc<AppConfig>>,
    Path(professional_id): Path<String>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state, None);

    let report = availability_service
        .availability_report(&professional_id, query.to_availability_query())
        .await?;

    Ok(Json(render_report(report, query.include_empty.unwrap_or(false))))
}

// ==============================================================================
// PROTECTED HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(professional_id): Path<String>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Value>, AppError> {
    debug!("User {} requesting availability for professional {}", user.id, professional_id);

    let availability_service = AvailabilityService::new(&state, Some(auth.token()));

    let report = availability_service
        .availability_report(&professional_id, query.to_availability_query())
        .await?;

    Ok(Json(render_report(report, query.include_empty.unwrap_or(false))))
}

/// Blocked days are always listed so the calendar can grey them out; days
/// that are merely empty only when asked for.
pub fn render_report(report: AvailabilityReport, include_empty: bool) -> Value {
    let days: Vec<DayAvailability> = report
        .days
        .into_values()
        .filter(|day| include_empty || day.blocked || day.has_slots())
        .collect();

    let total_slots: usize = days.iter().map(|day| day.slots.len()).sum();

    json!({
        "professional_id": report.professional_id,
        "from": report.horizon.from,
        "to": report.horizon.to_exclusive,
        "days": days,
        "total_slots": total_slots,
        "generated_at": Utc::now().to_rfc3339(),
    })
}
