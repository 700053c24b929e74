use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use shared_config::AppConfig;

use crate::models::{
    AvailabilityError, AvailabilityMap, Booking, BookingStatus, Horizon, SlotConfig,
    UnavailabilityBlock, WorkingSession, MAX_HORIZON_DAYS,
};
use crate::services::clock::{Clock, SystemClock};
use crate::services::engine::{compute_availability, ScheduleSnapshot};
use crate::services::store::{ScheduleStore, SupabaseScheduleStore};

/// Caller-side knobs for one availability lookup. Unset fields fall back to
/// the service defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub from: Option<NaiveDate>,
    /// Exclusive end date; wins over `days` when both are given.
    pub to: Option<NaiveDate>,
    pub days: Option<u32>,
    pub duration_minutes: Option<u32>,
    pub step_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityReport {
    pub professional_id: String,
    pub horizon: Horizon,
    pub days: AvailabilityMap,
}

pub struct AvailabilityService<S, C = SystemClock> {
    store: S,
    clock: C,
    defaults: SlotConfig,
    horizon_days: u32,
}

impl AvailabilityService<SupabaseScheduleStore, SystemClock> {
    pub fn new(config: &AppConfig, auth_token: Option<&str>) -> Self {
        let store = match auth_token {
            Some(token) => SupabaseScheduleStore::new(config).with_auth_token(token),
            None => SupabaseScheduleStore::new(config),
        };

        let clock = SystemClock::with_offset_minutes(config.utc_offset_minutes).unwrap_or_else(|e| {
            warn!("{}; computing today in UTC", e);
            SystemClock::default()
        });

        let horizon_days = if config.booking_horizon_days > MAX_HORIZON_DAYS {
            warn!(
                "BOOKING_HORIZON_DAYS {} exceeds {}, capping the default horizon",
                config.booking_horizon_days, MAX_HORIZON_DAYS
            );
            MAX_HORIZON_DAYS
        } else {
            config.booking_horizon_days
        };

        Self::with_parts(store, clock, SlotConfig::from_app_config(config), horizon_days)
    }
}

impl<S, C> AvailabilityService<S, C>
where
    S: ScheduleStore,
    C: Clock,
{
    pub fn with_parts(store: S, clock: C, defaults: SlotConfig, horizon_days: u32) -> Self {
        Self {
            store,
            clock,
            defaults,
            horizon_days,
        }
    }

    /// Bookable slots per working date for `professional_id`.
    ///
    /// Valid only at the moment it is computed; see [`compute_availability`].
    pub async fn get_available_slots(
        &self,
        professional_id: &str,
        query: AvailabilityQuery,
    ) -> Result<AvailabilityMap, AvailabilityError> {
        Ok(self.availability_report(professional_id, query).await?.days)
    }

    pub async fn availability_report(
        &self,
        professional_id: &str,
        query: AvailabilityQuery,
    ) -> Result<AvailabilityReport, AvailabilityError> {
        let professional_id = professional_id.trim();
        if professional_id.is_empty() {
            return Err(AvailabilityError::InvalidQuery("professional_id is required".to_string()));
        }

        let config = self.slot_config(&query)?;
        let horizon = self.resolve_horizon(&query)?;
        let today = self.clock.today();

        debug!(
            "Calculating availability for professional {} over {} days from {} ({} min every {} min)",
            professional_id, horizon.len_days(), horizon.from, config.duration_minutes, config.step_minutes
        );

        let (session_rows, booking_rows, block_rows) = futures::try_join!(
            self.store.list_working_sessions(professional_id),
            self.store.list_bookings(professional_id, horizon, &BookingStatus::OCCUPYING),
            self.store.list_unavailability_blocks(professional_id, horizon),
        )?;

        let snapshot = ScheduleSnapshot {
            professional_id: professional_id.to_string(),
            sessions: session_rows
                .into_iter()
                .map(WorkingSession::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            bookings: booking_rows
                .into_iter()
                .map(Booking::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            blocks: block_rows
                .into_iter()
                .map(UnavailabilityBlock::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        };

        if !snapshot.sessions.is_empty() && snapshot.sessions.iter().all(|session| session.weekday().is_none()) {
            let codes: Vec<&str> = snapshot.sessions.iter().map(|session| session.day_code()).collect();
            warn!(
                "No working session of professional {} has a recognizable day code: {:?}",
                professional_id, codes
            );
        }

        let days = compute_availability(&snapshot, horizon, today, &config);

        Ok(AvailabilityReport {
            professional_id: professional_id.to_string(),
            horizon,
            days,
        })
    }

    /// Explicit `from` wins; without it the patient-facing default applies
    /// (starting tomorrow).
    pub fn resolve_horizon(&self, query: &AvailabilityQuery) -> Result<Horizon, AvailabilityError> {
        let days = query.days.unwrap_or(self.horizon_days);

        match (query.from, query.to) {
            (Some(from), Some(to)) => Horizon::new(from, to),
            (Some(from), None) => Horizon::days(from, days),
            (None, Some(to)) => {
                let tomorrow = Horizon::patient_default(self.clock.today(), 1)?.from;
                Horizon::new(tomorrow, to)
            }
            (None, None) => Horizon::patient_default(self.clock.today(), days),
        }
    }

    fn slot_config(&self, query: &AvailabilityQuery) -> Result<SlotConfig, AvailabilityError> {
        SlotConfig {
            duration_minutes: query.duration_minutes.unwrap_or(self.defaults.duration_minutes),
            step_minutes: query.step_minutes.unwrap_or(self.defaults.step_minutes),
            occupancy: self.defaults.occupancy,
        }
        .validated()
    }
}
