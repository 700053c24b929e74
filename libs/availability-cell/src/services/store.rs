use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    AvailabilityError, BookingRow, BookingStatus, Horizon, UnavailabilityBlockRow,
    WorkingSessionRow,
};

/// Read access to the three record streams the engine consumes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn list_working_sessions(
        &self,
        professional_id: &str,
    ) -> Result<Vec<WorkingSessionRow>, AvailabilityError>;

    async fn list_bookings(
        &self,
        professional_id: &str,
        range: Horizon,
        statuses: &[BookingStatus],
    ) -> Result<Vec<BookingRow>, AvailabilityError>;

    async fn list_unavailability_blocks(
        &self,
        professional_id: &str,
        range: Horizon,
    ) -> Result<Vec<UnavailabilityBlockRow>, AvailabilityError>;
}

/// PostgREST-backed store. Requests run with the caller's token when one is
/// given so row-level security applies, otherwise as the anon role.
pub struct SupabaseScheduleStore {
    supabase: SupabaseClient,
    auth_token: Option<String>,
}

impl SupabaseScheduleStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    async fn fetch<T>(&self, path: &str) -> Result<Vec<T>, AvailabilityError>
    where
        T: serde::de::DeserializeOwned,
    {
        self.supabase
            .request::<Vec<T>>(Method::GET, path, self.auth_token.as_deref(), None)
            .await
            .map_err(|e| AvailabilityError::Store(e.to_string()))
    }
}

#[async_trait]
impl ScheduleStore for SupabaseScheduleStore {
    async fn list_working_sessions(
        &self,
        professional_id: &str,
    ) -> Result<Vec<WorkingSessionRow>, AvailabilityError> {
        debug!("Fetching working sessions for professional: {}", professional_id);

        let path = format!(
            "/rest/v1/working_sessions?professional_id=eq.{}&order=start_time.asc",
            urlencoding::encode(professional_id)
        );
        self.fetch(&path).await
    }

    async fn list_bookings(
        &self,
        professional_id: &str,
        range: Horizon,
        statuses: &[BookingStatus],
    ) -> Result<Vec<BookingRow>, AvailabilityError> {
        debug!(
            "Fetching bookings for professional {} between {} and {}",
            professional_id, range.from, range.to_exclusive
        );

        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let status_list = statuses
            .iter()
            .map(BookingStatus::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let path = format!(
            "/rest/v1/appointments?professional_id=eq.{}&date=gte.{}&date=lt.{}&status=in.({})&order=date.asc,time.asc",
            urlencoding::encode(professional_id),
            range.from,
            range.to_exclusive,
            status_list
        );
        self.fetch(&path).await
    }

    async fn list_unavailability_blocks(
        &self,
        professional_id: &str,
        range: Horizon,
    ) -> Result<Vec<UnavailabilityBlockRow>, AvailabilityError> {
        debug!(
            "Fetching unavailability blocks for professional {} between {} and {}",
            professional_id, range.from, range.to_exclusive
        );

        let path = format!(
            "/rest/v1/unavailability_blocks?professional_id=eq.{}&date=gte.{}&date=lt.{}&order=date.asc",
            urlencoding::encode(professional_id),
            range.from,
            range.to_exclusive
        );
        self.fetch(&path).await
    }
}
