use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SLOT_DURATION_MINUTES: u32 = 50;
pub const DEFAULT_SLOT_STEP_MINUTES: u32 = 30;
pub const DEFAULT_BOOKING_HORIZON_DAYS: u32 = 30;
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub port: u16,
    pub slot_duration_minutes: u32,
    pub slot_step_minutes: u32,
    pub booking_horizon_days: u32,
    /// `exact` or `overlap`; parsed by the availability cell.
    pub booking_occupancy_match: String,
    /// Offset of the wall clock working sessions are written in, e.g. `-180` for UTC-3.
    pub utc_offset_minutes: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            supabase_jwt_secret: String::new(),
            port: DEFAULT_PORT,
            slot_duration_minutes: DEFAULT_SLOT_DURATION_MINUTES,
            slot_step_minutes: DEFAULT_SLOT_STEP_MINUTES,
            booking_horizon_days: DEFAULT_BOOKING_HORIZON_DAYS,
            booking_occupancy_match: "exact".to_string(),
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            port: numeric_var("PORT", DEFAULT_PORT),
            slot_duration_minutes: numeric_var("SLOT_DURATION_MINUTES", DEFAULT_SLOT_DURATION_MINUTES),
            slot_step_minutes: numeric_var("SLOT_STEP_MINUTES", DEFAULT_SLOT_STEP_MINUTES),
            booking_horizon_days: numeric_var("BOOKING_HORIZON_DAYS", DEFAULT_BOOKING_HORIZON_DAYS),
            booking_occupancy_match: env::var("BOOKING_OCCUPANCY_MATCH")
                .unwrap_or_else(|_| "exact".to_string()),
            utc_offset_minutes: numeric_var("LOCAL_UTC_OFFSET_MINUTES", DEFAULT_UTC_OFFSET_MINUTES),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }
}

fn numeric_var<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
