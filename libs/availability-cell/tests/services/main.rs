// libs/availability-cell/tests/services/main.rs

mod engine;
mod exclusion;
mod slots;

use chrono::{NaiveDate, NaiveTime};

use availability_cell::models::{SlotConfig, WorkingSession};

pub const PRO: &str = "pro-1";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// 2024-06-03 is a Monday.
pub fn monday() -> NaiveDate {
    date(2024, 6, 3)
}

pub fn session(id: &str, day: &str, start: NaiveTime, end: NaiveTime) -> WorkingSession {
    WorkingSession::new(id, PRO, day, start, end).unwrap()
}

pub fn config(duration: u32, step: u32) -> SlotConfig {
    SlotConfig::new(duration, step).unwrap()
}
