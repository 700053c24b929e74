// libs/availability-cell/src/models.rs
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use shared_config::{
    AppConfig, DEFAULT_SLOT_DURATION_MINUTES, DEFAULT_SLOT_STEP_MINUTES,
};
use shared_models::error::AppError;

use crate::services::day_code;

// ==============================================================================
// PERSISTED ROWS (as returned by PostgREST)
// ==============================================================================

/// A day code as stored: free text in most rows, an integer in older ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDayCode {
    Text(String),
    Number(i64),
}

impl fmt::Display for RawDayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawDayCode::Text(text) => write!(f, "{}", text),
            RawDayCode::Number(number) => write!(f, "{}", number),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingSessionRow {
    pub id: String,
    pub professional_id: String,
    #[serde(alias = "day_code")]
    pub day_of_week: RawDayCode,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRow {
    pub id: String,
    pub professional_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnavailabilityBlockRow {
    pub id: String,
    pub professional_id: String,
    pub date: NaiveDate,
    pub all_day: bool,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

// ==============================================================================
// SCHEDULING MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Statuses that hold a slot.
    pub const OCCUPYING: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    pub fn is_occupying(&self) -> bool {
        Self::OCCUPYING.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recurring weekly availability rule. `start_time < end_time` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingSession {
    id: String,
    professional_id: String,
    day_code: String,
    weekday: Option<Weekday>,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

impl WorkingSession {
    pub fn new(
        id: impl Into<String>,
        professional_id: impl Into<String>,
        day_code: impl Into<String>,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self, AvailabilityError> {
        let id = id.into();
        let day_code = day_code.into();
        let start_time = truncate_to_minute(start_time);
        let end_time = truncate_to_minute(end_time);

        if start_time >= end_time {
            return Err(AvailabilityError::invalid_rule(
                format!("working session {}", id),
                format!("start time {} must be before end time {}", start_time, end_time),
            ));
        }

        let weekday = day_code::resolve(&day_code);
        if weekday.is_none() {
            tracing::warn!("Working session {} has unrecognized day code '{}'; it will never match", id, day_code);
        }

        Ok(Self {
            id,
            professional_id: professional_id.into(),
            day_code,
            weekday,
            start_time,
            end_time,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn professional_id(&self) -> &str {
        &self.professional_id
    }

    pub fn day_code(&self) -> &str {
        &self.day_code
    }

    /// `None` when the day code is not in the lookup table.
    pub fn weekday(&self) -> Option<Weekday> {
        self.weekday
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    pub fn applies_to(&self, date: NaiveDate) -> bool {
        self.weekday == Some(date.weekday())
    }
}

impl TryFrom<WorkingSessionRow> for WorkingSession {
    type Error = AvailabilityError;

    fn try_from(row: WorkingSessionRow) -> Result<Self, Self::Error> {
        let record = format!("working session {}", row.id);
        let start = parse_wall_clock(&row.start_time, &record)?;
        let end = parse_wall_clock(&row.end_time, &record)?;
        WorkingSession::new(row.id, row.professional_id, row.day_of_week.to_string(), start, end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: String,
    pub professional_id: String,
    pub date: NaiveDate,
    /// Slot start, minute precision.
    pub time: NaiveTime,
    pub status: BookingStatus,
    pub duration_minutes: Option<u32>,
}

impl Booking {
    pub fn new(
        id: impl Into<String>,
        professional_id: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        status: BookingStatus,
    ) -> Self {
        Self {
            id: id.into(),
            professional_id: professional_id.into(),
            date,
            time: truncate_to_minute(time),
            status,
            duration_minutes: None,
        }
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }
}

impl TryFrom<BookingRow> for Booking {
    type Error = AvailabilityError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let time = parse_wall_clock(&row.time, &format!("booking {}", row.id))?;
        let booking = Booking::new(row.id, row.professional_id, row.date, time, row.status);
        Ok(match row.duration_minutes {
            Some(minutes) if minutes > 0 => booking.with_duration(minutes),
            _ => booking,
        })
    }
}

/// Extent of an unavailability block: the whole day or one time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSpan {
    AllDay,
    Partial { start: NaiveTime, end: NaiveTime },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnavailabilityBlock {
    id: String,
    professional_id: String,
    date: NaiveDate,
    span: BlockSpan,
}

impl UnavailabilityBlock {
    pub fn all_day(id: impl Into<String>, professional_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            professional_id: professional_id.into(),
            date,
            span: BlockSpan::AllDay,
        }
    }

    pub fn partial(
        id: impl Into<String>,
        professional_id: impl Into<String>,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, AvailabilityError> {
        let id = id.into();
        let start = truncate_to_minute(start);
        let end = truncate_to_minute(end);
        if start >= end {
            return Err(AvailabilityError::invalid_rule(
                format!("unavailability block {}", id),
                format!("start time {} must be before end time {}", start, end),
            ));
        }

        Ok(Self {
            id,
            professional_id: professional_id.into(),
            date,
            span: BlockSpan::Partial { start, end },
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn professional_id(&self) -> &str {
        &self.professional_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn span(&self) -> BlockSpan {
        self.span
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self.span, BlockSpan::AllDay)
    }
}

impl TryFrom<UnavailabilityBlockRow> for UnavailabilityBlock {
    type Error = AvailabilityError;

    fn try_from(row: UnavailabilityBlockRow) -> Result<Self, Self::Error> {
        let record = format!("unavailability block {}", row.id);

        match (row.all_day, row.start_time.as_deref(), row.end_time.as_deref()) {
            (true, None, None) => Ok(UnavailabilityBlock::all_day(row.id, row.professional_id, row.date)),
            (true, _, _) => Err(AvailabilityError::invalid_rule(
                record,
                "all-day block must not carry a time range",
            )),
            (false, Some(start), Some(end)) => {
                let start = parse_wall_clock(start, &record)?;
                let end = parse_wall_clock(end, &record)?;
                UnavailabilityBlock::partial(row.id, row.professional_id, row.date, start, end)
            }
            (false, _, _) => Err(AvailabilityError::invalid_rule(
                record,
                "partial block requires both start_time and end_time",
            )),
        }
    }
}

/// A bookable window computed for one query. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CandidateSlot {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_hh_mm")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "serialize_hh_mm")]
    pub end_time: NaiveTime,
}

/// Per-date result. `blocked` is set only by an all-day block, so an empty
/// `slots` with `blocked == false` means the day is fully booked or too short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub blocked: bool,
    pub slots: Vec<CandidateSlot>,
}

impl DayAvailability {
    pub fn fully_blocked(date: NaiveDate) -> Self {
        Self { date, blocked: true, slots: Vec::new() }
    }

    pub fn has_slots(&self) -> bool {
        !self.slots.is_empty()
    }
}

pub type AvailabilityMap = BTreeMap<NaiveDate, DayAvailability>;

/// Longest horizon a single query may span.
pub const MAX_HORIZON_DAYS: u32 = 366;

/// Half-open calendar range `[from, to_exclusive)`, at most [`MAX_HORIZON_DAYS`] long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Horizon {
    pub from: NaiveDate,
    pub to_exclusive: NaiveDate,
}

impl Horizon {
    pub fn new(from: NaiveDate, to_exclusive: NaiveDate) -> Result<Self, AvailabilityError> {
        if to_exclusive <= from {
            return Err(AvailabilityError::InvalidQuery(format!(
                "horizon end {} must be after start {}",
                to_exclusive, from
            )));
        }
        if (to_exclusive - from).num_days() > i64::from(MAX_HORIZON_DAYS) {
            return Err(AvailabilityError::InvalidQuery(format!(
                "horizon from {} to {} exceeds {} days",
                from, to_exclusive, MAX_HORIZON_DAYS
            )));
        }
        Ok(Self { from, to_exclusive })
    }

    /// Number of calendar days covered.
    pub fn len_days(&self) -> i64 {
        (self.to_exclusive - self.from).num_days()
    }

    pub fn days(from: NaiveDate, days: u32) -> Result<Self, AvailabilityError> {
        if days == 0 {
            return Err(AvailabilityError::InvalidQuery("horizon must span at least one day".to_string()));
        }
        if days > MAX_HORIZON_DAYS {
            return Err(AvailabilityError::InvalidQuery(format!(
                "horizon of {} days exceeds {} days",
                days, MAX_HORIZON_DAYS
            )));
        }
        let to_exclusive = from
            .checked_add_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| AvailabilityError::InvalidQuery("horizon exceeds the supported calendar".to_string()))?;
        Self::new(from, to_exclusive)
    }

    /// The patient-facing calendar: `days` days starting tomorrow.
    pub fn patient_default(today: NaiveDate, days: u32) -> Result<Self, AvailabilityError> {
        let tomorrow = today
            .succ_opt()
            .ok_or_else(|| AvailabilityError::InvalidQuery("no day after today".to_string()))?;
        Self::days(tomorrow, days)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date < self.to_exclusive
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.to_exclusive;
        self.from.iter_days().take_while(move |date| *date < end)
    }
}

/// How occupying bookings remove candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyMatch {
    /// A candidate is removed only when its start equals a booking's start.
    #[default]
    ExactStart,
    /// Also removes candidates overlapping `[booking.time, booking.time + duration)`.
    Overlap,
}

impl FromStr for OccupancyMatch {
    type Err = AvailabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" | "exact_start" => Ok(OccupancyMatch::ExactStart),
            "overlap" => Ok(OccupancyMatch::Overlap),
            other => Err(AvailabilityError::InvalidQuery(format!("unknown occupancy match mode '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotConfig {
    pub duration_minutes: u32,
    pub step_minutes: u32,
    pub occupancy: OccupancyMatch,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            duration_minutes: DEFAULT_SLOT_DURATION_MINUTES,
            step_minutes: DEFAULT_SLOT_STEP_MINUTES,
            occupancy: OccupancyMatch::ExactStart,
        }
    }
}

impl SlotConfig {
    pub fn new(duration_minutes: u32, step_minutes: u32) -> Result<Self, AvailabilityError> {
        Self { duration_minutes, step_minutes, ..Self::default() }.validated()
    }

    pub fn with_occupancy(mut self, occupancy: OccupancyMatch) -> Self {
        self.occupancy = occupancy;
        self
    }

    pub fn from_app_config(config: &AppConfig) -> Self {
        let occupancy = config.booking_occupancy_match.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "BOOKING_OCCUPANCY_MATCH '{}' not recognized, using exact start matching",
                config.booking_occupancy_match
            );
            OccupancyMatch::ExactStart
        });

        let candidate = Self {
            duration_minutes: config.slot_duration_minutes,
            step_minutes: config.slot_step_minutes,
            occupancy,
        };

        candidate.validated().unwrap_or_else(|e| {
            tracing::warn!("Invalid slot settings in configuration ({}), using defaults", e);
            Self::default().with_occupancy(occupancy)
        })
    }

    pub fn validated(self) -> Result<Self, AvailabilityError> {
        const MINUTES_PER_DAY: u32 = 24 * 60;

        if self.duration_minutes == 0 || self.duration_minutes >= MINUTES_PER_DAY {
            return Err(AvailabilityError::InvalidQuery(format!(
                "duration_minutes must be between 1 and {}",
                MINUTES_PER_DAY - 1
            )));
        }
        if self.step_minutes == 0 || self.step_minutes >= MINUTES_PER_DAY {
            return Err(AvailabilityError::InvalidQuery(format!(
                "step_minutes must be between 1 and {}",
                MINUTES_PER_DAY - 1
            )));
        }
        Ok(self)
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvailabilityError {
    #[error("Invalid schedule rule ({record}): {reason}")]
    InvalidScheduleRule { record: String, reason: String },

    #[error("Invalid availability query: {0}")]
    InvalidQuery(String),

    #[error("Schedule store error: {0}")]
    Store(String),
}

impl AvailabilityError {
    pub fn invalid_rule(record: impl Into<String>, reason: impl Into<String>) -> Self {
        AvailabilityError::InvalidScheduleRule {
            record: record.into(),
            reason: reason.into(),
        }
    }
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::InvalidScheduleRule { .. } => AppError::ValidationError(err.to_string()),
            AvailabilityError::InvalidQuery(msg) => AppError::BadRequest(msg),
            AvailabilityError::Store(msg) => AppError::Database(msg),
        }
    }
}

// ==============================================================================
// TIME HELPERS
// ==============================================================================

/// Parses `HH:MM` or `HH:MM:SS` wall-clock values; seconds are dropped.
pub fn parse_wall_clock(value: &str, record: &str) -> Result<NaiveTime, AvailabilityError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map(truncate_to_minute)
        .map_err(|_| AvailabilityError::invalid_rule(record, format!("unparseable time '{}'", value)))
}

pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

fn serialize_hh_mm<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format("%H:%M"))
}
