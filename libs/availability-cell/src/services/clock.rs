use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};

use crate::models::AvailabilityError;

/// Source of "now" for horizon defaults and past-date filtering.
///
/// `today` is the calendar date at the professional's wall-clock offset, not
/// the UTC date; session and booking times are stored in that same local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Offset of the wall clock schedules are written in. UTC unless configured.
    fn utc_offset(&self) -> FixedOffset {
        Utc.fix()
    }

    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.utc_offset()).date_naive()
    }
}

fn offset_from_minutes(minutes: i32) -> Result<FixedOffset, AvailabilityError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| AvailabilityError::InvalidQuery(format!("UTC offset of {} minutes is out of range", minutes)))
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self { offset: Utc.fix() }
    }
}

impl SystemClock {
    pub fn with_offset_minutes(minutes: i32) -> Result<Self, AvailabilityError> {
        Ok(Self { offset: offset_from_minutes(minutes)? })
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn utc_offset(&self) -> FixedOffset {
        self.offset
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now, offset: Utc.fix() }
    }

    /// Midnight UTC of `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self::at(date.and_time(NaiveTime::default()).and_utc())
    }

    pub fn with_offset_minutes(self, minutes: i32) -> Result<Self, AvailabilityError> {
        Ok(Self { offset: offset_from_minutes(minutes)?, ..self })
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn utc_offset(&self) -> FixedOffset {
        self.offset
    }
}
