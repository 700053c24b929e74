use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::models::{CandidateSlot, SlotConfig, WorkingSession};

pub(crate) fn minutes_of(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight() / 60
}

pub(crate) fn time_from_minutes(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Candidate start times inside `[start, end)`.
///
/// Starts at `start` and advances by `step_minutes`; a start is kept only if a
/// full `duration_minutes` consultation still ends by `end`. No snapping when
/// the step does not divide the window.
pub fn generate_start_times(start: NaiveTime, end: NaiveTime, config: &SlotConfig) -> Vec<NaiveTime> {
    let end_minutes = minutes_of(end);
    let step = config.step_minutes.max(1);

    let mut starts = Vec::new();
    let mut current = minutes_of(start);

    while current + config.duration_minutes <= end_minutes {
        if let Some(time) = time_from_minutes(current) {
            starts.push(time);
        }
        current += step;
    }

    starts
}

/// All candidates for `date` across `sessions`, deduplicated by start time and
/// sorted ascending.
pub fn generate_candidates(date: NaiveDate, sessions: &[&WorkingSession], config: &SlotConfig) -> Vec<CandidateSlot> {
    let mut candidates: Vec<CandidateSlot> = sessions
        .iter()
        .flat_map(|session| generate_start_times(session.start_time(), session.end_time(), config))
        .filter_map(|start| {
            let end = time_from_minutes(minutes_of(start) + config.duration_minutes)?;
            Some(CandidateSlot { date, start_time: start, end_time: end })
        })
        .collect();

    sort_and_dedup(&mut candidates);
    candidates
}

pub(crate) fn sort_and_dedup(slots: &mut Vec<CandidateSlot>) {
    slots.sort_by_key(|slot| slot.start_time);
    slots.dedup_by_key(|slot| slot.start_time);
}
