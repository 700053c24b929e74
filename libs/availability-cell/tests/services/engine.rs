use chrono::{NaiveTime, Timelike};

use availability_cell::models::{
    AvailabilityError, Booking, BookingStatus, Horizon, UnavailabilityBlock, WorkingSession,
};
use availability_cell::services::engine::{compute_availability, ScheduleSnapshot};
use assert_matches::assert_matches;

use super::{config, date, monday, session, t, PRO};

fn snapshot(sessions: Vec<WorkingSession>, bookings: Vec<Booking>, blocks: Vec<UnavailabilityBlock>) -> ScheduleSnapshot {
    ScheduleSnapshot {
        professional_id: PRO.to_string(),
        sessions,
        bookings,
        blocks,
    }
}

fn starts_on(snapshot: &ScheduleSnapshot, horizon: Horizon) -> Vec<NaiveTime> {
    compute_availability(snapshot, horizon, date(2024, 6, 1), &config(50, 30))
        .get(&monday())
        .map(|day| day.slots.iter().map(|s| s.start_time).collect())
        .unwrap_or_default()
}

#[test]
fn test_one_hour_monday_session_end_to_end() {
    let horizon = Horizon::days(monday(), 1).unwrap();
    let mut snap = snapshot(vec![session("ws-1", "mon", t(9, 0), t(10, 0))], vec![], vec![]);

    assert_eq!(starts_on(&snap, horizon), vec![t(9, 0)]);

    snap.bookings.push(Booking::new("bk-1", PRO, monday(), t(9, 0), BookingStatus::Confirmed));
    let result = compute_availability(&snap, horizon, date(2024, 6, 1), &config(50, 30));

    let day = &result[&monday()];
    assert!(day.slots.is_empty());
    assert!(!day.blocked);
}

#[test]
fn test_full_day_block_marks_date_blocked() {
    let horizon = Horizon::days(monday(), 8).unwrap();
    let snap = snapshot(
        vec![
            session("ws-1", "mon", t(8, 0), t(12, 0)),
            session("ws-2", "mon", t(13, 0), t(18, 0)),
        ],
        vec![],
        vec![UnavailabilityBlock::all_day("blk-1", PRO, monday())],
    );

    let result = compute_availability(&snap, horizon, date(2024, 6, 1), &config(50, 30));

    assert!(result[&monday()].blocked);
    assert!(result[&monday()].slots.is_empty());

    let next_monday = &result[&date(2024, 6, 10)];
    assert!(!next_monday.blocked);
    assert_eq!(next_monday.slots.len(), 7 + 9);
}

#[test]
fn test_exclusions_only_apply_to_their_own_date() {
    let horizon = Horizon::days(monday(), 8).unwrap();
    let snap = snapshot(
        vec![session("ws-1", "mon", t(9, 0), t(10, 0))],
        vec![Booking::new("bk-1", PRO, date(2024, 6, 10), t(9, 0), BookingStatus::Confirmed)],
        vec![UnavailabilityBlock::partial("blk-1", PRO, date(2024, 6, 10), t(9, 30), t(9, 45)).unwrap()],
    );

    let result = compute_availability(&snap, horizon, date(2024, 6, 1), &config(50, 30));

    assert_eq!(result[&monday()].slots.len(), 1);
    assert!(result[&date(2024, 6, 10)].slots.is_empty());
}

#[test]
fn test_other_professionals_records_are_ignored() {
    let horizon = Horizon::days(monday(), 1).unwrap();
    let snap = snapshot(
        vec![session("ws-1", "mon", t(9, 0), t(10, 0))],
        vec![Booking::new("bk-1", "someone-else", monday(), t(9, 0), BookingStatus::Confirmed)],
        vec![UnavailabilityBlock::all_day("blk-1", "someone-else", monday())],
    );

    assert_eq!(starts_on(&snap, horizon), vec![t(9, 0)]);
}

#[test]
fn test_days_without_sessions_are_absent() {
    let horizon = Horizon::days(monday(), 7).unwrap();
    let snap = snapshot(vec![session("ws-1", "fri", t(9, 0), t(17, 0))], vec![], vec![]);

    let result = compute_availability(&snap, horizon, date(2024, 6, 1), &config(50, 30));

    assert_eq!(result.keys().copied().collect::<Vec<_>>(), vec![date(2024, 6, 7)]);
}

#[test]
fn test_engine_is_idempotent() {
    let horizon = Horizon::days(date(2024, 6, 1), 30).unwrap();
    let snap = snapshot(
        vec![
            session("ws-1", "segunda-feira", t(8, 0), t(12, 0)),
            session("ws-2", "thu", t(14, 0), t(19, 0)),
        ],
        vec![
            Booking::new("bk-1", PRO, monday(), t(8, 30), BookingStatus::Confirmed),
            Booking::new("bk-2", PRO, date(2024, 6, 6), t(15, 0), BookingStatus::Pending),
        ],
        vec![UnavailabilityBlock::partial("blk-1", PRO, date(2024, 6, 13), t(16, 0), t(17, 0)).unwrap()],
    );

    let first = compute_availability(&snap, horizon, date(2024, 6, 1), &config(50, 30));
    let second = compute_availability(&snap, horizon, date(2024, 6, 1), &config(50, 30));

    assert_eq!(first, second);
    assert_eq!(first.len(), 8);
}

#[test]
fn test_every_slot_respects_duration_and_session_end() {
    let horizon = Horizon::days(date(2024, 6, 1), 30).unwrap();
    let sessions = vec![
        session("ws-1", "mon", t(8, 5), t(11, 55)),
        session("ws-2", "ter", t(13, 0), t(17, 20)),
    ];
    let snap = snapshot(sessions.clone(), vec![], vec![]);
    let cfg = config(50, 30);

    for day in compute_availability(&snap, horizon, date(2024, 6, 1), &cfg).values() {
        for slot in &day.slots {
            let start = slot.start_time.num_seconds_from_midnight() / 60;
            let end = slot.end_time.num_seconds_from_midnight() / 60;
            assert_eq!(end - start, 50);
            assert!(sessions.iter().any(|s| s.applies_to(slot.date) && slot.end_time <= s.end_time()));
        }
    }
}

#[test]
fn test_invalid_records_cannot_be_constructed() {
    assert_matches!(
        WorkingSession::new("ws-1", PRO, "mon", t(10, 0), t(10, 0)),
        Err(AvailabilityError::InvalidScheduleRule { .. })
    );
    assert_matches!(
        UnavailabilityBlock::partial("blk-1", PRO, monday(), t(12, 0), t(11, 0)),
        Err(AvailabilityError::InvalidScheduleRule { .. })
    );
    assert_matches!(Horizon::days(monday(), 0), Err(AvailabilityError::InvalidQuery(_)));
}
