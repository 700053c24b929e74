use chrono::{NaiveTime, Timelike};

use availability_cell::models::{
    Booking, BookingStatus, CandidateSlot, OccupancyMatch, UnavailabilityBlock,
};
use availability_cell::services::exclusion::{collides_with_block, filter_day};

use super::{config, monday, t, PRO};

fn slot(start: NaiveTime, duration: u32) -> CandidateSlot {
    let end_minutes = start.num_seconds_from_midnight() / 60 + duration;
    CandidateSlot {
        date: monday(),
        start_time: start,
        end_time: t(end_minutes / 60, end_minutes % 60),
    }
}

fn starts(slots: &[CandidateSlot]) -> Vec<NaiveTime> {
    slots.iter().map(|s| s.start_time).collect()
}

#[test]
fn test_all_day_block_dominates() {
    let candidates = vec![slot(t(9, 0), 50), slot(t(9, 30), 50)];
    let block = UnavailabilityBlock::all_day("blk-1", PRO, monday());
    let partial = UnavailabilityBlock::partial("blk-2", PRO, monday(), t(13, 0), t(14, 0)).unwrap();

    let day = filter_day(monday(), candidates, &[], &[&partial, &block], &config(50, 30));

    assert!(day.blocked);
    assert!(day.slots.is_empty());
}

#[test]
fn test_confirmed_booking_excludes_exact_start_but_cancelled_does_not() {
    let candidates = vec![slot(t(9, 0), 50), slot(t(9, 30), 50), slot(t(10, 0), 50)];
    let confirmed = Booking::new("bk-1", PRO, monday(), t(9, 0), BookingStatus::Confirmed);
    let pending = Booking::new("bk-2", PRO, monday(), t(10, 0), BookingStatus::Pending);
    let cancelled = Booking::new("bk-3", PRO, monday(), t(9, 30), BookingStatus::Cancelled);

    let day = filter_day(monday(), candidates, &[&confirmed, &pending, &cancelled], &[], &config(50, 30));

    assert!(!day.blocked);
    assert_eq!(starts(&day.slots), vec![t(9, 30)]);
}

#[test]
fn test_completed_booking_does_not_occupy() {
    let candidates = vec![slot(t(9, 0), 50)];
    let completed = Booking::new("bk-1", PRO, monday(), t(9, 0), BookingStatus::Completed);

    let day = filter_day(monday(), candidates, &[&completed], &[], &config(50, 30));

    assert_eq!(starts(&day.slots), vec![t(9, 0)]);
}

#[test]
fn test_booking_seconds_are_ignored() {
    let candidates = vec![slot(t(9, 0), 50)];
    let booking = Booking::new(
        "bk-1",
        PRO,
        monday(),
        NaiveTime::from_hms_opt(9, 0, 42).unwrap(),
        BookingStatus::Confirmed,
    );

    let day = filter_day(monday(), candidates, &[&booking], &[], &config(50, 30));

    assert!(day.slots.is_empty());
}

#[test]
fn test_off_grid_booking_is_not_excluded_in_exact_mode() {
    let candidates = vec![slot(t(9, 0), 50), slot(t(9, 30), 50)];
    let legacy = Booking::new("bk-1", PRO, monday(), t(9, 10), BookingStatus::Confirmed);

    let day = filter_day(monday(), candidates, &[&legacy], &[], &config(50, 30));

    assert_eq!(starts(&day.slots), vec![t(9, 0), t(9, 30)]);
}

#[test]
fn test_overlap_mode_excludes_every_slot_touching_a_booking() {
    let candidates = vec![
        slot(t(8, 0), 50),
        slot(t(8, 30), 50),
        slot(t(9, 0), 50),
        slot(t(9, 30), 50),
        slot(t(10, 0), 50),
    ];
    let legacy = Booking::new("bk-1", PRO, monday(), t(9, 10), BookingStatus::Confirmed).with_duration(30);
    let cfg = config(50, 30).with_occupancy(OccupancyMatch::Overlap);

    let day = filter_day(monday(), candidates, &[&legacy], &[], &cfg);

    // Booking covers [09:10, 09:40): 08:30-09:20, 09:00-09:50 and 09:30-10:20 touch it.
    assert_eq!(starts(&day.slots), vec![t(8, 0), t(10, 0)]);
}

#[test]
fn test_partial_block_overlap_cases() {
    let candidates = vec![
        slot(t(8, 0), 50),
        slot(t(9, 15), 50),
        slot(t(10, 30), 50),
        slot(t(10, 40), 50),
        slot(t(11, 0), 50),
    ];
    let block = UnavailabilityBlock::partial("blk-1", PRO, monday(), t(10, 0), t(11, 0)).unwrap();

    let day = filter_day(monday(), candidates, &[], &[&block], &config(50, 30));

    assert!(!day.blocked);
    assert_eq!(starts(&day.slots), vec![t(8, 0), t(11, 0)]);
}

#[test]
fn test_slot_containing_block_is_excluded() {
    let candidates = vec![slot(t(9, 30), 50), slot(t(9, 10), 50)];
    let block = UnavailabilityBlock::partial("blk-1", PRO, monday(), t(9, 45), t(10, 0)).unwrap();

    let day = filter_day(monday(), candidates, &[], &[&block], &config(50, 30));

    assert!(day.slots.is_empty());
}

#[test]
fn test_collision_boundaries() {
    // Block [600, 660) = 10:00-11:00
    assert!(!collides_with_block(550, 600, 600, 660), "ends exactly at block start");
    assert!(!collides_with_block(660, 710, 600, 660), "starts exactly at block end");
    assert!(collides_with_block(600, 650, 600, 660));
    assert!(collides_with_block(555, 605, 600, 660));
    assert!(collides_with_block(640, 690, 600, 660));
    assert!(collides_with_block(590, 670, 600, 660));
}

#[test]
fn test_result_is_sorted_and_unique() {
    let candidates = vec![slot(t(11, 0), 50), slot(t(9, 0), 50), slot(t(11, 0), 50), slot(t(10, 0), 50)];

    let day = filter_day(monday(), candidates, &[], &[], &config(50, 30));

    assert_eq!(starts(&day.slots), vec![t(9, 0), t(10, 0), t(11, 0)]);
}
