use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::models::{
    BlockSpan, Booking, CandidateSlot, DayAvailability, OccupancyMatch, SlotConfig,
    UnavailabilityBlock,
};
use crate::services::slots::{minutes_of, sort_and_dedup};

/// Applies the day's bookings and unavailability blocks to its candidates.
///
/// An all-day block wins outright. Otherwise a candidate survives only if no
/// occupying booking starts at the same minute and it does not overlap any
/// partial block. In [`OccupancyMatch::Overlap`] mode bookings also remove
/// every candidate intersecting their own interval.
pub fn filter_day(
    date: NaiveDate,
    candidates: Vec<CandidateSlot>,
    bookings: &[&Booking],
    blocks: &[&UnavailabilityBlock],
    config: &SlotConfig,
) -> DayAvailability {
    if blocks.iter().any(|block| block.is_all_day()) {
        debug!("{} blocked all day, skipping {} candidates", date, candidates.len());
        return DayAvailability::fully_blocked(date);
    }

    let occupying: Vec<&Booking> = bookings
        .iter()
        .copied()
        .filter(|booking| booking.status.is_occupying())
        .collect();

    let occupied_starts: HashSet<NaiveTime> = occupying.iter().map(|booking| booking.time).collect();

    let partial_ranges: Vec<(u32, u32)> = blocks
        .iter()
        .filter_map(|block| match block.span() {
            BlockSpan::Partial { start, end } => Some((minutes_of(start), minutes_of(end))),
            BlockSpan::AllDay => None,
        })
        .collect();

    let mut slots: Vec<CandidateSlot> = candidates
        .into_iter()
        .filter(|slot| !occupied_starts.contains(&slot.start_time))
        .filter(|slot| {
            config.occupancy != OccupancyMatch::Overlap
                || !overlaps_any_booking(slot, &occupying, config.duration_minutes)
        })
        .filter(|slot| {
            let start = minutes_of(slot.start_time);
            let end = start + config.duration_minutes;
            !partial_ranges
                .iter()
                .any(|&(block_start, block_end)| collides_with_block(start, end, block_start, block_end))
        })
        .collect();

    sort_and_dedup(&mut slots);

    DayAvailability { date, blocked: false, slots }
}

/// Slot `[slot_start, slot_end)` against block `[block_start, block_end)`.
///
/// Excluded when the slot starts inside the block, ends inside it, or
/// swallows it whole.
pub fn collides_with_block(slot_start: u32, slot_end: u32, block_start: u32, block_end: u32) -> bool {
    let starts_inside = slot_start >= block_start && slot_start < block_end;
    let ends_inside = slot_end > block_start && slot_end <= block_end;
    let contains_block = slot_start < block_start && slot_end > block_end;

    starts_inside || ends_inside || contains_block
}

fn overlaps_any_booking(slot: &CandidateSlot, bookings: &[&Booking], slot_duration: u32) -> bool {
    let slot_start = minutes_of(slot.start_time);
    let slot_end = slot_start + slot_duration;

    bookings.iter().any(|booking| {
        let booking_start = minutes_of(booking.time);
        let booking_end = booking_start + booking.duration_minutes.unwrap_or(slot_duration);
        slot_start < booking_end && slot_end > booking_start
    })
}
