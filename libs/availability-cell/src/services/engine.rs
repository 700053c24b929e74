use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{
    AvailabilityMap, Booking, Horizon, SlotConfig, UnavailabilityBlock, WorkingSession,
};
use crate::services::exclusion::filter_day;
use crate::services::slots::generate_candidates;
use crate::services::window::resolve_working_window;

/// Validated schedule data for one professional.
#[derive(Debug, Clone, Default)]
pub struct ScheduleSnapshot {
    pub professional_id: String,
    pub sessions: Vec<WorkingSession>,
    pub bookings: Vec<Booking>,
    pub blocks: Vec<UnavailabilityBlock>,
}

/// Computes bookable slots per working date.
///
/// Pure: no I/O, no clock reads, same output for the same input. Only dates
/// with at least one matching session appear in the map; each entry says
/// whether the date is blocked all day or simply has nothing left.
///
/// The result is a snapshot. A slot listed here may be taken before the
/// caller commits a booking, so the commit path must re-check or rely on a
/// uniqueness constraint on `(professional_id, date, time)` in storage.
pub fn compute_availability(
    snapshot: &ScheduleSnapshot,
    horizon: Horizon,
    today: NaiveDate,
    config: &SlotConfig,
) -> AvailabilityMap {
    let professional_id = snapshot.professional_id.as_str();

    let mut bookings_by_date: HashMap<NaiveDate, Vec<&Booking>> = HashMap::new();
    for booking in &snapshot.bookings {
        if booking.professional_id != professional_id {
            debug!("Ignoring booking {} for professional {}", booking.id, booking.professional_id);
            continue;
        }
        bookings_by_date.entry(booking.date).or_default().push(booking);
    }

    let mut blocks_by_date: HashMap<NaiveDate, Vec<&UnavailabilityBlock>> = HashMap::new();
    for block in &snapshot.blocks {
        if block.professional_id() != professional_id {
            debug!("Ignoring unavailability block {} for professional {}", block.id(), block.professional_id());
            continue;
        }
        blocks_by_date.entry(block.date()).or_default().push(block);
    }

    let sessions: Vec<WorkingSession> = snapshot
        .sessions
        .iter()
        .filter(|session| session.professional_id() == professional_id)
        .cloned()
        .collect();

    let mut availability = AvailabilityMap::new();

    for working_day in resolve_working_window(&sessions, horizon, today) {
        let date = working_day.date;
        let candidates = generate_candidates(date, &working_day.sessions, config);

        let day = filter_day(
            date,
            candidates,
            bookings_by_date.get(&date).map(Vec::as_slice).unwrap_or_default(),
            blocks_by_date.get(&date).map(Vec::as_slice).unwrap_or_default(),
            config,
        );

        availability.insert(date, day);
    }

    debug!(
        "Computed availability for professional {}: {} working days, {} bookable slots",
        professional_id,
        availability.len(),
        availability.values().map(|day| day.slots.len()).sum::<usize>()
    );

    availability
}
