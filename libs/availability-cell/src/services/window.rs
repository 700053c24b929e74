use chrono::NaiveDate;

use crate::models::{Horizon, WorkingSession};

/// A calendar date inside the horizon together with the sessions that apply
/// to its weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDay<'a> {
    pub date: NaiveDate,
    pub sessions: Vec<&'a WorkingSession>,
}

/// Expands recurring sessions over `horizon`.
///
/// Dates before `today` are skipped whatever the horizon says. Output is
/// ascending and holds one entry per date; a date matched by several sessions
/// (split morning/afternoon rules) lists all of them in input order.
pub fn resolve_working_window<'a>(
    sessions: &'a [WorkingSession],
    horizon: Horizon,
    today: NaiveDate,
) -> Vec<WorkingDay<'a>> {
    horizon
        .dates()
        .filter(|date| *date >= today)
        .filter_map(|date| {
            let matching: Vec<&WorkingSession> = sessions
                .iter()
                .filter(|session| session.applies_to(date))
                .collect();

            (!matching.is_empty()).then_some(WorkingDay { date, sessions: matching })
        })
        .collect()
}
