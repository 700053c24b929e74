use chrono::{NaiveTime, Timelike};

use availability_cell::services::slots::{generate_candidates, generate_start_times};

use super::{config, monday, session, t};

fn minutes(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight() / 60
}

#[test]
fn test_one_hour_window_fits_a_single_fifty_minute_slot() {
    let starts = generate_start_times(t(9, 0), t(10, 0), &config(50, 30));
    assert_eq!(starts, vec![t(9, 0)]);
}

#[test]
fn test_last_start_is_end_minus_duration() {
    let starts = generate_start_times(t(8, 0), t(12, 0), &config(50, 30));
    assert_eq!(
        starts,
        vec![t(8, 0), t(8, 30), t(9, 0), t(9, 30), t(10, 0), t(10, 30), t(11, 0)]
    );
}

#[test]
fn test_step_that_does_not_divide_window_is_not_snapped() {
    let starts = generate_start_times(t(9, 0), t(10, 30), &config(30, 25));
    assert_eq!(starts, vec![t(9, 0), t(9, 25), t(9, 50)]);
}

#[test]
fn test_window_shorter_than_duration_is_empty() {
    assert!(generate_start_times(t(9, 0), t(9, 45), &config(50, 30)).is_empty());
}

#[test]
fn test_slots_keep_exact_duration_and_stay_inside_session() {
    let sessions = [
        session("a", "mon", t(7, 10), t(12, 5)),
        session("b", "mon", t(13, 0), t(19, 45)),
    ];
    let refs: Vec<_> = sessions.iter().collect();

    for (duration, step) in [(50, 30), (30, 15), (45, 45), (60, 20), (25, 40)] {
        let cfg = config(duration, step);
        let candidates = generate_candidates(monday(), &refs, &cfg);
        assert!(!candidates.is_empty());

        for slot in &candidates {
            assert_eq!(minutes(slot.end_time) - minutes(slot.start_time), duration);
            let owner = sessions
                .iter()
                .find(|s| slot.start_time >= s.start_time() && slot.start_time < s.end_time())
                .expect("slot starts inside a session");
            assert!(slot.end_time <= owner.end_time());
        }
    }
}

#[test]
fn test_overlapping_sessions_are_deduplicated_and_sorted() {
    let sessions = [
        session("late", "mon", t(10, 0), t(12, 0)),
        session("early", "mon", t(9, 0), t(11, 0)),
        session("dup", "mon", t(9, 0), t(11, 0)),
    ];
    let refs: Vec<_> = sessions.iter().collect();

    let starts: Vec<_> = generate_candidates(monday(), &refs, &config(50, 30))
        .into_iter()
        .map(|slot| slot.start_time)
        .collect();

    assert_eq!(starts, vec![t(9, 0), t(9, 30), t(10, 0), t(10, 30), t(11, 0)]);
}
