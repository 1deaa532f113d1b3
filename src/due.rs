use chrono::{DateTime, Utc};

use crate::state::MemoryState;

/// Whether the item should be shown at `now`. An item carrying a due
/// instant is due once that instant has passed; otherwise its due date is
/// compared against today (UTC).
pub fn is_due(state: &MemoryState, now: DateTime<Utc>) -> bool {
    match state.next_review_instant {
        Some(instant) => instant <= now,
        None => state.next_review_date <= now.date_naive(),
    }
}

/// How overdue the item is. Minutes for items with a due instant, whole days
/// otherwise, so the two are not directly comparable. Negative when not yet
/// due.
pub fn urgency(state: &MemoryState, now: DateTime<Utc>) -> f64 {
    match state.next_review_instant {
        Some(instant) => (now - instant).num_milliseconds() as f64 / 60_000.0,
        None => (now.date_naive() - state.next_review_date).num_days() as f64,
    }
}

/// Share of incorrect answers, 0 for an item never answered.
pub fn error_rate(state: &MemoryState) -> f64 {
    match state.total_answers() {
        0 => 0.0,
        total => f64::from(state.incorrect_count) / f64::from(total),
    }
}
