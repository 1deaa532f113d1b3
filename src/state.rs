use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

pub const STARTING_EASE: f64 = 2.5;
pub const MINIMUM_EASE: f64 = 1.3;
pub const DEFAULT_DIFFICULTY: f64 = 5.0;
pub const D_MIN: f64 = 1.0;
pub const D_MAX: f64 = 10.0;

pub(crate) const MINUTES_PER_DAY: f64 = 24.0 * 60.0;
pub(crate) const MILLIS_PER_DAY: f64 = MINUTES_PER_DAY * 60.0 * 1000.0;
/// Smallest interval a transition may produce, one minute.
pub(crate) const MIN_INTERVAL: f64 = 1.0 / MINUTES_PER_DAY;
/// Longest interval any algorithm schedules, about a hundred years.
pub const MAXIMUM_INTERVAL: f64 = 36500.0;

pub(crate) fn minutes_to_days(minutes: f64) -> f64 {
    minutes / MINUTES_PER_DAY
}

/// Coarse lifecycle stage of an item. Decides which branch of an algorithm
/// handles the next answer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    #[default]
    New,
    Learning,
    Review,
    Relearning,
}

/// Per-item review state.
///
/// Owned by the caller; scheduling never mutates a state in place but returns
/// a replacement. The serialized field names match the stored progress
/// records, and fields added after the first record format default when
/// missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    #[serde(rename = "term_id")]
    pub item_id: String,
    #[serde(default = "starting_ease")]
    pub ease_factor: f64,
    /// Days until the next review. Fractions below 1 are minute/hour steps.
    #[serde(default)]
    pub interval: f64,
    #[serde(default)]
    pub repetitions: u32,
    #[serde(rename = "next_review")]
    pub next_review_date: NaiveDate,
    /// Set only while the pending interval is shorter than a day. Takes
    /// precedence over `next_review_date` when present.
    #[serde(
        rename = "next_review_time",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_review_instant: Option<DateTime<Utc>>,
    #[serde(
        rename = "last_review",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_review_date: Option<NaiveDate>,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub incorrect_count: u32,
    #[serde(default)]
    pub is_bookmarked: bool,
    #[serde(default)]
    pub is_difficult: bool,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub learning_step: usize,
    /// Days until recall probability decays to 90%. Zero until the adaptive
    /// algorithm first computes it.
    #[serde(default)]
    pub stability: f64,
    #[serde(default = "default_difficulty")]
    pub difficulty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_notes: Option<String>,
}

fn starting_ease() -> f64 {
    STARTING_EASE
}

fn default_difficulty() -> f64 {
    DEFAULT_DIFFICULTY
}

impl MemoryState {
    /// State for an item the learner is seeing for the first time. It is due
    /// on the day of `now`.
    pub fn new(item_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            item_id: item_id.into(),
            ease_factor: STARTING_EASE,
            interval: 0.0,
            repetitions: 0,
            next_review_date: now.date_naive(),
            next_review_instant: None,
            last_review_date: None,
            correct_count: 0,
            incorrect_count: 0,
            is_bookmarked: false,
            is_difficult: false,
            phase: Phase::New,
            learning_step: 0,
            stability: 0.0,
            difficulty: DEFAULT_DIFFICULTY,
            user_notes: None,
        }
    }

    pub fn total_answers(&self) -> u32 {
        self.correct_count.saturating_add(self.incorrect_count)
    }

    /// Copy with non-finite or out-of-range numeric fields replaced by values
    /// the algorithms can work with.
    pub(crate) fn sanitized(&self) -> MemoryState {
        let mut state = self.clone();
        if !state.ease_factor.is_finite() {
            state.ease_factor = STARTING_EASE;
        }
        state.ease_factor = state.ease_factor.max(MINIMUM_EASE);
        if state.interval.is_nan() || state.interval < 0.0 {
            state.interval = 0.0;
        }
        state.interval = state.interval.min(MAXIMUM_INTERVAL);
        if !state.stability.is_finite() || state.stability < 0.0 {
            state.stability = 0.0;
        }
        if !state.difficulty.is_finite() || state.difficulty == 0.0 {
            state.difficulty = DEFAULT_DIFFICULTY;
        }
        state.difficulty = state.difficulty.clamp(D_MIN, D_MAX);
        if state != *self {
            warn!("sanitized malformed memory state for {}", self.item_id);
        }
        state
    }

    /// Builds the successor state from the values an algorithm computed.
    ///
    /// Invariant clamps run here, after every branch, so no algorithm can leak
    /// an ease below the floor, a difficulty outside [1, 10] or a
    /// non-positive interval.
    pub(crate) fn apply(&self, transition: Transition, now: DateTime<Utc>) -> MemoryState {
        let Transition {
            ease_factor,
            interval,
            repetitions,
            phase,
            learning_step,
            stability,
            difficulty,
            correct,
        } = transition.guarded();

        let today = now.date_naive();
        let (next_review_date, next_review_instant) = if interval < 1.0 {
            let due = now + Duration::milliseconds((interval * MILLIS_PER_DAY).round() as i64);
            (due.date_naive(), Some(due))
        } else {
            let days = Days::new(interval.round() as u64);
            (today.checked_add_days(days).unwrap_or(NaiveDate::MAX), None)
        };

        MemoryState {
            ease_factor,
            interval,
            repetitions,
            next_review_date,
            next_review_instant,
            last_review_date: Some(today),
            correct_count: self.correct_count.saturating_add(u32::from(correct)),
            incorrect_count: self.incorrect_count.saturating_add(u32::from(!correct)),
            phase,
            learning_step,
            stability,
            difficulty,
            ..self.clone()
        }
    }
}

/// The values one scheduling step decides on. Algorithms start from
/// [`Transition::carry`] and overwrite what their branch changes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Transition {
    pub ease_factor: f64,
    pub interval: f64,
    pub repetitions: u32,
    pub phase: Phase,
    pub learning_step: usize,
    pub stability: f64,
    pub difficulty: f64,
    pub correct: bool,
}

impl Transition {
    pub(crate) fn carry(state: &MemoryState, correct: bool) -> Self {
        Self {
            ease_factor: state.ease_factor,
            interval: state.interval,
            repetitions: state.repetitions,
            phase: state.phase,
            learning_step: state.learning_step,
            stability: state.stability,
            difficulty: state.difficulty,
            correct,
        }
    }

    fn guarded(self) -> Self {
        // overflow saturates at the ceiling; only NaN or non-positive
        // values fall back to the floor
        let interval = if self.interval > 0.0 {
            self.interval.min(MAXIMUM_INTERVAL)
        } else {
            MIN_INTERVAL
        };
        let ease_factor = if self.ease_factor.is_finite() {
            self.ease_factor.max(MINIMUM_EASE)
        } else {
            MINIMUM_EASE
        };
        let difficulty = if self.difficulty.is_finite() {
            self.difficulty.clamp(D_MIN, D_MAX)
        } else {
            DEFAULT_DIFFICULTY
        };
        let stability = if self.stability.is_finite() {
            self.stability.max(0.0)
        } else {
            0.0
        };
        Self {
            ease_factor,
            interval,
            difficulty,
            stability,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{at, date};

    #[test]
    fn initial_state() {
        let state = MemoryState::new("term_1", at("2025-03-10T15:30:00Z"));
        assert_eq!(state.item_id, "term_1");
        assert_eq!(state.ease_factor, 2.5);
        assert_eq!(state.interval, 0.0);
        assert_eq!(state.repetitions, 0);
        assert_eq!(state.phase, Phase::New);
        assert_eq!(state.learning_step, 0);
        assert_eq!(state.stability, 0.0);
        assert_eq!(state.difficulty, 5.0);
        assert_eq!(state.next_review_date, date("2025-03-10"));
        assert_eq!(state.next_review_instant, None);
        assert_eq!(state.last_review_date, None);
    }

    #[test]
    fn apply_sub_day_sets_instant() {
        let now = at("2025-03-10T23:55:00Z");
        let state = MemoryState::new("t", now);
        let transition = Transition {
            interval: minutes_to_days(10.0),
            ..Transition::carry(&state, true)
        };
        let next = state.apply(transition, now);
        assert_eq!(next.next_review_instant, Some(at("2025-03-11T00:05:00Z")));
        // calendar date follows the instant across midnight
        assert_eq!(next.next_review_date, date("2025-03-11"));
        assert_eq!(next.last_review_date, Some(date("2025-03-10")));
        assert_eq!(next.correct_count, 1);
        assert_eq!(next.incorrect_count, 0);
    }

    #[test]
    fn apply_whole_days_clears_instant() {
        let now = at("2025-03-10T08:00:00Z");
        let mut state = MemoryState::new("t", now);
        state.next_review_instant = Some(now);
        let transition = Transition {
            interval: 2.6,
            ..Transition::carry(&state, false)
        };
        let next = state.apply(transition, now);
        assert_eq!(next.next_review_instant, None);
        assert_eq!(next.next_review_date, date("2025-03-13"));
        assert_eq!(next.incorrect_count, 1);
    }

    #[test]
    fn apply_enforces_invariants() {
        let now = at("2025-03-10T08:00:00Z");
        let state = MemoryState::new("t", now);
        let transition = Transition {
            ease_factor: 0.4,
            interval: f64::NAN,
            difficulty: 42.0,
            stability: f64::INFINITY,
            ..Transition::carry(&state, true)
        };
        let next = state.apply(transition, now);
        assert_eq!(next.ease_factor, MINIMUM_EASE);
        assert_eq!(next.interval, MIN_INTERVAL);
        assert_eq!(next.difficulty, D_MAX);
        assert_eq!(next.stability, 0.0);
    }

    #[test]
    fn apply_passes_caller_flags_through() {
        let now = at("2025-03-10T08:00:00Z");
        let mut state = MemoryState::new("t", now);
        state.is_bookmarked = true;
        state.is_difficult = true;
        state.user_notes = Some("watch the sign".into());
        let next = state.apply(Transition::carry(&state, true), now);
        assert!(next.is_bookmarked);
        assert!(next.is_difficult);
        assert_eq!(next.user_notes.as_deref(), Some("watch the sign"));
    }

    #[test]
    fn oversized_interval_is_capped() {
        let now = at("2025-03-10T08:00:00Z");
        let state = MemoryState::new("t", now);
        for interval in [1e300, f64::INFINITY] {
            let transition = Transition {
                interval,
                ..Transition::carry(&state, true)
            };
            let next = state.apply(transition, now);
            assert_eq!(next.interval, MAXIMUM_INTERVAL);
            assert_eq!(next.next_review_date, date("2125-02-14"));
            assert_eq!(next.next_review_instant, None);
        }
    }

    #[test]
    fn sanitize_repairs_fields() {
        let now = at("2025-03-10T08:00:00Z");
        let mut state = MemoryState::new("t", now);
        state.ease_factor = f64::NAN;
        state.interval = -3.0;
        state.difficulty = 0.0;
        state.stability = -1.0;
        let clean = state.sanitized();
        assert_eq!(clean.ease_factor, STARTING_EASE);
        assert_eq!(clean.interval, 0.0);
        assert_eq!(clean.difficulty, DEFAULT_DIFFICULTY);
        assert_eq!(clean.stability, 0.0);

        state.interval = f64::INFINITY;
        assert_eq!(state.sanitized().interval, MAXIMUM_INTERVAL);
        state.interval = f64::NAN;
        assert_eq!(state.sanitized().interval, 0.0);
    }

    #[test]
    fn serde_round_trip_keeps_every_field() {
        let now = at("2025-03-10T08:00:00Z");
        let mut state = MemoryState::new("term_7", now);
        state.phase = Phase::Learning;
        state.learning_step = 1;
        state.interval = minutes_to_days(10.0);
        state.next_review_instant = Some(at("2025-03-10T08:10:00Z"));
        state.last_review_date = Some(date("2025-03-10"));
        state.correct_count = 3;
        state.incorrect_count = 2;
        state.stability = 2.4;
        state.difficulty = 4.93;
        state.is_bookmarked = true;

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"next_review\":\"2025-03-10\""));
        assert!(json.contains("\"phase\":\"learning\""));
        let back: MemoryState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn legacy_record_defaults() {
        let json = r#"{
            "term_id": "eq_001",
            "ease_factor": 2.36,
            "interval": 6,
            "repetitions": 2,
            "next_review": "2025-01-07",
            "last_review": "2025-01-01",
            "correct_count": 2,
            "incorrect_count": 0,
            "is_bookmarked": false,
            "is_difficult": false
        }"#;
        let state: MemoryState = serde_json::from_str(json).unwrap();
        assert_eq!(state.phase, Phase::New);
        assert_eq!(state.learning_step, 0);
        assert_eq!(state.stability, 0.0);
        assert_eq!(state.difficulty, DEFAULT_DIFFICULTY);
        assert_eq!(state.next_review_instant, None);
        assert_eq!(state.last_review_date, Some(date("2025-01-01")));
    }

    #[test]
    fn accepts_javascript_timestamps() {
        let json = r#"{
            "term_id": "eq_002",
            "next_review": "2025-01-01",
            "next_review_time": "2025-01-01T10:15:00.000Z"
        }"#;
        let state: MemoryState = serde_json::from_str(json).unwrap();
        assert_eq!(state.next_review_instant, Some(at("2025-01-01T10:15:00Z")));
        assert_eq!(state.ease_factor, STARTING_EASE);
    }
}
