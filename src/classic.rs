//! SuperMemo 2: I(1) = 1 day, I(2) = 6 days, I(n) = I(n-1) × EF.
//!
//! There is no learning phase. Any answer below quality 3 resets the
//! repetition count and schedules the item for the next day.

use crate::grade::Grade;
use crate::state::{MINIMUM_EASE, MemoryState, Phase, Transition};

const PASSING_QUALITY: u8 = 3;
const FIRST_INTERVAL: f64 = 1.0;
const SECOND_INTERVAL: f64 = 6.0;

/// EF' = EF + (0.1 - (5 - q) × (0.08 + (5 - q) × 0.02))
fn next_ease(ease_factor: f64, quality: u8) -> f64 {
    let q = f64::from(5 - quality);
    (ease_factor + (0.1 - q * (0.08 + q * 0.02))).max(MINIMUM_EASE)
}

pub(crate) fn transition(state: &MemoryState, grade: Grade) -> Transition {
    let quality = grade.quality();
    let passed = quality >= PASSING_QUALITY;

    let (interval, repetitions) = if passed {
        let interval = match state.repetitions {
            0 => FIRST_INTERVAL,
            1 => SECOND_INTERVAL,
            // the interval grows with the ease from before this answer
            _ => (state.interval * state.ease_factor)
                .round()
                .max(FIRST_INTERVAL),
        };
        (interval, state.repetitions.saturating_add(1))
    } else {
        (FIRST_INTERVAL, 0)
    };

    Transition {
        ease_factor: next_ease(state.ease_factor, quality),
        interval,
        repetitions,
        phase: Phase::Review,
        ..Transition::carry(state, passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{Algorithm, ReviewContext};
    use crate::test_helpers::{TestHelper, at, date};

    fn answer(state: &MemoryState, grade: Grade) -> MemoryState {
        let ctx = ReviewContext::new(at("2025-01-01T09:00:00Z"));
        Algorithm::Classic.next_state(state, grade, &ctx)
    }

    fn reviewed(interval: f64, repetitions: u32) -> MemoryState {
        MemoryState {
            interval,
            repetitions,
            phase: Phase::Review,
            correct_count: repetitions,
            ..MemoryState::new("t", at("2024-12-01T09:00:00Z"))
        }
    }

    #[test]
    fn ease_formula() {
        [
            next_ease(2.5, 0),
            next_ease(2.5, 2),
            next_ease(2.5, 3),
            next_ease(2.5, 5),
        ]
        .assert_approx_eq([1.7, 2.18, 2.36, 2.6]);
        assert_eq!(next_ease(1.35, 0), MINIMUM_EASE);
    }

    #[test]
    fn interval_sequence() {
        let mut state = MemoryState::new("t", at("2025-01-01T09:00:00Z"));

        state = answer(&state, Grade::Good);
        assert_eq!(state.interval, 1.0);
        assert_eq!(state.repetitions, 1);
        assert_eq!(state.phase, Phase::Review);

        state = answer(&state, Grade::Good);
        assert_eq!(state.interval, 6.0);
        state.ease_factor.assert_approx_eq(2.22);

        // 6 × 2.22 = 13.32
        state = answer(&state, Grade::Good);
        assert_eq!(state.interval, 13.0);
        assert_eq!(state.repetitions, 3);
        assert_eq!(state.correct_count, 3);
        assert_eq!(state.next_review_date, date("2025-01-14"));
        assert_eq!(state.next_review_instant, None);
    }

    #[test]
    fn failure_resets() {
        let state = answer(&reviewed(15.0, 3), Grade::Again);
        assert_eq!(state.interval, 1.0);
        assert_eq!(state.repetitions, 0);
        assert_eq!(state.incorrect_count, 1);
        state.ease_factor.assert_approx_eq(1.7);
        assert_eq!(state.next_review_date, date("2025-01-02"));
    }

    #[test]
    fn hard_counts_as_failure() {
        let state = answer(&reviewed(15.0, 3), Grade::Hard);
        assert_eq!(state.interval, 1.0);
        assert_eq!(state.repetitions, 0);
        assert_eq!(state.correct_count, 3);
        assert_eq!(state.incorrect_count, 1);
    }

    #[test]
    fn easy_uses_previous_ease() {
        let state = answer(&reviewed(10.0, 3), Grade::Easy);
        assert_eq!(state.interval, 25.0);
        state.ease_factor.assert_approx_eq(2.6);
    }

    #[test]
    fn ease_never_below_floor() {
        let mut state = reviewed(30.0, 5);
        for _ in 0..20 {
            state = answer(&state, Grade::Again);
            assert!(state.ease_factor >= MINIMUM_EASE);
        }
        assert_eq!(state.ease_factor, MINIMUM_EASE);
    }

    #[test]
    fn zero_interval_review_still_advances() {
        let state = answer(&reviewed(0.0, 4), Grade::Good);
        assert_eq!(state.interval, 1.0);
    }

    #[test]
    fn learning_step_is_untouched() {
        let state = MemoryState {
            learning_step: 1,
            phase: Phase::Learning,
            ..MemoryState::new("t", at("2025-01-01T08:00:00Z"))
        };
        let next = answer(&state, Grade::Good);
        assert_eq!(next.learning_step, 1);
        assert_eq!(next.phase, Phase::Review);
    }
}
