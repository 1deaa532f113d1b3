//! SM-2 with short learning steps before an item graduates to day-based
//! review, and a relearning step after each lapse.

use crate::grade::Grade;
use crate::state::{MINIMUM_EASE, MemoryState, Phase, Transition, minutes_to_days};

/// Minutes between answers while learning a new item.
const LEARNING_STEPS: [f64; 2] = [1.0, 10.0];
/// Minutes between answers while relearning after a lapse.
const RELEARNING_STEPS: [f64; 1] = [10.0];

const GRADUATING_INTERVAL: f64 = 1.0;
const EASY_INTERVAL: f64 = 4.0;
const EASY_BONUS: f64 = 1.3;
const HARD_INTERVAL_MULTIPLIER: f64 = 1.2;
const HARD_STEP_MULTIPLIER: f64 = 1.5;

/// Fraction of the pre-lapse interval kept when relearning finishes.
/// Zero sends the item back to the minimum interval.
const NEW_INTERVAL_AFTER_LAPSE: f64 = 0.0;
const MINIMUM_INTERVAL: f64 = 1.0;

const LAPSE_EASE_DECREASE: f64 = 0.2;
const HARD_EASE_DECREASE: f64 = 0.15;
const EASY_EASE_INCREASE: f64 = 0.15;
/// Increases only apply while the ease is at or below this value.
const EASE_CEILING: f64 = 2.5;

fn raise_ease(ease_factor: f64) -> f64 {
    if ease_factor <= EASE_CEILING {
        ease_factor + EASY_EASE_INCREASE
    } else {
        ease_factor
    }
}

fn lower_ease(ease_factor: f64, by: f64) -> f64 {
    (ease_factor - by).max(MINIMUM_EASE)
}

fn step_minutes(steps: &[f64], step: usize) -> f64 {
    steps[step.min(steps.len() - 1)]
}

pub(crate) fn transition(state: &MemoryState, grade: Grade) -> Transition {
    let carry = Transition::carry(state, grade.is_correct());
    match state.phase {
        Phase::New | Phase::Learning => learning(state, grade, carry),
        Phase::Review => review(state, grade, carry),
        Phase::Relearning => relearning(state, grade, carry),
    }
}

fn learning(state: &MemoryState, grade: Grade, carry: Transition) -> Transition {
    let step = state.learning_step;
    let last = LEARNING_STEPS.len() - 1;
    let carry = Transition {
        phase: Phase::Learning,
        ..carry
    };

    match grade {
        Grade::Again => Transition {
            learning_step: 0,
            interval: minutes_to_days(LEARNING_STEPS[0]),
            ..carry
        },
        Grade::Hard => {
            let current = step_minutes(&LEARNING_STEPS, step);
            let minutes = if step < last {
                (current + LEARNING_STEPS[step + 1]) / 2.0
            } else {
                current * HARD_STEP_MULTIPLIER
            };
            Transition {
                interval: minutes_to_days(minutes),
                ..carry
            }
        }
        Grade::Good if step < last => Transition {
            learning_step: step + 1,
            interval: minutes_to_days(LEARNING_STEPS[step + 1]),
            ..carry
        },
        Grade::Good => Transition {
            learning_step: 0,
            interval: GRADUATING_INTERVAL,
            phase: Phase::Review,
            repetitions: 1,
            ..carry
        },
        Grade::Easy => Transition {
            learning_step: 0,
            interval: EASY_INTERVAL,
            phase: Phase::Review,
            repetitions: 1,
            ease_factor: raise_ease(state.ease_factor),
            ..carry
        },
    }
}

fn review(state: &MemoryState, grade: Grade, carry: Transition) -> Transition {
    let interval = state.interval;
    let ease_factor = state.ease_factor;
    let repetitions = state.repetitions.saturating_add(1);

    // each button schedules at least as far out as the one before it
    let hard = (interval * HARD_INTERVAL_MULTIPLIER).max(interval + 1.0);
    let good = (interval * ease_factor).max(hard);
    let easy = (interval * ease_factor * EASY_BONUS).max(good);

    match grade {
        Grade::Again => Transition {
            learning_step: 0,
            interval: minutes_to_days(RELEARNING_STEPS[0]),
            phase: Phase::Relearning,
            ease_factor: lower_ease(ease_factor, LAPSE_EASE_DECREASE),
            ..carry
        },
        Grade::Hard => Transition {
            interval: hard,
            ease_factor: lower_ease(ease_factor, HARD_EASE_DECREASE),
            repetitions,
            ..carry
        },
        Grade::Good => Transition {
            interval: good,
            repetitions,
            ..carry
        },
        Grade::Easy => Transition {
            interval: easy,
            ease_factor: raise_ease(ease_factor),
            repetitions,
            ..carry
        },
    }
}

fn relearning(state: &MemoryState, grade: Grade, carry: Transition) -> Transition {
    let step = state.learning_step;
    let last = RELEARNING_STEPS.len() - 1;

    match grade {
        Grade::Again => Transition {
            learning_step: 0,
            interval: minutes_to_days(RELEARNING_STEPS[0]),
            ..carry
        },
        Grade::Hard => Transition {
            interval: minutes_to_days(step_minutes(&RELEARNING_STEPS, step) * HARD_STEP_MULTIPLIER),
            ..carry
        },
        Grade::Good if step < last => Transition {
            learning_step: step + 1,
            interval: minutes_to_days(RELEARNING_STEPS[step + 1]),
            ..carry
        },
        Grade::Good => Transition {
            learning_step: 0,
            interval: (state.interval * NEW_INTERVAL_AFTER_LAPSE).max(MINIMUM_INTERVAL),
            phase: Phase::Review,
            ..carry
        },
        Grade::Easy => Transition {
            learning_step: 0,
            interval: state.interval.max(MINIMUM_INTERVAL),
            phase: Phase::Review,
            ..carry
        },
    }
}
