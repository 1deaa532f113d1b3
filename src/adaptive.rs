//! Adaptive scheduling from a stability/difficulty memory model.
//!
//! - Retrievability after `t` days: R = 0.9^(t / S)
//! - Interval for a requested retention r: I = S × ln(r) / ln(0.9)
//!
//! Stability S is the number of days until recall probability falls to 90%;
//! difficulty D in [1, 10] is how hard the item is for this learner.

use chrono::{DateTime, Utc};
use log::warn;

use crate::algorithm::ReviewContext;
use crate::grade::Grade;
use crate::state::{
    D_MAX, D_MIN, MAXIMUM_INTERVAL, MILLIS_PER_DAY, MINIMUM_EASE, MemoryState, Phase, Transition,
    minutes_to_days,
};

/// Default model weights. Normally fitted to a learner's review history; fixed
/// here so schedules are reproducible.
pub const DEFAULT_WEIGHTS: [f64; 17] = [
    0.4, 0.6, 2.4, 5.8, // initial stability per rating
    4.93, 0.94, 0.86, 0.01, // difficulty
    1.49, 0.14, 0.94, // stability after success
    2.18, 0.05, 0.34, 1.26, // stability after failure
    0.29, 2.61, // hard penalty, easy bonus
];

pub const DEFAULT_TARGET_RETENTION: f64 = 0.9;

const S_MIN: f64 = 0.1;
const HARD_INTERVAL_FACTOR: f64 = 0.8;
const EASY_INTERVAL_FACTOR: f64 = 1.3;
const RELEARN_STABILITY_FACTOR: f64 = 0.5;
const AGAIN_STEP_MINUTES: f64 = 1.0;
const SHORT_STEP_MINUTES: f64 = 10.0;

fn w(i: usize) -> f64 {
    DEFAULT_WEIGHTS[i]
}

fn rating(grade: Grade) -> f64 {
    f64::from(grade.rating())
}

pub(crate) fn init_stability(grade: Grade) -> f64 {
    w(usize::from(grade.rating()) - 1)
}

pub(crate) fn init_difficulty(grade: Grade) -> f64 {
    (w(4) - (rating(grade) - 3.0) * w(5)).clamp(D_MIN, D_MAX)
}

/// Moves difficulty against the grade, then pulls it slightly back toward the
/// initial difficulty so long runs of one grade level off.
pub(crate) fn next_difficulty(difficulty: f64, grade: Grade) -> f64 {
    let delta = -w(6) * (rating(grade) - 3.0);
    let mean_reversion = w(7) * (w(4) - difficulty);
    (difficulty + delta + mean_reversion).clamp(D_MIN, D_MAX)
}

/// S' = S × (1 + e^w8 × (11 - D) × S^-w9 × (e^(w10 × (1 - R)) - 1) × penalty × bonus)
pub(crate) fn stability_after_success(d: f64, s: f64, r: f64, grade: Grade) -> f64 {
    let hard_penalty = if grade == Grade::Hard { w(15) } else { 1.0 };
    let easy_bonus = if grade == Grade::Easy { w(16) } else { 1.0 };
    let growth = w(8).exp()
        * (11.0 - d)
        * s.powf(-w(9))
        * ((w(10) * (1.0 - r)).exp() - 1.0)
        * hard_penalty
        * easy_bonus;
    s * (1.0 + growth)
}

/// S' = w11 × D^-w12 × ((S + 1)^w13 - 1) × e^(w14 × (1 - R)), never above S.
pub(crate) fn stability_after_failure(d: f64, s: f64, r: f64) -> f64 {
    let new_s = w(11) * d.powf(-w(12)) * ((s + 1.0).powf(w(13)) - 1.0) * (w(14) * (1.0 - r)).exp();
    new_s.min(s).max(S_MIN)
}

pub(crate) fn power_forgetting_curve(elapsed_days: f64, stability: f64) -> f64 {
    0.9f64.powf(elapsed_days / stability.max(S_MIN))
}

/// Days until retrievability decays to `target_retention`, at least one.
pub fn next_interval(stability: f64, target_retention: f64) -> f64 {
    (stability * target_retention.ln() / 0.9f64.ln()).max(1.0)
}

fn scheduled_interval(stability: f64, grade: Grade, target_retention: f64) -> f64 {
    let interval = next_interval(stability, target_retention);
    let scaled = match grade {
        Grade::Hard => interval * HARD_INTERVAL_FACTOR,
        Grade::Easy => interval * EASY_INTERVAL_FACTOR,
        Grade::Again | Grade::Good => interval,
    };
    scaled.min(MAXIMUM_INTERVAL)
}

/// Display ease derived from difficulty: D = 1 maps to 2.38, D = 10 to 1.3.
fn ease_from_difficulty(difficulty: f64) -> f64 {
    MINIMUM_EASE + (10.0 - difficulty) / 10.0 * 1.2
}

/// Fractional days since the start of the last review day, 0 when the item
/// has never been reviewed.
fn elapsed_days(state: &MemoryState, now: DateTime<Utc>) -> f64 {
    state
        .last_review_date
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| (now - midnight.and_utc()).num_milliseconds() as f64 / MILLIS_PER_DAY)
        .unwrap_or(0.0)
        .max(0.0)
}

/// Probability of recalling the item at `now`, or `None` before the model
/// has a stability for it.
pub fn retrievability(state: &MemoryState, now: DateTime<Utc>) -> Option<f64> {
    (state.stability > 0.0 && state.stability.is_finite())
        .then(|| power_forgetting_curve(elapsed_days(state, now), state.stability))
}

pub(crate) fn transition(state: &MemoryState, grade: Grade, ctx: &ReviewContext) -> Transition {
    let carry = Transition::carry(state, grade.is_correct());
    let target = ctx.target_retention;

    let transition = if state.phase == Phase::New || state.stability == 0.0 {
        let stability = init_stability(grade);
        let carry = Transition {
            stability,
            difficulty: init_difficulty(grade),
            ..carry
        };
        match grade {
            Grade::Again => Transition {
                interval: minutes_to_days(AGAIN_STEP_MINUTES),
                phase: Phase::Learning,
                ..carry
            },
            _ => Transition {
                interval: scheduled_interval(stability, grade, target),
                phase: Phase::Review,
                repetitions: 1,
                ..carry
            },
        }
    } else if matches!(state.phase, Phase::Learning | Phase::Relearning) {
        match grade {
            Grade::Again => Transition {
                interval: minutes_to_days(AGAIN_STEP_MINUTES),
                stability: state.stability * RELEARN_STABILITY_FACTOR,
                ..carry
            },
            Grade::Hard => Transition {
                interval: minutes_to_days(SHORT_STEP_MINUTES),
                ..carry
            },
            Grade::Good | Grade::Easy => Transition {
                interval: scheduled_interval(state.stability, grade, target),
                phase: Phase::Review,
                repetitions: state.repetitions.saturating_add(1),
                ..carry
            },
        }
    } else {
        if state.last_review_date.is_none() {
            warn!(
                "review item {} has no last review date, assuming no elapsed time",
                state.item_id
            );
        }
        let r = power_forgetting_curve(elapsed_days(state, ctx.now), state.stability);
        let difficulty = next_difficulty(state.difficulty, grade);
        match grade {
            Grade::Again => Transition {
                stability: stability_after_failure(state.difficulty, state.stability, r),
                difficulty,
                interval: minutes_to_days(SHORT_STEP_MINUTES),
                phase: Phase::Relearning,
                learning_step: 0,
                ..carry
            },
            _ => {
                let stability =
                    stability_after_success(state.difficulty, state.stability, r, grade);
                Transition {
                    stability,
                    difficulty,
                    interval: scheduled_interval(stability, grade, target),
                    repetitions: state.repetitions.saturating_add(1),
                    ..carry
                }
            }
        }
    };

    Transition {
        ease_factor: ease_from_difficulty(transition.difficulty),
        ..transition
    }
}
