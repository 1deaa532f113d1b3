use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::adaptive::{self, DEFAULT_TARGET_RETENTION};
use crate::grade::Grade;
use crate::state::MemoryState;
use crate::{classic, stepped};

/// Everything besides the state and the grade that a scheduling step may
/// depend on. Time is always passed in, never read from the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewContext {
    pub now: DateTime<Utc>,
    /// Recall probability the adaptive algorithm schedules for.
    pub target_retention: f64,
}

impl ReviewContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            target_retention: DEFAULT_TARGET_RETENTION,
        }
    }
}

/// The scheduling algorithms. The string form is the identifier stored in
/// learner settings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, EnumIter, Display, IntoStaticStr,
)]
pub enum Algorithm {
    #[serde(rename = "sm2")]
    #[strum(serialize = "sm2")]
    Classic,
    #[default]
    #[serde(rename = "sm2_anki")]
    #[strum(serialize = "sm2_anki")]
    LearningSteps,
    #[serde(rename = "fsrs")]
    #[strum(serialize = "fsrs")]
    Adaptive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Classic,
        Algorithm::LearningSteps,
        Algorithm::Adaptive,
    ];

    pub fn id(self) -> &'static str {
        self.into()
    }

    /// Resolves a stored identifier. Unknown identifiers select the default
    /// algorithm instead of failing.
    pub fn from_id(id: &str) -> Self {
        Algorithm::iter()
            .find(|algorithm| algorithm.id() == id)
            .unwrap_or_else(|| {
                let fallback = Algorithm::default();
                warn!("unknown algorithm {id:?}, falling back to {fallback}");
                fallback
            })
    }

    /// Descriptions of every algorithm, for settings screens.
    pub fn catalog() -> Vec<AlgorithmInfo> {
        Algorithm::ALL.into_iter().map(Algorithm::info).collect()
    }

    pub fn info(self) -> AlgorithmInfo {
        let (name, description) = match self {
            Algorithm::Classic => (
                "SM2 (SuperMemo 2)",
                "Classic algorithm from 1987. I(1)=1day, I(2)=6days, I(n)=I(n-1)×EF. \
                 Simple and predictable.",
            ),
            Algorithm::LearningSteps => (
                "SM2 with learning steps (Recommended)",
                "SM2 with short learning steps (1min → 10min → 1day) before review, \
                 and a relearning step with reduced ease after a lapse.",
            ),
            Algorithm::Adaptive => (
                "Adaptive (stability/difficulty)",
                "Tracks stability S and difficulty D. Forgetting curve R=0.9^(t/S). \
                 Interval I=S×ln(r)/ln(0.9) for target retention r.",
            ),
        };
        AlgorithmInfo {
            id: self.id(),
            name,
            description,
        }
    }

    /// Computes the state after answering `grade`. `state` is left untouched.
    pub fn next_state(self, state: &MemoryState, grade: Grade, ctx: &ReviewContext) -> MemoryState {
        let state = state.sanitized();
        let transition = match self {
            Algorithm::Classic => classic::transition(&state, grade),
            Algorithm::LearningSteps => stepped::transition(&state, grade),
            Algorithm::Adaptive => adaptive::transition(&state, grade, ctx),
        };
        let next = state.apply(transition, ctx.now);
        debug!(
            "{self} {}: {grade} moved {} -> {}, interval {:.4} days",
            state.item_id, state.phase, next.phase, next.interval
        );
        next
    }
}

impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = String::deserialize(deserializer)?;
        Ok(Algorithm::from_id(&id))
    }
}
