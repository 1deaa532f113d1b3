use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::adaptive::DEFAULT_TARGET_RETENTION;
use crate::algorithm::Algorithm;
use crate::error::{InvalidArgumentSnafu, Result};

/// Learner-level scheduling settings, stored as
/// `{"algorithm": "fsrs", "targetRetention": 0.9}`.
///
/// Missing fields take their defaults and an unrecognised algorithm
/// identifier selects [`Algorithm::LearningSteps`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    pub algorithm: Algorithm,
    /// Only read by [`Algorithm::Adaptive`].
    pub target_retention: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            target_retention: DEFAULT_TARGET_RETENTION,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<()> {
        let retention = self.target_retention;
        ensure!(
            retention.is_finite() && retention > 0.0 && retention < 1.0,
            InvalidArgumentSnafu {
                reason: format!("target retention must be in (0, 1), got {retention}"),
            }
        );
        Ok(())
    }
}
