use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::ensure;
use strum::{Display, EnumIter, IntoStaticStr};

use crate::error::{InvalidArgumentSnafu, Result, SchedulerError};

/// The learner's self-assessment after seeing the answer.
///
/// Ordered from worst to best recall, so `Grade::Again < Grade::Easy`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
    Display, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    /// Quality on the six-point SM-2 scale (0-5).
    pub fn quality(self) -> u8 {
        match self {
            Grade::Again => 0,
            Grade::Hard => 2,
            Grade::Good => 3,
            Grade::Easy => 5,
        }
    }

    /// Rating on the four-point scale used by the adaptive model (1-4).
    pub fn rating(self) -> u8 {
        match self {
            Grade::Again => 1,
            Grade::Hard => 2,
            Grade::Good => 3,
            Grade::Easy => 4,
        }
    }

    /// Maps a legacy six-point quality score onto a grade.
    ///
    /// 0 is a total failure, 1-2 recalled with difficulty, 3 normal recall and
    /// 4-5 effortless recall.
    pub fn from_quality(quality: u8) -> Result<Self> {
        ensure!(
            quality <= 5,
            InvalidArgumentSnafu {
                reason: format!("quality must be within 0..=5, got {quality}"),
            }
        );
        Ok(match quality {
            0 => Grade::Again,
            1 | 2 => Grade::Hard,
            3 => Grade::Good,
            _ => Grade::Easy,
        })
    }

    pub fn is_correct(self) -> bool {
        self != Grade::Again
    }
}

impl TryFrom<u8> for Grade {
    type Error = SchedulerError;

    fn try_from(rating: u8) -> Result<Self> {
        match rating {
            1 => Ok(Grade::Again),
            2 => Ok(Grade::Hard),
            3 => Ok(Grade::Good),
            4 => Ok(Grade::Easy),
            _ => InvalidArgumentSnafu {
                reason: format!("rating must be within 1..=4, got {rating}"),
            }
            .fail(),
        }
    }
}

impl FromStr for Grade {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "again" => Ok(Grade::Again),
            "hard" => Ok(Grade::Hard),
            "good" => Ok(Grade::Good),
            "easy" => Ok(Grade::Easy),
            _ => InvalidArgumentSnafu {
                reason: format!("unknown grade {s:?}"),
            }
            .fail(),
        }
    }
}
