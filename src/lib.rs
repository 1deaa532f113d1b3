mod adaptive;
mod algorithm;
mod classic;
mod config;
mod due;
mod error;
mod grade;
mod interval;
mod scheduler;
mod selection;
mod state;
mod stepped;
#[cfg(test)]
mod test_helpers;

pub use adaptive::{DEFAULT_TARGET_RETENTION, DEFAULT_WEIGHTS, next_interval, retrievability};
pub use algorithm::{Algorithm, AlgorithmInfo, ReviewContext};
pub use config::SchedulerConfig;
pub use due::{error_rate, is_due, urgency};
pub use error::{Result, SchedulerError};
pub use grade::Grade;
pub use interval::{IntervalInfo, IntervalUnit, format_interval};
pub use scheduler::{NextStates, Previews, Scheduler};
pub use selection::{MASTERED_REPETITIONS, ProgressSummary, Reviewable, select_due, summarize};
pub use state::{
    DEFAULT_DIFFICULTY, MAXIMUM_INTERVAL, MINIMUM_EASE, MemoryState, Phase, STARTING_EASE,
};
