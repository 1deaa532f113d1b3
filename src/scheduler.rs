use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::algorithm::{Algorithm, ReviewContext};
use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::grade::Grade;
use crate::interval::{IntervalInfo, format_interval};
use crate::state::MemoryState;

/// Candidate states for every possible answer.
#[derive(Debug, Clone, PartialEq)]
pub struct NextStates {
    pub again: MemoryState,
    pub hard: MemoryState,
    pub good: MemoryState,
    pub easy: MemoryState,
}

impl NextStates {
    pub fn get(&self, grade: Grade) -> &MemoryState {
        match grade {
            Grade::Again => &self.again,
            Grade::Hard => &self.hard,
            Grade::Good => &self.good,
            Grade::Easy => &self.easy,
        }
    }
}

/// Formatted intervals shown on the answer buttons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Previews {
    pub again: IntervalInfo,
    pub hard: IntervalInfo,
    pub good: IntervalInfo,
    pub easy: IntervalInfo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Scheduler for a stored algorithm identifier with the default target
    /// retention. Unknown identifiers select the default algorithm.
    pub fn from_algorithm_id(id: &str) -> Self {
        Self {
            config: SchedulerConfig {
                algorithm: Algorithm::from_id(id),
                ..Default::default()
            },
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn algorithm(&self) -> Algorithm {
        self.config.algorithm
    }

    fn context(&self, now: DateTime<Utc>) -> ReviewContext {
        ReviewContext {
            now,
            target_retention: self.config.target_retention,
        }
    }

    pub fn next_state(&self, state: &MemoryState, grade: Grade, now: DateTime<Utc>) -> MemoryState {
        self.config
            .algorithm
            .next_state(state, grade, &self.context(now))
    }

    /// Answers on the six-point 0-5 quality scale.
    pub fn next_state_with_quality(
        &self,
        state: &MemoryState,
        quality: u8,
        now: DateTime<Utc>,
    ) -> Result<MemoryState> {
        let grade = Grade::from_quality(quality)?;
        Ok(self.next_state(state, grade, now))
    }

    /// Answers with a grade name such as `"good"`.
    pub fn next_state_by_name(
        &self,
        state: &MemoryState,
        grade: &str,
        now: DateTime<Utc>,
    ) -> Result<MemoryState> {
        let grade = grade.parse()?;
        Ok(self.next_state(state, grade, now))
    }

    /// Records a right/wrong answer, starting a fresh state for an item seen
    /// for the first time.
    pub fn record_answer(
        &self,
        existing: Option<&MemoryState>,
        item_id: &str,
        correct: bool,
        now: DateTime<Utc>,
    ) -> MemoryState {
        let grade = if correct { Grade::Good } else { Grade::Again };
        match existing {
            Some(state) => self.next_state(state, grade, now),
            None => self.next_state(&MemoryState::new(item_id, now), grade, now),
        }
    }

    pub fn next_states(&self, state: &MemoryState, now: DateTime<Utc>) -> NextStates {
        let ctx = self.context(now);
        let next = |grade| self.config.algorithm.next_state(state, grade, &ctx);
        NextStates {
            again: next(Grade::Again),
            hard: next(Grade::Hard),
            good: next(Grade::Good),
            easy: next(Grade::Easy),
        }
    }

    /// Intervals each answer would schedule, without committing any of them.
    /// Always ordered again <= hard <= good <= easy.
    pub fn preview(&self, state: &MemoryState, now: DateTime<Utc>) -> Previews {
        let next = self.next_states(state, now);
        Previews {
            again: format_interval(next.again.interval),
            hard: format_interval(next.hard.interval),
            good: format_interval(next.good.interval),
            easy: format_interval(next.easy.interval),
        }
    }
}
