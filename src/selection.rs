use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;

use crate::due::{error_rate, is_due, urgency};
use crate::state::MemoryState;

/// Items answered correctly this many times in a row count as mastered.
pub const MASTERED_REPETITIONS: u32 = 3;

/// Anything that can be looked up in a map of memory states.
pub trait Reviewable {
    fn item_id(&self) -> &str;
}

impl Reviewable for String {
    fn item_id(&self) -> &str {
        self
    }
}

impl Reviewable for &str {
    fn item_id(&self) -> &str {
        self
    }
}

impl Reviewable for MemoryState {
    fn item_id(&self) -> &str {
        &self.item_id
    }
}

/// Returns the items due for review at `now`, most overdue first, ties broken
/// by the higher historical error rate. Items without a memory state have
/// never been studied and are not returned.
pub fn select_due<'a, T>(
    items: &'a [T],
    states: &HashMap<String, MemoryState>,
    now: DateTime<Utc>,
) -> Vec<&'a T>
where
    T: Reviewable + Sync,
{
    let mut due: Vec<(&T, f64, f64)> = items
        .par_iter()
        .filter_map(|item| {
            let state = states.get(item.item_id())?;
            is_due(state, now).then(|| (item, urgency(state, now), error_rate(state)))
        })
        .collect();
    due.sort_by(|(_, u1, e1), (_, u2, e2)| u2.total_cmp(u1).then_with(|| e2.total_cmp(e1)));
    due.into_iter().map(|(item, ..)| item).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub total: usize,
    /// Items with a memory state.
    pub learned: usize,
    pub mastered: usize,
    pub review_due: usize,
}

pub fn summarize<T>(
    items: &[T],
    states: &HashMap<String, MemoryState>,
    now: DateTime<Utc>,
) -> ProgressSummary
where
    T: Reviewable + Sync,
{
    items
        .par_iter()
        .map(|item| match states.get(item.item_id()) {
            None => ProgressSummary {
                total: 1,
                ..Default::default()
            },
            Some(state) => ProgressSummary {
                total: 1,
                learned: 1,
                mastered: usize::from(state.repetitions >= MASTERED_REPETITIONS),
                review_due: usize::from(is_due(state, now)),
            },
        })
        .reduce(ProgressSummary::default, |a, b| ProgressSummary {
            total: a.total + b.total,
            learned: a.learned + b.learned,
            mastered: a.mastered + b.mastered,
            review_due: a.review_due + b.review_due,
        })
}
