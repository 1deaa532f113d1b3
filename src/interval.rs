use std::fmt;

use serde::Serialize;
use strum::{Display, IntoStaticStr};

use crate::state::MINUTES_PER_DAY;

const DAYS_PER_MONTH: f64 = 30.0;
const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IntervalUnit {
    Minutes,
    Hours,
    Days,
    Months,
    Years,
}

impl IntervalUnit {
    fn suffix(self) -> &'static str {
        match self {
            IntervalUnit::Minutes => "m",
            IntervalUnit::Hours => "h",
            IntervalUnit::Days => "d",
            IntervalUnit::Months => "mo",
            IntervalUnit::Years => "y",
        }
    }
}

/// An interval bucketed into a single unit for display, e.g. `10m`, `4d`
/// or `1.5mo`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalInfo {
    pub label: String,
    pub unit: IntervalUnit,
    /// Quantity in `unit`. Months and years keep one decimal.
    pub value: f64,
    pub minutes: f64,
    pub days: f64,
}

impl fmt::Display for IntervalInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.label)
    }
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Formats an interval given in days.
pub fn format_interval(days: f64) -> IntervalInfo {
    let days = if days.is_finite() && days > 0.0 {
        days
    } else {
        0.0
    };
    let mut minutes = (days * MINUTES_PER_DAY).round();

    let (unit, value) = if minutes < 60.0 {
        minutes = minutes.max(1.0);
        (IntervalUnit::Minutes, minutes)
    } else if minutes < MINUTES_PER_DAY {
        (IntervalUnit::Hours, (minutes / 60.0).round())
    } else if days < DAYS_PER_MONTH {
        (IntervalUnit::Days, days.round())
    } else if days < DAYS_PER_YEAR {
        (IntervalUnit::Months, one_decimal(days / DAYS_PER_MONTH))
    } else {
        (IntervalUnit::Years, one_decimal(days / DAYS_PER_YEAR))
    };

    IntervalInfo {
        label: format!("{value}{}", unit.suffix()),
        unit,
        value,
        minutes,
        days,
    }
}
