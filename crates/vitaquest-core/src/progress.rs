//! Goal progress derivation.
//!
//! Pure functions over a start date and a duration (amount + unit); no
//! stored state. The `*_at` functions take `now` explicitly so callers and
//! tests control the clock; the short names use `Utc::now()`.

use std::fmt;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

/// Unit of a goal duration.
///
/// `Unknown` absorbs any unit string the store does not recognize; date
/// arithmetic treats it as a no-op rather than an error, matching the
/// tolerance of the persisted data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DurationUnit {
    #[default]
    Days,
    Weeks,
    Months,
    #[serde(other)]
    Unknown,
}

/// A goal's intended duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDuration {
    pub amount: u32,
    pub unit: DurationUnit,
}

impl GoalDuration {
    pub fn new(amount: u32, unit: DurationUnit) -> Self {
        Self { amount, unit }
    }
}

/// Elapsed-ratio progress for a running goal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    /// Elapsed fraction of the goal window, clamped to `[0, 1]`.
    pub ratio: f64,
    pub is_finished: bool,
}

/// End date for a goal started at `start`.
///
/// Days add `amount` days, weeks `amount * 7` days, months `amount`
/// calendar months. Unknown units leave the date unchanged.
pub fn end_date(start: DateTime<Utc>, amount: u32, unit: DurationUnit) -> DateTime<Utc> {
    match unit {
        DurationUnit::Days => start + Duration::days(i64::from(amount)),
        DurationUnit::Weeks => start + Duration::days(i64::from(amount) * 7),
        DurationUnit::Months => start
            .checked_add_months(Months::new(amount))
            .unwrap_or(start),
        DurationUnit::Unknown => start,
    }
}

/// Progress of a goal window at `now`.
///
/// A zero-length window (`end == start`, which includes unknown units)
/// counts as immediately finished with ratio 1.
pub fn progress_at(
    start: DateTime<Utc>,
    duration: GoalDuration,
    now: DateTime<Utc>,
) -> GoalProgress {
    let end = end_date(start, duration.amount, duration.unit);
    if end <= start {
        return GoalProgress {
            ratio: 1.0,
            is_finished: true,
        };
    }
    let total = (end - start).num_milliseconds() as f64;
    let elapsed = (now - start).num_milliseconds() as f64;
    GoalProgress {
        ratio: (elapsed / total).clamp(0.0, 1.0),
        is_finished: now >= end,
    }
}

/// Progress at the current wall clock.
pub fn progress(start: DateTime<Utc>, duration: GoalDuration) -> GoalProgress {
    progress_at(start, duration, Utc::now())
}

/// Remaining time re-expressed in the goal's original unit.
///
/// This is the localization seam: consumers render the variant however
/// their locale requires; the `Display` impl is the English default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLeft {
    Completed,
    Days(i64),
    Weeks(i64),
    Months(i64),
}

/// Time remaining until `end`, expressed in `unit`.
///
/// Remaining days are rounded up; weeks divide by 7 and months by 30,
/// both rounded up. Unknown units fall back to days.
pub fn time_left_at(end: DateTime<Utc>, unit: DurationUnit, now: DateTime<Utc>) -> TimeLeft {
    if now >= end {
        return TimeLeft::Completed;
    }
    let secs = (end - now).num_seconds();
    let days_left = (secs + 86_399) / 86_400;
    match unit {
        DurationUnit::Days | DurationUnit::Unknown => TimeLeft::Days(days_left),
        DurationUnit::Weeks => TimeLeft::Weeks((days_left + 6) / 7),
        DurationUnit::Months => TimeLeft::Months((days_left + 29) / 30),
    }
}

/// Time remaining at the current wall clock.
pub fn time_left(end: DateTime<Utc>, unit: DurationUnit) -> TimeLeft {
    time_left_at(end, unit, Utc::now())
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLeft::Completed => write!(f, "Completed"),
            TimeLeft::Days(1) => write!(f, "1 day left"),
            TimeLeft::Days(n) => write!(f, "{n} days left"),
            TimeLeft::Weeks(1) => write!(f, "1 week left"),
            TimeLeft::Weeks(n) => write!(f, "{n} weeks left"),
            TimeLeft::Months(1) => write!(f, "1 month left"),
            TimeLeft::Months(n) => write!(f, "{n} months left"),
        }
    }
}
