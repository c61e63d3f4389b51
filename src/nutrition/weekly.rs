use std::collections::BTreeMap;

use serde::Serialize;

use super::{DailySummary, DayKey};

pub const WEEK_LEN: usize = 7;

/// One bar pair in the weekly chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekPoint {
    pub day: DayKey,
    pub weekday: &'static str,
    pub calories: i64,
    pub goal: u32,
}

/// Seven points from `reference_day - 6` through `reference_day`, oldest first.
/// Days without a summary contribute zero calories.
///
/// `None` when the window would start before the earliest representable date.
pub fn weekly_series(
    summaries: &BTreeMap<DayKey, DailySummary>,
    goal: u32,
    reference_day: DayKey,
) -> Option<Vec<WeekPoint>> {
    let first = reference_day.days_before(WEEK_LEN as i64 - 1)?;
    let points = std::iter::successors(Some(first), |day| day.next())
        .take(WEEK_LEN)
        .map(|day| WeekPoint {
            day,
            weekday: day.weekday_label(),
            calories: summaries
                .get(&day)
                .map(|s| s.calories.round() as i64)
                .unwrap_or(0),
            goal,
        })
        .collect();
    Some(points)
}
