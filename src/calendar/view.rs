//! Builds the calendar feed from daily summaries. No I/O and no clock.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::nutrition::{
    evaluate, weekly_series, DailySummary, DayKey, Evaluation, GoalThresholds, GoalType,
    NutritionError, UserGoalProfile, WeekPoint,
};

/// Longest span one calendar request may cover.
pub const MAX_SPAN_DAYS: i64 = 366;
/// Window shown when the client names no range: six weeks up to the reference day.
pub const DEFAULT_SPAN_DAYS: i64 = 42;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTile {
    pub date: DayKey,
    /// `None` when nothing was recorded that day.
    pub summary: Option<DailySummary>,
    #[serde(flatten)]
    pub evaluation: Evaluation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarView {
    pub goal: u32,
    pub goal_type: GoalType,
    pub days: Vec<DayTile>,
    pub week: Vec<WeekPoint>,
}

pub fn tile(
    thresholds: &GoalThresholds,
    profile: &UserGoalProfile,
    date: DayKey,
    summary: Option<DailySummary>,
) -> Result<DayTile, NutritionError> {
    let calories = summary.map_or(0.0, |s| s.calories);
    let evaluation = evaluate(
        thresholds,
        calories,
        f64::from(profile.daily_calorie_goal),
        profile.goal_type,
    )?;
    Ok(DayTile {
        date,
        summary,
        evaluation,
    })
}

/// One tile per day from `start` through `end`, plus the week ending on
/// `reference_day`.
pub fn build(
    thresholds: &GoalThresholds,
    profile: &UserGoalProfile,
    summaries: &BTreeMap<DayKey, DailySummary>,
    start: DayKey,
    end: DayKey,
    reference_day: DayKey,
) -> Result<CalendarView, NutritionError> {
    profile.daily_goal()?;

    let mut days = Vec::new();
    let mut cursor = Some(start);
    while let Some(day) = cursor.filter(|d| *d <= end) {
        days.push(tile(thresholds, profile, day, summaries.get(&day).copied())?);
        cursor = day.next();
    }

    let week = weekly_series(summaries, profile.daily_calorie_goal, reference_day)
        .ok_or_else(|| {
            NutritionError::DateOutOfRange(format!("no full week ends on {reference_day}"))
        })?;

    Ok(CalendarView {
        goal: profile.daily_calorie_goal,
        goal_type: profile.goal_type,
        days,
        week,
    })
}
