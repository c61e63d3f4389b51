use serde::{Deserialize, Serialize};

use crate::nutrition::{DailySummary, DayKey, Evaluation, GoalType};
use crate::records::FoodRecordView;

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub start: Option<DayKey>,
    pub end: Option<DayKey>,
    pub reference_day: Option<DayKey>,
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub utc_offset_minutes: Option<i32>,
}

/// Daily detail panel: the day's totals and the meals behind them.
#[derive(Debug, Serialize)]
pub struct DayDetail {
    pub date: DayKey,
    pub goal: u32,
    pub goal_type: GoalType,
    pub summary: Option<DailySummary>,
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub records: Vec<FoodRecordView>,
}
