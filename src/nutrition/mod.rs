//! Daily aggregation and goal evaluation over a user's food records.
//!
//! Everything here is pure: callers fetch records and settings, pass them in,
//! and get derived values back. No I/O, no clock reads.

mod aggregate;
mod day_key;
mod evaluate;
mod record;
mod weekly;

pub use aggregate::{aggregate, records_on_day, DailySummary};
pub use day_key::DayKey;
pub use evaluate::{evaluate, Band, DailyGoal, Evaluation, GoalThresholds, GoalType};
pub use record::{FoodItem, FoodRecord, MacroTotals, NewFoodRecord};
pub use weekly::{weekly_series, WeekPoint, WEEK_LEN};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NutritionError {
    #[error("invalid goal configuration: {0}")]
    InvalidGoalConfig(String),
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error("date out of range: {0}")]
    DateOutOfRange(String),
}

/// Goal settings as the evaluator consumes them. Defaults are applied by the
/// profile adapter, never inside the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct UserGoalProfile {
    pub daily_calorie_goal: u32,
    pub goal_type: GoalType,
}

impl UserGoalProfile {
    pub const DEFAULT_DAILY_CALORIES: u32 = 2000;

    pub fn daily_goal(&self) -> Result<DailyGoal, NutritionError> {
        DailyGoal::new(f64::from(self.daily_calorie_goal))
    }
}

impl Default for UserGoalProfile {
    fn default() -> Self {
        Self {
            daily_calorie_goal: Self::DEFAULT_DAILY_CALORIES,
            goal_type: GoalType::Maintain,
        }
    }
}
