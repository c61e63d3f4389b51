use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::StoredFoodRecord;
use crate::nutrition::{DayKey, FoodItem};

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub start: Option<DayKey>,
    pub end: Option<DayKey>,
    pub utc_offset_minutes: Option<i32>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

#[derive(Debug, Serialize)]
pub struct FoodRecordView {
    pub id: Uuid,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub total_fiber: f64,
    pub total_sugar: f64,
    pub total_sodium: f64,
    pub foods: Vec<FoodItem>,
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl FoodRecordView {
    pub fn new(stored: StoredFoodRecord, photo_url: Option<String>) -> Self {
        let r = stored.record;
        let t = r.totals;
        Self {
            id: r.id,
            total_calories: t.calories(),
            total_protein: t.protein(),
            total_carbs: t.carbs(),
            total_fat: t.fat(),
            total_fiber: t.fiber(),
            total_sugar: t.sugar(),
            total_sodium: t.sodium(),
            foods: r.foods,
            recorded_at: r.recorded_at,
            photo_url,
        }
    }
}
