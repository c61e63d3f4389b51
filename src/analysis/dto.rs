use serde::Serialize;
use uuid::Uuid;

use crate::nutrition::{FoodItem, NewFoodRecord};

/// Daily reference values used for the "% of daily value" figures.
const DV_PROTEIN_G: f64 = 50.0;
const DV_CARBS_G: f64 = 300.0;
const DV_FAT_G: f64 = 65.0;
const DV_FIBER_G: f64 = 25.0;
const DV_SODIUM_MG: f64 = 2300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyValuePercentages {
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
    pub fiber: i64,
    pub sodium: i64,
}

#[derive(Debug, Serialize)]
pub struct NutritionAnalysis {
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub total_fiber: f64,
    pub total_sugar: f64,
    pub total_sodium: f64,
    pub daily_value: DailyValuePercentages,
    pub foods: Vec<FoodItem>,
    /// Set when the analysis was stored for the signed-in user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<Uuid>,
}

impl NutritionAnalysis {
    pub fn from_record(record: &NewFoodRecord, record_id: Option<Uuid>) -> Self {
        let t = &record.totals;
        Self {
            total_calories: t.calories(),
            total_protein: t.protein(),
            total_carbs: t.carbs(),
            total_fat: t.fat(),
            total_fiber: t.fiber(),
            total_sugar: t.sugar(),
            total_sodium: t.sodium(),
            daily_value: daily_value_percentages(record),
            foods: record.foods.clone(),
            record_id,
        }
    }
}

pub fn daily_value_percentages(record: &NewFoodRecord) -> DailyValuePercentages {
    let pct = |value: f64, reference: f64| (value / reference * 100.0).round() as i64;
    let t = &record.totals;
    DailyValuePercentages {
        protein: pct(t.protein(), DV_PROTEIN_G),
        carbs: pct(t.carbs(), DV_CARBS_G),
        fat: pct(t.fat(), DV_FAT_G),
        fiber: pct(t.fiber(), DV_FIBER_G),
        sodium: pct(t.sodium(), DV_SODIUM_MG),
    }
}
