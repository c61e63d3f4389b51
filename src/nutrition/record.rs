use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::NutritionError;

/// One food the vision model recognised in a photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default)]
    pub sugar: f64,
    #[serde(default)]
    pub sodium: f64,
    #[serde(default)]
    pub confidence: f64,
}

impl FoodItem {
    pub fn validate(&self) -> Result<(), NutritionError> {
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
            ("fiber", self.fiber),
            ("sugar", self.sugar),
            ("sodium", self.sodium),
        ] {
            check_amount(&self.name, field, value)?;
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(NutritionError::InvalidRecord(format!(
                "{}: confidence {} outside [0, 1]",
                self.name, self.confidence
            )));
        }
        Ok(())
    }
}

/// Validated, non-negative macro totals of one record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MacroTotals {
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    fiber: f64,
    sugar: f64,
    sodium: f64,
}

impl MacroTotals {
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Result<Self, NutritionError> {
        Self::with_details(calories, protein, carbs, fat, 0.0, 0.0, 0.0)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_details(
        calories: f64,
        protein: f64,
        carbs: f64,
        fat: f64,
        fiber: f64,
        sugar: f64,
        sodium: f64,
    ) -> Result<Self, NutritionError> {
        for (field, value) in [
            ("total_calories", calories),
            ("total_protein", protein),
            ("total_carbs", carbs),
            ("total_fat", fat),
            ("total_fiber", fiber),
            ("total_sugar", sugar),
            ("total_sodium", sodium),
        ] {
            check_amount("record", field, value)?;
        }
        Ok(Self { calories, protein, carbs, fat, fiber, sugar, sodium })
    }

    /// Validates and sums the items.
    pub fn from_items(items: &[FoodItem]) -> Result<Self, NutritionError> {
        let mut totals = Self::default();
        for item in items {
            item.validate()?;
            totals.calories += item.calories;
            totals.protein += item.protein;
            totals.carbs += item.carbs;
            totals.fat += item.fat;
            totals.fiber += item.fiber;
            totals.sugar += item.sugar;
            totals.sodium += item.sodium;
        }
        // sums can still overflow to infinity
        Self::with_details(
            totals.calories,
            totals.protein,
            totals.carbs,
            totals.fat,
            totals.fiber,
            totals.sugar,
            totals.sodium,
        )
    }

    pub fn calories(&self) -> f64 {
        self.calories
    }
    pub fn protein(&self) -> f64 {
        self.protein
    }
    pub fn carbs(&self) -> f64 {
        self.carbs
    }
    pub fn fat(&self) -> f64 {
        self.fat
    }
    pub fn fiber(&self) -> f64 {
        self.fiber
    }
    pub fn sugar(&self) -> f64 {
        self.sugar
    }
    pub fn sodium(&self) -> f64 {
        self.sodium
    }
}

/// One analysed meal. Immutable once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodRecord {
    pub id: Uuid,
    pub recorded_at: OffsetDateTime,
    pub totals: MacroTotals,
    pub foods: Vec<FoodItem>,
}

impl FoodRecord {
    pub fn new(
        id: Uuid,
        recorded_at: OffsetDateTime,
        totals: MacroTotals,
        foods: Vec<FoodItem>,
    ) -> Self {
        Self { id, recorded_at, totals, foods }
    }
}

/// A record about to be persisted, built from a successful analysis.
#[derive(Debug, Clone)]
pub struct NewFoodRecord {
    pub totals: MacroTotals,
    pub foods: Vec<FoodItem>,
    pub image_key: Option<String>,
}

impl NewFoodRecord {
    pub fn from_items(foods: Vec<FoodItem>) -> Result<Self, NutritionError> {
        if foods.is_empty() {
            return Err(NutritionError::InvalidRecord("no food items".into()));
        }
        let totals = MacroTotals::from_items(&foods)?;
        Ok(Self { totals, foods, image_key: None })
    }
}

fn check_amount(owner: &str, field: &str, value: f64) -> Result<(), NutritionError> {
    if !value.is_finite() || value < 0.0 {
        return Err(NutritionError::InvalidRecord(format!(
            "{owner}: {field} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}
