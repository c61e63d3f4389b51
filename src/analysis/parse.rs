use lazy_static::lazy_static;
use regex::Regex;

use super::AnalysisError;
use crate::nutrition::FoodItem;

lazy_static! {
    static ref FENCED_JSON: Regex = Regex::new(r"(?s)```(?:json)?\s*\n(.*?)\n\s*```").unwrap();
    static ref BARE_ARRAY: Regex = Regex::new(r"(?s)\[.*\]").unwrap();
}

/// Pulls the food list out of the model's free-text answer.
///
/// Tries a fenced ```json block first, then the outermost `[...]`, then the
/// whole answer. An empty list is reported as `Unrecognized`.
pub fn parse_food_items(answer: &str) -> Result<Vec<FoodItem>, AnalysisError> {
    let candidate = FENCED_JSON
        .captures(answer)
        .and_then(|c| c.get(1))
        .or_else(|| BARE_ARRAY.find(answer))
        .map(|m| m.as_str())
        .unwrap_or(answer)
        .trim();

    let items: Vec<FoodItem> = serde_json::from_str(candidate)?;
    if items.is_empty() {
        return Err(AnalysisError::Unrecognized);
    }
    Ok(items)
}
