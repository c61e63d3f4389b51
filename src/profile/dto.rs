use serde::{Deserialize, Serialize};

use super::{
    energy::{recommended_calories, ActivityLevel, Gender},
    repo::ProfileRow,
};
use crate::error::AppError;
use crate::nutrition::{GoalType, NutritionError, UserGoalProfile};

#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub daily_calorie_goal: Option<i64>,
    pub goal_type: Option<GoalType>,
    pub activity_level: Option<ActivityLevel>,
}

impl ProfileUpdate {
    pub fn into_row(self) -> Result<ProfileRow, AppError> {
        for (field, value) in [("height_cm", self.height_cm), ("weight_kg", self.weight_kg)] {
            if value.is_some_and(|v| !v.is_finite() || v <= 0.0) {
                return Err(AppError::BadRequest(format!("{field} must be positive")));
            }
        }
        if self.age.is_some_and(|a| !(1..=150).contains(&a)) {
            return Err(AppError::BadRequest("age must be between 1 and 150".into()));
        }
        let daily_calorie_goal = match self.daily_calorie_goal {
            Some(goal) if goal <= 0 || goal > i64::from(i32::MAX) => {
                return Err(NutritionError::InvalidGoalConfig(format!(
                    "daily calorie goal must be a positive whole number, got {goal}"
                ))
                .into())
            }
            Some(goal) => Some(goal as i32),
            None => None,
        };

        Ok(ProfileRow {
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            age: self.age,
            gender: self.gender.map(|g| g.as_str().to_string()),
            daily_calorie_goal,
            goal_type: self.goal_type.map(|g| g.as_str().to_string()),
            activity_level: self.activity_level.map(|a| a.as_str().to_string()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: ProfileRow,
    /// Estimated daily need; absent until weight, height, age and gender are set.
    pub recommended_calories: Option<u32>,
}

impl From<ProfileRow> for ProfileResponse {
    fn from(profile: ProfileRow) -> Self {
        Self {
            recommended_calories: recommended_for(&profile),
            profile,
        }
    }
}

fn recommended_for(p: &ProfileRow) -> Option<u32> {
    let gender = p.gender.as_deref()?.parse::<Gender>().ok()?;
    let age = u32::try_from(p.age?).ok()?;
    let activity = p
        .activity_level
        .as_deref()
        .and_then(|a| a.parse::<ActivityLevel>().ok());
    Some(recommended_calories(gender, p.weight_kg?, p.height_cm?, age, activity))
}

/// Goal settings with defaults filled in for anything the user never set.
pub fn goal_profile(p: &ProfileRow) -> Result<UserGoalProfile, NutritionError> {
    let defaults = UserGoalProfile::default();
    let daily_calorie_goal = match p.daily_calorie_goal {
        None => defaults.daily_calorie_goal,
        Some(goal) => u32::try_from(goal)
            .ok()
            .filter(|g| *g > 0)
            .ok_or_else(|| {
                NutritionError::InvalidGoalConfig(format!("stored daily calorie goal {goal}"))
            })?,
    };
    let goal_type = match p.goal_type.as_deref() {
        None | Some("") => defaults.goal_type,
        Some(raw) => raw.parse()?,
    };
    Ok(UserGoalProfile {
        daily_calorie_goal,
        goal_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_profile_gets_default_goal() {
        let goal = goal_profile(&ProfileRow::default()).unwrap();
        assert_eq!(goal.daily_calorie_goal, 2000);
        assert_eq!(goal.goal_type, GoalType::Maintain);
    }

    #[test]
    fn stored_goal_is_used() {
        let row = ProfileRow {
            daily_calorie_goal: Some(1600),
            goal_type: Some("weight_loss".into()),
            ..ProfileRow::default()
        };
        let goal = goal_profile(&row).unwrap();
        assert_eq!(goal.daily_calorie_goal, 1600);
        assert_eq!(goal.goal_type, GoalType::WeightLoss);
    }

    #[test]
    fn corrupt_stored_goal_is_a_config_error() {
        let row = ProfileRow {
            daily_calorie_goal: Some(0),
            ..ProfileRow::default()
        };
        assert!(matches!(goal_profile(&row), Err(NutritionError::InvalidGoalConfig(_))));
    }

    #[test]
    fn update_rejects_non_positive_goal() {
        let update = ProfileUpdate {
            daily_calorie_goal: Some(0),
            ..ProfileUpdate::default()
        };
        let err = update.into_row().unwrap_err();
        assert!(matches!(err, AppError::Nutrition(NutritionError::InvalidGoalConfig(_))));
    }

    #[test]
    fn update_stores_wire_names() {
        let update: ProfileUpdate = serde_json::from_str(
            r#"{"height_cm":172,"weight_kg":68.5,"age":34,"gender":"female",
                "daily_calorie_goal":1800,"goal_type":"weight_gain","activity_level":"very_active"}"#,
        )
        .unwrap();
        let row = update.into_row().unwrap();
        assert_eq!(row.gender.as_deref(), Some("female"));
        assert_eq!(row.goal_type.as_deref(), Some("weight_gain"));
        assert_eq!(row.activity_level.as_deref(), Some("very_active"));
        assert_eq!(row.daily_calorie_goal, Some(1800));

        let response = ProfileResponse::from(row);
        assert!(response.recommended_calories.is_some());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["daily_calorie_goal"], 1800);
    }

    #[test]
    fn unknown_goal_type_is_rejected_on_input() {
        assert!(serde_json::from_str::<ProfileUpdate>(r#"{"goal_type":"bulk"}"#).is_err());
    }

    #[test]
    fn recommendation_needs_all_body_fields() {
        let row = ProfileRow {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            gender: Some("male".into()),
            ..ProfileRow::default()
        };
        assert_eq!(ProfileResponse::from(row).recommended_calories, None);
    }
}
