use serde::Deserialize;

use super::repo::NewGoal;
use crate::{error::AppError, nutrition::DayKey};

#[derive(Debug, Deserialize)]
pub struct CreateGoalBody {
    pub title: String,
    pub description: String,
    pub reason: String,
    pub target_date: Option<DayKey>,
    pub before_image: Option<String>,
    pub reward: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}
fn active_by_default() -> bool {
    true
}

impl CreateGoalBody {
    pub fn validated(&self) -> Result<NewGoal<'_>, AppError> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("reason", &self.reason),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::BadRequest(format!("{field} is required")));
            }
        }
        Ok(NewGoal {
            title: self.title.trim(),
            description: self.description.trim(),
            reason: self.reason.trim(),
            target_date: self.target_date.map(DayKey::date),
            before_image: non_blank(&self.before_image),
            reward: non_blank(&self.reward),
            is_active: self.is_active,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct UpdateGoalBody {
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn create_defaults_to_active_and_parses_dates() {
        let body: CreateGoalBody = serde_json::from_str(
            r#"{"title":" Run a 10k ","description":"three runs a week","reason":"health",
                "target_date":"2024-09-01","reward":""}"#,
        )
        .unwrap();
        let goal = body.validated().unwrap();
        assert!(goal.is_active);
        assert_eq!(goal.title, "Run a 10k");
        assert_eq!(goal.target_date, Some(date!(2024 - 09 - 01)));
        assert_eq!(goal.reward, None);
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        let body: CreateGoalBody =
            serde_json::from_str(r#"{"title":"x","description":"  ","reason":"y"}"#).unwrap();
        assert!(matches!(body.validated(), Err(AppError::BadRequest(m)) if m.contains("description")));
    }

    #[test]
    fn missing_required_field_fails_to_parse() {
        assert!(serde_json::from_str::<CreateGoalBody>(r#"{"title":"x"}"#).is_err());
    }
}
