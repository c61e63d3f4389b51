use anyhow::Context;
use serde::{Serialize, Serializer};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::DayKey;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub reason: String,
    #[serde(serialize_with = "as_day_key")]
    pub target_date: Option<Date>,
    pub before_image: Option<String>,
    pub reward: Option<String>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

fn as_day_key<S: Serializer>(date: &Option<Date>, s: S) -> Result<S::Ok, S::Error> {
    date.map(DayKey::from).serialize(s)
}

pub struct NewGoal<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub reason: &'a str,
    pub target_date: Option<Date>,
    pub before_image: Option<&'a str>,
    pub reward: Option<&'a str>,
    pub is_active: bool,
}

const COLUMNS: &str =
    "id, title, description, reason, target_date, before_image, reward, is_active, created_at";

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Goal>> {
    let rows = sqlx::query_as::<_, Goal>(&format!(
        "SELECT {COLUMNS} FROM goals WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list goals")?;
    Ok(rows)
}

pub async fn insert(db: &PgPool, user_id: Uuid, goal: &NewGoal<'_>) -> anyhow::Result<Goal> {
    let row = sqlx::query_as::<_, Goal>(&format!(
        r#"
        INSERT INTO goals (id, user_id, title, description, reason, target_date, before_image, reward, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(goal.title)
    .bind(goal.description)
    .bind(goal.reason)
    .bind(goal.target_date)
    .bind(goal.before_image)
    .bind(goal.reward)
    .bind(goal.is_active)
    .fetch_one(db)
    .await
    .context("insert goal")?;
    Ok(row)
}

/// `None` when the goal does not exist or belongs to someone else.
pub async fn set_active(
    db: &PgPool,
    user_id: Uuid,
    goal_id: Uuid,
    is_active: bool,
) -> anyhow::Result<Option<Goal>> {
    let row = sqlx::query_as::<_, Goal>(&format!(
        "UPDATE goals SET is_active = $3 WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}"
    ))
    .bind(goal_id)
    .bind(user_id)
    .bind(is_active)
    .fetch_optional(db)
    .await
    .context("update goal")?;
    Ok(row)
}

pub async fn delete(db: &PgPool, user_id: Uuid, goal_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
        .bind(goal_id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete goal")?;
    Ok(res.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn goal_dates_serialize_as_calendar_days() {
        let goal = Goal {
            id: Uuid::nil(),
            title: "Lose 3 kg".into(),
            description: "cut snacks".into(),
            reason: "summer".into(),
            target_date: Some(date!(2024 - 07 - 01)),
            before_image: None,
            reward: Some("new shoes".into()),
            is_active: true,
            created_at: datetime!(2024-05-02 08:30 UTC),
        };
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["target_date"], "2024-07-01");
        assert_eq!(json["created_at"], "2024-05-02T08:30:00Z");
        assert!(json["before_image"].is_null());
    }
}
