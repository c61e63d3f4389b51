use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct ProfileRow {
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub daily_calorie_goal: Option<i32>,
    pub goal_type: Option<String>,
    pub activity_level: Option<String>,
}

/// `None` when the user does not exist.
pub async fn get(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<ProfileRow>> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT height_cm, weight_kg, age, gender, daily_calorie_goal, goal_type, activity_level
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("load profile")?;
    Ok(row)
}

/// Returns false when the user does not exist.
pub async fn update(db: &PgPool, user_id: Uuid, p: &ProfileRow) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        UPDATE users
           SET height_cm = $2, weight_kg = $3, age = $4, gender = $5,
               daily_calorie_goal = $6, goal_type = $7, activity_level = $8
         WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(p.height_cm)
    .bind(p.weight_kg)
    .bind(p.age)
    .bind(p.gender.as_deref())
    .bind(p.daily_calorie_goal)
    .bind(p.goal_type.as_deref())
    .bind(p.activity_level.as_deref())
    .execute(db)
    .await
    .context("update profile")?;
    Ok(res.rows_affected() == 1)
}
