use anyhow::Context;
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::nutrition::{FoodItem, FoodRecord, MacroTotals, NewFoodRecord, NutritionError};

#[derive(Debug, FromRow)]
pub struct FoodRecordRow {
    pub id: Uuid,
    pub image_key: Option<String>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub total_fiber: f64,
    pub total_sugar: f64,
    pub total_sodium: f64,
    pub foods: Json<Vec<FoodItem>>,
    pub recorded_at: OffsetDateTime,
}

/// A record as read back from the store.
#[derive(Debug, Clone)]
pub struct StoredFoodRecord {
    pub record: FoodRecord,
    pub image_key: Option<String>,
}

impl TryFrom<FoodRecordRow> for StoredFoodRecord {
    type Error = NutritionError;

    fn try_from(r: FoodRecordRow) -> Result<Self, Self::Error> {
        let totals = MacroTotals::with_details(
            r.total_calories,
            r.total_protein,
            r.total_carbs,
            r.total_fat,
            r.total_fiber,
            r.total_sugar,
            r.total_sodium,
        )?;
        Ok(Self {
            record: FoodRecord::new(r.id, r.recorded_at, totals, r.foods.0),
            image_key: r.image_key,
        })
    }
}

/// Drops rows whose stored macros are unusable instead of summing them.
fn keep_valid(user_id: Uuid, rows: Vec<FoodRecordRow>) -> Vec<StoredFoodRecord> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match StoredFoodRecord::try_from(row) {
                Ok(stored) => Some(stored),
                Err(e) => {
                    warn!(%user_id, record_id = %id, error = %e, "skipping invalid food record");
                    None
                }
            }
        })
        .collect()
}

const COLUMNS: &str = "id, image_key, total_calories, total_protein, total_carbs, total_fat, \
                       total_fiber, total_sugar, total_sodium, foods, recorded_at";

/// Newest first, optionally restricted to `[start, end)`.
pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    range: Option<(OffsetDateTime, OffsetDateTime)>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<StoredFoodRecord>> {
    let (start, end) = match range {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    };
    let rows = sqlx::query_as::<_, FoodRecordRow>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM food_records
        WHERE user_id = $1
          AND ($2::timestamptz IS NULL OR recorded_at >= $2)
          AND ($3::timestamptz IS NULL OR recorded_at < $3)
        ORDER BY recorded_at DESC
        LIMIT $4 OFFSET $5
        "#
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
    .context("list food records")?;
    Ok(keep_valid(user_id, rows))
}

/// Every record in `[start, end)`, oldest first.
pub async fn list_between(
    db: &PgPool,
    user_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> anyhow::Result<Vec<StoredFoodRecord>> {
    let rows = sqlx::query_as::<_, FoodRecordRow>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM food_records
        WHERE user_id = $1 AND recorded_at >= $2 AND recorded_at < $3
        ORDER BY recorded_at ASC
        "#
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
    .context("list food records between")?;
    Ok(keep_valid(user_id, rows))
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    record_id: Uuid,
    new: &NewFoodRecord,
) -> anyhow::Result<OffsetDateTime> {
    let t = &new.totals;
    let (recorded_at,): (OffsetDateTime,) = sqlx::query_as(
        r#"
        INSERT INTO food_records (id, user_id, image_key, total_calories, total_protein,
                                  total_carbs, total_fat, total_fiber, total_sugar,
                                  total_sodium, foods)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING recorded_at
        "#,
    )
    .bind(record_id)
    .bind(user_id)
    .bind(new.image_key.as_deref())
    .bind(t.calories())
    .bind(t.protein())
    .bind(t.carbs())
    .bind(t.fat())
    .bind(t.fiber())
    .bind(t.sugar())
    .bind(t.sodium())
    .bind(Json(&new.foods))
    .fetch_one(db)
    .await
    .context("insert food record")?;
    Ok(recorded_at)
}
