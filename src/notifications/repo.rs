use anyhow::Context;
use sqlx::{types::Json, PgPool};
use tracing::warn;
use uuid::Uuid;

use super::settings::NotificationSettings;

/// `None` when the user does not exist. Unset or unreadable settings come
/// back as the defaults.
pub async fn get(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<NotificationSettings>> {
    let row: Option<(Option<serde_json::Value>,)> =
        sqlx::query_as("SELECT notification_settings FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await
            .context("load notification settings")?;

    Ok(row.map(|(raw,)| match raw {
        None => NotificationSettings::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(%user_id, error = %e, "stored notification settings unreadable; using defaults");
            NotificationSettings::default()
        }),
    }))
}

/// Returns false when the user does not exist.
pub async fn save(
    db: &PgPool,
    user_id: Uuid,
    settings: &NotificationSettings,
) -> anyhow::Result<bool> {
    let res = sqlx::query("UPDATE users SET notification_settings = $2 WHERE id = $1")
        .bind(user_id)
        .bind(Json(settings))
        .execute(db)
        .await
        .context("save notification settings")?;
    Ok(res.rows_affected() == 1)
}
