use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{debug, info, instrument};

use super::{
    repo,
    schedule::{self, Pending},
    settings::NotificationSettings,
};
use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    nutrition::{aggregate, evaluate, DayKey},
    profile::load_goal_profile,
    records::{self, handlers::instant_range},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(get_settings).post(save_settings))
        .route("/notifications/pending", get(pending))
}

#[instrument(skip(state))]
pub async fn get_settings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<NotificationSettings>> {
    repo::get(&state.db, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("user not found".into()))
}

#[instrument(skip(state, body))]
pub async fn save_settings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<NotificationSettings>> {
    let settings = parse_settings(body)?;
    if !repo::save(&state.db, user_id, &settings).await? {
        return Err(AppError::NotFound("user not found".into()));
    }
    info!(%user_id, reminders = settings.meal_reminder_times.len(), "notification settings saved");
    Ok(Json(settings))
}

fn parse_settings(body: serde_json::Value) -> Result<NotificationSettings> {
    serde_json::from_value::<NotificationSettings>(body)
        .map_err(|e| AppError::BadRequest(e.to_string()))?
        .normalized()
        .map_err(AppError::BadRequest)
}

#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    pub utc_offset_minutes: Option<i32>,
}

/// Reminders still ahead and today's calorie alerts.
#[instrument(skip(state))]
pub async fn pending(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<PendingQuery>,
) -> Result<Json<Pending>> {
    let offset = state.viewer_offset(q.utc_offset_minutes)?;
    let now = OffsetDateTime::now_utc();
    let today = DayKey::from_timestamp(now, offset);

    let settings = repo::get(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;
    let profile = load_goal_profile(&state, user_id).await?;

    let (from, until) = instant_range(today, today, offset)?;
    let stored = records::repo::list_between(&state.db, user_id, from, until).await?;
    let summaries = aggregate(stored.iter().map(|s| &s.record), offset);
    let calories = summaries.get(&today).map_or(0.0, |s| s.calories);

    let evaluation = evaluate(
        &state.config.thresholds,
        calories,
        f64::from(profile.daily_calorie_goal),
        profile.goal_type,
    )?;
    debug!(%user_id, %today, calories, band = ?evaluation.band, "evaluated today for alerts");

    Ok(Json(schedule::pending(
        &settings,
        now,
        offset,
        calories,
        profile.daily_calorie_goal,
        &evaluation,
    )))
}
