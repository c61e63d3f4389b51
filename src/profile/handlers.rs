use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{goal_profile, ProfileResponse, ProfileUpdate},
    repo,
};
use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    nutrition::UserGoalProfile,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).post(update_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>> {
    let row = repo::get(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;
    Ok(Json(row.into()))
}

#[instrument(skip(state, body))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>> {
    let row = body.into_row()?;
    if !repo::update(&state.db, user_id, &row).await? {
        return Err(AppError::NotFound("user not found".into()));
    }
    info!(%user_id, goal = ?row.daily_calorie_goal, goal_type = ?row.goal_type, "profile updated");
    Ok(Json(row.into()))
}

/// Goal settings for the evaluator, with defaults for unset fields.
pub async fn load_goal_profile(state: &AppState, user_id: Uuid) -> Result<UserGoalProfile> {
    let row = repo::get(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;
    Ok(goal_profile(&row)?)
}
