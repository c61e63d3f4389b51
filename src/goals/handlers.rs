use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateGoalBody, UpdateGoalBody},
    repo::{self, Goal},
};
use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/:id", patch(update_goal).delete(delete_goal))
}

#[instrument(skip(state))]
pub async fn list_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Goal>>> {
    Ok(Json(repo::list_by_user(&state.db, user_id).await?))
}

#[instrument(skip(state, body))]
pub async fn create_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateGoalBody>,
) -> Result<(StatusCode, Json<Goal>)> {
    let new_goal = body.validated()?;
    let goal = repo::insert(&state.db, user_id, &new_goal).await?;
    info!(%user_id, goal_id = %goal.id, "goal created");
    Ok((StatusCode::CREATED, Json(goal)))
}

#[instrument(skip(state))]
pub async fn update_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateGoalBody>,
) -> Result<Json<Goal>> {
    repo::set_active(&state.db, user_id, id, body.is_active)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("goal not found".into()))
}

#[instrument(skip(state))]
pub async fn delete_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(AppError::NotFound("goal not found".into()));
    }
    info!(%user_id, goal_id = %id, "goal deleted");
    Ok(StatusCode::NO_CONTENT)
}
