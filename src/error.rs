//! HTTP error type shared by every handler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::analysis::AnalysisError;
use crate::nutrition::NutritionError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Nutrition(#[from] NutritionError),

    #[error("Meal analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Nutrition(NutritionError::DateOutOfRange(_)) => StatusCode::BAD_REQUEST,
            AppError::Nutrition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Analysis(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Conflict(_) => "conflict",
            AppError::Nutrition(NutritionError::InvalidGoalConfig(_)) => "invalid_goal_config",
            AppError::Nutrition(NutritionError::InvalidRecord(_)) => "invalid_record",
            AppError::Nutrition(NutritionError::DateOutOfRange(_)) => "date_out_of_range",
            AppError::Analysis(_) => "analysis_failed",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = match &self {
            AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg) => Some(msg.clone()),
            AppError::Nutrition(err) => Some(err.to_string()),
            AppError::Analysis(err) => {
                tracing::warn!(error = %err, "meal analysis failed");
                Some(err.to_string())
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                None
            }
        };

        let body = ErrorResponse {
            error: self.code(),
            details,
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
