mod dto;
pub mod handlers;
mod parse;
mod vision;

use crate::state::AppState;
use axum::Router;

pub use parse::parse_food_items;
pub use vision::{OpenAiVision, VisionAnalyzer};

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("vision endpoint returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("vision endpoint returned an empty answer")]
    EmptyResponse,

    #[error("no food could be recognised in the image")]
    Unrecognized,

    #[error("vision request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not decode vision answer: {0}")]
    Decode(#[from] serde_json::Error),
}

pub fn router() -> Router<AppState> {
    handlers::routes()
}
