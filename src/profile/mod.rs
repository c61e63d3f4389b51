mod dto;
mod energy;
pub mod handlers;
mod repo;

use crate::state::AppState;
use axum::Router;

pub use handlers::load_goal_profile;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
