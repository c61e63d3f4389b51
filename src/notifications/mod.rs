pub mod handlers;
mod repo;
mod schedule;
mod settings;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
