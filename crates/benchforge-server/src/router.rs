//! Route table assembly, shared by the binary and integration tests.

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::leaderboard::leaderboard))
        .route("/leaderboard", get(handlers::leaderboard::leaderboard))
        .route("/submit", post(handlers::submit::submit))
        .route("/view_submission", get(handlers::view_submission::view_submission))
        .nest_service("/static", ServeDir::new("runtime/static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
