//! HTTP route tree.

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

pub mod health;
pub mod jobs;

/// Build the full route tree (REST + WebSocket).
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(jobs::router())
        .route("/ws/jobs/{job_id}", get(ws::job_progress))
}
