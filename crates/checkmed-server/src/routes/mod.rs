//! Route wiring.

pub mod register;
pub mod report;
pub mod verify;

use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Uploads carry up to three photos; phone cameras easily exceed axum's
/// 2 MiB default.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/verify", post(verify::handle))
        .route("/api/register-drug", post(register::handle))
        .route("/api/report", post(report::handle))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
