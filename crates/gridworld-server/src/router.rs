//! Axum router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete router.
///
/// - `GET /` -- join and render
/// - `GET /cmd` -- submit a command
/// - `GET /api/actors` -- actor summaries
/// - `GET /api/actors/{id}` -- single actor
///
/// CORS allows any origin so browser terminals hosted elsewhere can poll
/// the frame endpoint.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::view))
        .route("/cmd", get(handlers::command))
        .route("/api/actors", get(handlers::list_actors))
        .route("/api/actors/{id}", get(handlers::get_actor))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
