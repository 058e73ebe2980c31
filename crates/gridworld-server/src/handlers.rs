//! Endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/?uid=&w=&h=` | Join as a player if needed, return the frame |
//! | `GET` | `/cmd?uid=&key=` | Submit a command, return its status |
//! | `GET` | `/api/actors` | List actor summaries |
//! | `GET` | `/api/actors/{id}` | Single actor summary |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use gridworld_types::{ActorId, ActorKind, ActorSummary, StatusCode as CommandCode, Viewport};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /`.
#[derive(Debug, serde::Deserialize)]
pub struct ViewQuery {
    /// Player id. Without one the caller sees the spawn area as an observer.
    pub uid: Option<String>,
    /// Frame width in glyphs.
    pub w: Option<String>,
    /// Frame height in glyphs.
    pub h: Option<String>,
}

/// Query parameters for `GET /cmd`.
#[derive(Debug, serde::Deserialize)]
pub struct CommandQuery {
    /// Player id.
    pub uid: Option<String>,
    /// Command text: a movement key or a `>` directive.
    pub key: Option<String>,
}

/// Map a command status onto the HTTP status it is reported with.
pub const fn http_status(code: CommandCode) -> StatusCode {
    match code {
        CommandCode::Ok => StatusCode::OK,
        CommandCode::BadRequest => StatusCode::BAD_REQUEST,
        CommandCode::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        CommandCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Parse one frame dimension, falling back to `default` when absent.
fn dimension(name: &str, raw: Option<&str>, default: u16) -> Result<u16, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(text) => text.parse().map_err(|_| {
            ApiError::InvalidQuery(format!("{name} must be 0..=65535, got {text:?}"))
        }),
    }
}

// ---------------------------------------------------------------------------
// GET / -- frame
// ---------------------------------------------------------------------------

/// Admit the caller if needed and return their rendered frame.
///
/// New players are placed at the configured spawn with the requested
/// frame size as their viewport. Missing dimensions fall back to the
/// configured default viewport.
pub async fn view(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewQuery>,
) -> Result<String, ApiError> {
    let fallback = state.config().world.default_viewport;
    let size = Viewport::new(
        dimension("w", params.w.as_deref(), fallback.width)?,
        dimension("h", params.h.as_deref(), fallback.height)?,
    );
    let uid = params.uid.unwrap_or_default();

    if !uid.trim().is_empty() {
        let spawn = state.config().world.spawn;
        let admission = state
            .engine
            .create_actor(&uid, size, spawn, ActorKind::Player)
            .await;
        debug!(uid = %uid.trim(), ?admission, "view requested");
    }
    Ok(state.engine.render_view(&uid, size).await)
}

// ---------------------------------------------------------------------------
// GET /cmd -- command submission
// ---------------------------------------------------------------------------

/// Submit a command and answer with its status code and message.
pub async fn command(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CommandQuery>,
) -> impl IntoResponse {
    let uid = params.uid.unwrap_or_default();
    let key = params.key.unwrap_or_default();
    let status = state.engine.submit_command(&uid, &key).await;
    debug!(
        uid = %uid.trim(),
        key = %key.trim(),
        code = status.code.as_u16(),
        "command handled"
    );
    (http_status(status.code), status.message)
}

// ---------------------------------------------------------------------------
// GET /api/actors
// ---------------------------------------------------------------------------

/// List every actor in the world.
pub async fn list_actors(State(state): State<Arc<AppState>>) -> Json<Vec<ActorSummary>> {
    Json(state.engine.actor_summaries().await)
}

/// Look up a single actor.
pub async fn get_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ActorSummary>, ApiError> {
    let id = ActorId::new(id);
    let world = state.engine.world();
    let world = world.lock().await;
    let summary = world.actor(&id).map(gridworld_core::Actor::summary);
    drop(world);
    summary
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("actor {id} not found")))
}
