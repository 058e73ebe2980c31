//! Error types for the HTTP boundary and the server binary.
//!
//! [`ApiError`] is converted into a JSON response through its
//! [`IntoResponse`] implementation. [`LaunchError`] is what `main`
//! propagates while bringing the process up.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors returned by the JSON and render endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested actor does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A query parameter could not be parsed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Top-level error for the server binary.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: gridworld_core::ConfigError,
    },

    /// The map file could not be loaded.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: gridworld_world::WorldError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: crate::server::ServerError,
    },
}
