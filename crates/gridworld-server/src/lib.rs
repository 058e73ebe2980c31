//! HTTP boundary for the Gridworld simulation.
//!
//! This crate binds the engine's entry points to an Axum server:
//!
//! - **`GET /`** admits the caller as a player if needed and returns the
//!   rendered frame as plain text.
//! - **`GET /cmd`** submits one command and answers with the command's
//!   status code and message.
//! - **`GET /api/actors`** lists actor summaries as JSON, with a single
//!   actor under `/api/actors/{id}`.
//!
//! Handlers hold no simulation state of their own. Every request goes
//! through the shared [`Engine`](gridworld_core::Engine) in [`AppState`].

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::{ApiError, LaunchError};
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use state::AppState;
