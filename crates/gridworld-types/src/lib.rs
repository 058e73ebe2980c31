//! Shared type definitions for the Gridworld simulation.
//!
//! This crate holds the plain value types that flow between the spatial
//! map, the simulation core, and the HTTP boundary. Nothing here owns
//! runtime state; the core wraps these types in its own records.
//!
//! # Modules
//!
//! - [`ids`] -- Actor identifiers
//! - [`enums`] -- Actor kinds, movement directions, status codes
//! - [`structs`] -- Coordinates, vitals, viewports, command status, summaries

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ActorKind, Direction, StatusCode};
pub use ids::ActorId;
pub use structs::{ActorSummary, CommandStatus, Coord, Viewport, Vitals};
