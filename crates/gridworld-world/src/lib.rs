//! Spatial layout and screen overlays for the Gridworld simulation.
//!
//! This crate models the static side of the world: the occupancy grid of
//! cells keyed by coordinate, the plain-text map format it is built from,
//! and the screen-anchored text panels drawn over a player's view.
//!
//! # Modules
//!
//! - [`cell`] -- A single coordinate's terrain and occupancy record.
//! - [`error`] -- Error types for map construction and loading.
//! - [`map_file`] -- Plain-text map parsing and loading.
//! - [`overlay`] -- Help and profile panels anchored to screen space.
//! - [`spatial_map`] -- The occupancy grid with move/vacate primitives and
//!   vacancy search.

pub mod cell;
pub mod error;
pub mod map_file;
pub mod overlay;
pub mod spatial_map;

// Re-export primary types at crate root.
pub use cell::Cell;
pub use error::WorldError;
pub use map_file::{load_map, parse_map};
pub use overlay::{Overlay, OverlayKind, ProfilePanel};
pub use spatial_map::SpatialMap;
