//! Error types for the `gridworld-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`].

use std::path::PathBuf;

use gridworld_types::Coord;

/// Errors that can occur while building or loading a spatial map.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The map file could not be read.
    #[error("failed to read map file {path}: {source}")]
    Io {
        /// The path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The map description contains no cells.
    #[error("map contains no cells")]
    EmptyMap,

    /// Two cells were inserted at the same coordinate.
    #[error("duplicate cell at {0}")]
    DuplicateCell(Coord),
}
