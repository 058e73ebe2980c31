//! Plain-text map files.
//!
//! One row per line, one glyph per column. The first glyph of the first
//! line is `(1,1)`; `y` grows downward. A space is open floor, any other
//! glyph is a wall. Carriage returns are ignored so files edited on any
//! platform load the same way.

use std::path::Path;

use gridworld_types::Coord;
use tracing::info;

use crate::cell::Cell;
use crate::error::WorldError;
use crate::spatial_map::SpatialMap;

/// Parse map text into a [`SpatialMap`].
///
/// # Errors
///
/// Returns [`WorldError::EmptyMap`] if the text contains no glyphs.
pub fn parse_map(text: &str) -> Result<SpatialMap, WorldError> {
    let mut map = SpatialMap::new();
    let mut y: i32 = 1;
    for line in text.split('\n') {
        let mut x: i32 = 1;
        for glyph in line.chars().filter(|c| *c != '\r') {
            map.insert(Cell::from_glyph(Coord::new(x, y), glyph))?;
            x = x.saturating_add(1);
        }
        y = y.saturating_add(1);
    }
    if map.is_empty() {
        return Err(WorldError::EmptyMap);
    }
    Ok(map)
}

/// Read and parse a map file.
///
/// # Errors
///
/// Returns [`WorldError::Io`] if the file cannot be read, or
/// [`WorldError::EmptyMap`] if it contains no glyphs.
pub fn load_map(path: &Path) -> Result<SpatialMap, WorldError> {
    let text = std::fs::read_to_string(path).map_err(|source| WorldError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let map = parse_map(&text)?;
    info!(path = %path.display(), cells = map.len(), "map loaded");
    Ok(map)
}
