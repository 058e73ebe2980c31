//! A single grid cell: terrain glyph, open/closed state, and occupant.

use gridworld_types::{ActorId, Coord};
use serde::{Deserialize, Serialize};

/// Glyph used for open floor.
pub const FLOOR_GLYPH: char = ' ';

/// One coordinate of the spatial map.
///
/// A cell is closed either because its terrain is a wall or because an
/// actor stands on it. Only cells with an occupant are reopened when that
/// occupant leaves; walls stay closed forever.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Position of this cell; also its identity.
    pub coord: Coord,
    /// Terrain glyph drawn when the cell is unoccupied.
    pub glyph: char,
    /// Whether the cell currently blocks entry.
    pub closed: bool,
    /// The actor standing here, if any.
    pub occupant: Option<ActorId>,
}

impl Cell {
    /// Build a cell from a map glyph. Any glyph other than floor is a wall.
    pub const fn from_glyph(coord: Coord, glyph: char) -> Self {
        Self {
            coord,
            glyph,
            closed: glyph != FLOOR_GLYPH,
            occupant: None,
        }
    }

    /// An open floor cell.
    pub const fn floor(coord: Coord) -> Self {
        Self {
            coord,
            glyph: FLOOR_GLYPH,
            closed: false,
            occupant: None,
        }
    }

    /// Return `true` if an actor may step onto this cell.
    pub const fn is_enterable(&self) -> bool {
        !self.closed && self.occupant.is_none()
    }

    /// Return `true` if this cell's terrain is a wall.
    pub const fn is_wall(&self) -> bool {
        self.glyph != FLOOR_GLYPH
    }
}
