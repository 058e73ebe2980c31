//! Core value structs: coordinates, vitals, viewports, and the records
//! that cross the command/render boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{ActorKind, Direction, StatusCode};
use crate::ids::ActorId;

// ---------------------------------------------------------------------------
// Coord
// ---------------------------------------------------------------------------

/// An integer grid coordinate. Maps are 1-based; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Coord {
    /// Create a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by `(dx, dy)`, saturating at the `i32` range.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// The neighbouring coordinate one step in `direction`.
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// The eight surrounding coordinates in row-major order, excluding
    /// `self`.
    pub const fn moore_neighbors(self) -> [Self; 8] {
        [
            self.offset(-1, -1),
            self.offset(0, -1),
            self.offset(1, -1),
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(-1, 1),
            self.offset(0, 1),
            self.offset(1, 1),
        ]
    }

    /// Chebyshev (king-move) distance to `other`.
    pub const fn chebyshev(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }
}

impl core::fmt::Display for Coord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Vitals
// ---------------------------------------------------------------------------

/// Health and energy of an actor.
///
/// Every mutator keeps both values inside `0..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    /// Current health.
    pub health: u32,
    /// Health ceiling.
    pub max_health: u32,
    /// Current energy.
    pub energy: u32,
    /// Energy ceiling.
    pub max_energy: u32,
}

impl Vitals {
    /// Full health, with `energy` clamped to `max_energy`.
    pub const fn new(max_health: u32, max_energy: u32, energy: u32) -> Self {
        Self {
            health: max_health,
            max_health,
            energy: if energy > max_energy {
                max_energy
            } else {
                energy
            },
            max_energy,
        }
    }

    /// Restore one point of health. Returns `true` if the value changed.
    pub const fn regen_health(&mut self) -> bool {
        if self.health < self.max_health {
            self.health = self.health.saturating_add(1);
            true
        } else {
            false
        }
    }

    /// Restore one point of energy. Returns `true` if the value changed.
    pub const fn regen_energy(&mut self) -> bool {
        if self.energy < self.max_energy {
            self.energy = self.energy.saturating_add(1);
            true
        } else {
            false
        }
    }

    /// Spend `cost` energy if the actor has at least that much.
    ///
    /// Returns `false` and leaves energy untouched otherwise.
    pub const fn try_spend(&mut self, cost: u32) -> bool {
        if self.energy >= cost {
            self.energy = self.energy.saturating_sub(cost);
            true
        } else {
            false
        }
    }

    /// Apply damage, flooring at zero. Returns the remaining health.
    pub const fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    /// Set health to `value`, clamped to the ceiling.
    pub const fn reset_health(&mut self, value: u32) {
        self.health = if value > self.max_health {
            self.max_health
        } else {
            value
        };
    }

    /// Return `true` while health is above zero.
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// The size of the window a client renders, in glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Columns.
    pub width: u16,
    /// Rows.
    pub height: u16,
}

impl Viewport {
    /// Create a viewport.
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Offset that centres this viewport on an actor: `(width/2, height/2)`.
    pub fn half(self) -> (i32, i32) {
        (i32::from(self.width) / 2, i32::from(self.height) / 2)
    }
}

// ---------------------------------------------------------------------------
// Command acknowledgement
// ---------------------------------------------------------------------------

/// The acknowledgement every command receives exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStatus {
    /// Outcome category.
    pub code: StatusCode,
    /// Human-readable detail. Empty for silent successes.
    pub message: String,
}

impl CommandStatus {
    /// Plain success with no message.
    pub const fn ok() -> Self {
        Self {
            code: StatusCode::Ok,
            message: String::new(),
        }
    }

    /// Success carrying a message.
    pub fn ok_with(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::Ok,
            message: message.into(),
        }
    }

    /// Rejected before the queue.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::BadRequest,
            message: message.into(),
        }
    }

    /// Unknown directive.
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::NotImplemented,
            message: message.into(),
        }
    }

    /// The engine is no longer processing commands.
    pub fn unavailable() -> Self {
        Self {
            code: StatusCode::Unavailable,
            message: String::from("engine stopped"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actor summary
// ---------------------------------------------------------------------------

/// A read-only projection of an actor for status endpoints and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSummary {
    /// Actor identifier.
    pub id: ActorId,
    /// Player or NPC.
    pub kind: ActorKind,
    /// Glyph drawn at the actor's cell.
    pub glyph: char,
    /// Current cell.
    pub position: Coord,
    /// Health and energy.
    pub vitals: Vitals,
    /// Times this actor has been killed.
    pub deaths: u32,
    /// Actors this one has killed.
    pub kills: u32,
    /// The actor's own viewport size.
    pub viewport: Viewport,
    /// Wall-clock time the actor joined.
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moore_neighbors_are_row_major_and_exclude_centre() {
        let centre = Coord::new(5, 5);
        let ring = centre.moore_neighbors();
        assert_eq!(ring.first(), Some(&Coord::new(4, 4)));
        assert_eq!(ring.last(), Some(&Coord::new(6, 6)));
        assert!(!ring.contains(&centre));
        assert!(ring.iter().all(|c| c.chebyshev(centre) == 1));
    }

    #[test]
    fn vitals_stay_clamped() {
        let mut v = Vitals::new(3, 10, 50);
        assert_eq!(v.energy, 10);
        assert!(!v.regen_energy());
        assert!(!v.regen_health());
        assert_eq!(v.take_damage(7), 0);
        assert!(!v.is_alive());
        v.reset_health(99);
        assert_eq!(v.health, 3);
        assert!(v.is_alive());
    }

    #[test]
    fn spending_more_than_available_is_refused() {
        let mut v = Vitals::new(3, 150, 15);
        assert!(!v.try_spend(25));
        assert_eq!(v.energy, 15);
        assert!(v.try_spend(15));
        assert_eq!(v.energy, 0);
    }

    #[test]
    fn viewport_half_truncates() {
        assert_eq!(Viewport::new(81, 21).half(), (40, 10));
        assert_eq!(Viewport::new(0, 1).half(), (0, 0));
    }
}
