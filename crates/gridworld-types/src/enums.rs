//! Enumeration types shared across the simulation.

use serde::{Deserialize, Serialize};

/// Who drives an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// Controlled by a remote client through the command boundary.
    Player,
    /// Driven by an in-process autonomous behavior task.
    Npc,
}

impl ActorKind {
    /// Return `true` for player-controlled actors.
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Player)
    }
}

/// One of the four movement directions.
///
/// Screen coordinates grow downward, so `Up` decrements `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// `y - 1`
    Up,
    /// `x - 1`
    Left,
    /// `y + 1`
    Down,
    /// `x + 1`
    Right,
}

impl Direction {
    /// All directions, in key order (`mw`, `ma`, `ms`, `md`).
    pub const ALL: [Self; 4] = [Self::Up, Self::Left, Self::Down, Self::Right];

    /// Parse a movement key (`mw`, `ma`, `ms`, `md`).
    ///
    /// Returns `None` for anything else; callers treat that as a move that
    /// leaves the position unchanged.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "mw" => Some(Self::Up),
            "ma" => Some(Self::Left),
            "ms" => Some(Self::Down),
            "md" => Some(Self::Right),
            _ => None,
        }
    }

    /// The movement key that produces this direction.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Up => "mw",
            Self::Left => "ma",
            Self::Down => "ms",
            Self::Right => "md",
        }
    }

    /// Unit delta `(dx, dy)` for this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Left => (-1, 0),
            Self::Down => (0, 1),
            Self::Right => (1, 0),
        }
    }
}

/// Acknowledgement status returned for every submitted command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    /// The command was processed (including silent no-ops).
    Ok,
    /// The command was rejected before it reached the queue.
    BadRequest,
    /// The directive verb is not known.
    NotImplemented,
    /// The engine stopped before the command could be acknowledged.
    Unavailable,
}

impl StatusCode {
    /// The HTTP status number this code maps to at the boundary.
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::NotImplemented => 501,
            Self::Unavailable => 503,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_key(dir.key()), Some(dir));
        }
        assert_eq!(Direction::from_key("mx"), None);
        assert_eq!(Direction::from_key(""), None);
    }

    #[test]
    fn up_moves_toward_row_one() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn status_codes_map_to_http() {
        assert_eq!(StatusCode::Ok.as_u16(), 200);
        assert_eq!(StatusCode::BadRequest.as_u16(), 400);
        assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
    }
}
