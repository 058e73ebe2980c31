//! Actor identifiers.
//!
//! Players choose their own identifier at the boundary (any non-empty
//! string), so [`ActorId`] wraps a `String` rather than a [`Uuid`].
//! Autonomous actors get a generated identifier built from a UUID v7 so
//! they sort by creation time and never collide with each other.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix for generated NPC identifiers.
const NPC_PREFIX: &str = "npc-";

/// Unique identifier for an actor in the world.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Wrap a caller-supplied identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier for an autonomous actor.
    pub fn generate_npc() -> Self {
        Self(format!("{NPC_PREFIX}{}", Uuid::now_v7().simple()))
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return `true` if the identifier is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl core::fmt::Display for ActorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ActorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
