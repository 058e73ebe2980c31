//! The authoritative world state.
//!
//! [`World`] owns the spatial map, the actor registry, and the pending
//! command queue. It is always accessed through one
//! `Arc<tokio::sync::Mutex<World>>`; every method here assumes the caller
//! holds that lock and keeps the occupancy invariant intact before
//! returning: a cell names an occupant exactly when that actor's position
//! is the cell.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use gridworld_types::{ActorId, ActorKind, ActorSummary, Coord, Viewport, Vitals};
use gridworld_world::{Overlay, ProfilePanel, SpatialMap};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;
use tracing::info;

use crate::cancel::CancelSignal;
use crate::command::Command;
use crate::config::GridworldConfig;

/// Glyphs handed out to players at creation.
pub const PLAYER_GLYPHS: [char; 22] = [
    '◊', 'ᐉ', 'ᛤ', '៙', '⁖', '⁘', '⁙', '⊙', '⍾', '⎔', '⎊', '⎈', '◈', '☆', '☃', '☢', '☣', '♀',
    '♂', '⚉', '♜', '⛄',
];

/// One actor's record in the registry.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Identifier.
    pub id: ActorId,
    /// Player or NPC.
    pub kind: ActorKind,
    /// Glyph drawn at the actor's cell.
    pub glyph: char,
    /// Current cell.
    pub position: Coord,
    /// Health and energy.
    pub vitals: Vitals,
    /// Times killed.
    pub deaths: u32,
    /// Kills scored.
    pub kills: u32,
    /// The actor's viewport; rendering centres on it.
    pub viewport: Viewport,
    /// Active screen overlay, if any.
    pub overlay: Option<Overlay>,
    /// Bumped on every overlay install or clear so refresh tasks can tell
    /// when their overlay was superseded.
    pub overlay_epoch: u64,
    /// When the actor last issued a command.
    pub last_command_at: Instant,
    /// Wall-clock join time.
    pub joined_at: DateTime<Utc>,
    /// Raised once when the actor is destroyed.
    pub cancel: CancelSignal,
}

impl Actor {
    /// Fields shown on the profile overlay.
    pub fn profile_panel(&self) -> ProfilePanel<'_> {
        ProfilePanel {
            id: self.id.as_str(),
            glyph: self.glyph,
            health: self.vitals.health,
            max_health: self.vitals.max_health,
            energy: self.vitals.energy,
            max_energy: self.vitals.max_energy,
            deaths: self.deaths,
            kills: self.kills,
        }
    }

    /// Replace the overlay and bump the epoch.
    pub fn set_overlay(&mut self, overlay: Option<Overlay>) {
        self.overlay = overlay;
        self.overlay_epoch = self.overlay_epoch.wrapping_add(1);
    }

    /// Read-only projection.
    pub fn summary(&self) -> ActorSummary {
        ActorSummary {
            id: self.id.clone(),
            kind: self.kind,
            glyph: self.glyph,
            position: self.position,
            vitals: self.vitals,
            deaths: self.deaths,
            kills: self.kills,
            viewport: self.viewport,
            joined_at: self.joined_at,
        }
    }
}

/// Result of asking the world to admit a new actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The actor was placed at the given cell.
    Created(Coord),
    /// An actor with this identifier already exists.
    AlreadyPresent,
    /// The player limit has been reached.
    AtCapacity,
    /// No enterable cell is left.
    NoRoom,
    /// The identifier is blank.
    InvalidId,
}

impl Admission {
    /// Return `true` only when a new actor was created.
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// The shared simulation state.
#[derive(Debug)]
pub struct World {
    /// Occupancy grid.
    map: SpatialMap,
    /// Actor registry.
    actors: BTreeMap<ActorId, Actor>,
    /// Commands waiting for the next tick, in arrival order.
    pending: Vec<Command>,
    /// Seeded randomness for glyphs, placement, and NPC streams.
    rng: SmallRng,
    /// Simulation parameters.
    config: Arc<GridworldConfig>,
}

impl World {
    /// Build a world over `map`.
    pub fn new(map: SpatialMap, config: Arc<GridworldConfig>) -> Self {
        Self {
            map,
            actors: BTreeMap::new(),
            pending: Vec::new(),
            rng: SmallRng::seed_from_u64(config.world.seed),
            config,
        }
    }

    /// Simulation parameters.
    pub fn config(&self) -> &GridworldConfig {
        &self.config
    }

    /// The spatial map.
    pub const fn map(&self) -> &SpatialMap {
        &self.map
    }

    /// Mutable access to the spatial map.
    pub const fn map_mut(&mut self) -> &mut SpatialMap {
        &mut self.map
    }

    // -----------------------------------------------------------------------
    // Registry
    // -----------------------------------------------------------------------

    /// Look up an actor.
    pub fn actor(&self, id: &ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    /// Look up an actor for mutation.
    pub fn actor_mut(&mut self, id: &ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    /// All actors in identifier order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    /// Number of actors of any kind.
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Number of player-controlled actors.
    pub fn player_count(&self) -> usize {
        self.actors.values().filter(|a| a.kind.is_player()).count()
    }

    /// Return `true` if `actor` is registered under the given signal.
    ///
    /// Lifecycle tasks use this to make sure the actor they were started
    /// for has not been replaced by a new actor with the same identifier.
    pub fn is_current(&self, id: &ActorId, cancel: &CancelSignal) -> bool {
        !cancel.is_cancelled()
            && self
                .actors
                .get(id)
                .is_some_and(|a| a.cancel.same_signal(cancel))
    }

    /// Admit a new actor near `spawn`.
    ///
    /// Players need a free slot under the configured capacity. The actor is
    /// placed on `spawn` if it is enterable, otherwise on the nearest
    /// enterable cell. New players start with the help overlay installed.
    pub fn admit(
        &mut self,
        id: &ActorId,
        kind: ActorKind,
        viewport: Viewport,
        spawn: Coord,
        now: Instant,
    ) -> Admission {
        if id.is_blank() {
            return Admission::InvalidId;
        }
        if self.actors.contains_key(id) {
            return Admission::AlreadyPresent;
        }
        if kind.is_player() && self.player_count() >= self.config.world.capacity {
            return Admission::AtCapacity;
        }
        let Some(position) = self.map.nearest_vacant(spawn) else {
            return Admission::NoRoom;
        };
        if !self.map.occupy(position, id) {
            return Admission::NoRoom;
        }

        let glyph = match kind {
            ActorKind::Player => self.pick_player_glyph(),
            ActorKind::Npc => self.config.world.npc_glyph,
        };
        let vitals = &self.config.vitals;
        let overlay = kind.is_player().then(Overlay::help);
        let actor = Actor {
            id: id.clone(),
            kind,
            glyph,
            position,
            vitals: Vitals::new(vitals.max_health, vitals.max_energy, vitals.starting_energy),
            deaths: 0,
            kills: 0,
            viewport,
            overlay,
            overlay_epoch: 0,
            last_command_at: now,
            joined_at: Utc::now(),
            cancel: CancelSignal::new(),
        };
        info!(actor = %id, kind = ?kind, position = %position, "actor created");
        self.actors.insert(id.clone(), actor);
        Admission::Created(position)
    }

    /// Destroy an actor: raise its signal, clear its cell, drop the record.
    ///
    /// Returns the removed record, or `None` if there was nothing to remove.
    pub fn remove_actor(&mut self, id: &ActorId) -> Option<Actor> {
        let actor = self.actors.remove(id)?;
        actor.cancel.cancel();
        self.map.vacate(actor.position, id);
        Some(actor)
    }

    /// Raise every actor's signal. Records stay in place.
    pub fn cancel_all(&self) {
        for actor in self.actors.values() {
            actor.cancel.cancel();
        }
    }

    /// Projections of every actor.
    pub fn summaries(&self) -> Vec<ActorSummary> {
        self.actors.values().map(Actor::summary).collect()
    }

    // -----------------------------------------------------------------------
    // Placement
    // -----------------------------------------------------------------------

    /// Where a dead actor reappears: the spawn cell if free, otherwise the
    /// nearest free cell to it.
    pub fn respawn_point(&self) -> Option<Coord> {
        self.map.nearest_vacant(self.config.world.spawn)
    }

    /// A uniformly chosen enterable cell.
    pub fn random_vacant(&mut self) -> Option<Coord> {
        let vacant = self.map.vacant_cells();
        if vacant.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..vacant.len());
        vacant.get(idx).copied()
    }

    /// A fresh generator seeded from the world's stream, for tasks that need
    /// their own randomness.
    pub fn fork_rng(&mut self) -> SmallRng {
        SmallRng::seed_from_u64(self.rng.random())
    }

    fn pick_player_glyph(&mut self) -> char {
        let idx = self.rng.random_range(0..PLAYER_GLYPHS.len());
        PLAYER_GLYPHS.get(idx).copied().unwrap_or('@')
    }

    // -----------------------------------------------------------------------
    // Command queue
    // -----------------------------------------------------------------------

    /// Append a command to the pending queue.
    pub fn enqueue(&mut self, command: Command) {
        self.pending.push(command);
    }

    /// Take every pending command, leaving the queue empty.
    pub fn drain_pending(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }

    // -----------------------------------------------------------------------
    // Invariants
    // -----------------------------------------------------------------------

    /// Check that occupied cells and actor positions are in bijection.
    pub fn occupancy_consistent(&self) -> bool {
        let actors_placed = self
            .actors
            .values()
            .all(|a| self.map.occupant_at(a.position) == Some(&a.id));
        let cells_owned = self
            .map
            .occupied()
            .all(|(at, id)| self.actor(id).is_some_and(|a| a.position == at));
        actors_placed && cells_owned
    }
}
