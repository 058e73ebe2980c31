//! Per-actor background tasks.
//!
//! Every actor gets a small set of tasks sharing its [`CancelSignal`]:
//! health and energy regeneration, an inactivity watchdog, and for NPCs an
//! autonomous driver. Installing a live overlay adds a refresher for as
//! long as that overlay stays up.
//!
//! Each task sleeps on its own timer without holding the world lock, then
//! takes the lock for one short step. The step functions are plain
//! functions over `&mut World` so they can be tested without a runtime;
//! every one of them re-checks that the actor is still registered under
//! the task's signal before touching anything.

use std::sync::Arc;
use std::time::Duration;

use gridworld_types::{ActorId, Direction, StatusCode};
use gridworld_world::Overlay;
use rand::Rng;
use rand::rngs::SmallRng;
use tokio::sync::Mutex;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, info};

use crate::cancel::CancelSignal;
use crate::command::Submitter;
use crate::config::LifecycleConfig;
use crate::tick::RefreshRequest;
use crate::vitals::{self, Vital};
use crate::world::World;

/// Directive an NPC sends when a player is adjacent.
const NPC_ATTACK: &str = ">attack";

/// A timer whose first tick is one full `period` from now.
pub fn ticker(period: Duration) -> Interval {
    let now = Instant::now();
    let start = now.checked_add(period).unwrap_or(now);
    let mut ticker = interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Sleep until the next tick. Returns `false` once the signal is raised,
/// whether that happens before or during the sleep.
pub(crate) async fn next_turn(ticker: &mut Interval, cancel: &CancelSignal) -> bool {
    tokio::select! {
        biased;
        () = cancel.cancelled() => false,
        _ = ticker.tick() => !cancel.is_cancelled(),
    }
}

// ---------------------------------------------------------------------------
// Regeneration
// ---------------------------------------------------------------------------

/// Restore one point of `vital` every `period` until the actor is gone.
pub async fn regenerate_vital(
    world: Arc<Mutex<World>>,
    id: ActorId,
    cancel: CancelSignal,
    vital: Vital,
    period: Duration,
) {
    let mut ticker = ticker(period);
    while next_turn(&mut ticker, &cancel).await {
        let mut world = world.lock().await;
        if vitals::regenerate(&mut world, &id, &cancel, vital).is_none() {
            break;
        }
    }
}

// ---------------------------------------------------------------------------
// Inactivity eviction
// ---------------------------------------------------------------------------

/// Result of one inactivity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleCheck {
    /// The actor has been active recently.
    Active,
    /// The actor was idle and has been removed.
    Evicted,
    /// The actor was already gone.
    Gone,
}

/// Evict `id` if its last command is older than `timeout`.
///
/// Removal raises the signal and clears the cell inside the same critical
/// section, so a racing second check sees [`IdleCheck::Gone`].
pub fn evict_if_idle(
    world: &mut World,
    id: &ActorId,
    cancel: &CancelSignal,
    now: Instant,
    timeout: Duration,
) -> IdleCheck {
    if !world.is_current(id, cancel) {
        return IdleCheck::Gone;
    }
    let Some(actor) = world.actor(id) else {
        return IdleCheck::Gone;
    };
    if now.saturating_duration_since(actor.last_command_at) <= timeout {
        return IdleCheck::Active;
    }
    if world.remove_actor(id).is_some() {
        info!(actor = %id, "actor evicted for inactivity");
    }
    IdleCheck::Evicted
}

/// Check for inactivity every `period` until the actor is evicted or gone.
pub async fn watch_inactivity(
    world: Arc<Mutex<World>>,
    id: ActorId,
    cancel: CancelSignal,
    period: Duration,
    timeout: Duration,
) {
    let mut ticker = ticker(period);
    while next_turn(&mut ticker, &cancel).await {
        let mut world = world.lock().await;
        if evict_if_idle(&mut world, &id, &cancel, Instant::now(), timeout) != IdleCheck::Active {
            break;
        }
    }
}

// ---------------------------------------------------------------------------
// Live overlay refresh
// ---------------------------------------------------------------------------

/// Rebuild the profile overlay installed at `epoch`.
///
/// Returns `false` once the overlay has been replaced or cleared, or the
/// actor is gone; the refresher stops then.
pub fn refresh_overlay(world: &mut World, id: &ActorId, cancel: &CancelSignal, epoch: u64) -> bool {
    if !world.is_current(id, cancel) {
        return false;
    }
    let Some(actor) = world.actor_mut(id) else {
        return false;
    };
    if actor.overlay_epoch != epoch {
        return false;
    }
    // Refreshing keeps the epoch of the original install.
    actor.overlay = Some(Overlay::profile(&actor.profile_panel()));
    true
}

/// Refresh a live overlay every `period` until it is superseded.
pub async fn refresh_profile(world: Arc<Mutex<World>>, request: RefreshRequest, period: Duration) {
    let mut ticker = ticker(period);
    while next_turn(&mut ticker, &request.cancel).await {
        let mut world = world.lock().await;
        if !refresh_overlay(&mut world, &request.actor, &request.cancel, request.epoch) {
            break;
        }
    }
    debug!(actor = %request.actor, epoch = request.epoch, "overlay refresher stopped");
}

// ---------------------------------------------------------------------------
// NPC behavior
// ---------------------------------------------------------------------------

/// What an NPC does on its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NpcTurn {
    /// Submit this command text.
    Act(String),
    /// The NPC has died; it unregistered itself.
    Retired,
    /// The NPC no longer exists.
    Gone,
}

/// Decide an NPC's next command.
///
/// A dead NPC (one with a recorded death) removes itself. Otherwise it
/// attacks when a player stands in its Moore neighbourhood and wanders in
/// a random direction when not.
pub fn npc_turn(
    world: &mut World,
    id: &ActorId,
    cancel: &CancelSignal,
    rng: &mut SmallRng,
) -> NpcTurn {
    if !world.is_current(id, cancel) {
        return NpcTurn::Gone;
    }
    let Some(npc) = world.actor(id) else {
        return NpcTurn::Gone;
    };
    if npc.deaths > 0 {
        world.remove_actor(id);
        info!(actor = %id, "npc retired after death");
        return NpcTurn::Retired;
    }
    let player_adjacent = npc.position.moore_neighbors().into_iter().any(|coord| {
        world
            .map()
            .occupant_at(coord)
            .and_then(|other| world.actor(other))
            .is_some_and(|other| other.kind.is_player())
    });
    if player_adjacent {
        return NpcTurn::Act(NPC_ATTACK.to_owned());
    }
    let idx = rng.random_range(0..Direction::ALL.len());
    let direction = Direction::ALL.get(idx).copied().unwrap_or(Direction::Up);
    NpcTurn::Act(direction.key().to_owned())
}

/// Pick an NPC's action period within the configured bounds.
pub fn npc_interval(config: &LifecycleConfig, rng: &mut SmallRng) -> Duration {
    let low = config.npc_min_interval_ms;
    let high = config.npc_max_interval_ms.max(low);
    Duration::from_millis(rng.random_range(low..=high))
}

/// Drive an NPC until it dies or is destroyed.
///
/// Commands go through the same [`Submitter`] as player commands and are
/// awaited without holding the lock, so NPC and player commands interleave
/// by arrival.
pub async fn drive_npc(
    world: Arc<Mutex<World>>,
    submitter: Submitter,
    id: ActorId,
    cancel: CancelSignal,
    period: Duration,
    mut rng: SmallRng,
) {
    let mut ticker = ticker(period);
    while next_turn(&mut ticker, &cancel).await {
        let turn = {
            let mut world = world.lock().await;
            npc_turn(&mut world, &id, &cancel, &mut rng)
        };
        let NpcTurn::Act(text) = turn else {
            break;
        };
        let status = submitter.submit(id.as_str(), &text).await;
        if status.code == StatusCode::Unavailable {
            break;
        }
    }
    debug!(actor = %id, "npc driver stopped");
}
