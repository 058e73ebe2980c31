//! Attack resolution.
//!
//! An attack costs a fixed amount of energy and damages every actor in the
//! attacker's Moore neighbourhood. Targets are collected before any damage
//! is applied and processed in row-major order, so an actor respawned into
//! the attacker's neighbourhood is not hit twice by the same attack.

use gridworld_types::{ActorId, Coord};
use tracing::{debug, info};

use crate::world::World;

/// Reply text when the attacker cannot pay for the attack.
pub const NOT_ENOUGH_ENERGY: &str = "Not enough energy";

/// Effect of an attack on one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    /// The actor that was hit.
    pub target: ActorId,
    /// Health after the hit, or after respawn when the target died.
    pub health: u32,
    /// Where the target respawned, if the hit killed it.
    pub respawned_at: Option<Coord>,
}

/// What an attack did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Energy was spent and the listed targets were hit.
    Resolved {
        /// Targets in row-major order.
        hits: Vec<Hit>,
    },
    /// The attacker could not pay; nothing changed.
    NotEnoughEnergy,
    /// No such actor.
    UnknownActor,
}

/// Resolve an attack by `attacker`.
pub fn resolve_attack(world: &mut World, attacker: &ActorId) -> AttackOutcome {
    let cost = world.config().combat.attack_energy_cost;
    let damage = world.config().combat.attack_damage;

    let Some(record) = world.actor_mut(attacker) else {
        return AttackOutcome::UnknownActor;
    };
    if !record.vitals.try_spend(cost) {
        return AttackOutcome::NotEnoughEnergy;
    }
    let centre = record.position;

    let targets: Vec<ActorId> = centre
        .moore_neighbors()
        .into_iter()
        .filter_map(|coord| world.map().occupant_at(coord).cloned())
        .filter(|id| id != attacker)
        .collect();

    let mut hits = Vec::with_capacity(targets.len());
    for target in targets {
        if let Some(hit) = strike(world, attacker, &target, damage) {
            hits.push(hit);
        }
    }
    debug!(actor = %attacker, at = %centre, hits = hits.len(), "attack resolved");
    AttackOutcome::Resolved { hits }
}

/// Damage one target, respawning it if the blow is fatal.
fn strike(world: &mut World, attacker: &ActorId, target: &ActorId, damage: u32) -> Option<Hit> {
    let respawn_health = world.config().vitals.respawn_health;
    let record = world.actor_mut(target)?;
    record.vitals.take_damage(damage);
    if record.vitals.is_alive() {
        return Some(Hit {
            target: target.clone(),
            health: record.vitals.health,
            respawned_at: None,
        });
    }

    let fallen_at = record.position;
    world.map_mut().vacate(fallen_at, target);
    // The cell just vacated is always a candidate, so a point exists.
    let landing = world.respawn_point().unwrap_or(fallen_at);
    world.map_mut().occupy(landing, target);

    let record = world.actor_mut(target)?;
    record.position = landing;
    record.vitals.reset_health(respawn_health);
    record.deaths = record.deaths.saturating_add(1);
    let health = record.vitals.health;

    if let Some(killer) = world.actor_mut(attacker) {
        killer.kills = killer.kills.saturating_add(1);
    }
    info!(actor = %target, by = %attacker, at = %fallen_at, respawn = %landing, "actor killed");
    Some(Hit {
        target: target.clone(),
        health,
        respawned_at: Some(landing),
    })
}
