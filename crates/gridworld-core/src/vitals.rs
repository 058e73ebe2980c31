//! Vital regeneration steps run by each actor's lifecycle tasks.

use gridworld_types::ActorId;

use crate::cancel::CancelSignal;
use crate::world::World;

/// Which vital a regeneration task restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vital {
    /// Health, +1 per period up to the ceiling.
    Health,
    /// Energy, +1 per period up to the ceiling.
    Energy,
}

/// Restore one point of `vital` for the actor registered under `cancel`.
///
/// Returns `None` once the actor is gone (the task should stop), otherwise
/// the value after regeneration.
pub fn regenerate(
    world: &mut World,
    id: &ActorId,
    cancel: &CancelSignal,
    vital: Vital,
) -> Option<u32> {
    if !world.is_current(id, cancel) {
        return None;
    }
    let vitals = &mut world.actor_mut(id)?.vitals;
    match vital {
        Vital::Health => {
            vitals.regen_health();
            Some(vitals.health)
        }
        Vital::Energy => {
            vitals.regen_energy();
            Some(vitals.energy)
        }
    }
}
