//! Movement validation and occupancy transfer.
//!
//! A move is legal when, in this order, the target cell exists, it is not
//! closed, and the actor has energy left. A legal move costs one energy,
//! reopens the cell the actor leaves, and closes the one it enters.
//! Illegal moves change nothing.

use gridworld_types::{ActorId, Coord, Direction};
use tracing::debug;

use crate::world::World;

/// Energy spent per successful step.
const STEP_COST: u32 = 1;

/// Why a move did or did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The actor moved.
    Moved {
        /// Cell left behind.
        from: Coord,
        /// Cell now occupied.
        to: Coord,
    },
    /// No cell exists at the target.
    OffMap,
    /// The target is a wall or occupied (including the actor's own cell
    /// for an unrecognized key).
    Blocked,
    /// The actor has no energy.
    Exhausted,
    /// No such actor.
    UnknownActor,
}

/// The coordinate one step from `position`, or `position` itself when no
/// direction was recognized.
pub const fn apply_move(position: Coord, direction: Option<Direction>) -> Coord {
    match direction {
        Some(direction) => position.step(direction),
        None => position,
    }
}

/// Validate and perform a move for `actor`.
pub fn try_move(world: &mut World, actor: &ActorId, direction: Option<Direction>) -> MoveOutcome {
    let Some(record) = world.actor(actor) else {
        return MoveOutcome::UnknownActor;
    };
    let from = record.position;
    let energy = record.vitals.energy;
    let to = apply_move(from, direction);

    let Some(cell) = world.map().get(to) else {
        return MoveOutcome::OffMap;
    };
    if cell.closed {
        return MoveOutcome::Blocked;
    }
    if energy == 0 {
        return MoveOutcome::Exhausted;
    }

    let map = world.map_mut();
    map.vacate(from, actor);
    if !map.occupy(to, actor) {
        // Cannot happen after the checks above; put the actor back.
        map.occupy(from, actor);
        return MoveOutcome::Blocked;
    }
    if let Some(record) = world.actor_mut(actor) {
        record.position = to;
        record.vitals.try_spend(STEP_COST);
    }
    debug!(actor = %actor, from = %from, to = %to, "actor moved");
    MoveOutcome::Moved { from, to }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::GridworldConfig;
    use crate::world::tests::{admit_player, test_world};

    #[test]
    fn apply_move_uses_unit_deltas() {
        let at = Coord::new(5, 5);
        assert_eq!(apply_move(at, Some(Direction::Up)), Coord::new(5, 4));
        assert_eq!(apply_move(at, Some(Direction::Left)), Coord::new(4, 5));
        assert_eq!(apply_move(at, Some(Direction::Down)), Coord::new(5, 6));
        assert_eq!(apply_move(at, Some(Direction::Right)), Coord::new(6, 5));
        assert_eq!(apply_move(at, None), at);
    }

    #[test]
    fn wall_blocks_and_floor_admits() {
        let mut world = test_world(GridworldConfig::default());
        let id = admit_player(&mut world, "alice", Coord::new(2, 3));

        assert_eq!(
            try_move(&mut world, &id, Some(Direction::Left)),
            MoveOutcome::Blocked
        );
        let actor = world.actor(&id).unwrap();
        assert_eq!(actor.position, Coord::new(2, 3));
        assert_eq!(actor.vitals.energy, 15);

        assert_eq!(
            try_move(&mut world, &id, Some(Direction::Right)),
            MoveOutcome::Moved {
                from: Coord::new(2, 3),
                to: Coord::new(3, 3),
            }
        );
        let actor = world.actor(&id).unwrap();
        assert_eq!(actor.position, Coord::new(3, 3));
        assert_eq!(actor.vitals.energy, 14);
        assert!(world.map().is_enterable(Coord::new(2, 3)));
        assert!(world.occupancy_consistent());
    }

    #[test]
    fn unrecognized_key_is_blocked_by_own_cell() {
        let mut world = test_world(GridworldConfig::default());
        let id = admit_player(&mut world, "alice", Coord::new(2, 3));
        assert_eq!(try_move(&mut world, &id, None), MoveOutcome::Blocked);
        assert_eq!(world.actor(&id).unwrap().vitals.energy, 15);
    }

    #[test]
    fn occupied_cell_blocks() {
        let mut world = test_world(GridworldConfig::default());
        let alice = admit_player(&mut world, "alice", Coord::new(2, 3));
        admit_player(&mut world, "bob", Coord::new(3, 3));
        assert_eq!(
            try_move(&mut world, &alice, Some(Direction::Right)),
            MoveOutcome::Blocked
        );
        assert!(world.occupancy_consistent());
    }

    #[test]
    fn exhausted_actor_cannot_move() {
        let mut config = GridworldConfig::default();
        config.vitals.starting_energy = 1;
        let mut world = test_world(config);
        let id = admit_player(&mut world, "alice", Coord::new(2, 3));
        assert!(matches!(
            try_move(&mut world, &id, Some(Direction::Right)),
            MoveOutcome::Moved { .. }
        ));
        assert_eq!(
            try_move(&mut world, &id, Some(Direction::Right)),
            MoveOutcome::Exhausted
        );
        assert_eq!(world.actor(&id).unwrap().position, Coord::new(3, 3));
    }

    #[test]
    fn missing_cell_is_off_map() {
        let map = gridworld_world::parse_map("   \n   ").unwrap();
        let mut world = World::new(map, std::sync::Arc::new(GridworldConfig::default()));
        let id = admit_player(&mut world, "alice", Coord::new(1, 1));
        assert_eq!(
            try_move(&mut world, &id, Some(Direction::Up)),
            MoveOutcome::OffMap
        );
        assert_eq!(
            try_move(&mut world, &id, Some(Direction::Left)),
            MoveOutcome::OffMap
        );
        assert_eq!(world.actor(&id).unwrap().vitals.energy, 15);
        assert_eq!(
            try_move(&mut world, &ActorId::new("ghost"), Some(Direction::Up)),
            MoveOutcome::UnknownActor
        );
    }
}
