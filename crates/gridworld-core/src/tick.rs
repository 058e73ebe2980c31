//! One tick of command processing.
//!
//! [`run_tick`] drains the pending queue and applies every command in
//! submission order, acknowledging each before moving to the next. It runs
//! with the world lock held and never fails: illegal moves, unaffordable
//! attacks and unknown actors are outcomes, not errors.
//!
//! Side work that must outlive the critical section (starting a profile
//! refresher) is returned in the [`TickSummary`] for the caller to spawn
//! after the lock is released.

use gridworld_types::{ActorId, CommandStatus};
use gridworld_world::Overlay;
use tokio::time::Instant;
use tracing::debug;

use crate::cancel::CancelSignal;
use crate::combat::{self, AttackOutcome, NOT_ENOUGH_ENERGY};
use crate::command::{Directive, Instruction};
use crate::movement;
use crate::world::{Actor, World};

/// A live overlay that needs a refresh task.
#[derive(Debug, Clone)]
pub struct RefreshRequest {
    /// Actor whose overlay to refresh.
    pub actor: ActorId,
    /// Overlay epoch at install time; the task stops once it changes.
    pub epoch: u64,
    /// The actor's destruction signal.
    pub cancel: CancelSignal,
}

/// What a tick did.
#[derive(Debug, Clone, Default)]
pub struct TickSummary {
    /// Commands applied and acknowledged.
    pub applied: usize,
    /// Refresh tasks to start.
    pub refreshers: Vec<RefreshRequest>,
}

/// Result of applying a single command.
#[derive(Debug, Clone)]
pub struct Applied {
    /// Acknowledgement to send.
    pub status: CommandStatus,
    /// Refresh task to start, if a live overlay was installed.
    pub refresh: Option<RefreshRequest>,
}

impl Applied {
    fn status(status: CommandStatus) -> Self {
        Self {
            status,
            refresh: None,
        }
    }
}

/// Drain the queue and apply every pending command in order.
pub fn run_tick(world: &mut World, now: Instant) -> TickSummary {
    let batch = world.drain_pending();
    let mut summary = TickSummary::default();
    for command in batch {
        let applied = apply_command(world, &command.actor, &command.text, now);
        summary.refreshers.extend(applied.refresh);
        command.acknowledge(applied.status);
        summary.applied = summary.applied.saturating_add(1);
    }
    summary
}

/// Apply one command for `actor`.
///
/// Commands for unknown actors do nothing. They are acknowledged OK,
/// except unknown directives, which are not implemented for anyone.
pub fn apply_command(world: &mut World, actor: &ActorId, text: &str, now: Instant) -> Applied {
    let instruction = Instruction::parse(text);
    let Some(record) = world.actor_mut(actor) else {
        debug!(actor = %actor, text, "command for unknown actor ignored");
        return match instruction {
            Instruction::Directive(Directive::Unknown(verb)) => {
                Applied::status(unknown_directive(&verb))
            }
            Instruction::Move(_) | Instruction::Directive(_) => {
                Applied::status(CommandStatus::ok())
            }
        };
    };
    record.last_command_at = now;

    match instruction {
        Instruction::Move(direction) => {
            let outcome = movement::try_move(world, actor, direction);
            debug!(actor = %actor, text, outcome = ?outcome, "move applied");
            Applied::status(CommandStatus::ok())
        }
        Instruction::Directive(directive) => apply_directive(world, actor, directive),
    }
}

/// Install `overlay`. Live overlays come back with a refresh request.
fn install_overlay(record: &mut Actor, overlay: Overlay) -> Option<RefreshRequest> {
    let live = overlay.kind().is_live();
    record.set_overlay(Some(overlay));
    live.then(|| RefreshRequest {
        actor: record.id.clone(),
        epoch: record.overlay_epoch,
        cancel: record.cancel.clone(),
    })
}

fn unknown_directive(verb: &str) -> CommandStatus {
    CommandStatus::not_implemented(format!("unknown directive: {verb}"))
}

fn apply_directive(world: &mut World, actor: &ActorId, directive: Directive) -> Applied {
    match directive {
        Directive::Attack => match combat::resolve_attack(world, actor) {
            AttackOutcome::NotEnoughEnergy => {
                Applied::status(CommandStatus::ok_with(NOT_ENOUGH_ENERGY))
            }
            AttackOutcome::Resolved { .. } | AttackOutcome::UnknownActor => {
                Applied::status(CommandStatus::ok())
            }
        },
        Directive::Unknown(verb) => Applied::status(unknown_directive(&verb)),
        other => {
            let Some(record) = world.actor_mut(actor) else {
                return Applied::status(CommandStatus::ok());
            };
            let mut refresh = None;
            match &other {
                Directive::Help => refresh = install_overlay(record, Overlay::help()),
                Directive::Clear => record.set_overlay(None),
                Directive::Resize(Some(viewport)) => record.viewport = *viewport,
                Directive::Profile => {
                    let overlay = Overlay::profile(&record.profile_panel());
                    refresh = install_overlay(record, overlay);
                }
                Directive::Resize(None) | Directive::Attack | Directive::Unknown(_) => {}
            }
            debug!(actor = %actor, directive = ?other, "directive applied");
            Applied {
                status: CommandStatus::ok(),
                refresh,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridworld_types::{Coord, StatusCode, Viewport};
    use gridworld_world::OverlayKind;

    use super::*;
    use crate::command::Command;
    use crate::config::GridworldConfig;
    use crate::world::tests::{admit_player, test_world};

    #[test]
    fn commands_apply_in_submission_order() {
        let mut world = test_world(GridworldConfig::default());
        let id = admit_player(&mut world, "alice", Coord::new(2, 3));
        let mut receivers = Vec::new();
        for text in ["md", "md", "ms", "ma"] {
            let (command, rx) = Command::new(id.clone(), text);
            world.enqueue(command);
            receivers.push(rx);
        }

        let summary = run_tick(&mut world, Instant::now());
        assert_eq!(summary.applied, 4);
        assert_eq!(world.actor(&id).unwrap().position, Coord::new(3, 4));
        assert_eq!(world.actor(&id).unwrap().vitals.energy, 11);
        for mut rx in receivers {
            assert_eq!(rx.try_recv().unwrap(), CommandStatus::ok());
        }
        assert!(world.drain_pending().is_empty());
    }

    #[test]
    fn illegal_move_is_acknowledged_ok_and_changes_nothing() {
        let mut world = test_world(GridworldConfig::default());
        let id = admit_player(&mut world, "alice", Coord::new(2, 3));
        let applied = apply_command(&mut world, &id, "ma", Instant::now());
        assert_eq!(applied.status.code, StatusCode::Ok);
        let actor = world.actor(&id).unwrap();
        assert_eq!(actor.position, Coord::new(2, 3));
        assert_eq!(actor.vitals.energy, 15);
    }

    #[test]
    fn unknown_directive_is_not_implemented() {
        let mut world = test_world(GridworldConfig::default());
        let id = admit_player(&mut world, "alice", Coord::new(2, 3));
        let applied = apply_command(&mut world, &id, ">dance", Instant::now());
        assert_eq!(applied.status.code, StatusCode::NotImplemented);
        assert_eq!(applied.status.message, "unknown directive: dance");
    }

    #[test]
    fn unknown_actor_is_a_silent_no_op() {
        let mut world = test_world(GridworldConfig::default());
        let ghost = ActorId::new("ghost");
        for text in ["mw", ">help", ">attack"] {
            let applied = apply_command(&mut world, &ghost, text, Instant::now());
            assert_eq!(applied.status, CommandStatus::ok());
        }
        assert_eq!(world.actor_count(), 0);
    }

    #[test]
    fn unknown_directive_is_not_implemented_for_anyone() {
        let mut world = test_world(GridworldConfig::default());
        let id = admit_player(&mut world, "alice", Coord::new(2, 3));
        for actor in [id, ActorId::new("ghost")] {
            let applied = apply_command(&mut world, &actor, ">dance", Instant::now());
            assert_eq!(applied.status.code, StatusCode::NotImplemented);
            assert_eq!(applied.status.message, "unknown directive: dance");
            assert!(applied.refresh.is_none());
        }
        assert_eq!(world.actor_count(), 1);
    }

    #[test]
    fn attack_without_energy_reports_it() {
        let mut world = test_world(GridworldConfig::default());
        let id = admit_player(&mut world, "alice", Coord::new(2, 3));
        let applied = apply_command(&mut world, &id, ">attack", Instant::now());
        assert_eq!(applied.status, CommandStatus::ok_with(NOT_ENOUGH_ENERGY));
    }

    #[test]
    fn overlay_directives_bump_the_epoch() {
        let mut world = test_world(GridworldConfig::default());
        let id = admit_player(&mut world, "alice", Coord::new(2, 3));
        let start = world.actor(&id).unwrap().overlay_epoch;

        let applied = apply_command(&mut world, &id, ">clear", Instant::now());
        assert!(applied.refresh.is_none());
        assert!(world.actor(&id).unwrap().overlay.is_none());

        let applied = apply_command(&mut world, &id, ">profile", Instant::now());
        let request = applied.refresh.unwrap();
        let actor = world.actor(&id).unwrap();
        assert_eq!(
            actor.overlay.as_ref().map(Overlay::kind),
            Some(OverlayKind::Profile)
        );
        assert_eq!(request.epoch, actor.overlay_epoch);
        assert_eq!(actor.overlay_epoch, start.wrapping_add(2));

        let applied = apply_command(&mut world, &id, ">help", Instant::now());
        assert!(applied.refresh.is_none());
        assert_ne!(world.actor(&id).unwrap().overlay_epoch, request.epoch);
    }

    #[test]
    fn resize_updates_viewport_only_with_two_arguments() {
        let mut world = test_world(GridworldConfig::default());
        let id = admit_player(&mut world, "alice", Coord::new(2, 3));
        apply_command(&mut world, &id, ">resize 40", Instant::now());
        assert_eq!(world.actor(&id).unwrap().viewport, Viewport::new(20, 10));
        apply_command(&mut world, &id, ">resize 40 12", Instant::now());
        assert_eq!(world.actor(&id).unwrap().viewport, Viewport::new(40, 12));
    }

    #[test]
    fn every_command_stamps_activity() {
        let mut world = test_world(GridworldConfig::default());
        let id = admit_player(&mut world, "alice", Coord::new(2, 3));
        let later = Instant::now()
            .checked_add(std::time::Duration::from_secs(30))
            .unwrap();
        apply_command(&mut world, &id, ">dance", later);
        assert_eq!(world.actor(&id).unwrap().last_command_at, later);
    }
}
