//! The engine handle: entry points, task supervision, and shutdown.
//!
//! [`Engine::start`] builds the [`World`], starts the intake and tick loops,
//! and returns a handle exposing the boundary operations:
//!
//! - [`Engine::submit_command`] enqueues a command and awaits its single
//!   acknowledgement.
//! - [`Engine::render_view`] draws a viewer's window under the world lock.
//! - [`Engine::create_actor`] admits an actor and starts its lifecycle
//!   tasks.
//!
//! Lifecycle tasks are grouped per actor in a `JoinSet` alongside the
//! actor's [`CancelSignal`]. Finished groups are reaped whenever a new task
//! is supervised, and [`Engine::shutdown`] cancels and joins all of them.

use std::future::Future;
use std::sync::Arc;

use gridworld_types::{ActorId, ActorKind, ActorSummary, CommandStatus, Coord, Viewport};
use gridworld_world::SpatialMap;
use rand::rngs::SmallRng;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::cancel::CancelSignal;
use crate::command::Submitter;
use crate::config::GridworldConfig;
use crate::lifecycle;
use crate::render;
use crate::runner;
use crate::tick::RefreshRequest;
use crate::vitals::Vital;
use crate::world::{Admission, World};

/// Tasks belonging to one actor.
#[derive(Debug)]
struct ActorTasks {
    /// The actor's destruction signal.
    cancel: CancelSignal,
    /// Running lifecycle tasks.
    tasks: JoinSet<()>,
}

impl ActorTasks {
    /// The actor is gone and every task has been reaped.
    fn is_finished(&self) -> bool {
        self.cancel.is_cancelled() && self.tasks.is_empty()
    }

    /// The group belongs to the actor behind `cancel`.
    fn owned_by(&self, cancel: &CancelSignal) -> bool {
        self.cancel.same_signal(cancel)
    }
}

/// State shared between the engine handle and its background loops.
#[derive(Debug)]
pub(crate) struct Shared {
    /// The world behind its single lock.
    pub(crate) world: Arc<Mutex<World>>,
    /// Simulation parameters.
    pub(crate) config: Arc<GridworldConfig>,
    /// Command submission handle, also used by NPC drivers.
    pub(crate) submitter: Submitter,
    /// Per-actor task groups.
    supervisors: Mutex<Vec<ActorTasks>>,
}

impl Shared {
    /// Run `task` in the group owned by `cancel`.
    async fn supervise<F>(&self, cancel: &CancelSignal, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut supervisors = self.supervisors.lock().await;
        for group in supervisors.iter_mut() {
            while group.tasks.try_join_next().is_some() {}
        }
        supervisors.retain(|g| !g.is_finished());

        if let Some(group) = supervisors.iter_mut().find(|g| g.owned_by(cancel)) {
            group.tasks.spawn(task);
            return;
        }
        let mut tasks = JoinSet::new();
        tasks.spawn(task);
        supervisors.push(ActorTasks {
            cancel: cancel.clone(),
            tasks,
        });
    }

    /// Start a live overlay refresher.
    pub(crate) async fn spawn_refresher(&self, request: RefreshRequest) {
        let cancel = request.cancel.clone();
        let period = self.config.lifecycle.overlay_refresh();
        let task = lifecycle::refresh_profile(Arc::clone(&self.world), request, period);
        self.supervise(&cancel, task).await;
    }

    /// Start regeneration, the inactivity watchdog, and for NPCs the driver.
    async fn spawn_actor_tasks(
        &self,
        id: &ActorId,
        cancel: &CancelSignal,
        kind: ActorKind,
        mut rng: SmallRng,
    ) {
        let vitals = &self.config.vitals;
        let timers = &self.config.lifecycle;

        self.supervise(
            cancel,
            lifecycle::regenerate_vital(
                Arc::clone(&self.world),
                id.clone(),
                cancel.clone(),
                Vital::Health,
                vitals.health_regen(),
            ),
        )
        .await;
        self.supervise(
            cancel,
            lifecycle::regenerate_vital(
                Arc::clone(&self.world),
                id.clone(),
                cancel.clone(),
                Vital::Energy,
                vitals.energy_regen(),
            ),
        )
        .await;
        self.supervise(
            cancel,
            lifecycle::watch_inactivity(
                Arc::clone(&self.world),
                id.clone(),
                cancel.clone(),
                timers.eviction_check(),
                timers.inactivity_timeout(),
            ),
        )
        .await;

        if kind == ActorKind::Npc {
            let period = lifecycle::npc_interval(timers, &mut rng);
            self.supervise(
                cancel,
                lifecycle::drive_npc(
                    Arc::clone(&self.world),
                    self.submitter.clone(),
                    id.clone(),
                    cancel.clone(),
                    period,
                    rng,
                ),
            )
            .await;
        }
    }
}

/// Handle to a running simulation.
#[derive(Debug)]
pub struct Engine {
    /// State shared with the background loops.
    shared: Arc<Shared>,
    /// Raised by [`Engine::shutdown`] to stop the intake and tick loops.
    stop: CancelSignal,
    /// The intake and tick loops.
    loops: Mutex<JoinSet<()>>,
}

impl Engine {
    /// Build the world over `map` and start the intake and tick loops.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(map: SpatialMap, config: GridworldConfig) -> Self {
        let config = Arc::new(config);
        let world = Arc::new(Mutex::new(World::new(map, Arc::clone(&config))));
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            world: Arc::clone(&world),
            config,
            submitter: Submitter::new(tx),
            supervisors: Mutex::new(Vec::new()),
        });
        let stop = CancelSignal::new();

        let mut loops = JoinSet::new();
        loops.spawn(runner::intake_loop(world, rx, stop.clone()));
        let ticker = runner::tick_loop(Arc::clone(&shared), stop.clone());
        loops.spawn(ticker);

        info!(
            world = %shared.config.world.name,
            tick_interval_ms = shared.config.world.tick_interval_ms,
            capacity = shared.config.world.capacity,
            "engine started"
        );
        Self {
            shared,
            stop,
            loops: Mutex::new(loops),
        }
    }

    /// Simulation parameters.
    pub fn config(&self) -> &GridworldConfig {
        &self.shared.config
    }

    /// The world lock, for inspection.
    pub fn world(&self) -> Arc<Mutex<World>> {
        Arc::clone(&self.shared.world)
    }

    /// Submit a command and wait for its acknowledgement.
    pub async fn submit_command(&self, actor: &str, text: &str) -> CommandStatus {
        self.shared.submitter.submit(actor, text).await
    }

    /// Render `size` glyphs around `actor`.
    pub async fn render_view(&self, actor: &str, size: Viewport) -> String {
        let world = self.shared.world.lock().await;
        render::render_view(&world, &ActorId::new(actor.trim()), size)
    }

    /// Admit an actor near `spawn` and start its lifecycle tasks.
    pub async fn create_actor(
        &self,
        id: &str,
        viewport: Viewport,
        spawn: Coord,
        kind: ActorKind,
    ) -> Admission {
        let id = ActorId::new(id.trim());
        let (admission, cancel, rng) = {
            let mut world = self.shared.world.lock().await;
            let admission = world.admit(&id, kind, viewport, spawn, Instant::now());
            if !admission.is_accepted() {
                return admission;
            }
            let cancel = world.actor(&id).map(|a| a.cancel.clone());
            (admission, cancel, world.fork_rng())
        };
        if let Some(cancel) = cancel {
            self.shared.spawn_actor_tasks(&id, &cancel, kind, rng).await;
        }
        admission
    }

    /// Place `count` NPCs on random free cells. Returns how many were placed.
    pub async fn spawn_npcs(&self, count: u32) -> u32 {
        let viewport = self.shared.config.world.default_viewport;
        let mut placed: u32 = 0;
        for _ in 0..count {
            let spot = self.shared.world.lock().await.random_vacant();
            let Some(spot) = spot else {
                warn!(requested = count, placed, "no room left for npcs");
                break;
            };
            let id = ActorId::generate_npc();
            let admission = self
                .create_actor(id.as_str(), viewport, spot, ActorKind::Npc)
                .await;
            if admission.is_accepted() {
                placed = placed.saturating_add(1);
            }
        }
        info!(placed, "npcs spawned");
        placed
    }

    /// Projections of every actor.
    pub async fn actor_summaries(&self) -> Vec<ActorSummary> {
        self.shared.world.lock().await.summaries()
    }

    /// Stop the loops, destroy every actor's tasks, and wait for them.
    ///
    /// Commands still queued are acknowledged as unavailable. Calling this
    /// more than once is a no-op.
    pub async fn shutdown(&self) {
        if !self.stop.cancel() {
            return;
        }
        let mut loops = std::mem::take(&mut *self.loops.lock().await);
        while loops.join_next().await.is_some() {}

        {
            let mut world = self.shared.world.lock().await;
            world.cancel_all();
            for command in world.drain_pending() {
                command.acknowledge(CommandStatus::unavailable());
            }
        }

        let groups = std::mem::take(&mut *self.shared.supervisors.lock().await);
        for mut group in groups {
            while group.tasks.join_next().await.is_some() {}
        }
        info!("engine stopped");
    }
}
