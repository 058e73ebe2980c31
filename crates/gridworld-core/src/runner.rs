//! The intake and tick loops.
//!
//! The intake loop moves submitted commands from the unbounded channel
//! into the world's pending queue, so submitters never wait on a tick. The
//! tick loop wakes on a fixed period, drains and applies the queue with
//! [`run_tick`], and then starts any refresh tasks the tick asked for once
//! the lock has been released. A late tick is skipped rather than bunched
//! up, so tick N always finishes before tick N+1 begins.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cancel::CancelSignal;
use crate::command::Command;
use crate::engine::Shared;
use crate::lifecycle::{next_turn, ticker};
use crate::tick;
use crate::world::World;

/// Append submitted commands to the pending queue until `stop` is raised.
pub(crate) async fn intake_loop(
    world: Arc<Mutex<World>>,
    mut rx: mpsc::UnboundedReceiver<Command>,
    stop: CancelSignal,
) {
    loop {
        let first = tokio::select! {
            biased;
            () = stop.cancelled() => break,
            received = rx.recv() => match received {
                Some(command) => command,
                None => break,
            },
        };
        let mut world = world.lock().await;
        world.enqueue(first);
        while let Ok(next) = rx.try_recv() {
            world.enqueue(next);
        }
    }
    debug!("intake loop stopped");
}

/// Run one tick per configured period until `stop` is raised.
pub(crate) async fn tick_loop(shared: Arc<Shared>, stop: CancelSignal) {
    let mut ticker = ticker(shared.config.world.tick_interval());
    let mut ticks: u64 = 0;
    while next_turn(&mut ticker, &stop).await {
        let summary = {
            let mut world = shared.world.lock().await;
            tick::run_tick(&mut world, Instant::now())
        };
        ticks = ticks.wrapping_add(1);
        if summary.applied > 0 {
            debug!(
                tick = ticks,
                applied = summary.applied,
                "tick applied commands"
            );
        }
        for request in summary.refreshers {
            shared.spawn_refresher(request).await;
        }
    }
    info!(ticks, "tick loop stopped");
}
