//! World state, tick loop, and actor lifecycle for the Gridworld simulation.
//!
//! This crate is the authoritative simulation. A single [`World`] holds the
//! spatial map, the actor registry, and the pending command queue behind
//! one `tokio::sync::Mutex`. Everything that changes the world does so in a
//! short critical section on that lock:
//!
//! 1. **Intake** -- submitted commands are appended to the queue.
//! 2. **Tick** -- on a fixed period the queue is drained and every command
//!    is applied in submission order, then acknowledged.
//! 3. **Lifecycle** -- per-actor tasks regenerate vitals, evict idle actors,
//!    refresh live overlays, and drive NPCs.
//! 4. **Render** -- a consistent read projects a viewport to text.
//!
//! The [`Engine`] handle wires these together and exposes the three entry
//! points used by the boundary: [`Engine::submit_command`],
//! [`Engine::render_view`], and [`Engine::create_actor`].

pub mod cancel;
pub mod combat;
pub mod command;
pub mod config;
pub mod engine;
pub mod lifecycle;
pub mod movement;
pub mod render;
mod runner;
pub mod tick;
pub mod vitals;
pub mod world;

pub use cancel::CancelSignal;
pub use command::{Command, Directive, Instruction, Submitter};
pub use config::{ConfigError, GridworldConfig};
pub use engine::Engine;
pub use world::{Actor, Admission, World};
