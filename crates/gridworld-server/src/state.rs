//! Shared application state for the HTTP handlers.

use gridworld_core::{Engine, GridworldConfig};

/// State shared by every handler.
#[derive(Debug)]
pub struct AppState {
    /// The running simulation.
    pub engine: Engine,
}

impl AppState {
    /// Wrap a started engine.
    pub const fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Simulation parameters the engine was started with.
    pub fn config(&self) -> &GridworldConfig {
        self.engine.config()
    }
}
