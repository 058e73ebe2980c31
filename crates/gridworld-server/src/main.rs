//! Gridworld server binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `gridworld-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Load the map file
//! 4. Start the engine and seed NPCs
//! 5. Serve HTTP until `Ctrl-C`
//! 6. Shut the engine down

use std::path::Path;
use std::sync::Arc;

use gridworld_core::{Engine, GridworldConfig};
use gridworld_server::{AppState, LaunchError, start_server};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Default configuration file, relative to the working directory.
const CONFIG_PATH: &str = "gridworld-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the map, or the listener fail.
#[tokio::main]
async fn main() -> Result<(), LaunchError> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging. `RUST_LOG` wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        capacity = config.world.capacity,
        "configuration loaded"
    );

    // 3. Load the map.
    let map = gridworld_world::load_map(&config.world.map_path)?;

    // 4. Start the engine.
    let npc_count = config.world.npc_count;
    let server = config.server.clone();
    let state = Arc::new(AppState::new(Engine::start(map, config)));
    if npc_count > 0 {
        state.engine.spawn_npcs(npc_count).await;
    }

    // 5. Serve until interrupted.
    let served = start_server(&server, Arc::clone(&state), shutdown_signal()).await;

    // 6. Stop the simulation whether or not serving succeeded.
    state.engine.shutdown().await;
    served?;
    Ok(())
}

/// Load configuration from [`CONFIG_PATH`], or defaults if it is missing.
fn load_config() -> Result<GridworldConfig, LaunchError> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        return Ok(GridworldConfig::from_file(path)?);
    }
    let mut config = GridworldConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Resolve on `Ctrl-C`.
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for ctrl-c, shutting down");
    }
    info!("shutdown requested");
}
