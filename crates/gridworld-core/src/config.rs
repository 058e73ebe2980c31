//! Configuration loading and typed config structures for Gridworld.
//!
//! The canonical configuration lives in `gridworld-config.yaml` at the
//! project root. Every field has a default, so an empty file (or no file at
//! all) yields a playable world.

use std::path::{Path, PathBuf};
use std::time::Duration;

use gridworld_types::{Coord, Viewport};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is not usable.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Gridworld configuration.
///
/// Mirrors the structure of `gridworld-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GridworldConfig {
    /// World-level settings (map, timing, capacity, spawn).
    #[serde(default)]
    pub world: WorldConfig,

    /// Health and energy parameters.
    #[serde(default)]
    pub vitals: VitalsConfig,

    /// Attack parameters.
    #[serde(default)]
    pub combat: CombatConfig,

    /// Per-actor background task periods.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Viewport rendering parameters.
    #[serde(default)]
    pub render: RenderConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GridworldConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `GRIDWORLD_MAP` overrides `world.map_path`
    /// - `GRIDWORLD_PORT` overrides `server.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("GRIDWORLD_MAP") {
            self.world.map_path = PathBuf::from(val);
        }
        if let Some(port) = std::env::var("GRIDWORLD_PORT")
            .ok()
            .and_then(|val| val.parse().ok())
        {
            self.server.port = port;
        }
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("world.tick_interval_ms", self.world.tick_interval_ms),
            ("vitals.health_regen_ms", self.vitals.health_regen_ms),
            ("vitals.energy_regen_ms", self.vitals.energy_regen_ms),
            ("lifecycle.eviction_check_secs", self.lifecycle.eviction_check_secs),
            ("lifecycle.overlay_refresh_ms", self.lifecycle.overlay_refresh_ms),
            ("lifecycle.npc_min_interval_ms", self.lifecycle.npc_min_interval_ms),
        ];
        for (field, value) in periods {
            if value == 0 {
                return Err(invalid(field, "period must be greater than zero"));
            }
        }
        if self.vitals.max_health == 0 {
            return Err(invalid("vitals.max_health", "must be at least 1"));
        }
        if self.vitals.respawn_health == 0 || self.vitals.respawn_health > self.vitals.max_health {
            return Err(invalid(
                "vitals.respawn_health",
                format!("must be within 1..={}", self.vitals.max_health),
            ));
        }
        if self.vitals.starting_energy > self.vitals.max_energy {
            return Err(invalid(
                "vitals.starting_energy",
                format!("must not exceed max_energy ({})", self.vitals.max_energy),
            ));
        }
        if self.lifecycle.npc_min_interval_ms > self.lifecycle.npc_max_interval_ms {
            return Err(invalid(
                "lifecycle.npc_max_interval_ms",
                "must not be below npc_min_interval_ms",
            ));
        }
        Ok(())
    }
}

/// Build a [`ConfigError::Invalid`].
fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable world name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Seed for glyph assignment, NPC placement, and NPC behavior.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Path of the map file to load.
    #[serde(default = "default_map_path")]
    pub map_path: PathBuf,

    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Maximum number of players. NPCs do not count.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Where new actors and respawned actors are placed.
    #[serde(default = "default_spawn")]
    pub spawn: Coord,

    /// NPCs seeded at startup.
    #[serde(default)]
    pub npc_count: u32,

    /// Glyph drawn for NPCs.
    #[serde(default = "default_npc_glyph")]
    pub npc_glyph: char,

    /// Viewport used when a client does not send one.
    #[serde(default = "default_viewport")]
    pub default_viewport: Viewport,
}

impl WorldConfig {
    /// Tick period as a [`Duration`].
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            map_path: default_map_path(),
            tick_interval_ms: default_tick_interval_ms(),
            capacity: default_capacity(),
            spawn: default_spawn(),
            npc_count: 0,
            npc_glyph: default_npc_glyph(),
            default_viewport: default_viewport(),
        }
    }
}

/// Health and energy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VitalsConfig {
    /// Health ceiling.
    #[serde(default = "default_max_health")]
    pub max_health: u32,

    /// Energy ceiling.
    #[serde(default = "default_max_energy")]
    pub max_energy: u32,

    /// Energy a new actor starts with.
    #[serde(default = "default_starting_energy")]
    pub starting_energy: u32,

    /// Health restored on respawn after death.
    #[serde(default = "default_max_health")]
    pub respawn_health: u32,

    /// Milliseconds between +1 health ticks.
    #[serde(default = "default_health_regen_ms")]
    pub health_regen_ms: u64,

    /// Milliseconds between +1 energy ticks.
    #[serde(default = "default_energy_regen_ms")]
    pub energy_regen_ms: u64,
}

impl VitalsConfig {
    /// Health regeneration period.
    pub const fn health_regen(&self) -> Duration {
        Duration::from_millis(self.health_regen_ms)
    }

    /// Energy regeneration period.
    pub const fn energy_regen(&self) -> Duration {
        Duration::from_millis(self.energy_regen_ms)
    }
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            max_health: default_max_health(),
            max_energy: default_max_energy(),
            starting_energy: default_starting_energy(),
            respawn_health: default_max_health(),
            health_regen_ms: default_health_regen_ms(),
            energy_regen_ms: default_energy_regen_ms(),
        }
    }
}

/// Attack configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CombatConfig {
    /// Energy spent per attack.
    #[serde(default = "default_attack_energy_cost")]
    pub attack_energy_cost: u32,

    /// Health removed from each adjacent actor.
    #[serde(default = "default_attack_damage")]
    pub attack_damage: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_energy_cost: default_attack_energy_cost(),
            attack_damage: default_attack_damage(),
        }
    }
}

/// Per-actor background task configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LifecycleConfig {
    /// Seconds without a command before an actor is evicted.
    #[serde(default = "default_inactivity_secs")]
    pub inactivity_timeout_secs: u64,

    /// Seconds between eviction checks.
    #[serde(default = "default_inactivity_secs")]
    pub eviction_check_secs: u64,

    /// Milliseconds between live overlay refreshes.
    #[serde(default = "default_overlay_refresh_ms")]
    pub overlay_refresh_ms: u64,

    /// Lower bound of an NPC's action interval.
    #[serde(default = "default_npc_min_interval_ms")]
    pub npc_min_interval_ms: u64,

    /// Upper bound of an NPC's action interval.
    #[serde(default = "default_npc_max_interval_ms")]
    pub npc_max_interval_ms: u64,
}

impl LifecycleConfig {
    /// Idle window after which an actor is evicted.
    pub const fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_secs)
    }

    /// Period of the eviction check.
    pub const fn eviction_check(&self) -> Duration {
        Duration::from_secs(self.eviction_check_secs)
    }

    /// Period of live overlay refreshes.
    pub const fn overlay_refresh(&self) -> Duration {
        Duration::from_millis(self.overlay_refresh_ms)
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_secs: default_inactivity_secs(),
            eviction_check_secs: default_inactivity_secs(),
            overlay_refresh_ms: default_overlay_refresh_ms(),
            npc_min_interval_ms: default_npc_min_interval_ms(),
            npc_max_interval_ms: default_npc_max_interval_ms(),
        }
    }
}

/// Viewport rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenderConfig {
    /// Horizontal visibility radius around the viewer.
    #[serde(default = "default_visibility_x")]
    pub visibility_x: u32,

    /// Vertical visibility radius around the viewer.
    #[serde(default = "default_visibility_y")]
    pub visibility_y: u32,

    /// Glyph drawn for unknown or hidden cells.
    #[serde(default = "default_fog_glyph")]
    pub fog_glyph: char,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            visibility_x: default_visibility_x(),
            visibility_y: default_visibility_y(),
            fog_glyph: default_fog_glyph(),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Gridworld".to_owned()
}

const fn default_seed() -> u64 {
    42
}

fn default_map_path() -> PathBuf {
    PathBuf::from("maps/map_1.map")
}

const fn default_tick_interval_ms() -> u64 {
    100
}

const fn default_capacity() -> usize {
    10
}

const fn default_spawn() -> Coord {
    Coord::new(2, 3)
}

const fn default_npc_glyph() -> char {
    '&'
}

const fn default_viewport() -> Viewport {
    Viewport::new(80, 20)
}

const fn default_max_health() -> u32 {
    3
}

const fn default_max_energy() -> u32 {
    150
}

const fn default_starting_energy() -> u32 {
    15
}

const fn default_health_regen_ms() -> u64 {
    5000
}

const fn default_energy_regen_ms() -> u64 {
    500
}

const fn default_attack_energy_cost() -> u32 {
    25
}

const fn default_attack_damage() -> u32 {
    1
}

const fn default_inactivity_secs() -> u64 {
    600
}

const fn default_overlay_refresh_ms() -> u64 {
    500
}

const fn default_npc_min_interval_ms() -> u64 {
    400
}

const fn default_npc_max_interval_ms() -> u64 {
    1400
}

const fn default_visibility_x() -> u32 {
    15
}

const fn default_visibility_y() -> u32 {
    10
}

const fn default_fog_glyph() -> char {
    '·'
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8888
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_world() {
        let config = GridworldConfig::default();
        assert_eq!(config.world.tick_interval_ms, 100);
        assert_eq!(config.world.spawn, Coord::new(2, 3));
        assert_eq!(config.vitals.max_health, 3);
        assert_eq!(config.vitals.max_energy, 150);
        assert_eq!(config.vitals.starting_energy, 15);
        assert_eq!(config.combat.attack_energy_cost, 25);
        assert_eq!(
            config.lifecycle.inactivity_timeout(),
            Duration::from_secs(600)
        );
        assert_eq!(config.render.fog_glyph, '·');
        assert_eq!(config.server.port, 8888);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_yaml_uses_defaults() {
        let config = GridworldConfig::parse("{}").unwrap();
        assert_eq!(config, GridworldConfig::default());
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = r#"
world:
  name: "Arena"
  capacity: 2
  spawn: { x: 5, y: 6 }
  npc_count: 3
  default_viewport: { width: 40, height: 12 }
vitals:
  max_health: 5
  respawn_health: 4
combat:
  attack_energy_cost: 10
render:
  fog_glyph: "~"
server:
  port: 9000
"#;
        let config = GridworldConfig::parse(yaml).unwrap();
        assert_eq!(config.world.name, "Arena");
        assert_eq!(config.world.capacity, 2);
        assert_eq!(config.world.spawn, Coord::new(5, 6));
        assert_eq!(config.world.npc_count, 3);
        assert_eq!(config.world.default_viewport, Viewport::new(40, 12));
        assert_eq!(config.vitals.max_health, 5);
        assert_eq!(config.vitals.respawn_health, 4);
        assert_eq!(config.vitals.max_energy, 150);
        assert_eq!(config.combat.attack_energy_cost, 10);
        assert_eq!(config.render.fog_glyph, '~');
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let err = GridworldConfig::parse("world:\n  tick_interval_ms: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "world.tick_interval_ms",
                ..
            }
        ));
    }

    #[test]
    fn respawn_health_above_max_is_rejected() {
        let err = GridworldConfig::parse("vitals:\n  respawn_health: 5\n").unwrap_err();
        assert!(err.to_string().contains("vitals.respawn_health"));
    }

    #[test]
    fn starting_energy_above_max_is_rejected() {
        let yaml = "vitals:\n  max_energy: 10\n  starting_energy: 11\n";
        assert!(GridworldConfig::parse(yaml).is_err());
    }

    #[test]
    fn inverted_npc_interval_is_rejected() {
        let yaml = "lifecycle:\n  npc_min_interval_ms: 900\n  npc_max_interval_ms: 800\n";
        let err = GridworldConfig::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("npc_max_interval_ms"));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = GridworldConfig::parse("world: [unterminated").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn bundled_config_parses() {
        let yaml = include_str!("../../../gridworld-config.yaml");
        let config = GridworldConfig::parse(yaml).unwrap();
        assert_eq!(config.world.npc_count, 3);
        assert_eq!(config.world.map_path, PathBuf::from("maps/map_1.map"));
        assert_eq!(config.render.fog_glyph, '·');
    }
}
