//! Simulation configuration loaded from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. The runner applies command line overrides on top.

use crate::constants::*;
use crate::error::ConfigError;
use crate::spawning::ProfileKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: usize,
    pub height: usize,
    /// Chance (percent) that an interior cell starts as a wall
    pub fill_percent: u32,
    /// Fixed seed; a random one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: MAP_DEFAULT_WIDTH,
            height: MAP_DEFAULT_HEIGHT,
            fill_percent: MAP_DEFAULT_FILL_PERCENT,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    pub bot_count: usize,
    pub min_player_distance: f32,
    pub max_attempts: u32,
    /// Profiles handed out to bots in turn
    pub deck: Vec<ProfileKind>,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            bot_count: SPAWN_DEFAULT_BOT_COUNT,
            min_player_distance: SPAWN_MIN_PLAYER_DISTANCE,
            max_attempts: SPAWN_MAX_ATTEMPTS,
            deck: vec![ProfileKind::Hunter, ProfileKind::Sniper],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub map: MapConfig,
    pub spawn: SpawnSettings,
    /// Fixed ticks per second
    pub tick_rate: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            spawn: SpawnSettings::default(),
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

impl SimConfig {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map.width < MAP_MIN_DIMENSION || self.map.height < MAP_MIN_DIMENSION {
            return Err(ConfigError::Invalid(format!(
                "map must be at least {MAP_MIN_DIMENSION}x{MAP_MIN_DIMENSION}, got {}x{}",
                self.map.width, self.map.height
            )));
        }
        if self.map.fill_percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "fill_percent must be 0..=100, got {}",
                self.map.fill_percent
            )));
        }
        if self.tick_rate.is_nan() || self.tick_rate <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tick_rate must be positive, got {}",
                self.tick_rate
            )));
        }
        if self.spawn.bot_count > 0 && self.spawn.deck.is_empty() {
            return Err(ConfigError::Invalid("spawn deck is empty".to_string()));
        }
        Ok(())
    }

    /// Seconds per tick
    pub fn tick_interval(&self) -> f32 {
        1.0 / self.tick_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = SimConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.map.width, 50);
        assert_eq!(config.map.fill_percent, 47);
        assert_eq!(config.spawn.deck, vec![ProfileKind::Hunter, ProfileKind::Sniper]);
    }

    #[test]
    fn test_partial_override() {
        let config = SimConfig::from_json_str(
            r#"{ "map": { "width": 80, "seed": 42 }, "spawn": { "deck": ["tracker"] } }"#,
        )
        .unwrap();
        assert_eq!(config.map.width, 80);
        assert_eq!(config.map.height, 50);
        assert_eq!(config.map.seed, Some(42));
        assert_eq!(config.spawn.deck, vec![ProfileKind::Tracker]);
        assert_eq!(config.spawn.bot_count, SPAWN_DEFAULT_BOT_COUNT);
    }

    #[test]
    fn test_rejects_invalid_values() {
        for json in [
            r#"{ "map": { "width": 2 } }"#,
            r#"{ "map": { "fill_percent": 101 } }"#,
            r#"{ "tick_rate": 0 }"#,
            r#"{ "spawn": { "deck": [] } }"#,
        ] {
            assert!(
                matches!(SimConfig::from_json_str(json), Err(ConfigError::Invalid(_))),
                "{json}"
            );
        }
    }

    #[test]
    fn test_parse_error_reported() {
        assert!(matches!(
            SimConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimConfig::from_json_str(r#"{ "spawn": { "deck": ["wizard"] } }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SimConfig::load("/nonexistent/cave-bots.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
