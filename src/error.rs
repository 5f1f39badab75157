//! Error types shared across the simulation.
//!
//! None of these are fatal: path failures are recovered by the agent that
//! asked, generation failures skip the affected spawn.

use thiserror::Error;

/// Why a path query produced no waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    /// Start and goal are both walkable but no walkable chain connects them.
    #[error("no path between start and goal")]
    NoPath,
    /// Start or goal resolved to a cell that cannot be walked on.
    #[error("cell ({x}, {y}) is not walkable")]
    InvalidCell { x: i32, y: i32 },
}

/// Spawn placement failures after a map was generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("map has no floor cell to place the player on")]
    NoPlayerSpawn,
    #[error("placed {placed} of {requested} bots before running out of {attempts} attempts")]
    SpawnBudgetExhausted {
        placed: usize,
        requested: usize,
        attempts: u32,
    },
}

/// Problems loading or validating a [`crate::config::SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
