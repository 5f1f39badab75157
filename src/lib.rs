//! Cave map generation, grid A* pathfinding and state-machine driven bots.
//!
//! The host creates a [`engine::Simulation`] with a [`target::Target`], calls
//! `tick` at its own rate, drains the emitted events and renders the agent
//! snapshots it gets back.

pub mod components;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod grid;
pub mod map_gen;
pub mod pathfinding;
pub mod spawning;
pub mod systems;
pub mod target;
pub mod time_system;

pub use config::SimConfig;
pub use engine::{Simulation, TickResult};
pub use error::{ConfigError, GenerationError, PathError};
pub use events::GameEvent;
pub use target::{Player, Target};
