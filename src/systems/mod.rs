//! Simulation systems organized by domain.
//!
//! - `ai`: per-bot perception and state machine
//! - `combat`: damage, death sequence, aiming and firing
//! - `movement`: path following
//! - `rendering`: read-only snapshots for the host renderer

pub mod ai;
pub mod combat;
pub mod movement;
pub mod rendering;

// Re-export commonly used items
pub use ai::{update_agents, update_state_machine, AiContext, Perception};
pub use combat::{shot_hits, take_damage, update_timers};
pub use movement::{follow_path, horizontal_distance};
pub use rendering::{collect_paths, collect_render_agents, AgentPath, RenderAgent, Tint};
