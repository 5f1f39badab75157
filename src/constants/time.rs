//! Simulation timing constants.

/// Default fixed simulation rate (ticks per second)
pub const DEFAULT_TICK_RATE: f32 = 60.0;
/// Seconds between path refreshes while chasing
pub const CHASE_PATH_REFRESH_INTERVAL: f32 = 0.5;
/// Duration of the white hit flash
pub const HIT_FLASH_DURATION: f32 = 0.1;
/// Duration of the hunter shrink-and-remove sequence
pub const HUNTER_DEATH_DURATION: f32 = 1.0;
/// Duration of the tracker removal delay
pub const TRACKER_DEATH_DURATION: f32 = 1.0;
/// Duration of the sniper's faster shrink
pub const SNIPER_DEATH_DURATION: f32 = 0.5;
