//! Map generation constants.

/// Default map width in cells
pub const MAP_DEFAULT_WIDTH: usize = 50;
/// Default map height in cells
pub const MAP_DEFAULT_HEIGHT: usize = 50;
/// Default chance (percent) that an interior cell starts as a wall
pub const MAP_DEFAULT_FILL_PERCENT: u32 = 47;
/// Number of cellular automata smoothing passes
pub const MAP_SMOOTHING_ITERATIONS: usize = 5;
/// Wall-neighbour count at which a cell keeps its current value.
/// More neighbours than this turns a cell into wall, fewer into floor.
pub const MAP_WALL_NEIGHBOUR_THRESHOLD: u32 = 4;
/// Smallest map dimension that still has an interior
pub const MAP_MIN_DIMENSION: usize = 3;

/// Bots may not spawn closer than this to the player (world units)
pub const SPAWN_MIN_PLAYER_DISTANCE: f32 = 10.0;
/// Random placement attempts before remaining bots are skipped
pub const SPAWN_MAX_ATTEMPTS: u32 = 1000;
/// Default number of bots per map
pub const SPAWN_DEFAULT_BOT_COUNT: usize = 4;
/// Height above the floor at which the player is placed
pub const PLAYER_SPAWN_HEIGHT: f32 = 0.5;
/// Height above the floor at which bots are placed
pub const BOT_SPAWN_HEIGHT: f32 = 1.0;
