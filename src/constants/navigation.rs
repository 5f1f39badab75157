//! Pathfinding and path-following constants.

/// Cost of an orthogonal step
pub const STRAIGHT_STEP_COST: i32 = 10;
/// Cost of a diagonal step (10 * sqrt(2), rounded)
pub const DIAGONAL_STEP_COST: i32 = 14;

/// Horizontal distance at which a waypoint counts as reached
pub const WAYPOINT_TOLERANCE: f32 = 0.1;
/// Cells between a map corner and the refuge search origin
pub const REFUGE_INSET: i32 = 2;
/// Random cells tried when picking a patrol destination
pub const PATROL_SAMPLE_ATTEMPTS: u32 = 30;
