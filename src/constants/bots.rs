//! Bot behaviour tuning.

// HUNTER (grid A*, line of sight, search state)
/// Hunter maximum health
pub const HUNTER_MAX_HEALTH: i32 = 100;
/// Hunter movement speed (units per second)
pub const HUNTER_SPEED: f32 = 5.0;
/// Hunter view radius
pub const HUNTER_VIEW_RADIUS: f32 = 15.0;
/// Hunter attack range
pub const HUNTER_ATTACK_RANGE: f32 = 8.0;
/// Seconds between hunter shots
pub const HUNTER_FIRE_INTERVAL: f32 = 1.0;

// TRACKER (external navigation when available, no line of sight, no search)
/// Tracker maximum health
pub const TRACKER_MAX_HEALTH: i32 = 100;
/// Tracker movement speed
pub const TRACKER_SPEED: f32 = 8.0;
/// Tracker view radius
pub const TRACKER_VIEW_RADIUS: f32 = 20.0;
/// Tracker attack range
pub const TRACKER_ATTACK_RANGE: f32 = 10.0;
/// Seconds between tracker shots
pub const TRACKER_FIRE_INTERVAL: f32 = 0.8;
/// Tracker keeps chasing until the target is this many view radii away
pub const TRACKER_PURSUIT_FACTOR: f32 = 1.5;

// SNIPER (wanders, shoots from range, backs off when the target closes in)
/// Sniper maximum health
pub const SNIPER_MAX_HEALTH: i32 = 100;
/// Sniper movement speed
pub const SNIPER_SPEED: f32 = 3.5;
/// Sniper detection radius, also its attack range
pub const SNIPER_VIEW_RADIUS: f32 = 20.0;
/// Seconds between sniper shots
pub const SNIPER_FIRE_INTERVAL: f32 = 1.0;
/// Sniper runs away while the target is closer than this
pub const SNIPER_FLEE_RADIUS: f32 = 8.0;
/// Radius around the sniper used to pick wander destinations
pub const SNIPER_WANDER_RADIUS: f32 = 10.0;

// Shared
/// Below this health an attacking bot retreats
pub const FLEE_HEALTH_THRESHOLD: i32 = 30;
/// Above this health a retreating bot re-engages
pub const REENGAGE_HEALTH_THRESHOLD: i32 = 70;
/// Retreating bots only heal when the target is farther than this
pub const RETREAT_SAFE_DISTANCE: f32 = 15.0;
/// Percent chance per tick to regain one health point while safe
pub const RETREAT_REGEN_CHANCE_PERCENT: u32 = 5;
/// Health regained per successful regeneration roll
pub const RETREAT_REGEN_AMOUNT: i32 = 1;
/// Search ends once the bot is this close to the last known position
pub const SEARCH_ARRIVAL_RADIUS: f32 = 2.0;
/// Radius around the bot used to pick patrol destinations
pub const PATROL_RADIUS: f32 = 20.0;
/// How far ahead a fleeing bot aims, directly away from the target
pub const FLEE_STEP_DISTANCE: f32 = 5.0;
/// Turn smoothing factor while aiming (per second)
pub const AIM_TURN_RATE: f32 = 10.0;

// Shots
/// Damage dealt by one bot shot that connects
pub const SHOT_DAMAGE: i32 = 10;
/// Distance a shot travels before it expires
pub const SHOT_RANGE: f32 = 40.0;
/// A shot passing this close to the target's centre hits it
pub const SHOT_HIT_RADIUS: f32 = 0.5;
