//! Data-driven bot definitions.
//!
//! Every bot runs the same state machine; profiles only differ in thresholds
//! and in which optional capabilities they have.

use crate::components::{BotTag, Brain, Collider, Health, PathFollower, Transform};
use glam::Vec3;
use hecs::World;
use serde::{Deserialize, Serialize};

/// Optional behaviours a profile can switch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Losing the target leads to a search of its last known position
    /// instead of going straight back to patrol
    pub has_search: bool,
    /// Walls block the bot's view of the target
    pub has_line_of_sight: bool,
    /// Paths come from the host's navigation service when one is installed
    pub uses_external_nav: bool,
    /// Keeps its distance: runs from a target inside `flee_radius`, attacks
    /// whatever it sees in range and wanders otherwise
    pub flees_when_close: bool,
}

/// Definition of a bot type - all the data needed to spawn one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotProfile {
    pub name: &'static str,
    pub max_health: i32,
    /// Movement speed in world units per second
    pub speed: f32,
    pub view_radius: f32,
    pub attack_range: f32,
    /// Patrol destinations are picked within this distance
    pub patrol_radius: f32,
    /// Only used with the `flees_when_close` capability
    pub flee_radius: f32,
    /// Once chasing, contact is kept up to `view_radius * pursuit_factor`
    pub pursuit_factor: f32,
    /// Seconds between shots
    pub fire_interval: f32,
    /// Attacking bots retreat below this health
    pub flee_threshold: i32,
    /// Retreating bots re-engage above this health
    pub reengage_threshold: i32,
    pub death_duration: f32,
    pub capabilities: Capabilities,
}

impl BotProfile {
    /// Spawn this bot type at the given position
    pub fn spawn(&self, world: &mut World, id: impl Into<String>, position: Vec3) -> hecs::Entity {
        world.spawn((
            Transform::new(position),
            Brain::new(*self),
            Health::new(self.max_health),
            PathFollower::default(),
            BotTag { id: id.into() },
            Collider,
        ))
    }
}

/// Predefined bot types
pub mod profiles {
    use super::*;
    use crate::constants::*;

    /// Grid pathfinding, walls block sight, searches where the target vanished.
    pub const HUNTER: BotProfile = BotProfile {
        name: "Hunter",
        max_health: HUNTER_MAX_HEALTH,
        speed: HUNTER_SPEED,
        view_radius: HUNTER_VIEW_RADIUS,
        attack_range: HUNTER_ATTACK_RANGE,
        patrol_radius: PATROL_RADIUS,
        flee_radius: 0.0,
        pursuit_factor: 1.0,
        fire_interval: HUNTER_FIRE_INTERVAL,
        flee_threshold: FLEE_HEALTH_THRESHOLD,
        reengage_threshold: REENGAGE_HEALTH_THRESHOLD,
        death_duration: HUNTER_DEATH_DURATION,
        capabilities: Capabilities {
            has_search: true,
            has_line_of_sight: true,
            uses_external_nav: false,
            flees_when_close: false,
        },
    };

    /// Senses the target through walls and gives up the chase only at long range.
    pub const TRACKER: BotProfile = BotProfile {
        name: "Tracker",
        max_health: TRACKER_MAX_HEALTH,
        speed: TRACKER_SPEED,
        view_radius: TRACKER_VIEW_RADIUS,
        attack_range: TRACKER_ATTACK_RANGE,
        patrol_radius: PATROL_RADIUS,
        flee_radius: 0.0,
        pursuit_factor: TRACKER_PURSUIT_FACTOR,
        fire_interval: TRACKER_FIRE_INTERVAL,
        flee_threshold: FLEE_HEALTH_THRESHOLD,
        reengage_threshold: REENGAGE_HEALTH_THRESHOLD,
        death_duration: TRACKER_DEATH_DURATION,
        capabilities: Capabilities {
            has_search: false,
            has_line_of_sight: false,
            uses_external_nav: true,
            flees_when_close: false,
        },
    };

    /// Wanders, shoots anything it sees within range and backs away from a
    /// target that gets too close. Health never makes it retreat.
    pub const SNIPER: BotProfile = BotProfile {
        name: "Sniper",
        max_health: SNIPER_MAX_HEALTH,
        speed: SNIPER_SPEED,
        view_radius: SNIPER_VIEW_RADIUS,
        attack_range: SNIPER_VIEW_RADIUS,
        patrol_radius: SNIPER_WANDER_RADIUS,
        flee_radius: SNIPER_FLEE_RADIUS,
        pursuit_factor: 1.0,
        fire_interval: SNIPER_FIRE_INTERVAL,
        flee_threshold: FLEE_HEALTH_THRESHOLD,
        reengage_threshold: REENGAGE_HEALTH_THRESHOLD,
        death_duration: SNIPER_DEATH_DURATION,
        capabilities: Capabilities {
            has_search: false,
            has_line_of_sight: true,
            uses_external_nav: false,
            flees_when_close: true,
        },
    };
}

/// Config-facing name of a preset profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Hunter,
    Tracker,
    Sniper,
}

impl ProfileKind {
    pub fn profile(self) -> BotProfile {
        match self {
            ProfileKind::Hunter => profiles::HUNTER,
            ProfileKind::Tracker => profiles::TRACKER,
            ProfileKind::Sniper => profiles::SNIPER,
        }
    }
}

/// Spawn one bot per position, cycling through `deck` for their profiles.
/// Returns the spawned entities in position order.
pub fn spawn_bots(world: &mut World, deck: &[ProfileKind], positions: &[Vec3]) -> Vec<hecs::Entity> {
    if deck.is_empty() {
        return Vec::new();
    }
    positions
        .iter()
        .enumerate()
        .map(|(i, &pos)| {
            let profile = deck[i % deck.len()].profile();
            let id = format!("{}-{}", profile.name.to_uppercase(), i + 1);
            profile.spawn(world, id, pos)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::AgentState;

    #[test]
    fn test_spawn_has_full_health_and_patrols() {
        let mut world = World::new();
        let e = profiles::HUNTER.spawn(&mut world, "BOT1", Vec3::new(1.0, 1.0, 2.0));
        let health = *world.get::<&Health>(e).unwrap();
        assert_eq!(health, Health::new(crate::constants::HUNTER_MAX_HEALTH));
        assert_eq!(world.get::<&Brain>(e).unwrap().state, AgentState::Patrol);
        assert!(world.get::<&Collider>(e).is_ok());
        assert_eq!(world.get::<&BotTag>(e).unwrap().id, "BOT1");
    }

    #[test]
    fn test_deck_alternates_profiles() {
        let mut world = World::new();
        let deck = [ProfileKind::Hunter, ProfileKind::Sniper];
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Z];
        let spawned = spawn_bots(&mut world, &deck, &positions);
        let names: Vec<_> = spawned
            .iter()
            .map(|&e| world.get::<&Brain>(e).unwrap().profile.name)
            .collect();
        assert_eq!(names, vec!["Hunter", "Sniper", "Hunter"]);
        assert_eq!(world.get::<&BotTag>(spawned[1]).unwrap().id, "SNIPER-2");
    }

    #[test]
    fn test_sniper_keeps_its_distance() {
        let sniper = ProfileKind::Sniper.profile();
        assert!(sniper.capabilities.flees_when_close);
        assert!(sniper.capabilities.has_line_of_sight);
        assert!(sniper.flee_radius < sniper.attack_range);
        assert!(!profiles::HUNTER.capabilities.flees_when_close);
        assert!(!profiles::TRACKER.capabilities.flees_when_close);
    }

    #[test]
    fn test_empty_deck_spawns_nothing() {
        let mut world = World::new();
        assert!(spawn_bots(&mut world, &[], &[Vec3::ZERO]).is_empty());
    }

    #[test]
    fn test_profile_kind_from_json() {
        let kinds: Vec<ProfileKind> = serde_json::from_str(r#"["hunter", "tracker", "sniper"]"#).unwrap();
        assert_eq!(kinds, vec![ProfileKind::Hunter, ProfileKind::Tracker, ProfileKind::Sniper]);
    }
}
