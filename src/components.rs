use crate::pathfinding::Path;
use crate::spawning::BotProfile;
use glam::Vec3;
use std::fmt;

/// World placement of an agent
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
    /// Horizontal unit vector the agent is facing
    pub facing: Vec3,
}

impl Transform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            facing: Vec3::Z,
        }
    }
}

/// Health component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount).min(self.max);
    }

    /// Subtract `amount`, never going below zero.
    pub fn damage(&mut self, amount: i32) {
        self.current = (self.current - amount.max(0)).max(0);
    }
}

/// Behavioural mode of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentState {
    Patrol,
    Chase,
    Attack,
    Search,
    Retreat,
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentState::Patrol => "PATROL",
            AgentState::Chase => "CHASE",
            AgentState::Attack => "ATTACK",
            AgentState::Search => "SEARCH",
            AgentState::Retreat => "RETREAT",
        };
        f.write_str(name)
    }
}

/// FSM state and timers for one bot
#[derive(Debug, Clone)]
pub struct Brain {
    pub state: AgentState,
    pub profile: BotProfile,
    /// Where the target was last seen, set when contact is lost
    pub last_known_target: Option<Vec3>,
    /// Earliest time the chase path may be refreshed
    pub next_path_time: f32,
    /// Earliest time the next shot may be fired
    pub next_fire_time: f32,
}

impl Brain {
    pub fn new(profile: BotProfile) -> Self {
        Self {
            state: AgentState::Patrol,
            profile,
            last_known_target: None,
            next_path_time: 0.0,
            next_fire_time: 0.0,
        }
    }
}

/// Path currently being walked and the index of the next waypoint
#[derive(Debug, Clone, Default)]
pub struct PathFollower {
    pub path: Option<Path>,
    pub target_index: usize,
}

impl PathFollower {
    /// Replace the current path. The old one is dropped immediately.
    pub fn set(&mut self, path: Path) {
        self.path = Some(path);
        self.target_index = 0;
    }

    pub fn clear(&mut self) {
        self.path = None;
        self.target_index = 0;
    }

    pub fn is_active(&self) -> bool {
        self.path.is_some()
    }

    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.path
            .as_ref()
            .and_then(|p| p.waypoints().get(self.target_index).copied())
    }

    /// Waypoints not reached yet
    pub fn remaining(&self) -> &[Vec3] {
        match &self.path {
            Some(p) => p.waypoints().get(self.target_index..).unwrap_or(&[]),
            None => &[],
        }
    }
}

/// Marker: the agent can be hit. Removed when the death sequence starts.
#[derive(Debug, Clone, Copy)]
pub struct Collider;

/// Display name shown in status labels
#[derive(Debug, Clone)]
pub struct BotTag {
    pub id: String,
}

/// Short white flash after taking a hit
#[derive(Debug, Clone, Copy)]
pub struct HitFlash {
    pub remaining: f32,
}

/// Terminal sequence: the agent shrinks away and is removed when the timer ends
#[derive(Debug, Clone, Copy)]
pub struct Dying {
    pub remaining: f32,
    pub duration: f32,
}

impl Dying {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration,
            duration,
        }
    }

    /// Visual scale, 1.0 when the sequence starts and 0.0 when it ends
    pub fn scale(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_floors_at_zero() {
        let mut health = Health::new(100);
        health.damage(30);
        assert_eq!(health.current, 70);
        health.damage(500);
        assert_eq!(health.current, 0);
        health.damage(-20);
        assert_eq!(health.current, 0);
    }

    #[test]
    fn test_health_heal_caps_at_max() {
        let mut health = Health::new(100);
        health.damage(10);
        health.heal(50);
        assert_eq!(health.current, 100);
    }

    #[test]
    fn test_follower_remaining() {
        let path = Path::new(
            vec![Vec3::X, Vec3::Y, Vec3::Z],
            vec![(1, 0), (0, 1), (1, 1)],
            vec![10, 20, 30],
            0,
        );
        let mut follower = PathFollower::default();
        assert!(follower.remaining().is_empty());
        follower.set(path);
        follower.target_index = 2;
        assert_eq!(follower.remaining(), &[Vec3::Z]);
        assert_eq!(follower.current_waypoint(), Some(Vec3::Z));
        follower.target_index = 3;
        assert!(follower.remaining().is_empty());
        assert_eq!(follower.current_waypoint(), None);
    }

    #[test]
    fn test_dying_scale_shrinks() {
        let mut dying = Dying::new(1.0);
        assert_eq!(dying.scale(), 1.0);
        dying.remaining = 0.25;
        assert_eq!(dying.scale(), 0.25);
        dying.remaining = -0.1;
        assert_eq!(dying.scale(), 0.0);
        assert!(dying.is_finished());
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(AgentState::Retreat.to_string(), "RETREAT");
        assert_eq!(AgentState::Patrol.to_string(), "PATROL");
    }
}
