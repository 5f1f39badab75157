//! Read-only snapshots handed to the host's renderer.

use crate::components::{AgentState, BotTag, Brain, Dying, Health, HitFlash, PathFollower, Transform};
use glam::Vec3;
use hecs::{Entity, World};

/// Colour treatment for an agent this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Normal,
    /// Briefly white after a hit
    Flash,
    Retreating,
    /// Death sequence running
    Dead,
}

/// Agent ready for rendering with all visual state
#[derive(Debug, Clone, PartialEq)]
pub struct RenderAgent {
    pub entity: Entity,
    pub position: Vec3,
    pub facing: Vec3,
    /// 1.0 normally, shrinks to 0.0 over the death sequence
    pub scale: f32,
    pub tint: Tint,
    pub state: AgentState,
    /// Floating status text, one item per line
    pub label: String,
}

/// Remaining waypoints of one agent, for debug path overlays
#[derive(Debug, Clone, PartialEq)]
pub struct AgentPath {
    pub entity: Entity,
    pub waypoints: Vec<Vec3>,
}

pub fn status_label(id: &str, state: AgentState, hp: i32) -> String {
    format!("ID: {id}\nSTATE: {state}\nHP: {hp}")
}

/// Collect every agent, including ones in their death sequence.
pub fn collect_render_agents(world: &World) -> Vec<RenderAgent> {
    let mut agents: Vec<RenderAgent> = world
        .query::<(&Transform, &Brain, &Health, &BotTag, Option<&HitFlash>, Option<&Dying>)>()
        .iter()
        .map(|(entity, (transform, brain, health, tag, flash, dying))| {
            let tint = if dying.is_some() {
                Tint::Dead
            } else if flash.is_some() {
                Tint::Flash
            } else if brain.state == AgentState::Retreat {
                Tint::Retreating
            } else {
                Tint::Normal
            };
            RenderAgent {
                entity,
                position: transform.position,
                facing: transform.facing,
                scale: dying.map(|d| d.scale()).unwrap_or(1.0),
                tint,
                state: brain.state,
                label: status_label(&tag.id, brain.state, health.current),
            }
        })
        .collect();

    // Stable order for hosts that diff frames
    agents.sort_by_key(|a| a.entity.id());
    agents
}

/// Collect the unfinished part of every active path.
pub fn collect_paths(world: &World) -> Vec<AgentPath> {
    let mut paths: Vec<AgentPath> = world
        .query::<&PathFollower>()
        .iter()
        .filter(|(_, follower)| !follower.remaining().is_empty())
        .map(|(entity, follower)| AgentPath {
            entity,
            waypoints: follower.remaining().to_vec(),
        })
        .collect();
    paths.sort_by_key(|p| p.entity.id());
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventQueue;
    use crate::pathfinding::Path;
    use crate::spawning::profiles;
    use crate::systems::combat;

    #[test]
    fn test_label_format() {
        assert_eq!(
            status_label("HUNTER-1", AgentState::Search, 42),
            "ID: HUNTER-1\nSTATE: SEARCH\nHP: 42"
        );
    }

    #[test]
    fn test_tints_follow_agent_status() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let calm = profiles::HUNTER.spawn(&mut world, "HUNTER-1", Vec3::ZERO);
        let hit = profiles::HUNTER.spawn(&mut world, "HUNTER-2", Vec3::X);
        let fleeing = profiles::TRACKER.spawn(&mut world, "TRACKER-3", Vec3::Z);
        let dead = profiles::TRACKER.spawn(&mut world, "TRACKER-4", Vec3::Y);

        combat::take_damage(&mut world, hit, 10, &mut events);
        world.get::<&mut Brain>(fleeing).unwrap().state = AgentState::Retreat;
        combat::take_damage(&mut world, dead, 500, &mut events);

        let agents = collect_render_agents(&world);
        let tint_of = |e: Entity| agents.iter().find(|a| a.entity == e).unwrap().tint;
        assert_eq!(tint_of(calm), Tint::Normal);
        assert_eq!(tint_of(hit), Tint::Flash);
        assert_eq!(tint_of(fleeing), Tint::Retreating);
        assert_eq!(tint_of(dead), Tint::Dead);

        let hit_agent = agents.iter().find(|a| a.entity == hit).unwrap();
        assert_eq!(hit_agent.label, "ID: HUNTER-2\nSTATE: PATROL\nHP: 90");
    }

    #[test]
    fn test_paths_show_remaining_waypoints() {
        let mut world = World::new();
        let e = profiles::HUNTER.spawn(&mut world, "HUNTER-1", Vec3::ZERO);
        profiles::HUNTER.spawn(&mut world, "HUNTER-2", Vec3::X);
        {
            let mut follower = world.get::<&mut PathFollower>(e).unwrap();
            follower.set(Path::new(
                vec![Vec3::X, Vec3::Z],
                vec![(1, 0), (0, 1)],
                vec![10, 24],
                0,
            ));
            follower.target_index = 1;
        }
        let paths = collect_paths(&world);
        assert_eq!(paths, vec![AgentPath { entity: e, waypoints: vec![Vec3::Z] }]);
    }
}
