//! World initialization - places the target and spawns the bots for a grid.

use crate::config::SpawnSettings;
use crate::events::{EventQueue, GameEvent};
use crate::grid::Grid;
use crate::map_gen;
use crate::spawning;

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;

/// Who was placed on a freshly published grid
#[derive(Debug, Clone)]
pub struct Population {
    /// Target start position, `None` when the map has no floor at all
    pub player: Option<Vec3>,
    pub bots: Vec<Entity>,
}

/// Spawn bots for `grid` according to `settings`.
///
/// Placement failures are not fatal: they are logged, reported as
/// [`GameEvent::SpawnSkipped`] and the affected bots are simply left out.
pub fn populate(
    world: &mut World,
    grid: &Grid,
    settings: &SpawnSettings,
    rng: &mut impl Rng,
    events: &mut EventQueue,
) -> Population {
    puffin::profile_function!();

    let plan = match map_gen::plan_spawns(
        grid,
        settings.bot_count,
        settings.min_player_distance,
        settings.max_attempts,
        rng,
    ) {
        Ok(plan) => plan,
        Err(error) => {
            tracing::warn!(%error, "no bots spawned");
            events.push(GameEvent::SpawnSkipped { error });
            return Population {
                player: None,
                bots: Vec::new(),
            };
        }
    };

    if let Some(error) = plan.shortfall {
        tracing::warn!(%error, "spawned fewer bots than requested");
        events.push(GameEvent::SpawnSkipped { error });
    }

    let bots = spawning::spawn_bots(world, &settings.deck, &plan.bots);
    tracing::info!(
        bots = bots.len(),
        requested = settings.bot_count,
        player = ?plan.player,
        "spawned bots"
    );

    Population {
        player: Some(plan.player),
        bots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Transform;
    use crate::map_gen::WallMap;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_populate_open_map() {
        let grid = Grid::build(&WallMap::open(40, 40));
        let mut world = World::new();
        let mut events = EventQueue::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let population = populate(&mut world, &grid, &SpawnSettings::default(), &mut rng, &mut events);

        let player = population.player.unwrap();
        assert_eq!(population.bots.len(), SpawnSettings::default().bot_count);
        for bot in &population.bots {
            let pos = world.get::<&Transform>(*bot).unwrap().position;
            assert!(pos.distance(player) >= SpawnSettings::default().min_player_distance);
        }
        assert!(events.is_empty());
    }

    #[test]
    fn test_solid_map_spawns_nothing() {
        let grid = Grid::build(&WallMap::solid(10, 10));
        let mut world = World::new();
        let mut events = EventQueue::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let population = populate(&mut world, &grid, &SpawnSettings::default(), &mut rng, &mut events);

        assert!(population.player.is_none());
        assert!(population.bots.is_empty());
        assert_eq!(world.len(), 0);
        assert_eq!(events.pending().len(), 1);
    }
}
