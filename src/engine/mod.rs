//! Simulation engine - owns all simulation state and provides a clean API to the host.
//!
//! The engine handles:
//! - Map generation and grid publication
//! - Spawning and despawning bots
//! - Advancing every bot once per tick
//!
//! The host only handles:
//! - Driving `tick` at its frame or fixed rate
//! - Draining events (shots, deaths, state changes)
//! - Rendering what the engine returns

pub mod initialization;

pub use initialization::Population;

use crate::components::{AgentState, Brain, Health, PathFollower};
use crate::config::SimConfig;
use crate::events::{EventQueue, GameEvent};
use crate::grid::Grid;
use crate::map_gen::{MapGenerator, WallMap};
use crate::pathfinding::{Navigator, Pathfinder};
use crate::systems::{self, AgentPath, AiContext, RenderAgent};
use crate::target::Target;
use crate::time_system::GameClock;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Result of a simulation tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickResult {
    /// Simulation time after the tick
    pub time: f32,
    /// Bots still in the world, dying ones included
    pub agents: usize,
    /// Bots whose death sequence finished this tick
    pub removed: usize,
}

/// The simulation - owns the grid, the bots and everything they share.
pub struct Simulation<T: Target> {
    config: SimConfig,

    /// Current walkability grid, replaced wholesale on regeneration
    grid: Grid,

    /// The ECS world holding the bots
    world: World,

    /// Grid A* shared by every bot, scratch reused across queries
    pathfinder: Pathfinder,

    /// Host navigation service for profiles that use one
    external_nav: Option<Box<dyn Navigator>>,

    clock: GameClock,
    events: EventQueue,

    /// Drives patrol sampling, spawning and regeneration rolls
    rng: ChaCha8Rng,

    target: T,

    /// Seed of the current map
    seed: u64,
}

impl<T: Target> Simulation<T> {
    /// Generate a map from `config` and `seed` and populate it.
    pub fn new(config: SimConfig, target: T, seed: u64) -> Self {
        let map = MapGenerator::generate(
            config.map.width,
            config.map.height,
            config.map.fill_percent,
            seed,
        );
        Self::from_map(config, target, &map, seed)
    }

    /// Populate a caller-provided wall layout.
    pub fn from_map(config: SimConfig, target: T, map: &WallMap, seed: u64) -> Self {
        let mut sim = Self {
            config,
            grid: Grid::build(map),
            world: World::new(),
            pathfinder: Pathfinder::new(),
            external_nav: None,
            clock: GameClock::new(),
            events: EventQueue::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            target,
            seed,
        };
        sim.respawn();
        tracing::info!(
            seed,
            width = sim.grid.width,
            height = sim.grid.height,
            floor_cells = sim.grid.walkable_cells().count(),
            "simulation ready"
        );
        sim
    }

    /// Throw the current map away and build a new one from `seed`.
    ///
    /// Bots are despawned, each with an `AgentRemoved` event, and respawned on
    /// the new map; nothing computed on the old grid survives.
    pub fn regenerate(&mut self, seed: u64) {
        puffin::profile_function!();

        let map = MapGenerator::generate(
            self.config.map.width,
            self.config.map.height,
            self.config.map.fill_percent,
            seed,
        );
        self.seed = seed;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.publish_grid(Grid::build(&map));
        self.despawn_all();
        self.respawn();

        let generation = self.grid.generation();
        tracing::info!(seed, generation, "map regenerated");
        self.events.push(GameEvent::MapRegenerated { generation, seed });
    }

    /// Swap in a new grid, keeping the bots where they are. Every path computed
    /// on the old grid is dropped as part of the swap.
    pub fn replace_grid(&mut self, grid: Grid) {
        self.publish_grid(grid);
        tracing::debug!(generation = self.grid.generation(), "grid replaced");
    }

    fn publish_grid(&mut self, mut grid: Grid) {
        grid.set_generation(self.grid.generation() + 1);
        self.grid = grid;
        for (_, follower) in self.world.query_mut::<&mut PathFollower>() {
            follower.clear();
        }
    }

    fn despawn_all(&mut self) {
        let entities: Vec<Entity> = self.world.iter().map(|e| e.entity()).collect();
        for entity in entities {
            if self.world.despawn(entity).is_ok() {
                self.events.push(GameEvent::AgentRemoved { entity });
            }
        }
    }

    fn respawn(&mut self) {
        let population = initialization::populate(
            &mut self.world,
            &self.grid,
            &self.config.spawn,
            &mut self.rng,
            &mut self.events,
        );
        if let Some(player) = population.player {
            self.target.set_position(player);
        }
    }

    /// Advance every bot by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickResult {
        puffin::profile_function!();

        let mut ctx = AiContext {
            grid: &self.grid,
            pathfinder: &mut self.pathfinder,
            external_nav: self.external_nav.as_deref_mut(),
            target: self.target.position(),
            now: self.clock.time,
            dt,
            events: &mut self.events,
            rng: &mut self.rng,
        };
        systems::update_agents(&mut self.world, &mut ctx);

        let removed = {
            puffin::profile_scope!("timers");
            systems::update_timers(&mut self.world, dt, &mut self.events)
        };
        self.clock.advance(dt);

        TickResult {
            time: self.clock.time,
            agents: self.world.len() as usize,
            removed,
        }
    }

    /// Damage a bot. Ignored for bots already dying or gone.
    pub fn take_damage(&mut self, entity: Entity, amount: i32) -> bool {
        systems::take_damage(&mut self.world, entity, amount, &mut self.events)
    }

    /// Install the host's navigation service for profiles that use one.
    pub fn set_external_navigator(&mut self, navigator: Box<dyn Navigator>) {
        self.external_nav = Some(navigator);
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain().collect()
    }

    pub fn render_agents(&self) -> Vec<RenderAgent> {
        systems::collect_render_agents(&self.world)
    }

    pub fn paths(&self) -> Vec<AgentPath> {
        systems::collect_paths(&self.world)
    }

    /// Every bot entity, dying ones included
    pub fn agents(&self) -> Vec<Entity> {
        let mut agents: Vec<Entity> = self
            .world
            .query::<&Brain>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        agents.sort_by_key(|e| e.id());
        agents
    }

    pub fn agent_state(&self, entity: Entity) -> Option<AgentState> {
        self.world.get::<&Brain>(entity).ok().map(|brain| brain.state)
    }

    pub fn agent_health(&self, entity: Entity) -> Option<i32> {
        self.world.get::<&Health>(entity).ok().map(|health| health.current)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn time(&self) -> f32 {
        self.clock.time
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}
