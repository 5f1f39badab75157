//! Cave map generation using cellular automata.
//!
//! A seeded noise fill is smoothed a fixed number of times: cells with many
//! wall neighbours become walls, cells with few become floor. The result is a
//! set of organic, mostly connected cave regions enclosed by a solid border.

use crate::constants::*;
use crate::error::GenerationError;
use crate::grid::Grid;
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Boolean wall layout produced by the generator (`true` = wall).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallMap {
    pub width: usize,
    pub height: usize,
    walls: Vec<bool>,
}

impl WallMap {
    /// A map where every cell is a wall.
    pub fn solid(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            walls: vec![true; width * height],
        }
    }

    /// A map with a solid border and an open interior.
    pub fn open(width: usize, height: usize) -> Self {
        let mut map = Self::solid(width, height);
        for y in 1..height.saturating_sub(1) {
            for x in 1..width.saturating_sub(1) {
                map.walls[y * width + x] = false;
            }
        }
        map
    }

    /// Build a map from rows of characters, `#` is wall and anything else is floor.
    /// Rows are listed from `y = 0` upwards. Borders are not forced here.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut walls = Vec::with_capacity(width * height);
        for row in rows {
            walls.extend(row.chars().take(width).map(|c| c == '#'));
        }
        Self { width, height, walls }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Whether `(x, y)` is a wall. Out-of-bounds cells count as walls.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map(|i| self.walls[i]).unwrap_or(true)
    }

    pub fn set_wall(&mut self, x: i32, y: i32, wall: bool) {
        if let Some(i) = self.index(x, y) {
            self.walls[i] = wall;
        }
    }

    fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    pub fn floor_count(&self) -> usize {
        self.walls.iter().filter(|w| !**w).count()
    }

    /// Count walls among the 8 neighbours of `(x, y)`, edges count as wall.
    fn surrounding_wall_count(&self, x: i32, y: i32) -> u32 {
        let mut count = 0;
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if (nx, ny) != (x, y) && self.is_wall(nx, ny) {
                    count += 1;
                }
            }
        }
        count
    }
}

pub struct MapGenerator;

impl MapGenerator {
    /// Generate a cave layout. Identical arguments always give identical maps.
    pub fn generate(width: usize, height: usize, fill_percent: u32, seed: u64) -> WallMap {
        puffin::profile_function!();

        let fill_percent = fill_percent.min(100);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut map = Self::random_fill(width, height, fill_percent, &mut rng);

        for _ in 0..MAP_SMOOTHING_ITERATIONS {
            map = Self::smooth(&map);
        }

        tracing::debug!(
            width,
            height,
            fill_percent,
            seed,
            floor_cells = map.floor_count(),
            "generated cave map"
        );
        map
    }

    fn random_fill(width: usize, height: usize, fill_percent: u32, rng: &mut impl Rng) -> WallMap {
        let mut map = WallMap::solid(width, height);
        for y in 0..height {
            for x in 0..width {
                let wall = map.is_border(x, y) || rng.gen_range(0..100) < fill_percent;
                map.walls[y * width + x] = wall;
            }
        }
        map
    }

    /// One cellular automata pass. Reads only from `map` so the update is simultaneous.
    fn smooth(map: &WallMap) -> WallMap {
        let mut next = map.clone();
        for y in 0..map.height {
            for x in 0..map.width {
                let i = y * map.width + x;
                if map.is_border(x, y) {
                    next.walls[i] = true;
                    continue;
                }
                let walls = map.surrounding_wall_count(x as i32, y as i32);
                if walls > MAP_WALL_NEIGHBOUR_THRESHOLD {
                    next.walls[i] = true;
                } else if walls < MAP_WALL_NEIGHBOUR_THRESHOLD {
                    next.walls[i] = false;
                }
            }
        }
        next
    }
}

/// Where the player and bots start on a freshly built grid.
#[derive(Debug, Clone)]
pub struct SpawnPlan {
    pub player: Vec3,
    pub bots: Vec<Vec3>,
    /// Set when fewer bots than requested could be placed.
    pub shortfall: Option<GenerationError>,
}

/// Pick the player spawn: first floor cell scanning up and right from the centre,
/// then the whole map if that quadrant is solid.
pub fn player_spawn(grid: &Grid) -> Result<Vec3, GenerationError> {
    let (w, h) = (grid.width as i32, grid.height as i32);
    let from_centre = (w / 2..w).flat_map(|x| (h / 2..h).map(move |y| (x, y)));
    let anywhere = (0..w).flat_map(|x| (0..h).map(move |y| (x, y)));

    from_centre
        .chain(anywhere)
        .find(|&(x, y)| grid.is_walkable(x, y))
        .map(|(x, y)| grid.cell_to_world(x, y) + Vec3::Y * PLAYER_SPAWN_HEIGHT)
        .ok_or(GenerationError::NoPlayerSpawn)
}

/// Place `count` bots on random interior floor cells away from the player.
pub fn plan_spawns(
    grid: &Grid,
    count: usize,
    min_player_distance: f32,
    max_attempts: u32,
    rng: &mut impl Rng,
) -> Result<SpawnPlan, GenerationError> {
    let player = player_spawn(grid)?;
    let mut bots = Vec::with_capacity(count);
    let mut attempts = 0;

    if grid.width > 2 && grid.height > 2 {
        while bots.len() < count && attempts < max_attempts {
            attempts += 1;
            let x = rng.gen_range(1..grid.width as i32 - 1);
            let y = rng.gen_range(1..grid.height as i32 - 1);
            if !grid.is_walkable(x, y) {
                continue;
            }
            let pos = grid.cell_to_world(x, y) + Vec3::Y * BOT_SPAWN_HEIGHT;
            if pos.distance(player) < min_player_distance {
                continue;
            }
            bots.push(pos);
        }
    }

    let shortfall = (bots.len() < count).then(|| GenerationError::SpawnBudgetExhausted {
        placed: bots.len(),
        requested: count,
        attempts: max_attempts,
    });

    Ok(SpawnPlan {
        player,
        bots,
        shortfall,
    })
}
