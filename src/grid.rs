use crate::constants::REFUGE_INSET;
use crate::map_gen::WallMap;
use glam::Vec3;
use rand::Rng;

/// One grid cell. Immutable once the grid is published.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub walkable: bool,
    /// Extra cost for stepping onto this cell
    pub penalty: i32,
    /// Cell centre in world space (y = 0)
    pub world_position: Vec3,
    pub grid_x: i32,
    pub grid_y: i32,
}

/// Walkability grid shared by every agent. Centered on the world origin,
/// one world unit per cell.
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
    /// Bumped every time the simulation publishes a rebuilt grid
    generation: u64,
    /// Safe retreat points near each map corner
    refuges: Vec<Vec3>,
}

impl Grid {
    /// Build a grid from a wall layout with no movement penalties.
    pub fn build(map: &WallMap) -> Self {
        Self::build_with_penalties(map, |_, _| 0)
    }

    /// Build a grid, asking `penalty` for the extra step cost of each walkable cell.
    pub fn build_with_penalties<F>(map: &WallMap, penalty: F) -> Self
    where
        F: Fn(i32, i32) -> i32,
    {
        let (width, height) = (map.width, map.height);
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let walkable = !map.is_wall(x, y);
                cells.push(Cell {
                    walkable,
                    penalty: if walkable { penalty(x, y).max(0) } else { 0 },
                    world_position: cell_center(width, height, x, y),
                    grid_x: x,
                    grid_y: y,
                });
            }
        }

        let mut grid = Self {
            width,
            height,
            cells,
            generation: 0,
            refuges: Vec::new(),
        };
        grid.refuges = grid.find_refuges();
        grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map(|c| c.walkable).unwrap_or(false)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn walkable_cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(|c| c.walkable)
    }

    /// World-space centre of `(x, y)`.
    pub fn cell_to_world(&self, x: i32, y: i32) -> Vec3 {
        cell_center(self.width, self.height, x, y)
    }

    /// Cell containing `pos` (height ignored). Positions off the grid clamp to the
    /// nearest edge cell.
    pub fn world_to_cell(&self, pos: Vec3) -> (i32, i32) {
        let half_w = (self.width / 2) as f32;
        let half_h = (self.height / 2) as f32;
        let x = (pos.x + half_w).floor() as i32;
        let y = (pos.z + half_h).floor() as i32;
        (
            x.clamp(0, self.width.saturating_sub(1) as i32),
            y.clamp(0, self.height.saturating_sub(1) as i32),
        )
    }

    /// The 8-connected in-bounds neighbours of `(x, y)`.
    pub fn neighbours(&self, x: i32, y: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (x + dx, y + dy)))
            .filter(move |&(nx, ny)| (nx, ny) != (x, y) && self.index(nx, ny).is_some())
    }

    /// Walkable cell to plan from when standing at `pos`: the containing cell
    /// if it is walkable, else the closest walkable neighbour.
    pub fn nearest_walkable_cell(&self, pos: Vec3) -> Option<(i32, i32)> {
        let (x, y) = self.world_to_cell(pos);
        if self.is_walkable(x, y) {
            return Some((x, y));
        }
        let flat = Vec3::new(pos.x, 0.0, pos.z);
        self.neighbours(x, y)
            .filter(|&(nx, ny)| self.is_walkable(nx, ny))
            .min_by(|&(ax, ay), &(bx, by)| {
                let da = self.cell_to_world(ax, ay).distance_squared(flat);
                let db = self.cell_to_world(bx, by).distance_squared(flat);
                da.total_cmp(&db)
            })
    }

    /// Whether a straight line between two world positions crosses only walkable
    /// cells. The end points themselves are not tested.
    pub fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        let (x0, y0) = self.world_to_cell(from);
        let (x1, y1) = self.world_to_cell(to);

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        let mut x = x0;
        let mut y = y0;

        while x != x1 || y != y1 {
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }

            if x == x1 && y == y1 {
                break;
            }

            if !self.is_walkable(x, y) {
                return false;
            }
        }

        true
    }

    /// Random walkable cell centre within `radius` of `center`, or `None` after
    /// `attempts` misses.
    pub fn random_walkable_within(
        &self,
        center: Vec3,
        radius: f32,
        attempts: u32,
        rng: &mut impl Rng,
    ) -> Option<Vec3> {
        if radius <= 0.0 {
            return None;
        }
        for _ in 0..attempts {
            let sample = Vec3::new(
                center.x + rng.gen_range(-radius..=radius),
                0.0,
                center.z + rng.gen_range(-radius..=radius),
            );
            let (x, y) = self.world_to_cell(sample);
            let Some(cell) = self.get(x, y) else {
                continue;
            };
            let offset = cell.world_position - Vec3::new(center.x, 0.0, center.z);
            if cell.walkable && offset.length() <= radius {
                return Some(cell.world_position);
            }
        }
        None
    }

    /// Safe retreat points, one per map corner where any floor exists.
    pub fn refuges(&self) -> &[Vec3] {
        &self.refuges
    }

    fn find_refuges(&self) -> Vec<Vec3> {
        if self.width == 0 || self.height == 0 {
            return Vec::new();
        }
        let max_x = self.width as i32 - 1;
        let max_y = self.height as i32 - 1;
        let inset_x = REFUGE_INSET.min(max_x / 2);
        let inset_y = REFUGE_INSET.min(max_y / 2);
        let corners = [
            (max_x - inset_x, max_y - inset_y),
            (max_x - inset_x, inset_y),
            (inset_x, max_y - inset_y),
            (inset_x, inset_y),
        ];

        let mut refuges: Vec<Vec3> = Vec::with_capacity(corners.len());
        for (cx, cy) in corners {
            let nearest = self
                .walkable_cells()
                .min_by_key(|c| (c.grid_x - cx).pow(2) + (c.grid_y - cy).pow(2));
            if let Some(cell) = nearest {
                if !refuges.contains(&cell.world_position) {
                    refuges.push(cell.world_position);
                }
            }
        }
        refuges
    }
}

fn cell_center(width: usize, height: usize, x: i32, y: i32) -> Vec3 {
    let half_w = (width / 2) as f32;
    let half_h = (height / 2) as f32;
    Vec3::new(-half_w + x as f32 + 0.5, 0.0, -half_h + y as f32 + 0.5)
}
