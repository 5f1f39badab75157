use crate::constants::{DIAGONAL_STEP_COST, STRAIGHT_STEP_COST};
use crate::error::PathError;
use crate::grid::Grid;
use glam::Vec3;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Waypoints from (but excluding) the start cell to the goal cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    waypoints: Vec<Vec3>,
    cells: Vec<(i32, i32)>,
    /// Accumulated cost from the start at each waypoint
    costs: Vec<i32>,
    /// Grid generation the path was computed on
    generation: u64,
}

impl Path {
    pub fn new(waypoints: Vec<Vec3>, cells: Vec<(i32, i32)>, costs: Vec<i32>, generation: u64) -> Self {
        Self {
            waypoints,
            cells,
            costs,
            generation,
        }
    }

    /// A path with nothing left to walk.
    pub fn empty(generation: u64) -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), generation)
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn cells(&self) -> &[(i32, i32)] {
        &self.cells
    }

    pub fn costs(&self) -> &[i32] {
        &self.costs
    }

    /// Total cost of walking the whole path.
    pub fn cost(&self) -> i32 {
        self.costs.last().copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether this path was computed on the grid currently in use.
    pub fn is_current(&self, grid: &Grid) -> bool {
        self.generation == grid.generation()
    }

    /// Put `cell` at `waypoint` in front of the path at no extra cost. Used to
    /// walk an agent back onto the cell the path was planned from.
    pub fn with_lead_in(mut self, waypoint: Vec3, cell: (i32, i32)) -> Self {
        self.waypoints.insert(0, waypoint);
        self.cells.insert(0, cell);
        self.costs.insert(0, 0);
        self
    }
}

/// Anything that can answer path queries for an agent.
///
/// The grid A* [`Pathfinder`] is the built-in implementation; hosts with their
/// own navigation service install another one on the simulation.
pub trait Navigator {
    fn find_path(&mut self, grid: &Grid, start: Vec3, end: Vec3) -> Result<Path, PathError>;
}

/// Per-query bookkeeping for one cell. Entries whose `query` differs from the
/// running query are stale and read as a neutral node.
#[derive(Debug, Clone, Copy, Default)]
struct SearchNode {
    query: u32,
    g_cost: i32,
    h_cost: i32,
    parent: Option<usize>,
    opened: bool,
    closed: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct ScoredNode {
    index: usize,
    g_cost: i32,
    h_cost: i32,
}

impl ScoredNode {
    fn f_cost(&self) -> i32 {
        self.g_cost + self.h_cost
    }
}

// BinaryHeap is a max-heap, so we reverse the ordering for min-heap behavior.
// Lowest f first, then lowest h, then lowest index so results are reproducible.
impl Ord for ScoredNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost()
            .cmp(&self.f_cost())
            .then_with(|| other.h_cost.cmp(&self.h_cost))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for ScoredNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* over the 8-connected walkability grid.
///
/// Owns a scratch buffer sized to the grid so repeated queries don't allocate
/// per node. Nothing from one query is visible to the next.
#[derive(Debug, Default)]
pub struct Pathfinder {
    nodes: Vec<SearchNode>,
    query: u32,
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a path between two world positions.
    pub fn find_path(&mut self, grid: &Grid, start: Vec3, end: Vec3) -> Result<Path, PathError> {
        self.find_path_cells(grid, grid.world_to_cell(start), grid.world_to_cell(end))
    }

    /// Find a path between two grid cells.
    pub fn find_path_cells(
        &mut self,
        grid: &Grid,
        start: (i32, i32),
        goal: (i32, i32),
    ) -> Result<Path, PathError> {
        puffin::profile_function!();

        let start_index = walkable_index(grid, start)?;
        let goal_index = walkable_index(grid, goal)?;

        if start_index == goal_index {
            return Ok(Path::empty(grid.generation()));
        }

        self.begin_query(grid.len());

        let mut open_set = BinaryHeap::new();
        let h_start = octile_distance(start, goal);
        {
            let node = self.node_mut(start_index);
            node.h_cost = h_start;
            node.opened = true;
        }
        open_set.push(ScoredNode {
            index: start_index,
            g_cost: 0,
            h_cost: h_start,
        });

        while let Some(current) = open_set.pop() {
            let node = *self.node_mut(current.index);
            // Superseded heap entries are skipped instead of removed
            if node.closed || node.g_cost != current.g_cost {
                continue;
            }
            self.node_mut(current.index).closed = true;

            if current.index == goal_index {
                let path = self.retrace(grid, start_index, goal_index);
                tracing::trace!(
                    ?start,
                    ?goal,
                    waypoints = path.len(),
                    cost = path.cost(),
                    "path found"
                );
                return Ok(path);
            }

            let cell = grid.cell_at(current.index);
            let (cx, cy) = (cell.grid_x, cell.grid_y);

            for (nx, ny) in grid.neighbours(cx, cy) {
                let Some(neighbour_index) = grid.index(nx, ny) else {
                    continue;
                };
                let neighbour_cell = grid.cell_at(neighbour_index);
                if !neighbour_cell.walkable {
                    continue;
                }

                let neighbour = self.node_mut(neighbour_index);
                if neighbour.closed {
                    continue;
                }

                let tentative_g = node.g_cost
                    + octile_distance((cx, cy), (nx, ny))
                    + neighbour_cell.penalty;

                if tentative_g < neighbour.g_cost || !neighbour.opened {
                    neighbour.g_cost = tentative_g;
                    neighbour.h_cost = octile_distance((nx, ny), goal);
                    neighbour.parent = Some(current.index);
                    neighbour.opened = true;
                    let scored = ScoredNode {
                        index: neighbour_index,
                        g_cost: neighbour.g_cost,
                        h_cost: neighbour.h_cost,
                    };
                    open_set.push(scored);
                }
            }
        }

        tracing::trace!(?start, ?goal, "no path");
        Err(PathError::NoPath)
    }

    /// Start a new query: every node now reads as neutral until touched.
    fn begin_query(&mut self, cell_count: usize) {
        if self.nodes.len() != cell_count {
            self.nodes = vec![SearchNode::default(); cell_count];
            self.query = 0;
        }
        self.query = self.query.wrapping_add(1);
        if self.query == 0 {
            // Stamp wrapped around: old stamps could collide, so wipe them
            self.nodes.fill(SearchNode::default());
            self.query = 1;
        }
    }

    fn node_mut(&mut self, index: usize) -> &mut SearchNode {
        let query = self.query;
        let node = &mut self.nodes[index];
        if node.query != query {
            *node = SearchNode {
                query,
                ..SearchNode::default()
            };
        }
        node
    }

    fn retrace(&mut self, grid: &Grid, start_index: usize, goal_index: usize) -> Path {
        let mut cells = Vec::new();
        let mut waypoints = Vec::new();
        let mut costs = Vec::new();

        let mut current = goal_index;
        while current != start_index {
            let node = *self.node_mut(current);
            let cell = grid.cell_at(current);
            cells.push((cell.grid_x, cell.grid_y));
            waypoints.push(cell.world_position);
            costs.push(node.g_cost);
            match node.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }

        cells.reverse();
        waypoints.reverse();
        costs.reverse();
        Path::new(waypoints, cells, costs, grid.generation())
    }

    #[cfg(test)]
    fn f_cost_of(&mut self, index: usize) -> i32 {
        let node = self.node_mut(index);
        node.g_cost + node.h_cost
    }
}

impl Navigator for Pathfinder {
    fn find_path(&mut self, grid: &Grid, start: Vec3, end: Vec3) -> Result<Path, PathError> {
        Pathfinder::find_path(self, grid, start, end)
    }
}

fn walkable_index(grid: &Grid, (x, y): (i32, i32)) -> Result<usize, PathError> {
    match grid.index(x, y) {
        Some(i) if grid.cell_at(i).walkable => Ok(i),
        _ => Err(PathError::InvalidCell { x, y }),
    }
}

/// Octile distance with 10/14 step weights
pub fn octile_distance(from: (i32, i32), to: (i32, i32)) -> i32 {
    let dx = (from.0 - to.0).abs();
    let dy = (from.1 - to.1).abs();
    DIAGONAL_STEP_COST * dx.min(dy) + STRAIGHT_STEP_COST * (dx - dy).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_gen::{MapGenerator, WallMap};
    use std::collections::VecDeque;

    fn open_grid(w: usize, h: usize) -> Grid {
        Grid::build(&WallMap::open(w, h))
    }

    /// Cells reachable from `start` through walkable 8-neighbour steps
    fn reachable(grid: &Grid, start: (i32, i32)) -> Vec<bool> {
        let mut seen = vec![false; grid.len()];
        let mut queue = VecDeque::from([start]);
        seen[grid.index(start.0, start.1).unwrap()] = true;
        while let Some((x, y)) = queue.pop_front() {
            for (nx, ny) in grid.neighbours(x, y) {
                let i = grid.index(nx, ny).unwrap();
                if grid.cell_at(i).walkable && !seen[i] {
                    seen[i] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
        seen
    }

    /// Reference uniform-cost search for comparing path costs
    fn dijkstra_cost(grid: &Grid, start: (i32, i32), goal: (i32, i32)) -> Option<i32> {
        let mut dist = vec![i32::MAX; grid.len()];
        let mut heap = BinaryHeap::new();
        dist[grid.index(start.0, start.1)?] = 0;
        heap.push(std::cmp::Reverse((0, start)));
        while let Some(std::cmp::Reverse((d, (x, y)))) = heap.pop() {
            if (x, y) == goal {
                return Some(d);
            }
            if d > dist[grid.index(x, y)?] {
                continue;
            }
            for (nx, ny) in grid.neighbours(x, y) {
                let i = grid.index(nx, ny)?;
                let cell = grid.cell_at(i);
                if !cell.walkable {
                    continue;
                }
                let nd = d + octile_distance((x, y), (nx, ny)) + cell.penalty;
                if nd < dist[i] {
                    dist[i] = nd;
                    heap.push(std::cmp::Reverse((nd, (nx, ny))));
                }
            }
        }
        None
    }

    fn assert_well_formed(path: &Path, start: (i32, i32), goal: (i32, i32)) {
        assert_eq!(*path.cells().last().unwrap(), goal);
        assert_ne!(path.cells()[0], start, "start must not be part of the path");
        let mut prev = start;
        for &cell in path.cells() {
            let (dx, dy) = ((cell.0 - prev.0).abs(), (cell.1 - prev.1).abs());
            assert!(dx <= 1 && dy <= 1 && (dx, dy) != (0, 0), "{prev:?} -> {cell:?}");
            prev = cell;
        }
        assert!(path.costs().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_octile_distance() {
        assert_eq!(octile_distance((0, 0), (3, 0)), 30);
        assert_eq!(octile_distance((0, 0), (3, 3)), 42);
        assert_eq!(octile_distance((0, 0), (2, 5)), 28 + 30);
        assert_eq!(octile_distance((4, 1), (1, 3)), 28 + 10);
    }

    #[test]
    fn test_open_grid_diagonal_scenario() {
        let grid = open_grid(10, 10);
        let mut pf = Pathfinder::new();
        let path = pf.find_path_cells(&grid, (1, 1), (8, 8)).unwrap();
        assert!(path.len() <= 10);
        assert_eq!(*path.cells().last().unwrap(), (8, 8));
        assert_eq!(*path.waypoints().last().unwrap(), grid.cell_to_world(8, 8));
        assert_eq!(path.cost(), 7 * DIAGONAL_STEP_COST);
        assert_well_formed(&path, (1, 1), (8, 8));
    }

    #[test]
    fn test_world_positions_resolve_to_cells() {
        let grid = open_grid(10, 10);
        let mut pf = Pathfinder::new();
        let start = grid.cell_to_world(1, 1) + Vec3::new(0.2, 3.0, -0.3);
        let end = grid.cell_to_world(1, 5);
        let path = pf.find_path(&grid, start, end).unwrap();
        assert_eq!(path.cells(), &[(1, 2), (1, 3), (1, 4), (1, 5)]);
    }

    #[test]
    fn test_unwalkable_start_fails_immediately() {
        let mut map = WallMap::open(10, 10);
        map.set_wall(1, 1, true);
        let grid = Grid::build(&map);
        let mut pf = Pathfinder::new();
        assert_eq!(
            pf.find_path_cells(&grid, (1, 1), (8, 8)),
            Err(PathError::InvalidCell { x: 1, y: 1 })
        );
        assert_eq!(
            pf.find_path_cells(&grid, (8, 8), (0, 0)),
            Err(PathError::InvalidCell { x: 0, y: 0 })
        );
    }

    #[test]
    fn test_walled_off_goal_is_no_path() {
        let grid = Grid::build(&WallMap::from_rows(&[
            "#########",
            "#...#...#",
            "#...#...#",
            "#...#...#",
            "#########",
        ]));
        let mut pf = Pathfinder::new();
        assert_eq!(pf.find_path_cells(&grid, (1, 2), (6, 2)), Err(PathError::NoPath));
    }

    #[test]
    fn test_same_start_and_goal_is_empty() {
        let grid = open_grid(6, 6);
        let mut pf = Pathfinder::new();
        let path = pf.find_path_cells(&grid, (2, 2), (2, 2)).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.cost(), 0);
    }

    #[test]
    fn test_routes_around_wall() {
        let grid = Grid::build(&WallMap::from_rows(&[
            "#######",
            "#.....#",
            "#.###.#",
            "#.#.#.#",
            "#.....#",
            "#######",
        ]));
        let mut pf = Pathfinder::new();
        let path = pf.find_path_cells(&grid, (1, 1), (3, 3)).unwrap();
        assert_well_formed(&path, (1, 1), (3, 3));
        for &(x, y) in path.cells() {
            assert!(grid.is_walkable(x, y));
        }
        assert_eq!(Some(path.cost()), dijkstra_cost(&grid, (1, 1), (3, 3)));
    }

    #[test]
    fn test_penalty_steers_path() {
        // Middle row is expensive, so the path should detour through the top row
        let rows = ["#######", "#.....#", "#.....#", "#.....#", "#######"];
        let map = WallMap::from_rows(&rows);
        let expensive = |x: i32, y: i32| y == 2 && (2..=4).contains(&x);
        let grid = Grid::build_with_penalties(&map, |x, y| if expensive(x, y) { 100 } else { 0 });
        let mut pf = Pathfinder::new();
        let path = pf.find_path_cells(&grid, (1, 2), (5, 2)).unwrap();
        assert!(path.cells().iter().all(|&(x, y)| !expensive(x, y)));
        assert_eq!(Some(path.cost()), dijkstra_cost(&grid, (1, 2), (5, 2)));
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let grid = Grid::build(&MapGenerator::generate(40, 40, 45, 11));
        let walkable: Vec<_> = grid.walkable_cells().map(|c| (c.grid_x, c.grid_y)).collect();
        let (a, b) = (walkable[0], walkable[walkable.len() - 1]);
        let mut pf = Pathfinder::new();
        let first = pf.find_path_cells(&grid, a, b);
        let second = pf.find_path_cells(&grid, a, b);
        assert_eq!(first, second);
    }

    #[test]
    fn test_scratch_state_does_not_leak_between_queries() {
        let grid = Grid::build(&MapGenerator::generate(40, 40, 45, 21));
        let walkable: Vec<_> = grid.walkable_cells().map(|c| (c.grid_x, c.grid_y)).collect();
        let mut reused = Pathfinder::new();

        for i in 0..walkable.len().min(25) {
            let a = walkable[(i * 7) % walkable.len()];
            let b = walkable[(i * 13 + 5) % walkable.len()];
            let from_reused = reused.find_path_cells(&grid, a, b);
            let from_fresh = Pathfinder::new().find_path_cells(&grid, a, b);
            assert_eq!(from_reused, from_fresh, "{a:?} -> {b:?}");
        }
    }

    #[test]
    fn test_untouched_nodes_read_neutral() {
        let grid = open_grid(10, 10);
        let mut pf = Pathfinder::new();
        pf.find_path_cells(&grid, (1, 1), (8, 8)).unwrap();
        let touched = grid.index(2, 2).unwrap();
        pf.begin_query(grid.len());
        assert_eq!(pf.f_cost_of(touched), 0);
        assert_eq!(pf.node_mut(touched).parent, None);
    }

    #[test]
    fn test_connected_pairs_find_paths_on_generated_maps() {
        for seed in 0..6 {
            let grid = Grid::build(&MapGenerator::generate(30, 30, 45, seed));
            let walkable: Vec<_> = grid.walkable_cells().map(|c| (c.grid_x, c.grid_y)).collect();
            if walkable.len() < 2 {
                continue;
            }
            let mut pf = Pathfinder::new();
            let start = walkable[0];
            let connected = reachable(&grid, start);

            for (i, &goal) in walkable.iter().enumerate().step_by(17) {
                if goal == start {
                    continue;
                }
                let result = pf.find_path_cells(&grid, start, goal);
                if connected[grid.index(goal.0, goal.1).unwrap()] {
                    let path = result.unwrap_or_else(|e| panic!("seed {seed} #{i}: {e}"));
                    assert_well_formed(&path, start, goal);
                    assert_eq!(Some(path.cost()), dijkstra_cost(&grid, start, goal));
                } else {
                    assert_eq!(result, Err(PathError::NoPath));
                }
            }
        }
    }

    #[test]
    fn test_path_tagged_with_grid_generation() {
        let mut grid = open_grid(8, 8);
        grid.set_generation(3);
        let mut pf = Pathfinder::new();
        let path = pf.find_path_cells(&grid, (1, 1), (6, 6)).unwrap();
        assert_eq!(path.generation(), 3);
        assert!(path.is_current(&grid));
        grid.set_generation(4);
        assert!(!path.is_current(&grid));
    }

    #[test]
    fn test_scratch_resizes_for_new_grid() {
        let mut pf = Pathfinder::new();
        pf.find_path_cells(&open_grid(10, 10), (1, 1), (8, 8)).unwrap();
        let bigger = open_grid(30, 20);
        let path = pf.find_path_cells(&bigger, (1, 1), (28, 18)).unwrap();
        assert_eq!(*path.cells().last().unwrap(), (28, 18));
    }
}
