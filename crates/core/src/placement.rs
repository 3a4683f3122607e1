//! Spawn and exit selection on a carved grid, plus the path guarantor that
//! re-links a route when something has cut the level apart.

use rand_chacha::rand_core::Rng;
use serde::{Deserialize, Serialize};

use crate::error::MazeError;
use crate::grid::Grid;
use crate::seed::random_index;
use crate::solver::{distances, step_toward};
use crate::types::{Coord, TileKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub spawn: Coord,
    pub exit: Coord,
    /// Hops from spawn to exit; `None` when the exit is not reachable.
    pub exit_distance: Option<u32>,
}

/// Spawn is the origin when it is Floor, otherwise the nearest Floor cell.
/// Exit is the cell farthest from spawn. When that is spawn itself a random
/// other Floor cell is used, or spawn when there is none.
pub fn place_spawn_and_exit<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Placement {
    let spawn = spawn_cell(grid);
    let from_spawn = distances(grid, spawn);
    let (mut exit, distance) = from_spawn.max();
    let mut exit_distance = Some(distance);

    if exit == spawn {
        let others: Vec<Coord> = grid
            .each_cell()
            .filter(|cell| cell.tile() == TileKind::Floor && cell.coord() != spawn)
            .map(|cell| cell.coord())
            .collect();
        if !others.is_empty() {
            exit = others[random_index(rng, others.len())];
            exit_distance = from_spawn.get(exit);
        }
    }

    Placement { spawn, exit, exit_distance }
}

fn spawn_cell(grid: &Grid) -> Coord {
    if grid.cell(Coord::ORIGIN).is_some_and(|cell| cell.tile() == TileKind::Floor) {
        return Coord::ORIGIN;
    }
    grid.each_cell()
        .filter(|cell| cell.tile() == TileKind::Floor)
        .min_by_key(|cell| (cell.coord().manhattan(Coord::ORIGIN), cell.coord()))
        .map_or(Coord::ORIGIN, |cell| cell.coord())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathRepair {
    /// Cells walked from start to goal.
    pub steps: usize,
    /// Links that did not exist before.
    pub carved: usize,
}

/// Walks greedily from `start` toward `goal`, always stepping to the neighbor
/// with the smallest Manhattan distance and linking it if needed. Tiles are
/// reclassified afterwards. The walk is bounded by `rows + columns` steps.
pub fn guarantee_path(grid: &mut Grid, start: Coord, goal: Coord) -> Result<PathRepair, MazeError> {
    for coord in [start, goal] {
        if !grid.contains(coord) {
            return Err(MazeError::OutOfBounds { coord });
        }
    }

    let bound = grid.rows() + grid.columns();
    let mut current = start;
    let mut repair = PathRepair { steps: 0, carved: 0 };
    // Every greedy step closes the Manhattan gap by one, so on a rectangular
    // grid the walk ends in `start.manhattan(goal) < bound` steps and neither
    // failure branch below is taken.
    while current != goal {
        if repair.steps >= bound {
            return Err(MazeError::GenerationFailed { steps: repair.steps, bound });
        }
        let Some((_, next)) = step_toward(grid, current, goal) else {
            return Err(MazeError::GenerationFailed { steps: repair.steps, bound });
        };
        let was_linked = grid.linked(current, next);
        grid.link(current, next, true)?;
        if !was_linked {
            repair.carved += 1;
        }
        current = next;
        repair.steps += 1;
    }

    grid.classify_tiles();
    tracing::debug!(%start, %goal, steps = repair.steps, carved = repair.carved, "path guaranteed");
    Ok(repair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::level_rng;

    #[test]
    fn spawn_prefers_origin_and_exit_is_farthest() {
        let mut grid = Grid::create(2, 3).expect("grid");
        let snake = [(0, 0), (0, 1), (0, 2), (1, 2), (1, 1), (1, 0)];
        for pair in snake.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            grid.link(Coord::new(a.0, a.1), Coord::new(b.0, b.1), true).expect("adjacent");
        }
        grid.classify_tiles();

        let placement = place_spawn_and_exit(&grid, &mut level_rng(0));
        assert_eq!(placement.spawn, Coord::ORIGIN);
        assert_eq!(placement.exit, Coord::new(1, 0));
        assert_eq!(placement.exit_distance, Some(5));
    }

    #[test]
    fn spawn_moves_to_nearest_floor_when_origin_is_wall() {
        let mut grid = Grid::create(3, 3).expect("grid");
        grid.link(Coord::new(1, 0), Coord::new(2, 0), true).expect("adjacent");
        grid.link(Coord::new(0, 1), Coord::new(0, 2), true).expect("adjacent");
        grid.classify_tiles();

        // (0,1) and (1,0) are both one step from the origin; lowest row wins.
        let placement = place_spawn_and_exit(&grid, &mut level_rng(0));
        assert_eq!(placement.spawn, Coord::new(0, 1));
        assert_eq!(placement.exit, Coord::new(0, 2));
    }

    #[test]
    fn layout_without_floor_places_both_on_origin() {
        let mut grid = Grid::create(1, 1).expect("grid");
        grid.classify_tiles();
        let placement = place_spawn_and_exit(&grid, &mut level_rng(0));
        assert_eq!(
            placement,
            Placement { spawn: Coord::ORIGIN, exit: Coord::ORIGIN, exit_distance: Some(0) }
        );
    }

    #[test]
    fn guarantor_carves_a_straight_route_on_an_empty_grid() {
        let mut grid = Grid::create(4, 5).expect("grid");
        let repair = guarantee_path(&mut grid, Coord::ORIGIN, Coord::new(3, 4)).expect("repair");
        assert_eq!(repair, PathRepair { steps: 7, carved: 7 });
        assert_eq!(grid.floor_count(), 8);
        assert_eq!(distances(&grid, Coord::ORIGIN).get(Coord::new(3, 4)), Some(7));
    }

    #[test]
    fn guarantor_walks_exactly_the_manhattan_distance() {
        let (rows, columns) = (3, 4);
        let coords: Vec<Coord> = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| Coord::new(row, column)))
            .collect();
        for &start in &coords {
            for &goal in &coords {
                let mut grid = Grid::create(rows, columns).expect("grid");
                let repair = guarantee_path(&mut grid, start, goal).expect("repair");
                assert_eq!(repair.steps, start.manhattan(goal), "{start} -> {goal}");
                assert!(repair.steps < rows + columns);
                assert_eq!(distances(&grid, start).get(goal), Some(repair.steps as u32));
            }
        }
    }

    #[test]
    fn guarantor_reuses_existing_links() {
        let mut grid = Grid::create(1, 3).expect("grid");
        grid.link(Coord::new(0, 0), Coord::new(0, 1), true).expect("adjacent");
        let repair = guarantee_path(&mut grid, Coord::ORIGIN, Coord::new(0, 2)).expect("repair");
        assert_eq!(repair, PathRepair { steps: 2, carved: 1 });

        let again = guarantee_path(&mut grid, Coord::ORIGIN, Coord::new(0, 2)).expect("repair");
        assert_eq!(again.carved, 0);
    }

    #[test]
    fn guarantor_rejects_out_of_bounds_endpoints() {
        let mut grid = Grid::create(2, 2).expect("grid");
        assert_eq!(
            guarantee_path(&mut grid, Coord::ORIGIN, Coord::new(2, 0)),
            Err(MazeError::OutOfBounds { coord: Coord::new(2, 0) })
        );
    }
}
