//! Breadth-first distances over the link graph, farthest-cell queries, and the
//! spanning-tree check run after every generation.

use std::collections::VecDeque;

use crate::error::MazeError;
use crate::grid::Grid;
use crate::types::{Coord, Direction, TileKind};

/// Hop distances from a root cell. Unreachable cells have no entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Distances {
    root: Coord,
    columns: usize,
    hops: Vec<Option<u32>>,
}

impl Distances {
    pub fn root(&self) -> Coord {
        self.root
    }

    pub fn get(&self, coord: Coord) -> Option<u32> {
        if coord.column >= self.columns {
            return None;
        }
        let index = coord.row.checked_mul(self.columns)?.checked_add(coord.column)?;
        self.hops.get(index).copied().flatten()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.get(coord).is_some()
    }

    /// Reached cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, u32)> + '_ {
        let columns = self.columns;
        self.hops.iter().enumerate().filter_map(move |(index, hops)| {
            hops.map(|hops| (Coord::new(index / columns, index % columns), hops))
        })
    }

    pub fn len(&self) -> usize {
        self.hops.iter().filter(|hops| hops.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Farthest reached cell. Ties go to the lowest row, then the lowest column.
    pub fn max(&self) -> (Coord, u32) {
        let mut best = (self.root, 0);
        for (coord, hops) in self.iter() {
            if hops > best.1 || (hops == best.1 && coord < best.0) {
                best = (coord, hops);
            }
        }
        best
    }

    /// Shortest path from the root to `goal`, both ends included.
    pub fn path_to(&self, grid: &Grid, goal: Coord) -> Option<Vec<Coord>> {
        let mut remaining = self.get(goal)?;
        let mut path = vec![goal];
        let mut current = goal;
        while remaining > 0 {
            let cell = grid.cell(current)?;
            let previous = cell
                .links()
                .iter()
                .filter_map(|direction| grid.neighbor(current, direction))
                .find(|&neighbor| self.get(neighbor) == Some(remaining - 1))?;
            path.push(previous);
            current = previous;
            remaining -= 1;
        }
        path.reverse();
        Some(path)
    }
}

/// Breadth-first hop counts from `from` across linked passages. An
/// out-of-bounds root reaches nothing.
pub fn distances(grid: &Grid, from: Coord) -> Distances {
    let mut hops = vec![None; grid.len()];
    if grid.contains(from) {
        let start = grid.index_of(from);
        hops[start] = Some(0);
        let mut open = VecDeque::from([start]);
        while let Some(index) = open.pop_front() {
            let next_hops = hops[index].map_or(0, |value: u32| value + 1);
            for direction in grid.links_at(index).iter() {
                let Some(neighbor) = grid.neighbor_index(index, direction) else {
                    continue;
                };
                if hops[neighbor].is_none() {
                    hops[neighbor] = Some(next_hops);
                    open.push_back(neighbor);
                }
            }
        }
    }
    Distances { root: from, columns: grid.columns(), hops }
}

pub fn farthest_cell(distances: &Distances) -> Coord {
    distances.max().0
}

/// Checks that links are symmetric, every Floor cell is reachable from every
/// other, and Floor cells carry exactly `floor_count - 1` links.
pub fn validate_spanning_tree(grid: &Grid) -> Result<(), MazeError> {
    for cell in grid.each_cell() {
        for direction in cell.links().iter() {
            let mirrored = grid
                .neighbor(cell.coord(), direction)
                .and_then(|neighbor| grid.cell(neighbor))
                .is_some_and(|neighbor| neighbor.is_linked_toward(direction.opposite()));
            if !mirrored {
                return Err(MazeError::AsymmetricLink { coord: cell.coord(), direction });
            }
        }
    }

    let floor_count = grid.floor_count();
    let Some(first_floor) = grid.each_cell().find(|cell| cell.tile() == TileKind::Floor) else {
        return Ok(());
    };
    let reachable = distances(grid, first_floor.coord()).len();
    if reachable != floor_count {
        return Err(MazeError::DisconnectedGraph { reachable, floor_count });
    }

    let edges = grid.edge_count();
    if edges + 1 != floor_count {
        return Err(MazeError::CyclicGraph { edges, floor_count });
    }
    Ok(())
}

pub(crate) fn step_toward(grid: &Grid, current: Coord, goal: Coord) -> Option<(Direction, Coord)> {
    Direction::ALL
        .into_iter()
        .filter_map(|direction| grid.neighbor(current, direction).map(|next| (direction, next)))
        .min_by_key(|&(_, next)| next.manhattan(goal))
}
