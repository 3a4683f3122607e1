//! Recursive-Backtracker: depth-first carving over an explicit stack. Long winding
//! corridors and few dead ends.

use rand_chacha::rand_core::Rng;

use super::Candidates;
use crate::grid::Grid;
use crate::seed::random_index;
use crate::types::Direction;

pub fn generate<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let mut stack = vec![random_index(rng, grid.len())];

    while let Some(&top) = stack.last() {
        let mut candidates = Candidates::new();
        for direction in Direction::ALL {
            if let Some(neighbor) = grid.neighbor_index(top, direction)
                && grid.links_at(neighbor).is_empty()
            {
                candidates.push(direction, neighbor);
            }
        }

        if candidates.is_empty() {
            stack.pop();
            continue;
        }
        let (direction, neighbor) = candidates.pick(rng);
        grid.connect(top, direction);
        stack.push(neighbor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::level_rng;

    #[test]
    fn carves_a_spanning_tree() {
        let mut grid = Grid::create(8, 11).expect("grid");
        generate(&mut grid, &mut level_rng(8));
        assert!(grid.each_cell().all(|cell| cell.link_count() > 0));
        assert_eq!(grid.edge_count(), 8 * 11 - 1);
    }

    #[test]
    fn single_row_becomes_one_corridor() {
        let mut grid = Grid::create(1, 6).expect("grid");
        generate(&mut grid, &mut level_rng(3));
        assert_eq!(grid.edge_count(), 5);
        assert!(grid.each_cell().all(|cell| cell.link_count() <= 2));
    }
}
