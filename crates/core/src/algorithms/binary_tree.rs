//! Binary-Tree: every cell links north or east. The northeast corner is reachable
//! from everywhere and no cell ever carves south or west.

use rand_chacha::rand_core::Rng;

use crate::grid::Grid;
use crate::seed::random_bool;
use crate::types::Direction;

pub fn generate<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    for index in 0..grid.len() {
        let has_north = grid.neighbor_index(index, Direction::North).is_some();
        let has_east = grid.neighbor_index(index, Direction::East).is_some();
        let direction = match (has_north, has_east) {
            (true, true) => {
                if random_bool(rng) {
                    Direction::North
                } else {
                    Direction::East
                }
            }
            (true, false) => Direction::North,
            (false, true) => Direction::East,
            (false, false) => continue,
        };
        grid.connect(index, direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::level_rng;
    use crate::types::Coord;

    #[test]
    fn border_rows_and_columns_form_straight_corridors() {
        let mut grid = Grid::create(6, 6).expect("grid");
        generate(&mut grid, &mut level_rng(21));

        for column in 0..5 {
            assert!(grid.linked(Coord::new(0, column), Coord::new(0, column + 1)));
        }
        for row in 1..6 {
            assert!(grid.linked(Coord::new(row, 5), Coord::new(row - 1, 5)));
        }
    }

    #[test]
    fn carves_one_link_per_cell_except_the_corner() {
        let mut grid = Grid::create(4, 7).expect("grid");
        generate(&mut grid, &mut level_rng(4));
        assert_eq!(grid.edge_count(), 4 * 7 - 1);
    }
}
