//! Recursive-Division: start fully open, then split regions with walls that each
//! keep a single passage. Boxy, room-like structure.
//!
//! Regions are processed from an explicit work stack instead of call recursion.

use rand_chacha::rand_core::Rng;

use crate::grid::Grid;
use crate::seed::random_index;
use crate::types::{Coord, Direction};

/// Smallest threshold that still divides down to single-cell corridors, which
/// leaves a perfect maze.
pub const PERFECT_MIN_REGION: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Wall runs east-west between two rows.
    Horizontal,
    /// Wall runs north-south between two columns.
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub row: usize,
    pub column: usize,
    pub height: usize,
    pub width: usize,
}

/// One wall raised by the division.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Divide {
    pub orientation: Orientation,
    pub region: Region,
    /// Row above a horizontal wall, or column west of a vertical wall.
    pub line: usize,
    /// Cell on the north/west side of the wall whose passage stays open.
    pub passage: Coord,
}

pub fn generate<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    generate_with_min_region(grid, rng, PERFECT_MIN_REGION);
}

/// Divides until every region has height or width below `min_region` and
/// returns the walls raised, in the order they were placed. Thresholds above
/// [`PERFECT_MIN_REGION`] leave open rooms behind.
pub fn generate_with_min_region<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    min_region: usize,
) -> Vec<Divide> {
    let min_region = min_region.max(PERFECT_MIN_REGION);
    open_every_passage(grid);

    let mut divides = Vec::new();
    let mut pending =
        vec![Region { row: 0, column: 0, height: grid.rows(), width: grid.columns() }];

    while let Some(region) = pending.pop() {
        if region.height < min_region || region.width < min_region {
            continue;
        }
        let divide = if region.height >= region.width {
            divide_horizontally(grid, rng, region)
        } else {
            divide_vertically(grid, rng, region)
        };
        let (first, second) = split(divide);
        // Second is pushed first so the north/west half is handled next.
        pending.push(second);
        pending.push(first);
        divides.push(divide);
    }

    divides
}

fn open_every_passage(grid: &mut Grid) {
    for index in 0..grid.len() {
        grid.connect(index, Direction::South);
        grid.connect(index, Direction::East);
    }
}

fn divide_horizontally<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, region: Region) -> Divide {
    let line = region.row + random_index(rng, region.height - 1);
    let passage_column = region.column + random_index(rng, region.width);
    for column in region.column..region.column + region.width {
        if column != passage_column {
            let index = grid.index_of(Coord::new(line, column));
            grid.disconnect(index, Direction::South);
        }
    }
    Divide {
        orientation: Orientation::Horizontal,
        region,
        line,
        passage: Coord::new(line, passage_column),
    }
}

fn divide_vertically<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, region: Region) -> Divide {
    let line = region.column + random_index(rng, region.width - 1);
    let passage_row = region.row + random_index(rng, region.height);
    for row in region.row..region.row + region.height {
        if row != passage_row {
            let index = grid.index_of(Coord::new(row, line));
            grid.disconnect(index, Direction::East);
        }
    }
    Divide {
        orientation: Orientation::Vertical,
        region,
        line,
        passage: Coord::new(passage_row, line),
    }
}

fn split(divide: Divide) -> (Region, Region) {
    let region = divide.region;
    match divide.orientation {
        Orientation::Horizontal => {
            let upper_height = divide.line - region.row + 1;
            (
                Region { height: upper_height, ..region },
                Region { row: divide.line + 1, height: region.height - upper_height, ..region },
            )
        }
        Orientation::Vertical => {
            let left_width = divide.line - region.column + 1;
            (
                Region { width: left_width, ..region },
                Region { column: divide.line + 1, width: region.width - left_width, ..region },
            )
        }
    }
}
