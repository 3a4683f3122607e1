//! Maze carving strategies. Each one mutates only the link set of a fresh grid;
//! tile classification happens afterwards in the session.

pub mod aldous_broder;
pub mod binary_tree;
pub mod recursive_backtracker;
pub mod recursive_division;

use rand_chacha::rand_core::Rng;

use crate::grid::Grid;
use crate::seed::random_index;
use crate::types::{Algorithm, Direction};

impl Algorithm {
    /// Carves `grid` with this strategy. Deterministic for a given random stream.
    pub fn generate<R: Rng + ?Sized>(self, grid: &mut Grid, rng: &mut R) {
        match self {
            Self::BinaryTree => binary_tree::generate(grid, rng),
            Self::AldousBroder => aldous_broder::generate(grid, rng),
            Self::RecursiveBacktracker => recursive_backtracker::generate(grid, rng),
            Self::RecursiveDivision => recursive_division::generate(grid, rng),
        }
    }
}

/// Up to four neighbor candidates, kept on the stack for the hot loops.
#[derive(Clone, Copy, Debug)]
struct Candidates {
    items: [(Direction, usize); 4],
    len: usize,
}

impl Candidates {
    fn new() -> Self {
        Self { items: [(Direction::North, 0); 4], len: 0 }
    }

    fn push(&mut self, direction: Direction, index: usize) {
        self.items[self.len] = (direction, index);
        self.len += 1;
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> (Direction, usize) {
        self.items[random_index(rng, self.len)]
    }
}
