//! Aldous-Broder: a random walk that links every cell the first time it is entered.
//! The result is a uniformly random spanning tree.
//!
//! The walk has no hard step bound; revisits are unbounded in the worst case.
//! [`generate_bounded`] lets callers cap it and fall back to another strategy.

use rand_chacha::rand_core::Rng;

use super::Candidates;
use crate::grid::Grid;
use crate::seed::random_index;
use crate::types::Direction;

/// The walk ran out of steps before entering every cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepBudgetExhausted {
    pub steps: u64,
    pub unvisited: usize,
}

pub fn generate<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    // An uncapped walk only stops once every cell is linked.
    let _ = walk(grid, rng, None);
}

/// Walks at most `max_steps` steps. Returns the steps taken on success; on
/// exhaustion the grid is left partially carved.
pub fn generate_bounded<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    max_steps: u64,
) -> Result<u64, StepBudgetExhausted> {
    walk(grid, rng, Some(max_steps))
}

fn walk<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    max_steps: Option<u64>,
) -> Result<u64, StepBudgetExhausted> {
    let mut current = random_index(rng, grid.len());
    let mut unvisited = grid.len() - 1;
    let mut steps = 0_u64;

    while unvisited > 0 {
        if max_steps.is_some_and(|cap| steps >= cap) {
            return Err(StepBudgetExhausted { steps, unvisited });
        }

        let mut candidates = Candidates::new();
        for direction in Direction::ALL {
            if let Some(neighbor) = grid.neighbor_index(current, direction) {
                candidates.push(direction, neighbor);
            }
        }
        let (direction, neighbor) = candidates.pick(rng);
        if grid.links_at(neighbor).is_empty() {
            grid.connect(current, direction);
            unvisited -= 1;
        }
        current = neighbor;
        steps += 1;
    }

    tracing::trace!(steps, cells = grid.len(), "aldous-broder walk complete");
    Ok(steps)
}
