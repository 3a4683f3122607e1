//! Error taxonomy shared by grid construction, generation, and level records.

use thiserror::Error;

use crate::types::{Coord, Direction};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("grid dimensions must be positive and addressable, got {rows}x{columns}")]
    InvalidDimension { rows: usize, columns: usize },
    #[error("cell {coord} is outside the grid")]
    OutOfBounds { coord: Coord },
    #[error("cells {from} and {to} are not geometric neighbors")]
    NotAdjacent { from: Coord, to: Coord },
    /// A link exists in one direction only.
    #[error("cell {coord} links {direction:?} but the neighbor does not link back")]
    AsymmetricLink { coord: Coord, direction: Direction },
    #[error("only {reachable} of {floor_count} floor cells are reachable")]
    DisconnectedGraph { reachable: usize, floor_count: usize },
    #[error("{edges} links over {floor_count} floor cells is not a spanning tree")]
    CyclicGraph { edges: usize, floor_count: usize },
    #[error("path guarantor took {steps} steps, exceeding the bound of {bound}")]
    GenerationFailed { steps: usize, bound: usize },
    #[error("layout fingerprint {actual:#018x} does not match recorded {expected:#018x}")]
    FingerprintMismatch { expected: u64, actual: u64 },
    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),
    #[error("snapshot is malformed: {0}")]
    InvalidSnapshot(String),
    #[error("record format version {found} is not supported (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },
}
