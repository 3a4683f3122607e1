use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MazeError;

/// Grid coordinate. Ordering is row-major, so `min`/`max` tie-breaks resolve
/// by lowest row first and lowest column second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub column: usize,
}

impl Coord {
    pub const ORIGIN: Self = Self { row: 0, column: 0 };

    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    pub fn manhattan(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Enumeration order used everywhere neighbors are listed.
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::South, Direction::East, Direction::West];

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Direction that leads from `from` to `to` when the two are geometric neighbors.
    pub fn between(from: Coord, to: Coord) -> Option<Self> {
        match (to.row as i64 - from.row as i64, to.column as i64 - from.column as i64) {
            (-1, 0) => Some(Self::North),
            (1, 0) => Some(Self::South),
            (0, 1) => Some(Self::East),
            (0, -1) => Some(Self::West),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::North => 0b0001,
            Self::South => 0b0010,
            Self::East => 0b0100,
            Self::West => 0b1000,
        }
    }
}

/// Set of directions a cell is linked toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const EMPTY: Self = Self(0);

    pub fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&direction| self.contains(direction))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for direction in iter {
            set.insert(direction);
        }
        set
    }
}

/// Closed set of generation strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    BinaryTree,
    AldousBroder,
    RecursiveBacktracker,
    RecursiveDivision,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::BinaryTree,
        Algorithm::AldousBroder,
        Algorithm::RecursiveBacktracker,
        Algorithm::RecursiveDivision,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::BinaryTree => "binary-tree",
            Self::AldousBroder => "aldous-broder",
            Self::RecursiveBacktracker => "recursive-backtracker",
            Self::RecursiveDivision => "recursive-division",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = MazeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == normalized)
            .ok_or_else(|| MazeError::UnknownAlgorithm(raw.to_string()))
    }
}
