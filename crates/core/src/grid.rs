//! Arena-backed cell graph: fixed cell storage, geometric adjacency, and the link set.
//!
//! Cells live in one flat vector indexed by `row * columns + column`. Neighbors are
//! index arithmetic and links are direction bits on each cell, so a link can only
//! ever join two geometric neighbors.

use std::fmt::{self, Write as _};

use rand_chacha::rand_core::Rng;

use crate::error::MazeError;
use crate::seed::random_index;
use crate::types::{Coord, Direction, DirectionSet, TileKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    coord: Coord,
    tile: TileKind,
    links: DirectionSet,
}

impl Cell {
    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn row(&self) -> usize {
        self.coord.row
    }

    pub fn column(&self) -> usize {
        self.coord.column
    }

    pub fn tile(&self) -> TileKind {
        self.tile
    }

    /// Directions this cell has a passage toward.
    pub fn links(&self) -> DirectionSet {
        self.links
    }

    pub fn is_linked_toward(&self, direction: Direction) -> bool {
        self.links.contains(direction)
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn create(rows: usize, columns: usize) -> Result<Self, MazeError> {
        let len = rows
            .checked_mul(columns)
            .filter(|&len| len > 0)
            .ok_or(MazeError::InvalidDimension { rows, columns })?;
        let cells = (0..len)
            .map(|index| Cell {
                coord: Coord::new(index / columns, index % columns),
                tile: TileKind::Wall,
                links: DirectionSet::EMPTY,
            })
            .collect();
        Ok(Self { rows, columns, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.column < self.columns
    }

    pub fn cell_at(&self, row: usize, column: usize) -> Option<&Cell> {
        self.cell(Coord::new(row, column))
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        if !self.contains(coord) {
            return None;
        }
        Some(&self.cells[self.index_of(coord)])
    }

    /// Row-major walk over every cell. Each call starts a fresh walk.
    pub fn each_cell(&self) -> impl ExactSizeIterator<Item = &Cell> + Clone + '_ {
        self.cells.iter()
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> &Cell {
        &self.cells[random_index(rng, self.cells.len())]
    }

    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        if !self.contains(coord) {
            return None;
        }
        self.neighbor_index(self.index_of(coord), direction).map(|index| self.coord_of(index))
    }

    /// Geometric neighbors in north, south, east, west order.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        Direction::ALL.into_iter().filter_map(move |direction| self.neighbor(coord, direction))
    }

    pub fn link(&mut self, a: Coord, b: Coord, bidirectional: bool) -> Result<(), MazeError> {
        let (index, direction) = self.adjacent_pair(a, b)?;
        self.cells[index].links.insert(direction);
        if bidirectional {
            let other = self.index_of(b);
            self.cells[other].links.insert(direction.opposite());
        }
        Ok(())
    }

    pub fn unlink(&mut self, a: Coord, b: Coord, bidirectional: bool) -> Result<(), MazeError> {
        let (index, direction) = self.adjacent_pair(a, b)?;
        self.cells[index].links.remove(direction);
        if bidirectional {
            let other = self.index_of(b);
            self.cells[other].links.remove(direction.opposite());
        }
        Ok(())
    }

    /// True when either side carries the link, so `linked(a, b) == linked(b, a)`.
    pub fn linked(&self, a: Coord, b: Coord) -> bool {
        let Ok((index, direction)) = self.adjacent_pair(a, b) else {
            return false;
        };
        self.cells[index].links.contains(direction)
            || self.cells[self.index_of(b)].links.contains(direction.opposite())
    }

    /// Derives Wall/Floor from the link set: unlinked cells are walls.
    pub fn classify_tiles(&mut self) {
        for cell in &mut self.cells {
            cell.tile = if cell.links.is_empty() { TileKind::Wall } else { TileKind::Floor };
        }
    }

    pub fn clear_links(&mut self) {
        for cell in &mut self.cells {
            cell.links = DirectionSet::EMPTY;
            cell.tile = TileKind::Wall;
        }
    }

    pub fn floor_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.tile == TileKind::Floor).count()
    }

    /// Number of linked neighbor pairs.
    pub fn edge_count(&self) -> usize {
        let mut edges = 0;
        for index in 0..self.cells.len() {
            for direction in [Direction::South, Direction::East] {
                let Some(other) = self.neighbor_index(index, direction) else {
                    continue;
                };
                if self.cells[index].links.contains(direction)
                    || self.cells[other].links.contains(direction.opposite())
                {
                    edges += 1;
                }
            }
        }
        edges
    }

    pub fn dead_ends(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(|cell| cell.tile == TileKind::Floor && cell.link_count() == 1)
    }

    /// ASCII rendering; `marker` may overlay a character at the center of a cell.
    pub fn render_with<F>(&self, marker: F) -> String
    where
        F: Fn(Coord) -> Option<char>,
    {
        let mut out = String::with_capacity((self.rows * 2 + 1) * (self.columns * 4 + 2));
        out.push('+');
        for _ in 0..self.columns {
            out.push_str("---+");
        }
        out.push('\n');

        for row in 0..self.rows {
            let mut body = String::from("|");
            let mut bottom = String::from("+");
            for column in 0..self.columns {
                let cell = &self.cells[row * self.columns + column];
                match (marker(cell.coord), cell.tile) {
                    (Some(mark), _) => {
                        let _ = write!(body, " {mark} ");
                    }
                    (None, TileKind::Floor) => body.push_str("   "),
                    (None, TileKind::Wall) => body.push_str("###"),
                }
                body.push(if cell.links.contains(Direction::East) { ' ' } else { '|' });
                bottom.push_str(if cell.links.contains(Direction::South) { "   " } else { "---" });
                bottom.push('+');
            }
            out.push_str(&body);
            out.push('\n');
            out.push_str(&bottom);
            out.push('\n');
        }
        out
    }

    pub(crate) fn index_of(&self, coord: Coord) -> usize {
        coord.row * self.columns + coord.column
    }

    pub(crate) fn coord_of(&self, index: usize) -> Coord {
        self.cells[index].coord
    }

    pub(crate) fn links_at(&self, index: usize) -> DirectionSet {
        self.cells[index].links
    }

    pub(crate) fn neighbor_index(&self, index: usize, direction: Direction) -> Option<usize> {
        let row = index / self.columns;
        let column = index % self.columns;
        match direction {
            Direction::North if row > 0 => Some(index - self.columns),
            Direction::South if row + 1 < self.rows => Some(index + self.columns),
            Direction::East if column + 1 < self.columns => Some(index + 1),
            Direction::West if column > 0 => Some(index - 1),
            _ => None,
        }
    }

    /// Links `index` with its neighbor toward `direction` in both directions.
    /// Returns the neighbor index, or `None` at the grid border.
    pub(crate) fn connect(&mut self, index: usize, direction: Direction) -> Option<usize> {
        let other = self.neighbor_index(index, direction)?;
        self.cells[index].links.insert(direction);
        self.cells[other].links.insert(direction.opposite());
        Some(other)
    }

    pub(crate) fn disconnect(&mut self, index: usize, direction: Direction) {
        if let Some(other) = self.neighbor_index(index, direction) {
            self.cells[index].links.remove(direction);
            self.cells[other].links.remove(direction.opposite());
        }
    }

    fn adjacent_pair(&self, a: Coord, b: Coord) -> Result<(usize, Direction), MazeError> {
        for coord in [a, b] {
            if !self.contains(coord) {
                return Err(MazeError::OutOfBounds { coord });
            }
        }
        let direction = Direction::between(a, b).ok_or(MazeError::NotAdjacent { from: a, to: b })?;
        Ok((self.index_of(a), direction))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(|_| None))
    }
}
