//! Persistable level descriptions.
//!
//! A [`LevelRecord`] stores only the inputs plus a layout fingerprint and relies
//! on deterministic regeneration. A [`LevelSnapshot`] stores the layout itself.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::MazeError;
use crate::grid::Grid;
use crate::placement::Placement;
use crate::session::{GenerationOptions, Level, LevelGenerator};
use crate::solver::validate_spanning_tree;
use crate::types::{Algorithm, Coord, DirectionSet, TileKind};

pub const RECORD_FORMAT_VERSION: u32 = 1;

const WALL_GLYPH: char = '#';
const FLOOR_GLYPH: char = '.';

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub format_version: u32,
    pub rows: usize,
    pub columns: usize,
    pub seed: u64,
    pub algorithm: Algorithm,
    #[serde(default)]
    pub options: GenerationOptions,
    #[serde(default)]
    pub fell_back: bool,
    pub spawn: Coord,
    pub exit: Coord,
    pub exit_distance: Option<u32>,
    pub fingerprint: u64,
}

impl LevelRecord {
    pub fn generator(&self) -> LevelGenerator {
        LevelGenerator::new(self.seed, self.algorithm)
            .with_dimensions(self.rows, self.columns)
            .with_options(self.options)
    }

    /// Rebuilds the level from its inputs and checks it against the stored
    /// fingerprint.
    pub fn regenerate(&self) -> Result<Level, MazeError> {
        check_format(self.format_version)?;
        let level = self.generator().generate()?;
        let actual = level.fingerprint();
        if actual != self.fingerprint {
            return Err(MazeError::FingerprintMismatch { expected: self.fingerprint, actual });
        }
        Ok(level)
    }
}

/// Explicit layout: one string per row (`#` wall, `.` floor) and the raw link
/// bits of every cell in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub format_version: u32,
    pub rows: usize,
    pub columns: usize,
    pub tiles: Vec<String>,
    pub links: Vec<DirectionSet>,
    pub record: LevelRecord,
}

impl LevelSnapshot {
    pub fn capture(grid: &Grid, record: LevelRecord) -> Self {
        let tiles = (0..grid.rows())
            .map(|row| {
                (0..grid.columns())
                    .filter_map(|column| grid.cell_at(row, column))
                    .map(|cell| match cell.tile() {
                        TileKind::Wall => WALL_GLYPH,
                        TileKind::Floor => FLOOR_GLYPH,
                    })
                    .collect()
            })
            .collect();
        Self {
            format_version: RECORD_FORMAT_VERSION,
            rows: grid.rows(),
            columns: grid.columns(),
            tiles,
            links: grid.each_cell().map(|cell| cell.links()).collect(),
            record,
        }
    }

    /// Rebuilds the grid from the stored links. The stored tiles must agree
    /// with the links, and the layout must be a spanning tree over its Floor
    /// cells sized like the embedded record.
    pub fn to_grid(&self) -> Result<Grid, MazeError> {
        check_format(self.format_version)?;
        if (self.rows, self.columns) != (self.record.rows, self.record.columns) {
            return Err(MazeError::InvalidSnapshot(format!(
                "layout is {}x{} but its record describes {}x{}",
                self.rows, self.columns, self.record.rows, self.record.columns
            )));
        }
        let mut grid = Grid::create(self.rows, self.columns)?;
        if self.links.len() != grid.len() {
            return Err(MazeError::InvalidSnapshot(format!(
                "expected {} link entries, found {}",
                grid.len(),
                self.links.len()
            )));
        }

        for (index, links) in self.links.iter().enumerate() {
            let coord = Coord::new(index / self.columns, index % self.columns);
            for direction in links.iter() {
                let Some(neighbor) = grid.neighbor(coord, direction) else {
                    return Err(MazeError::InvalidSnapshot(format!(
                        "cell {coord} links {direction:?} off the edge of the grid"
                    )));
                };
                grid.link(coord, neighbor, false)?;
            }
        }
        grid.classify_tiles();

        if self.tiles.len() != self.rows {
            return Err(MazeError::InvalidSnapshot(format!(
                "expected {} tile rows, found {}",
                self.rows,
                self.tiles.len()
            )));
        }
        for (row, line) in self.tiles.iter().enumerate() {
            if line.chars().count() != self.columns {
                return Err(MazeError::InvalidSnapshot(format!(
                    "tile row {row} has {} cells, expected {}",
                    line.chars().count(),
                    self.columns
                )));
            }
            for (column, glyph) in line.chars().enumerate() {
                let expected = match glyph {
                    WALL_GLYPH => TileKind::Wall,
                    FLOOR_GLYPH => TileKind::Floor,
                    other => {
                        return Err(MazeError::InvalidSnapshot(format!(
                            "unknown tile glyph '{other}' at ({row}, {column})"
                        )));
                    }
                };
                if grid.cell_at(row, column).map(|cell| cell.tile()) != Some(expected) {
                    return Err(MazeError::InvalidSnapshot(format!(
                        "tile at ({row}, {column}) disagrees with its links"
                    )));
                }
            }
        }
        validate_spanning_tree(&grid)
            .map_err(|error| MazeError::InvalidSnapshot(error.to_string()))?;
        Ok(grid)
    }

    /// True when the stored layout hashes to the record's fingerprint.
    pub fn matches_record(&self) -> Result<bool, MazeError> {
        let grid = self.to_grid()?;
        let placement = Placement {
            spawn: self.record.spawn,
            exit: self.record.exit,
            exit_distance: self.record.exit_distance,
        };
        Ok(fingerprint(&grid, Some(placement)) == self.record.fingerprint)
    }
}

fn check_format(found: u32) -> Result<(), MazeError> {
    if found == RECORD_FORMAT_VERSION {
        Ok(())
    } else {
        Err(MazeError::UnsupportedFormat { found, expected: RECORD_FORMAT_VERSION })
    }
}

/// Dimensions, tiles, link bits, then spawn and exit when placed. Dimensions
/// and coordinates are little-endian `u64`.
pub fn canonical_bytes(grid: &Grid, placement: Option<Placement>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(16 + grid.len() * 2 + 33);
    extend_index(&mut bytes, grid.rows());
    extend_index(&mut bytes, grid.columns());
    for cell in grid.each_cell() {
        bytes.push(match cell.tile() {
            TileKind::Wall => 0,
            TileKind::Floor => 1,
        });
    }
    for cell in grid.each_cell() {
        bytes.push(cell.links().bits());
    }
    match placement {
        None => bytes.push(0),
        Some(placement) => {
            bytes.push(1);
            for coord in [placement.spawn, placement.exit] {
                extend_index(&mut bytes, coord.row);
                extend_index(&mut bytes, coord.column);
            }
        }
    }
    bytes
}

// usize is at most 64 bits on every supported target, so the widening is exact.
fn extend_index(bytes: &mut Vec<u8>, value: usize) {
    bytes.extend((value as u64).to_le_bytes());
}

pub fn fingerprint(grid: &Grid, placement: Option<Placement>) -> u64 {
    xxh3_64(&canonical_bytes(grid, placement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::generate_level;
    use crate::types::Direction;

    fn sample_level() -> Level {
        generate_level(404, Algorithm::RecursiveBacktracker, 5, 7).expect("generate")
    }

    #[test]
    fn record_describes_the_level() {
        let level = sample_level();
        let record = level.record().expect("populated level has a record");
        let placement = level.placement().expect("placed");
        assert_eq!(record.format_version, RECORD_FORMAT_VERSION);
        assert_eq!((record.rows, record.columns), (5, 7));
        assert_eq!(record.spawn, placement.spawn);
        assert_eq!(record.exit, placement.exit);
        assert_eq!(record.fingerprint, level.fingerprint());
    }

    #[test]
    fn record_json_uses_kebab_case_algorithm_names() {
        let record = sample_level().record().expect("record");
        let json = serde_json::to_string(&record).expect("serialize");
        assert!(json.contains("\"algorithm\":\"recursive-backtracker\""));
        let parsed: LevelRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, record);
    }

    #[test]
    fn regenerate_detects_fingerprint_drift() {
        let mut record = sample_level().record().expect("record");
        assert!(record.regenerate().is_ok());

        let actual = record.fingerprint;
        record.fingerprint ^= 1;
        assert_eq!(
            record.regenerate().map(|level| level.fingerprint()),
            Err(MazeError::FingerprintMismatch { expected: actual ^ 1, actual })
        );
    }

    #[test]
    fn regenerate_rejects_other_format_versions() {
        let mut record = sample_level().record().expect("record");
        record.format_version = RECORD_FORMAT_VERSION + 1;
        assert!(matches!(
            record.regenerate(),
            Err(MazeError::UnsupportedFormat { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn snapshot_rebuilds_the_same_grid() {
        let level = sample_level();
        let snapshot = level.snapshot().expect("snapshot");
        assert_eq!(snapshot.tiles.len(), 5);
        assert!(snapshot.tiles.iter().all(|row| row.len() == 7));
        assert_eq!(&snapshot.to_grid().expect("valid snapshot"), level.grid());
        assert_eq!(snapshot.matches_record(), Ok(true));
    }

    #[test]
    fn snapshot_rejects_links_off_the_edge() {
        let mut snapshot = sample_level().snapshot().expect("snapshot");
        // North from row 0 has no neighbor.
        snapshot.links[0] = DirectionSet::from_bits(0b1111);
        assert!(matches!(snapshot.to_grid(), Err(MazeError::InvalidSnapshot(_))));
    }

    fn link_index(snapshot: &LevelSnapshot, coord: Coord) -> usize {
        coord.row * snapshot.columns + coord.column
    }

    fn assert_rejected(snapshot: &LevelSnapshot, reason: &str) {
        match snapshot.to_grid() {
            Err(MazeError::InvalidSnapshot(message)) => {
                assert!(message.contains(reason), "unexpected rejection: {message}");
            }
            other => panic!("expected an invalid snapshot, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_rejects_one_way_links() {
        let level = sample_level();
        let mut snapshot = level.snapshot().expect("snapshot");
        // A cell with two or more links stays Floor after losing one of them.
        let cell = level
            .grid()
            .each_cell()
            .find(|cell| cell.link_count() >= 2)
            .expect("a tree over 35 cells has a branch cell");
        let direction = cell.links().iter().next().expect("linked");
        let index = link_index(&snapshot, cell.coord());
        snapshot.links[index].remove(direction);

        assert_rejected(&snapshot, "does not link back");
    }

    #[test]
    fn snapshot_rejects_disconnected_layouts() {
        let level = sample_level();
        let grid = level.grid();
        let mut snapshot = level.snapshot().expect("snapshot");
        // Cutting an edge between two branch cells leaves both halves Floor.
        let (a, direction, b) = grid
            .each_cell()
            .filter(|cell| cell.link_count() >= 2)
            .flat_map(|cell| cell.links().iter().map(move |direction| (cell.coord(), direction)))
            .filter_map(|(a, direction)| Some((a, direction, grid.neighbor(a, direction)?)))
            .find(|&(_, _, b)| grid.cell(b).is_some_and(|cell| cell.link_count() >= 2))
            .expect("a tree over 35 cells has an interior edge");
        let (a_index, b_index) = (link_index(&snapshot, a), link_index(&snapshot, b));
        snapshot.links[a_index].remove(direction);
        snapshot.links[b_index].remove(direction.opposite());

        assert_rejected(&snapshot, "floor cells are reachable");
    }

    #[test]
    fn snapshot_rejects_cycles() {
        let level = sample_level();
        let grid = level.grid();
        let mut snapshot = level.snapshot().expect("snapshot");
        let (a, direction, b) = grid
            .each_cell()
            .flat_map(|cell| Direction::ALL.into_iter().map(move |direction| (cell, direction)))
            .filter(|(cell, direction)| !cell.is_linked_toward(*direction))
            .find_map(|(cell, direction)| {
                Some((cell.coord(), direction, grid.neighbor(cell.coord(), direction)?))
            })
            .expect("a tree over a 5x7 grid leaves some neighbors unlinked");
        let (a_index, b_index) = (link_index(&snapshot, a), link_index(&snapshot, b));
        snapshot.links[a_index].insert(direction);
        snapshot.links[b_index].insert(direction.opposite());

        assert_rejected(&snapshot, "is not a spanning tree");
    }

    #[test]
    fn snapshot_rejects_dimensions_that_disagree_with_its_record() {
        let mut snapshot = sample_level().snapshot().expect("snapshot");
        snapshot.record.rows += 1;
        assert_rejected(&snapshot, "record describes 6x7");
    }

    #[test]
    fn snapshot_rejects_tiles_that_disagree_with_links() {
        let mut snapshot = sample_level().snapshot().expect("snapshot");
        snapshot.tiles[0].replace_range(0..1, "#");
        assert!(matches!(snapshot.to_grid(), Err(MazeError::InvalidSnapshot(_))));
    }

    #[test]
    fn canonical_bytes_distinguish_placement() {
        let level = sample_level();
        let placed = canonical_bytes(level.grid(), level.placement());
        let bare = canonical_bytes(level.grid(), None);
        assert_ne!(placed, bare);
        assert_eq!(bare.len(), 16 + 5 * 7 * 2 + 1);
        assert_eq!(placed.len(), bare.len() + 32);
    }

    #[test]
    fn canonical_bytes_encode_dimensions_and_coordinates_as_u64() {
        let level = sample_level();
        let placement = level.placement().expect("placed");
        let bytes = canonical_bytes(level.grid(), Some(placement));
        assert_eq!(bytes[..8], 5u64.to_le_bytes());
        assert_eq!(bytes[8..16], 7u64.to_le_bytes());

        let tail = &bytes[bytes.len() - 32..];
        assert_eq!(tail[..8], (placement.spawn.row as u64).to_le_bytes());
        assert_eq!(tail[8..16], (placement.spawn.column as u64).to_le_bytes());
        assert_eq!(tail[16..24], (placement.exit.row as u64).to_le_bytes());
        assert_eq!(tail[24..], (placement.exit.column as u64).to_le_bytes());
    }
}
