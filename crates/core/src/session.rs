//! Level generation sessions: one grid and one seeded random stream per level,
//! carried from carving through classification, validation, and placement.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::algorithms::aldous_broder;
use crate::error::MazeError;
use crate::grid::Grid;
use crate::placement::{Placement, place_spawn_and_exit};
use crate::record::{
    LevelRecord, LevelSnapshot, RECORD_FORMAT_VERSION, canonical_bytes, fingerprint,
};
use crate::seed::{derive_level_seed, level_rng};
use crate::solver::{Distances, distances, validate_spanning_tree};
use crate::types::{Algorithm, Coord};

pub const DEFAULT_ROWS: usize = 15;
pub const DEFAULT_COLUMNS: usize = 20;

new_key_type! {
    pub struct ContentId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    Spawn,
    Exit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Content {
    pub id: ContentId,
    pub kind: ContentKind,
    pub coord: Coord,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationOptions {
    /// Random-walk step cap for Aldous-Broder. When reached the level is
    /// carved with Recursive-Backtracker instead, continuing the same stream.
    pub aldous_broder_step_cap: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelGenerator {
    seed: u64,
    algorithm: Algorithm,
    rows: usize,
    columns: usize,
    options: GenerationOptions,
}

impl LevelGenerator {
    pub fn new(seed: u64, algorithm: Algorithm) -> Self {
        Self {
            seed,
            algorithm,
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            options: GenerationOptions::default(),
        }
    }

    /// Generator for level `level_index` of a multi-level run.
    pub fn for_run(run_seed: u64, level_index: u32, algorithm: Algorithm) -> Self {
        Self::new(derive_level_seed(run_seed, level_index), algorithm)
    }

    pub fn with_dimensions(mut self, rows: usize, columns: usize) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn generate(&self) -> Result<Level, MazeError> {
        let span = tracing::debug_span!(
            "generate_level",
            seed = self.seed,
            algorithm = %self.algorithm,
            rows = self.rows,
            columns = self.columns
        );
        let _entered = span.enter();

        let mut grid = Grid::create(self.rows, self.columns)?;
        let mut rng = level_rng(self.seed);
        let fell_back = carve(&mut grid, &mut rng, self.algorithm, &self.options);
        grid.classify_tiles();
        validate_spanning_tree(&grid)?;
        tracing::debug!(
            floor = grid.floor_count(),
            dead_ends = grid.dead_ends().count(),
            "layout carved and validated"
        );

        let mut level = Level {
            seed: self.seed,
            algorithm: self.algorithm,
            options: self.options,
            fell_back,
            grid,
            rng,
            content: SlotMap::with_key(),
            placement: None,
        };
        level.place_content();
        Ok(level)
    }
}

fn carve(
    grid: &mut Grid,
    rng: &mut ChaCha8Rng,
    algorithm: Algorithm,
    options: &GenerationOptions,
) -> bool {
    let (Algorithm::AldousBroder, Some(cap)) = (algorithm, options.aldous_broder_step_cap) else {
        algorithm.generate(grid, rng);
        return false;
    };
    match aldous_broder::generate_bounded(grid, rng, cap) {
        Ok(steps) => {
            tracing::debug!(steps, cap, "aldous-broder finished within cap");
            false
        }
        Err(exhausted) => {
            tracing::warn!(
                steps = exhausted.steps,
                unvisited = exhausted.unvisited,
                "aldous-broder step cap reached, falling back to recursive-backtracker"
            );
            grid.clear_links();
            Algorithm::RecursiveBacktracker.generate(grid, rng);
            true
        }
    }
}

/// Generates a level with default options.
pub fn generate_level(
    seed: u64,
    algorithm: Algorithm,
    rows: usize,
    columns: usize,
) -> Result<Level, MazeError> {
    LevelGenerator::new(seed, algorithm).with_dimensions(rows, columns).generate()
}

/// A generated level. The grid is frozen once placement has run.
#[derive(Clone, Debug)]
pub struct Level {
    seed: u64,
    algorithm: Algorithm,
    options: GenerationOptions,
    fell_back: bool,
    grid: Grid,
    rng: ChaCha8Rng,
    content: SlotMap<ContentId, Content>,
    placement: Option<Placement>,
}

impl Level {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn options(&self) -> GenerationOptions {
        self.options
    }

    /// True when the Aldous-Broder cap forced a Recursive-Backtracker layout.
    pub fn fell_back(&self) -> bool {
        self.fell_back
    }

    pub fn is_populated(&self) -> bool {
        self.placement.is_some()
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn content(&self) -> impl Iterator<Item = &Content> + '_ {
        self.content.values()
    }

    pub fn content_count(&self) -> usize {
        self.content.len()
    }

    pub fn distances_from(&self, coord: Coord) -> Distances {
        distances(&self.grid, coord)
    }

    /// Places spawn and exit once. Later calls return the recorded placement
    /// without drawing from the random stream or adding content. The grid is
    /// never modified here: a validated layout always reaches its exit.
    pub fn place_content(&mut self) -> Placement {
        if let Some(placement) = self.placement {
            tracing::debug!("level already populated, keeping existing placement");
            return placement;
        }

        let placement = place_spawn_and_exit(&self.grid, &mut self.rng);
        let markers = [(ContentKind::Spawn, placement.spawn), (ContentKind::Exit, placement.exit)];
        for (kind, coord) in markers {
            self.content.insert_with_key(|id| Content { id, kind, coord });
        }
        self.placement = Some(placement);
        tracing::debug!(
            spawn = %placement.spawn,
            exit = %placement.exit,
            exit_distance = placement.exit_distance,
            "content placed"
        );
        placement
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonical_bytes(&self.grid, self.placement)
    }

    /// xxh3 of [`Level::canonical_bytes`].
    pub fn fingerprint(&self) -> u64 {
        fingerprint(&self.grid, self.placement)
    }

    /// Persistable description of this level; `None` before placement.
    pub fn record(&self) -> Option<LevelRecord> {
        let placement = self.placement?;
        Some(LevelRecord {
            format_version: RECORD_FORMAT_VERSION,
            rows: self.grid.rows(),
            columns: self.grid.columns(),
            seed: self.seed,
            algorithm: self.algorithm,
            options: self.options,
            fell_back: self.fell_back,
            spawn: placement.spawn,
            exit: placement.exit,
            exit_distance: placement.exit_distance,
            fingerprint: self.fingerprint(),
        })
    }

    pub fn snapshot(&self) -> Option<LevelSnapshot> {
        self.record().map(|record| LevelSnapshot::capture(&self.grid, record))
    }

    /// ASCII layout with `S` on the spawn and `E` on the exit.
    pub fn render(&self) -> String {
        let placement = self.placement;
        self.grid.render_with(|coord| match placement {
            Some(placement) if coord == placement.spawn => Some('S'),
            Some(placement) if coord == placement.exit => Some('E'),
            _ => None,
        })
    }
}
