pub mod algorithms;
pub mod error;
pub mod grid;
pub mod placement;
pub mod record;
pub mod seed;
pub mod session;
pub mod solver;
pub mod types;

pub use error::MazeError;
pub use grid::{Cell, Grid};
pub use placement::{PathRepair, Placement, guarantee_path, place_spawn_and_exit};
pub use record::{LevelRecord, LevelSnapshot, RECORD_FORMAT_VERSION};
pub use seed::{derive_level_seed, level_rng};
pub use session::{
    Content, ContentId, ContentKind, GenerationOptions, Level, LevelGenerator, generate_level,
};
pub use solver::{Distances, distances, farthest_cell, validate_spanning_tree};
pub use types::*;
