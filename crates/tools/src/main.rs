use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use mazegen_core::{Algorithm, Level, LevelGenerator, LevelRecord, derive_level_seed};
use mazegen_tools::config::ToolConfig;
use mazegen_tools::record_file::JsonFile;
use mazegen_tools::seed::{generate_runtime_seed, resolve_seed};
use mazegen_tools::{format_fingerprint, format_seed, logging};

#[derive(Parser)]
#[command(author, version, about = "Generate and verify seeded maze levels", long_about = None)]
struct Args {
    /// Grid height in cells
    #[arg(long)]
    rows: Option<usize>,
    /// Grid width in cells
    #[arg(long)]
    columns: Option<usize>,
    /// Level seed, or the run seed when --level is given
    #[arg(short, long)]
    seed: Option<u64>,
    /// binary-tree, aldous-broder, recursive-backtracker or recursive-division
    #[arg(short, long)]
    algorithm: Option<Algorithm>,
    /// Level index within the run seeded by --seed
    #[arg(long)]
    level: Option<u32>,
    /// TOML file with default settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the level record as JSON instead of the ASCII layout
    #[arg(long)]
    json: bool,
    /// Write the level record to this path
    #[arg(long)]
    record_out: Option<PathBuf>,
    /// Write a full layout snapshot to this path
    #[arg(long)]
    snapshot_out: Option<PathBuf>,
    /// Regenerate the level in this record file and verify its fingerprint
    #[arg(long, conflicts_with_all = ["seed", "algorithm", "level", "rows", "columns"])]
    replay: Option<PathBuf>,
    /// Aldous-Broder walk step cap before falling back to recursive-backtracker
    #[arg(long)]
    step_cap: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ToolConfig::load(path)?,
        None => ToolConfig::default(),
    };
    logging::init_tracing(config.log_filter_or_default());

    let level = match args.replay.as_deref() {
        Some(path) => replay(path)?,
        None => generate(&args, &config)?,
    };

    if let Some(path) = &args.record_out {
        let record = level.record().context("level has no placement to record")?;
        record
            .write_atomic(path)
            .with_context(|| format!("failed to write record {}", path.display()))?;
        tracing::info!(path = %path.display(), "record written");
    }
    if let Some(path) = &args.snapshot_out {
        let snapshot = level.snapshot().context("level has no placement to snapshot")?;
        snapshot
            .write_atomic(path)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        tracing::info!(path = %path.display(), "snapshot written");
    }

    if args.json {
        let record = level.record().context("level has no placement to record")?;
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_level(&level);
    }
    Ok(())
}

fn generate(args: &Args, config: &ToolConfig) -> Result<Level> {
    let seed = resolve_seed(args.seed, config.seed, generate_runtime_seed());
    let algorithm = args.algorithm.unwrap_or_else(|| config.algorithm_or_default());
    let rows = args.rows.unwrap_or_else(|| config.rows_or_default());
    let columns = args.columns.unwrap_or_else(|| config.columns_or_default());

    let mut options = config.generation;
    if args.step_cap.is_some() {
        options.aldous_broder_step_cap = args.step_cap;
    }

    let level_seed = match args.level {
        Some(index) => derive_level_seed(seed.value(), index),
        None => seed.value(),
    };
    tracing::info!(
        seed = seed.value(),
        source = seed.source(),
        level = args.level,
        level_seed,
        %algorithm,
        rows,
        columns,
        "generating level"
    );

    LevelGenerator::new(level_seed, algorithm)
        .with_dimensions(rows, columns)
        .with_options(options)
        .generate()
        .with_context(|| format!("failed to generate {algorithm} level for seed {level_seed}"))
}

fn replay(path: &Path) -> Result<Level> {
    let record = LevelRecord::load(path)
        .with_context(|| format!("failed to read record {}", path.display()))?;
    let level = record
        .regenerate()
        .with_context(|| format!("record {} did not reproduce", path.display()))?;
    if level.placement().map(|placement| (placement.spawn, placement.exit))
        != Some((record.spawn, record.exit))
    {
        bail!("record {} placed spawn/exit differently on regeneration", path.display());
    }
    tracing::info!(
        fingerprint = %format_fingerprint(record.fingerprint),
        "record verified"
    );
    Ok(level)
}

fn print_level(level: &Level) {
    let (rows, columns) = level.dimensions();
    print!("{}", level.render());
    println!("Seed: {}", format_seed(level.seed()));
    println!("Algorithm: {}", level.algorithm());
    println!("Size: {rows}x{columns}");
    if level.fell_back() {
        println!("Carved with: {} (step cap reached)", Algorithm::RecursiveBacktracker);
    }
    if let Some(placement) = level.placement() {
        println!("Spawn: {}", placement.spawn);
        println!("Exit: {}", placement.exit);
        match placement.exit_distance {
            Some(distance) => println!("Exit distance: {distance}"),
            None => println!("Exit distance: unreachable"),
        }
    }
    println!("Dead ends: {}", level.grid().dead_ends().count());
    println!("Fingerprint: {}", format_fingerprint(level.fingerprint()));
}
