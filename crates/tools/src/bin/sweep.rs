use anyhow::{Context, Result, bail};
use clap::Parser;
use mazegen_core::{Algorithm, GenerationOptions, LevelGenerator, validate_spanning_tree};
use mazegen_tools::logging::{self, DEFAULT_FILTER};

/// Generates many levels per algorithm and checks every one is a spanning tree
/// with a reachable exit.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    levels: u32,
    #[arg(long, default_value_t = 15)]
    rows: usize,
    #[arg(long, default_value_t = 20)]
    columns: usize,
    /// Sweep a single algorithm instead of all four
    #[arg(short, long)]
    algorithm: Option<Algorithm>,
    #[arg(long)]
    step_cap: Option<u64>,
}

#[derive(Default)]
struct Tally {
    levels: u64,
    fallbacks: u64,
    dead_ends: u64,
    exit_distance: u64,
    longest_exit: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing(DEFAULT_FILTER);

    let algorithms = match args.algorithm {
        Some(algorithm) => vec![algorithm],
        None => Algorithm::ALL.to_vec(),
    };
    let options = GenerationOptions { aldous_broder_step_cap: args.step_cap };

    println!(
        "Sweeping {} levels per algorithm at {}x{} from run seed {}...",
        args.levels, args.rows, args.columns, args.seed
    );
    for algorithm in algorithms {
        let mut tally = Tally::default();
        for index in 0..args.levels {
            let generator = LevelGenerator::for_run(args.seed, index, algorithm)
                .with_dimensions(args.rows, args.columns)
                .with_options(options);
            let level_seed = generator.seed();
            let level = generator.generate().with_context(|| {
                format!("{algorithm} failed on level {index} (seed {level_seed})")
            })?;
            validate_spanning_tree(level.grid())
                .with_context(|| format!("{algorithm} level {index} is not a spanning tree"))?;

            let Some(distance) = level.placement().and_then(|placement| placement.exit_distance)
            else {
                bail!("{algorithm} level {index} (seed {level_seed}) has an unreachable exit");
            };
            tally.levels += 1;
            tally.fallbacks += u64::from(level.fell_back());
            tally.dead_ends += level.grid().dead_ends().count() as u64;
            tally.exit_distance += u64::from(distance);
            tally.longest_exit = tally.longest_exit.max(distance);
        }

        let levels = tally.levels.max(1);
        println!(
            "{:<22} levels={:<5} fallbacks={:<4} avg_dead_ends={:<6.1} avg_exit={:<6.1} max_exit={}",
            algorithm.name(),
            tally.levels,
            tally.fallbacks,
            tally.dead_ends as f64 / levels as f64,
            tally.exit_distance as f64 / levels as f64,
            tally.longest_exit
        );
    }

    println!("Sweep completed successfully.");
    Ok(())
}
