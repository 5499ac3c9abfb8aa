#![warn(non_snake_case)]
//! # dungeon-carve
//!
//! Command-line front end of the recursive dungeon carver. Prints one or more
//! dungeons as tile grids, Graphviz graphs or one-line summaries. Batches are
//! carved in parallel, one carver per dungeon, with consecutive seeds.
//!
//! ## License
//! Licensed under the MIT License.

use clap::{Parser, ValueEnum};
use dungeon_carve::{Carver, CarverConfig, ConfigError, Dungeon, GenerateError, TransformError};
use log::{error, info};
use rayon::prelude::*;
use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// `#` walls, `.` rooms, `-` and `|` halls.
    Tiles,
    /// Graphviz description of the adjacency graph.
    Dot,
    /// Counts and connectivity only.
    Summary,
}

#[derive(Debug, Parser)]
#[command(name = "dungeon-carve", version, about = "Carves connected room-and-corridor dungeons")]
struct Args {
    /// Grid width in cells.
    #[arg(long, default_value_t = 80)]
    width: i32,

    /// Grid height in cells.
    #[arg(long, default_value_t = 40)]
    height: i32,

    /// Seed of the first dungeon; drawn at random when omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of dungeons to carve.
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u64,

    /// JSON file with carver settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    room_width_min: Option<i32>,

    #[arg(long)]
    room_height_min: Option<i32>,

    #[arg(long)]
    room_ratio_min: Option<f64>,

    #[arg(long)]
    depth_max: Option<u32>,

    #[arg(short, long, value_enum, default_value_t = Format::Tiles)]
    format: Format,

    /// Spread the layout out by this factor before printing.
    #[arg(long, default_value_t = 1)]
    scale: i32,
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl Args {
    /// Settings from `--config`, overridden field by field by the flags.
    fn carver_config(&self) -> Result<CarverConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => CarverConfig::from_json_file(path)?,
            None => CarverConfig::default(),
        };
        if let Some(value) = self.room_width_min {
            config.room_width_min = value;
        }
        if let Some(value) = self.room_height_min {
            config.room_height_min = value;
        }
        if let Some(value) = self.room_ratio_min {
            config.room_ratio_min = value;
        }
        if let Some(value) = self.depth_max {
            config.depth_max = value;
        }
        config.validate()?;
        Ok(config)
    }
}

fn carve_one(args: &Args, config: &CarverConfig, seed: u64) -> Result<String, RunError> {
    let mut carver = Carver::with_seed(config.clone(), seed)?;
    let mut dungeon = carver.generate(args.width, args.height)?;
    dungeon.scale(args.scale)?;
    Ok(render(&dungeon, args.format, seed))
}

fn render(dungeon: &Dungeon, format: Format, seed: u64) -> String {
    match format {
        Format::Tiles => dungeon.to_string(),
        Format::Dot => dungeon.to_dot(),
        Format::Summary => {
            let stats = dungeon.stats();
            format!(
                "seed {}: {}x{}, {} rooms, {} junctions, {} halls, {} cells covered, {}\n",
                seed,
                dungeon.num_cols(),
                dungeon.num_rows(),
                stats.rooms,
                stats.junctions,
                stats.halls,
                stats.covered_cells,
                if dungeon.is_connected() {
                    "connected"
                } else {
                    "DISCONNECTED"
                }
            )
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging.
    env_logger::init();
    let args = Args::parse();

    let config = args.carver_config()?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        "Carving {} dungeon(s) of {}x{} from seed {} with {:?}",
        args.count, args.width, args.height, seed, config
    );

    let results: Vec<(u64, Result<String, RunError>)> = (0..args.count)
        .into_par_iter()
        .map(|i| {
            let seed = seed.wrapping_add(i);
            (seed, carve_one(&args, &config, seed))
        })
        .collect();

    let mut failures = 0;
    for (seed, result) in results {
        match result {
            Ok(text) => {
                if args.count > 1 && args.format == Format::Tiles {
                    println!("; seed {}", seed);
                }
                print!("{}", text);
            }
            Err(e) => {
                error!("Seed {} failed: {}", seed, e);
                failures += 1;
            }
        }
    }

    info!("Done: {} carved, {} failed.", args.count - failures, failures);
    if failures > 0 {
        return Err(format!("{} of {} dungeons failed", failures, args.count).into());
    }
    Ok(())
}
