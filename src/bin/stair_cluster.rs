//! Command-line driver: Overpass JSON export in, banded OSM files out.
//!
//! Run with: cargo run --release -- bern.json --output-dir .output

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::error;

use stair_cluster::{run, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "stair-cluster", version)]
#[command(about = "Group OpenStreetMap stairs by proximity and sort the groups by total step count")]
struct Args {
    /// Overpass API JSON export (`[out:json]`)
    input: PathBuf,

    /// Directory for the generated .osm files
    #[arg(short, long, default_value = ".output")]
    output_dir: PathBuf,

    /// Worker threads for grouping (0 = one per core)
    #[arg(short, long, default_value_t = 0)]
    threads: u32,

    /// Stairs need more steps than this to seed a group
    #[arg(long)]
    min_seed_steps: Option<u32>,

    /// Metres per step for the search radius
    #[arg(long)]
    step_length: Option<f64>,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.grouping.max_threads = self.threads;
        if let Some(min_seed_steps) = self.min_seed_steps {
            config.grouping.min_seed_steps = min_seed_steps;
        }
        if let Some(step_length) = self.step_length {
            config.grouping.step_length = step_length;
        }
        config
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &Args) -> anyhow::Result<()> {
    let config = args.pipeline_config();
    let summary = run(&args.input, &args.output_dir, &config)
        .with_context(|| format!("processing {}", args.input.display()))?;

    println!("Extracted {} stairs, {} ski jumps", summary.stairs_extracted, summary.ski_jumps);
    for (band, count) in &summary.banded_stairs {
        println!("  {:>8}: {} stairs", band, count);
    }
    println!("Wrote {} files to {}", summary.written.len(), args.output_dir.display());

    Ok(())
}
