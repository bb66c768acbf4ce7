//! End-to-end stair processing.
//!
//! [`process_stairs`] chains the three in-memory stages:
//!
//! ```text
//! stairs -> group_stairs -> remove_duplicates -> categorize_by_step_count
//! ```
//!
//! [`run`] wraps it with file handling: read an Overpass JSON export, extract
//! stairs and ski jumps, process the stairs and write one OSM file per band
//! plus one for the ski jumps.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};
use crate::extract::{ExtractConfig, StairsExtractor};
use crate::osm_writer::{write_ski_jumps_to_file, write_stairs_to_file};
use crate::overpass::OverpassDocument;
use crate::{
    categorize_by_step_count, group_stairs, remove_duplicates, CategorizedStairs, GroupingConfig,
    StairPoint,
};

/// Input extensions [`run`] accepts.
const SUPPORTED_EXTENSIONS: &[&str] = &["json"];

/// Settings for a full [`run`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub grouping: GroupingConfig,
    pub extract: ExtractConfig,
}

/// What a [`run`] read and wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Stair records extracted from the input
    pub stairs_extracted: usize,
    /// Ski jumps passed through to the output
    pub ski_jumps: usize,
    /// Stairs written per band, lowest band first
    pub banded_stairs: Vec<(String, usize)>,
    /// Every file written, band files first
    pub written: Vec<PathBuf>,
}

/// Group, deduplicate and band a stair list.
///
/// # Example
/// ```
/// use stair_cluster::{process_stairs, GroupingConfig, StairPoint};
///
/// // A lone 60-step stair stays under 150 steps and is dropped
/// let stairs = vec![StairPoint::new(50.0, 50.0, 60)];
/// let result = process_stairs(&stairs, &GroupingConfig::default()).unwrap();
/// assert!(result.is_empty());
/// ```
pub fn process_stairs(stairs: &[StairPoint], config: &GroupingConfig) -> Result<CategorizedStairs> {
    let start = Instant::now();

    let grouped = group_stairs(stairs, config)?;
    let unique = remove_duplicates(&grouped);
    let categorized = categorize_by_step_count(&unique);

    info!(
        "[Pipeline] {} stairs -> {} groups -> {} unique groups -> {} banded stairs in {:?}",
        stairs.len(),
        grouped.len(),
        unique.len(),
        categorized.total_stairs(),
        start.elapsed()
    );

    Ok(categorized)
}

/// Reject input files this tool cannot read.
pub fn validate_input_file(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(ClusterError::UnsupportedInput(format!(
            "{} (expected an Overpass export with extension: {})",
            path.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        )))
    }
}

/// Process an Overpass JSON export into OSM files under `output_dir`.
///
/// Files are named `<input stem>_stairs_<band>.osm` for each band, even empty
/// ones, and `<input stem>_ski_jumps.osm`. `output_dir` is created if missing.
pub fn run(input: &Path, output_dir: &Path, config: &PipelineConfig) -> Result<RunSummary> {
    validate_input_file(input)?;
    info!("[Pipeline] Reading {}", input.display());

    let document = OverpassDocument::from_reader(BufReader::new(File::open(input)?))?;
    let extraction =
        StairsExtractor::extract(&document.nodes, &document.ways, config.extract.clone());

    let categorized = process_stairs(&extraction.stairs, &config.grouping)?;

    fs::create_dir_all(output_dir)?;
    let base_name = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());

    let mut written = Vec::new();
    let mut banded_stairs = Vec::new();

    for (band, stairs) in categorized.iter() {
        let path = output_dir.join(format!("{}_stairs_{}.osm", base_name, band.label()));
        write_stairs_to_file(&path, stairs)?;
        info!("[Pipeline] Wrote {} stairs to {}", stairs.len(), path.display());
        banded_stairs.push((band.label().to_string(), stairs.len()));
        written.push(path);
    }

    let ski_jump_path = output_dir.join(format!("{}_ski_jumps.osm", base_name));
    write_ski_jumps_to_file(&ski_jump_path, &extraction.ski_jumps)?;
    info!(
        "[Pipeline] Wrote {} ski jumps to {}",
        extraction.ski_jumps.len(),
        ski_jump_path.display()
    );
    written.push(ski_jump_path);

    Ok(RunSummary {
        stairs_extracted: extraction.stairs.len(),
        ski_jumps: extraction.ski_jumps.len(),
        banded_stairs,
        written,
    })
}
