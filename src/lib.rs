//! # Stair Cluster
//!
//! Proximity clustering of OpenStreetMap stairs into step-count bands.
//!
//! This library provides:
//! - Connected-component grouping of stairs with a step-count dependent radius
//! - First-seen-wins deduplication of overlapping groups
//! - Bucketing of groups by their total step count
//! - Extraction from Overpass JSON and OSM XML output for the command-line tool
//!
//! ## Features
//!
//! - **`parallel`** - Run the per-seed searches on a rayon thread pool (default)
//! - **`cli`** - Build the `stair-cluster` binary (default)
//!
//! ## Quick Start
//!
//! ```rust
//! use stair_cluster::{process_stairs, GroupingConfig, StairPoint, StepBand};
//!
//! // Five 40-step stairs a metre apart: one group of 200 steps
//! let stairs: Vec<StairPoint> = (0..5)
//!     .map(|i| StairPoint::new(46.9480 + i as f64 * 0.00001, 7.4474, 40))
//!     .collect();
//!
//! let result = process_stairs(&stairs, &GroupingConfig::default()).unwrap();
//! assert_eq!(result.get(StepBand::From200To250).len(), 5);
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{ClusterError, Result};

pub mod geo_utils;

// Stair grouping stages
pub mod grouping;
pub use grouping::{find_connected_stairs, group_stairs};

pub mod dedup;
pub use dedup::remove_duplicates;

pub mod categorize;
pub use categorize::{categorize_by_step_count, CategorizedStairs, StepBand};

// OSM input and output
pub mod extract;
pub use extract::{ExtractConfig, Extraction, OsmNode, OsmWay, SkiJump, StairsExtractor, WayNode};

pub mod overpass;
pub use overpass::OverpassDocument;

pub mod osm_writer;

pub mod pipeline;
pub use pipeline::{process_stairs, run, validate_input_file, PipelineConfig, RunSummary};

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use stair_cluster::GpsPoint;
/// let point = GpsPoint::new(46.9480, 7.4474); // Bern
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Check that both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Hashable identity of this coordinate pair.
    pub(crate) fn coord_key(&self) -> CoordKey {
        CoordKey::new(self.longitude, self.latitude)
    }
}

/// Bitwise (longitude, latitude) key used for visited and seen sets.
///
/// `-0.0` is folded into `0.0` so both spell the same coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CoordKey(u64, u64);

impl CoordKey {
    fn new(longitude: f64, latitude: f64) -> Self {
        Self(canonical_bits(longitude), canonical_bits(latitude))
    }
}

#[inline]
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// A stair record: a location and the number of steps tagged on it.
///
/// Two stair points are the same stair for grouping purposes when their
/// coordinates match, whatever their step counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StairPoint {
    pub location: GpsPoint,
    pub step_count: u32,
}

impl StairPoint {
    /// Create a stair point from latitude, longitude and step count.
    pub fn new(latitude: f64, longitude: f64, step_count: u32) -> Self {
        Self {
            location: GpsPoint::new(latitude, longitude),
            step_count,
        }
    }

    pub(crate) fn coord_key(&self) -> CoordKey {
        self.location.coord_key()
    }
}

/// One connected cluster of stairs, in discovery order.
pub type StairGroup = Vec<StairPoint>;

/// Configuration for the proximity grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Metres per step used for the dynamic search radius.
    /// Default: 0.25
    pub step_length: f64,

    /// Stairs with strictly more steps than this start their own search.
    /// Default: 25
    pub min_seed_steps: u32,

    /// Worker threads for the grouping pool. 0 lets rayon pick.
    /// Default: 0
    pub max_threads: u32,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            step_length: geo_utils::STEP_LENGTH,
            min_seed_steps: 25,
            max_threads: 0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gps_point_validation() {
        assert!(GpsPoint::new(46.9480, 7.4474).is_valid());
        assert!(!GpsPoint::new(91.0, 0.0).is_valid());
        assert!(!GpsPoint::new(0.0, 181.0).is_valid());
        assert!(!GpsPoint::new(f64::NAN, 0.0).is_valid());
        assert!(!GpsPoint::new(0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_coord_key_ignores_step_count() {
        let a = StairPoint::new(46.9480, 7.4474, 40);
        let b = StairPoint::new(46.9480, 7.4474, 0);
        assert_eq!(a.coord_key(), b.coord_key());
    }

    #[test]
    fn test_coord_key_folds_negative_zero() {
        let a = StairPoint::new(0.0, -0.0, 30);
        let b = StairPoint::new(-0.0, 0.0, 30);
        assert_eq!(a.coord_key(), b.coord_key());
    }

    #[test]
    fn test_coord_key_distinguishes_axes() {
        let a = StairPoint::new(1.0, 2.0, 30);
        let b = StairPoint::new(2.0, 1.0, 30);
        assert_ne!(a.coord_key(), b.coord_key());
    }

    #[test]
    fn test_grouping_config_defaults() {
        let config = GroupingConfig::default();
        assert_eq!(config.step_length, 0.25);
        assert_eq!(config.min_seed_steps, 25);
        assert_eq!(config.max_threads, 0);
    }

    #[test]
    fn test_grouping_config_partial_json() {
        let config: GroupingConfig = serde_json::from_str(r#"{"max_threads": 4}"#).unwrap();
        assert_eq!(config.max_threads, 4);
        assert_eq!(config.min_seed_steps, 25);
    }
}
