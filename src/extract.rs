//! Extraction of stairs and ski jumps from OpenStreetMap elements.
//!
//! [`StairsExtractor`] is fed nodes and ways one at a time and keeps two
//! lists:
//! - stair records for the grouping, from `highway=steps` elements with a
//!   `step_count` above [`ExtractConfig::min_step_count`]
//! - ski jumps (`piste:type=ski_jump` or `man_made=ski_jump`), which skip the
//!   grouping and go straight to the writer
//!
//! Every vertex of a stair way becomes a stair record carrying the way's step
//! count. Long stair ways additionally contribute each vertex again with zero
//! steps, which lets them bridge neighbouring flights without seeding searches
//! of their own.

use std::collections::HashMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::geo_utils::planar_length;
use crate::{GpsPoint, StairPoint};

/// Elements processed between progress log lines.
const LOG_INTERVAL: usize = 1000;

/// OSM tag map.
pub type Tags = HashMap<String, String>;

/// Configuration for stair and ski jump extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Elements need strictly more steps than this to count as stairs.
    /// Default: 25
    pub min_step_count: u32,

    /// Planar length, in coordinate degrees, above which a stair way is long.
    /// Default: 50.0
    pub long_stair_min_length: f64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_step_count: 25,
            long_stair_min_length: 50.0,
        }
    }
}

/// An OSM node. `location` is `None` when the source had no usable position.
#[derive(Debug, Clone, PartialEq)]
pub struct OsmNode {
    pub id: i64,
    pub location: Option<GpsPoint>,
    pub tags: Tags,
}

/// A node reference inside a way, with its resolved location if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WayNode {
    pub node_ref: i64,
    pub location: Option<GpsPoint>,
}

impl WayNode {
    fn valid_location(&self) -> Option<GpsPoint> {
        self.location.filter(GpsPoint::is_valid)
    }
}

/// An OSM way.
#[derive(Debug, Clone, PartialEq)]
pub struct OsmWay {
    pub id: i64,
    pub nodes: Vec<WayNode>,
    pub tags: Tags,
}

impl OsmWay {
    fn valid_locations(&self) -> Vec<GpsPoint> {
        self.nodes.iter().filter_map(WayNode::valid_location).collect()
    }
}

/// Ski jump geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum SkiJump {
    /// A ski jump mapped as a single node
    Point(GpsPoint),
    /// A ski jump mapped as a way, at least two vertices
    Line(Vec<GpsPoint>),
}

/// Output of a full extraction pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub stairs: Vec<StairPoint>,
    pub ski_jumps: Vec<SkiJump>,
}

/// Collects stairs and ski jumps from a stream of OSM elements.
#[derive(Debug, Default)]
pub struct StairsExtractor {
    config: ExtractConfig,
    extraction: Extraction,
    node_count: usize,
    way_count: usize,
}

impl StairsExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Process one node.
    pub fn node(&mut self, node: &OsmNode) {
        self.node_count += 1;
        if self.node_count % LOG_INTERVAL == 0 {
            info!("[Extract] Processing node {}", self.node_count);
        }

        if let Some(step_count) = self.stair_step_count(&node.tags) {
            match node.location.filter(GpsPoint::is_valid) {
                Some(location) => self.add_stair(location, step_count),
                None => warn!("[Extract] Invalid location for stair node {}", node.id),
            }
            return;
        }

        if is_ski_jump(&node.tags) {
            match node.location.filter(GpsPoint::is_valid) {
                Some(location) => {
                    debug!("[Extract] Added ski jump node {}", node.id);
                    self.extraction.ski_jumps.push(SkiJump::Point(location));
                }
                None => warn!("[Extract] Invalid location for ski jump node {}", node.id),
            }
        }
    }

    /// Process one way.
    pub fn way(&mut self, way: &OsmWay) {
        self.way_count += 1;
        if self.way_count % LOG_INTERVAL == 0 {
            info!("[Extract] Processing way {}", self.way_count);
        }

        if let Some(step_count) = self.stair_step_count(&way.tags) {
            self.process_stair_way(way, step_count);
            return;
        }

        if is_ski_jump(&way.tags) {
            self.process_ski_jump_way(way);
        }
    }

    /// Finish and hand over everything collected.
    pub fn finish(self) -> Extraction {
        info!(
            "[Extract] {} nodes and {} ways -> {} stairs, {} ski jumps",
            self.node_count,
            self.way_count,
            self.extraction.stairs.len(),
            self.extraction.ski_jumps.len()
        );
        self.extraction
    }

    /// Run a whole node and way list through a fresh extractor.
    pub fn extract(nodes: &[OsmNode], ways: &[OsmWay], config: ExtractConfig) -> Extraction {
        let mut extractor = Self::new(config);
        for node in nodes {
            extractor.node(node);
        }
        for way in ways {
            extractor.way(way);
        }
        extractor.finish()
    }

    fn add_stair(&mut self, location: GpsPoint, step_count: u32) {
        debug!(
            "[Extract] Added stair ({}, {}), step_count: {}",
            location.latitude, location.longitude, step_count
        );
        self.extraction.stairs.push(StairPoint { location, step_count });
    }

    fn process_stair_way(&mut self, way: &OsmWay, step_count: u32) {
        let mut has_valid_node = false;

        for node in &way.nodes {
            match node.valid_location() {
                Some(location) => {
                    has_valid_node = true;
                    self.add_stair(location, step_count);
                }
                None => warn!(
                    "[Extract] Invalid location for node {} in way {}",
                    node.node_ref, way.id
                ),
            }
        }

        if !has_valid_node {
            warn!("[Extract] No valid nodes found in way {}", way.id);
            return;
        }

        let vertices = way.valid_locations();
        if self.is_long_stair(&vertices) {
            debug!("[Extract] Added long stair way {} ({} vertices)", way.id, vertices.len());
            for location in vertices {
                self.extraction.stairs.push(StairPoint { location, step_count: 0 });
            }
        }
    }

    fn process_ski_jump_way(&mut self, way: &OsmWay) {
        let vertices = way.valid_locations();
        if vertices.len() < 2 {
            warn!("[Extract] No valid nodes for ski jump in way {}", way.id);
            return;
        }
        debug!("[Extract] Added ski jump way {} ({} vertices)", way.id, vertices.len());
        self.extraction.ski_jumps.push(SkiJump::Line(vertices));
    }

    fn stair_step_count(&self, tags: &Tags) -> Option<u32> {
        if tags.get("highway").map(String::as_str) != Some("steps") {
            return None;
        }
        let step_count = tags.get("step_count")?.trim().parse::<u32>().ok()?;
        (step_count > self.config.min_step_count).then_some(step_count)
    }

    fn is_long_stair(&self, vertices: &[GpsPoint]) -> bool {
        vertices.len() >= 2 && planar_length(vertices) > self.config.long_stair_min_length
    }
}

fn is_ski_jump(tags: &Tags) -> bool {
    tags.get("piste:type").map(String::as_str) == Some("ski_jump")
        || tags.get("man_made").map(String::as_str) == Some("ski_jump")
}
