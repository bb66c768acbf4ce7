//! Overpass API JSON input.
//!
//! Reads documents produced by an `[out:json]` Overpass query:
//!
//! ```json
//! {"elements": [
//!   {"type": "node", "id": 1, "lat": 46.94, "lon": 7.44, "tags": {"highway": "steps"}},
//!   {"type": "way", "id": 2, "nodes": [1, 3], "tags": {"man_made": "ski_jump"}}
//! ]}
//! ```
//!
//! Way vertex positions come from the way's `geometry` array (`out geom`) when
//! present, otherwise from the nodes in the same document. Relations and other
//! element types are ignored.

use std::collections::HashMap;
use std::io::Read;

use log::info;
use serde::Deserialize;

use crate::error::Result;
use crate::extract::{OsmNode, OsmWay, Tags, WayNode};
use crate::GpsPoint;

#[derive(Debug, Clone, Copy, Deserialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

impl From<LatLon> for GpsPoint {
    fn from(value: LatLon) -> Self {
        GpsPoint::new(value.lat, value.lon)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum OverpassElement {
    Node {
        id: i64,
        lat: Option<f64>,
        lon: Option<f64>,
        #[serde(default)]
        tags: Tags,
    },
    Way {
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
        #[serde(default)]
        geometry: Option<Vec<Option<LatLon>>>,
        #[serde(default)]
        tags: Tags,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

/// Nodes and ways of an Overpass document, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverpassDocument {
    pub nodes: Vec<OsmNode>,
    pub ways: Vec<OsmWay>,
}

impl OverpassDocument {
    /// Parse a document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    /// Parse a document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: RawDocument = serde_json::from_reader(reader)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawDocument) -> Self {
        let mut nodes = Vec::new();
        let mut raw_ways = Vec::new();

        for element in raw.elements {
            match element {
                OverpassElement::Node { id, lat, lon, tags } => {
                    let location = lat.zip(lon).map(|(lat, lon)| GpsPoint::new(lat, lon));
                    nodes.push(OsmNode { id, location, tags });
                }
                OverpassElement::Way { id, nodes: refs, geometry, tags } => {
                    raw_ways.push((id, refs, geometry, tags));
                }
                OverpassElement::Other => {}
            }
        }

        let node_locations: HashMap<i64, GpsPoint> = nodes
            .iter()
            .filter_map(|n| n.location.map(|loc| (n.id, loc)))
            .collect();

        let ways: Vec<OsmWay> = raw_ways
            .into_iter()
            .map(|(id, refs, geometry, tags)| {
                let geometry = geometry.unwrap_or_default();
                let nodes = refs
                    .iter()
                    .enumerate()
                    .map(|(i, &node_ref)| {
                        let location = match geometry.get(i) {
                            Some(vertex) => vertex.map(GpsPoint::from),
                            None => node_locations.get(&node_ref).copied(),
                        };
                        WayNode { node_ref, location }
                    })
                    .collect();
                OsmWay { id, nodes, tags }
            })
            .collect();

        info!(
            "[Overpass] Loaded {} nodes and {} ways",
            nodes.len(),
            ways.len()
        );

        Self { nodes, ways }
    }
}
