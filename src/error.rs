//! Error types for stair clustering.

use thiserror::Error;

use crate::GpsPoint;

/// Primary error type for the grouping pipeline.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error(
        "non-finite distance between ({}, {}) and ({}, {})",
        .from.latitude, .from.longitude, .to.latitude, .to.longitude
    )]
    InvalidDistance { from: GpsPoint, to: GpsPoint },

    #[error("failed to build grouping thread pool: {0}")]
    ThreadPool(String),

    #[error("unsupported input file: {0}")]
    UnsupportedInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid Overpass JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using ClusterError.
pub type Result<T> = std::result::Result<T, ClusterError>;
