//! # Geographic Utilities
//!
//! Distance model used by the stair grouping.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`geodesic_distance`] | Ellipsoidal distance between two GPS points |
//! | [`search_radius`] | Dynamic search radius for a step count |
//! | [`planar_length`] | Length of a polyline in raw coordinate units |
//!
//! ## Example
//!
//! ```rust
//! use stair_cluster::{GpsPoint, geo_utils};
//!
//! let bottom = GpsPoint::new(46.9480, 7.4474);
//! let top = GpsPoint::new(46.9481, 7.4474);
//!
//! let dist = geo_utils::geodesic_distance(&bottom, &top);
//! println!("Bottom to top: {:.1}m", dist);
//!
//! // A 40-step stair looks for neighbours within 10m
//! assert_eq!(geo_utils::search_radius(40, geo_utils::STEP_LENGTH), 10.0);
//! ```
//!
//! ## Algorithm Notes
//!
//! Distances use the geodesic on the WGS84 ellipsoid (Karney's algorithm as
//! implemented by `geo`). It is slower than haversine but the grouping compares
//! against radii of a few metres, where the spherical error is noticeable.

use geo::{Distance, Euclidean, Geodesic, Point};
use crate::GpsPoint;

/// Metres covered by one step. Multiplied by a step count to get the search radius.
pub const STEP_LENGTH: f64 = 0.25;

// =============================================================================
// Distance Functions
// =============================================================================

/// Geodesic distance between two GPS points in metres.
///
/// Symmetric, and zero for identical points.
///
/// # Example
///
/// ```rust
/// use stair_cluster::{GpsPoint, geo_utils};
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
///
/// let distance = geo_utils::geodesic_distance(&london, &paris);
/// assert!((distance - 343_900.0).abs() < 2000.0);
/// ```
#[inline]
pub fn geodesic_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Geodesic::distance(point1, point2)
}

/// Search radius in metres around a stair with `step_count` steps.
///
/// `radius(0) == 0`, so a zero-step vertex only reaches points at its own
/// coordinate.
#[inline]
pub fn search_radius(step_count: u32, step_length: f64) -> f64 {
    step_length * step_count as f64
}

/// Length of a polyline measured in raw coordinate units (degrees).
///
/// This is a planar length on the lon/lat plane, not metres. Empty or
/// single-point input returns 0.0.
pub fn planar_length(points: &[GpsPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| {
            Euclidean::distance(
                Point::new(w[0].longitude, w[0].latitude),
                Point::new(w[1].longitude, w[1].latitude),
            )
        })
        .sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_geodesic_distance_same_point() {
        let p = GpsPoint::new(51.5074, -0.1278);
        assert_eq!(geodesic_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_geodesic_distance_symmetric() {
        let a = GpsPoint::new(46.9480, 7.4474);
        let b = GpsPoint::new(46.9483, 7.4479);
        assert!(approx_eq(geodesic_distance(&a, &b), geodesic_distance(&b, &a), 1e-9));
    }

    #[test]
    fn test_geodesic_distance_known_value() {
        // One thousandth of a degree of latitude at the equator is ~110.6m
        let a = GpsPoint::new(0.0, 0.0);
        let b = GpsPoint::new(0.001, 0.0);
        assert!(approx_eq(geodesic_distance(&a, &b), 110.57, 0.5));
    }

    #[test]
    fn test_search_radius() {
        assert_eq!(search_radius(0, STEP_LENGTH), 0.0);
        assert_eq!(search_radius(40, STEP_LENGTH), 10.0);
        assert_eq!(search_radius(60, STEP_LENGTH), 15.0);
        assert!(search_radius(41, STEP_LENGTH) > search_radius(40, STEP_LENGTH));
    }

    #[test]
    fn test_planar_length_short_input() {
        assert_eq!(planar_length(&[]), 0.0);
        assert_eq!(planar_length(&[GpsPoint::new(1.0, 2.0)]), 0.0);
    }

    #[test]
    fn test_planar_length_in_degrees() {
        let line = vec![
            GpsPoint::new(0.0, 0.0),
            GpsPoint::new(3.0, 0.0),
            GpsPoint::new(3.0, 4.0),
        ];
        assert!(approx_eq(planar_length(&line), 7.0, 1e-12));
    }
}
