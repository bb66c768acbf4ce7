//! Proximity grouping of stairs.
//!
//! Every stair with more than [`GroupingConfig::min_seed_steps`] steps seeds an
//! independent depth-first search over the full stair list. From each visited
//! stair the search reaches every unvisited stair within
//! `step_count * step_length` metres, so the radius belongs to the stair being
//! expanded, not to the seed. Reachability is therefore not symmetric: a long
//! flight can pull in a short one that would not reach back.
//!
//! Searches do not share visited state and may overlap. Overlaps are resolved
//! afterwards by [`crate::dedup::remove_duplicates`].
//!
//! With the `parallel` feature the searches run on a bounded rayon pool, all
//! borrowing the same immutable slice. Groups come back in seed order either
//! way.

use std::collections::HashSet;
use std::time::Instant;

use log::{debug, info};

use crate::error::{ClusterError, Result};
use crate::geo_utils::{geodesic_distance, search_radius};
use crate::{CoordKey, GroupingConfig, StairGroup, StairPoint};

/// Seeds completed between progress log lines.
const LOG_INTERVAL: usize = 1000;

/// Stairs eligible to start a search, in input order.
pub fn select_seeds<'a>(stairs: &'a [StairPoint], config: &GroupingConfig) -> Vec<&'a StairPoint> {
    stairs
        .iter()
        .filter(|s| s.step_count > config.min_seed_steps)
        .collect()
}

/// Collect every stair reachable from `seed`.
///
/// The result starts with the seed and lists stairs in visiting order. A seed
/// with nothing in range yields a single-element group.
///
/// Fails with [`ClusterError::InvalidDistance`] when a distance cannot be
/// computed, e.g. for a stair with non-finite coordinates.
///
/// # Example
/// ```
/// use stair_cluster::{find_connected_stairs, geo_utils::STEP_LENGTH, StairPoint};
///
/// let stairs = vec![
///     StairPoint::new(0.0, 0.0, 40),
///     StairPoint::new(0.00008, 0.0, 40), // ~9m north
///     StairPoint::new(0.00016, 0.0, 40), // ~18m north
/// ];
///
/// let group = find_connected_stairs(&stairs, &stairs[0], STEP_LENGTH).unwrap();
/// assert_eq!(group, stairs);
/// ```
pub fn find_connected_stairs(
    stairs: &[StairPoint],
    seed: &StairPoint,
    step_length: f64,
) -> Result<StairGroup> {
    let mut visited: HashSet<CoordKey> = HashSet::new();
    let mut to_visit: Vec<&StairPoint> = vec![seed];
    let mut connected: StairGroup = Vec::new();

    while let Some(current) = to_visit.pop() {
        if !visited.insert(current.coord_key()) {
            continue;
        }
        connected.push(*current);

        debug!(
            "[Grouping] Visiting ({}, {}) with {} steps",
            current.location.latitude, current.location.longitude, current.step_count
        );

        let radius = search_radius(current.step_count, step_length);

        for candidate in stairs {
            if visited.contains(&candidate.coord_key()) {
                continue;
            }
            if checked_distance(current, candidate)? <= radius {
                to_visit.push(candidate);
            }
        }
    }

    Ok(connected)
}

fn checked_distance(from: &StairPoint, to: &StairPoint) -> Result<f64> {
    let invalid = || ClusterError::InvalidDistance {
        from: from.location,
        to: to.location,
    };

    if !from.location.is_finite() || !to.location.is_finite() {
        return Err(invalid());
    }

    let distance = geodesic_distance(&from.location, &to.location);
    if distance.is_finite() {
        Ok(distance)
    } else {
        Err(invalid())
    }
}

/// Group stairs by proximity, one group per seed.
///
/// Returns one group per seed in seed order. The first failing search aborts
/// the whole batch and its error is returned.
///
/// # Example
/// ```
/// use stair_cluster::{group_stairs, GroupingConfig, StairPoint};
///
/// let stairs = vec![
///     StairPoint::new(50.0, 50.0, 60),
///     StairPoint::new(10.0, 10.0, 20), // too short to seed
/// ];
///
/// let groups = group_stairs(&stairs, &GroupingConfig::default()).unwrap();
/// assert_eq!(groups, vec![vec![stairs[0]]]);
/// ```
pub fn group_stairs(stairs: &[StairPoint], config: &GroupingConfig) -> Result<Vec<StairGroup>> {
    let seeds = select_seeds(stairs, config);
    info!(
        "[Grouping] Searching from {} seeds over {} stairs",
        seeds.len(),
        stairs.len()
    );

    if seeds.is_empty() {
        return Ok(vec![]);
    }

    let start = Instant::now();

    #[cfg(feature = "parallel")]
    let groups = group_seeds_parallel(stairs, &seeds, config)?;

    #[cfg(not(feature = "parallel"))]
    let groups = group_seeds_sequential(stairs, &seeds, config)?;

    info!(
        "[Grouping] Built {} groups in {:?}",
        groups.len(),
        start.elapsed()
    );

    Ok(groups)
}

#[cfg(feature = "parallel")]
fn group_seeds_parallel(
    stairs: &[StairPoint],
    seeds: &[&StairPoint],
    config: &GroupingConfig,
) -> Result<Vec<StairGroup>> {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.max_threads as usize)
        .thread_name(|i| format!("stair-grouping-{}", i))
        .build()
        .map_err(|e| ClusterError::ThreadPool(e.to_string()))?;

    info!(
        "[Grouping] Using PARALLEL processing ({} threads)",
        pool.current_num_threads()
    );

    let completed = AtomicUsize::new(0);

    pool.install(|| {
        seeds
            .par_iter()
            .map(|seed| -> Result<StairGroup> {
                let group = find_connected_stairs(stairs, seed, config.step_length)?;
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                log_progress(done, seeds.len());
                Ok(group)
            })
            .collect()
    })
}

#[cfg(not(feature = "parallel"))]
fn group_seeds_sequential(
    stairs: &[StairPoint],
    seeds: &[&StairPoint],
    config: &GroupingConfig,
) -> Result<Vec<StairGroup>> {
    info!("[Grouping] Using sequential processing");

    seeds
        .iter()
        .enumerate()
        .map(|(i, seed)| -> Result<StairGroup> {
            let group = find_connected_stairs(stairs, seed, config.step_length)?;
            log_progress(i + 1, seeds.len());
            Ok(group)
        })
        .collect()
}

fn log_progress(done: usize, total: usize) {
    if done % LOG_INTERVAL == 0 {
        info!("[Grouping] Finished {}/{} seeds", done, total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ~8.85m of latitude at the equator
    const STEP_9M: f64 = 0.00008;

    fn chain() -> Vec<StairPoint> {
        vec![
            StairPoint::new(0.0, 0.0, 40),
            StairPoint::new(STEP_9M, 0.0, 40),
            StairPoint::new(2.0 * STEP_9M, 0.0, 40),
        ]
    }

    #[test]
    fn test_select_seeds_threshold() {
        let stairs = vec![
            StairPoint::new(0.0, 0.0, 25),
            StairPoint::new(1.0, 0.0, 26),
            StairPoint::new(2.0, 0.0, 0),
        ];
        let seeds = select_seeds(&stairs, &GroupingConfig::default());
        assert_eq!(seeds, vec![&stairs[1]]);
    }

    #[test]
    fn test_chain_is_transitive() {
        let stairs = chain();
        // A does not reach C directly
        assert!(geodesic_distance(&stairs[0].location, &stairs[2].location) > 10.0);

        let group = find_connected_stairs(&stairs, &stairs[0], 0.25).unwrap();
        assert_eq!(group, stairs);
    }

    #[test]
    fn test_search_is_depth_first() {
        let stairs = chain();
        // From the middle both ends are pushed; the last pushed is visited first
        let group = find_connected_stairs(&stairs, &stairs[1], 0.25).unwrap();
        assert_eq!(group, vec![stairs[1], stairs[2], stairs[0]]);
    }

    #[test]
    fn test_isolated_seed_is_singleton() {
        let stairs = vec![
            StairPoint::new(50.0, 50.0, 60),
            StairPoint::new(50.001, 50.0, 60), // ~111m away
        ];
        let group = find_connected_stairs(&stairs, &stairs[0], 0.25).unwrap();
        assert_eq!(group, vec![stairs[0]]);
    }

    #[test]
    fn test_radius_comes_from_expanded_stair() {
        // ~15m apart: 80 steps reach 20m, 30 steps only 7.5m
        let long_flight = StairPoint::new(0.0, 0.0, 80);
        let short_flight = StairPoint::new(0.000135, 0.0, 30);
        let stairs = vec![long_flight, short_flight];

        let from_long = find_connected_stairs(&stairs, &long_flight, 0.25).unwrap();
        let from_short = find_connected_stairs(&stairs, &short_flight, 0.25).unwrap();

        assert_eq!(from_long, vec![long_flight, short_flight]);
        assert_eq!(from_short, vec![short_flight]);
    }

    #[test]
    fn test_duplicate_coordinates_visited_once() {
        let stairs = vec![
            StairPoint::new(0.0, 0.0, 40),
            StairPoint::new(0.0, 0.0, 0),
            StairPoint::new(STEP_9M, 0.0, 0),
        ];
        let group = find_connected_stairs(&stairs, &stairs[0], 0.25).unwrap();
        assert_eq!(group, vec![stairs[0], stairs[2]]);
    }

    #[test]
    fn test_group_stairs_one_group_per_seed() {
        let mut stairs = chain();
        stairs.push(StairPoint::new(0.0, 0.00005, 10)); // ~5.6m east of A, not a seed

        let groups = group_stairs(&stairs, &GroupingConfig::default()).unwrap();
        assert_eq!(groups.len(), 3);
        for (group, seed) in groups.iter().zip(&stairs) {
            assert_eq!(group[0], *seed);
            assert_eq!(group.len(), 4);
        }
    }

    #[test]
    fn test_overlapping_seeds_share_midpoint() {
        let left = StairPoint::new(0.0, 0.0, 40);
        let middle = StairPoint::new(STEP_9M, 0.0, 0);
        let right = StairPoint::new(2.0 * STEP_9M, 0.0, 40);
        let stairs = vec![left, middle, right];

        let groups = group_stairs(&stairs, &GroupingConfig::default()).unwrap();
        assert_eq!(groups, vec![vec![left, middle], vec![right, middle]]);
    }

    #[test]
    fn test_group_stairs_empty_input() {
        let groups = group_stairs(&[], &GroupingConfig::default()).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_group_stairs_no_seeds() {
        let stairs = vec![StairPoint::new(0.0, 0.0, 10), StairPoint::new(0.0, 0.00001, 25)];
        let groups = group_stairs(&stairs, &GroupingConfig::default()).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_non_finite_coordinate_fails_batch() {
        let stairs = vec![
            StairPoint::new(0.0, 0.0, 40),
            StairPoint::new(f64::NAN, 0.0, 40),
        ];
        let result = group_stairs(&stairs, &GroupingConfig::default());
        assert!(matches!(result, Err(ClusterError::InvalidDistance { .. })));
    }

    #[test]
    fn test_thread_count_does_not_change_groups() {
        let stairs: Vec<StairPoint> = (0..20)
            .map(|i| StairPoint::new(i as f64 * 0.00005, (i % 3) as f64 * 0.00003, 30 + i))
            .collect();

        let single = GroupingConfig { max_threads: 1, ..GroupingConfig::default() };
        let many = GroupingConfig { max_threads: 4, ..GroupingConfig::default() };

        assert_eq!(
            group_stairs(&stairs, &single).unwrap(),
            group_stairs(&stairs, &many).unwrap()
        );
    }
}
