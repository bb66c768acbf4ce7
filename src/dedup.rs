//! Deduplication of overlapping stair groups.
//!
//! Seeds search independently, so a stair near two seeds shows up in both
//! groups. Groups are walked in the order given and the first group to list a
//! coordinate keeps it. Later occurrences, including repeats inside the same
//! group, are dropped, and groups left with nothing are removed.

use std::collections::HashSet;

use log::info;

use crate::{CoordKey, StairGroup};

/// Remove duplicate stairs group by group, first occurrence wins.
///
/// The output has globally unique coordinates and no empty groups. Applying it
/// twice gives the same result as applying it once.
///
/// # Example
/// ```
/// use stair_cluster::{remove_duplicates, StairPoint};
///
/// let shared = StairPoint::new(0.0, 0.0, 30);
/// let a = StairPoint::new(0.0, 0.0001, 30);
/// let b = StairPoint::new(0.0001, 0.0, 30);
///
/// let unique = remove_duplicates(&[vec![a, shared], vec![shared, b], vec![a]]);
/// assert_eq!(unique, vec![vec![a, shared], vec![b]]);
/// ```
pub fn remove_duplicates(groups: &[StairGroup]) -> Vec<StairGroup> {
    let mut seen: HashSet<CoordKey> = HashSet::new();

    let unique: Vec<StairGroup> = groups
        .iter()
        .filter_map(|group| {
            let unique_group: StairGroup = group
                .iter()
                .filter(|stair| seen.insert(stair.coord_key()))
                .copied()
                .collect();
            (!unique_group.is_empty()).then_some(unique_group)
        })
        .collect();

    info!(
        "[Dedup] {} groups -> {} groups with {} unique stairs",
        groups.len(),
        unique.len(),
        seen.len()
    );

    unique
}
