//! Example of grouping and banding a batch of stairs.
//!
//! Run with: cargo run --example group_stairs

use stair_cluster::{
    categorize_by_step_count, group_stairs, remove_duplicates, GroupingConfig, StairPoint,
};
use std::time::Instant;

fn main() {
    println!("Stair Grouping Example\n");

    let mut stairs = Vec::new();

    // Bern: a long flight of 8 x 40 steps, ~2m between landings
    stairs.extend(flight(46.9480, 7.4474, 8, 40));
    // Lausanne: 5 x 45 steps
    stairs.extend(flight(46.5197, 6.6323, 5, 45));
    // Lugano: two short flights that do not reach each other
    stairs.extend(flight(46.0037, 8.9511, 2, 30));
    stairs.extend(flight(46.0047, 8.9511, 2, 30));
    // Zero-step vertex bridging nothing
    stairs.push(StairPoint::new(46.9490, 7.4474, 0));

    let config = GroupingConfig::default();
    println!("Created {} stairs\n", stairs.len());

    let start = Instant::now();
    let groups = match group_stairs(&stairs, &config) {
        Ok(groups) => groups,
        Err(e) => {
            eprintln!("Grouping failed: {}", e);
            return;
        }
    };
    let unique = remove_duplicates(&groups);
    let categorized = categorize_by_step_count(&unique);
    let elapsed = start.elapsed();

    println!("Grouping completed in {:?}\n", elapsed);
    println!("{} raw groups, {} after deduplication:\n", groups.len(), unique.len());

    for (i, group) in unique.iter().enumerate() {
        let total: u64 = group.iter().map(|s| s.step_count as u64).sum();
        println!("  Group {}: {} stairs, {} steps", i, group.len(), total);
    }

    println!("\nBands:");
    for (band, banded) in categorized.iter() {
        println!("  {:>8}: {} stairs", band, banded.len());
    }
}

/// `count` landings going north from (lat, lng), ~2.2m apart
fn flight(lat: f64, lng: f64, count: usize, step_count: u32) -> Vec<StairPoint> {
    (0..count)
        .map(|i| StairPoint::new(lat + i as f64 * 0.00002, lng, step_count))
        .collect()
}
