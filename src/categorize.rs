//! Step-count bands for deduplicated stair groups.
//!
//! Each group's step counts are summed and the group lands in the first band
//! whose half-open range holds the total. Groups under 150 steps are dropped.

use std::fmt;

use log::{debug, info};

use crate::{StairGroup, StairPoint};

const TOTAL_STEP_THRESHOLD_1: u64 = 150;
const TOTAL_STEP_THRESHOLD_2: u64 = 200;
const TOTAL_STEP_THRESHOLD_3: u64 = 250;
const TOTAL_STEP_THRESHOLD_4: u64 = 300;

/// Band of total step counts for a stair group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepBand {
    /// 150 <= total < 200
    From150To200,
    /// 200 <= total < 250
    From200To250,
    /// 250 <= total < 300
    From250To300,
    /// total >= 300
    From300,
}

impl StepBand {
    /// All bands, lowest first.
    pub const ALL: [StepBand; 4] = [
        StepBand::From150To200,
        StepBand::From200To250,
        StepBand::From250To300,
        StepBand::From300,
    ];

    /// Band for a group total, or `None` below 150 steps.
    pub fn from_total(total_steps: u64) -> Option<Self> {
        if (TOTAL_STEP_THRESHOLD_1..TOTAL_STEP_THRESHOLD_2).contains(&total_steps) {
            Some(StepBand::From150To200)
        } else if (TOTAL_STEP_THRESHOLD_2..TOTAL_STEP_THRESHOLD_3).contains(&total_steps) {
            Some(StepBand::From200To250)
        } else if (TOTAL_STEP_THRESHOLD_3..TOTAL_STEP_THRESHOLD_4).contains(&total_steps) {
            Some(StepBand::From250To300)
        } else if total_steps >= TOTAL_STEP_THRESHOLD_4 {
            Some(StepBand::From300)
        } else {
            None
        }
    }

    /// Label used in output file names, e.g. `"150-200"` or `"300plus"`.
    pub fn label(&self) -> &'static str {
        match self {
            StepBand::From150To200 => "150-200",
            StepBand::From200To250 => "200-250",
            StepBand::From250To300 => "250-300",
            StepBand::From300 => "300plus",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StepBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stairs bucketed by the total step count of the group they belong to.
///
/// Every band is present, possibly empty. Within a band, stairs keep group
/// order and then in-group order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorizedStairs {
    bands: [Vec<StairPoint>; 4],
}

impl CategorizedStairs {
    /// Stairs in `band`.
    pub fn get(&self, band: StepBand) -> &[StairPoint] {
        &self.bands[band.index()]
    }

    /// Bands with their stairs, lowest band first.
    pub fn iter(&self) -> impl Iterator<Item = (StepBand, &[StairPoint])> + '_ {
        StepBand::ALL.into_iter().map(move |band| (band, self.get(band)))
    }

    /// Number of stairs across all bands.
    pub fn total_stairs(&self) -> usize {
        self.bands.iter().map(Vec::len).sum()
    }

    /// True when no group reached 150 steps.
    pub fn is_empty(&self) -> bool {
        self.total_stairs() == 0
    }
}

/// Sum of step counts in a group.
pub fn total_steps(group: &[StairPoint]) -> u64 {
    group.iter().map(|s| s.step_count as u64).sum()
}

/// Bucket groups into step-count bands.
///
/// # Example
/// ```
/// use stair_cluster::{categorize_by_step_count, StairPoint, StepBand};
///
/// let big = vec![StairPoint::new(0.0, 0.0, 120), StairPoint::new(0.0, 0.0001, 80)];
/// let small = vec![StairPoint::new(1.0, 1.0, 149)];
///
/// let result = categorize_by_step_count(&[big.clone(), small]);
/// assert_eq!(result.get(StepBand::From200To250), big.as_slice());
/// assert_eq!(result.total_stairs(), 2);
/// ```
pub fn categorize_by_step_count(groups: &[StairGroup]) -> CategorizedStairs {
    let mut categorized = CategorizedStairs::default();
    let mut dropped = 0usize;

    for group in groups {
        let total = total_steps(group);
        match StepBand::from_total(total) {
            Some(band) => {
                debug!("[Categorize] Group of {} stairs, {} steps -> {}", group.len(), total, band);
                categorized.bands[band.index()].extend_from_slice(group);
            }
            None => dropped += 1,
        }
    }

    info!(
        "[Categorize] {} groups banded, {} below {} steps dropped",
        groups.len() - dropped,
        dropped,
        TOTAL_STEP_THRESHOLD_1
    );

    categorized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_with_total(total: u32, lat: f64) -> StairGroup {
        vec![StairPoint::new(lat, 0.0, total)]
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(StepBand::from_total(149), None);
        assert_eq!(StepBand::from_total(150), Some(StepBand::From150To200));
        assert_eq!(StepBand::from_total(199), Some(StepBand::From150To200));
        assert_eq!(StepBand::from_total(200), Some(StepBand::From200To250));
        assert_eq!(StepBand::from_total(250), Some(StepBand::From250To300));
        assert_eq!(StepBand::from_total(299), Some(StepBand::From250To300));
        assert_eq!(StepBand::from_total(300), Some(StepBand::From300));
        assert_eq!(StepBand::from_total(10_000), Some(StepBand::From300));
        assert_eq!(StepBand::from_total(0), None);
    }

    #[test]
    fn test_labels() {
        let labels: Vec<&str> = StepBand::ALL.iter().map(|b| b.label()).collect();
        assert_eq!(labels, vec!["150-200", "200-250", "250-300", "300plus"]);
        assert_eq!(StepBand::From300.to_string(), "300plus");
    }

    #[test]
    fn test_group_total_is_summed() {
        // 3 x 50 = 150, none of them alone reaches a band
        let group: StairGroup = (0..3).map(|i| StairPoint::new(i as f64, 0.0, 50)).collect();
        assert_eq!(total_steps(&group), 150);

        let result = categorize_by_step_count(&[group.clone()]);
        assert_eq!(result.get(StepBand::From150To200), group.as_slice());
    }

    #[test]
    fn test_order_within_band() {
        let first = vec![StairPoint::new(1.0, 0.0, 100), StairPoint::new(2.0, 0.0, 60)];
        let second = group_with_total(170, 3.0);
        let result = categorize_by_step_count(&[first.clone(), second.clone()]);

        let mut expected = first;
        expected.extend(second);
        assert_eq!(result.get(StepBand::From150To200), expected.as_slice());
    }

    #[test]
    fn test_groups_routed_to_bands() {
        let groups = vec![
            group_with_total(149, 0.0),
            group_with_total(150, 1.0),
            group_with_total(200, 2.0),
            group_with_total(250, 3.0),
            group_with_total(300, 4.0),
        ];
        let result = categorize_by_step_count(&groups);

        assert_eq!(result.total_stairs(), 4);
        for (band, stairs) in result.iter() {
            assert_eq!(stairs.len(), 1, "band {}", band);
        }
        assert_eq!(result.get(StepBand::From300)[0].step_count, 300);
    }

    #[test]
    fn test_all_groups_dropped() {
        let result = categorize_by_step_count(&[group_with_total(20, 0.0), vec![]]);
        assert!(result.is_empty());
        assert_eq!(result.iter().count(), 4);
    }

    #[test]
    fn test_empty_input() {
        assert!(categorize_by_step_count(&[]).is_empty());
    }
}
