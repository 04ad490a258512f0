//! Default sample duration (frame rate) estimation.

use std::collections::HashMap;

use crate::support::to_ns;

use super::{index::IndexEntry, tables::SampleTables};

/// Derives a constant sample duration in nanoseconds.
///
/// Uses the duration map if it holds a single run and the
/// samples are not reordered. Otherwise the most common
/// positive delta between sorted presentation timestamps is used.
pub(crate) fn estimate_default_duration(
    tables: &SampleTables,
    sample_size: u32,
    time_scale: u32,
    index: &[IndexEntry],
) -> Option<i64> {
    if let [only] = tables.durmap_table.as_slice() {
        if only.duration != 0 && (sample_size != 0 || tables.frame_offset_table.is_empty()) {
            return Some(to_ns(only.duration as i64, time_scale));
        }
    }

    let mut timestamps = index.iter().map(|e| e.timestamp).collect::<Vec<_>>();
    timestamps.sort_unstable();

    let mut counts: HashMap<i64, usize> = HashMap::new();
    timestamps
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| *d > 0)
        .for_each(|d| *counts.entry(d).or_default() += 1);

    // smallest delta wins ties
    counts
        .into_iter()
        .max_by(|(d1, n1), (d2, n2)| n1.cmp(n2).then(d2.cmp(d1)))
        .map(|(delta, _)| delta)
}

/// Replaces non-positive durations with `default_duration`.
pub(crate) fn backfill_durations(index: &mut [IndexEntry], default_duration: i64) {
    index.iter_mut()
        .filter(|e| e.duration <= 0)
        .for_each(|e| e.duration = default_duration);
}
