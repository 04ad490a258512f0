//! Builds a track's flat sample index from its resolved sample tables.

use std::collections::BTreeSet;

use tracing::warn;

use crate::{atom_types::Audio, support::to_ns};

use super::tables::{constant_duration, FrameOffset, SampleTables};

/// Single entry in a track's sample index.
///
/// For constant sample size tracks (e.g. PCM audio)
/// each entry covers a full chunk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Absolute byte offset.
    pub file_pos: u64,
    /// Size in bytes.
    pub size: u32,
    /// Presentation timestamp in nanoseconds.
    pub timestamp: i64,
    /// Duration in nanoseconds.
    pub duration: i64,
    pub is_keyframe: bool,
}

impl IndexEntry {
    /// Presentation end time in nanoseconds.
    pub fn end(&self) -> i64 {
        self.timestamp + self.duration
    }
}

/// Constant sample size: one entry per chunk.
///
/// Byte size is `samples in chunk * sample_size`.
/// If the sample size is 1 (common for QuickTime PCM),
/// the size is derived from the audio description instead,
/// via bytes per frame and samples per packet if declared,
/// or channels and bit depth.
pub(crate) fn build_constant(
    tables: &SampleTables,
    sample_size: u32,
    time_scale: u32,
    audio: Option<&Audio>,
) -> Vec<IndexEntry> {
    let duration = constant_duration(&tables.durmap_table).unwrap_or(0) as i64;
    let keyframes = Keyframes::new(tables, tables.num_samples());
    let mut frame_offsets = OffsetRuns::new(&tables.raw_frame_offset_table);

    tables.chunk_table
        .iter()
        .map(|chunk| {
            let count = chunk.size as u64;
            let frame_size = match (sample_size, audio) {
                (1, Some(audio)) => match audio.frame_ratio() {
                    Some((bytes_per_frame, samples_per_packet)) => {
                        count * bytes_per_frame as u64 / samples_per_packet as u64
                    }
                    None => count * audio.channels() as u64 * audio.bits_per_sample() as u64 / 8,
                },
                _ => count * sample_size as u64,
            };
            let frame_offset = frame_offsets.at(chunk.samples);

            IndexEntry {
                file_pos: chunk.pos,
                size: u32::try_from(frame_size).unwrap_or(u32::MAX),
                timestamp: to_ns(
                    (chunk.samples as i64).saturating_mul(duration).saturating_add(frame_offset),
                    time_scale,
                ),
                duration: to_ns((count as i64).saturating_mul(duration), time_scale),
                is_keyframe: keyframes.any_in(chunk.samples + 1, count),
            }
        })
        .collect()
}

/// Variable sample size: one entry per sample, in chunk order.
pub(crate) fn build_variable(tables: &SampleTables, time_scale: u32) -> Vec<IndexEntry> {
    let (timestamps, durations) = calculate_timestamps(tables, time_scale);
    let keyframes = Keyframes::new(tables, tables.sample_table.len() as u64);

    let mut index = Vec::with_capacity(tables.sample_table.len());
    'chunks: for chunk in tables.chunk_table.iter() {
        for i in chunk.samples..chunk.samples + chunk.size as u64 {
            let i = i as usize;
            let Some(sample) = tables.sample_table.get(i) else {
                break 'chunks;
            };
            index.push(IndexEntry {
                file_pos: sample.pos,
                size: sample.size,
                timestamp: timestamps[i],
                duration: durations[i],
                is_keyframe: keyframes.contains(i as u64 + 1),
            });
        }
    }

    index
}

/// Presentation timestamps and durations in nanoseconds for every sample.
///
/// Timestamps are decode timestamps plus composition offsets.
/// Durations are decode timestamp deltas, with the final sample
/// using the last declared duration. Non-positive deltas are replaced
/// by the average of all positive deltas.
pub(crate) fn calculate_timestamps(tables: &SampleTables, time_scale: u32) -> (Vec<i64>, Vec<i64>) {
    let samples = &tables.sample_table;

    let timestamps = samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let offset = tables.frame_offset_table.get(i).copied().unwrap_or(0);
            to_ns(s.pts + offset, time_scale)
        })
        .collect::<Vec<_>>();

    let mut deltas = samples
        .windows(2)
        .map(|w| w[1].pts - w[0].pts)
        .collect::<Vec<_>>();
    if !samples.is_empty() {
        let last = tables.durmap_table.last().map(|d| d.duration as i64).unwrap_or(0);
        deltas.push(last);
    }

    let (sum, num_valid) = deltas
        .iter()
        .filter(|d| **d > 0)
        .fold((0_i64, 0_i64), |(sum, n), d| (sum + d, n + 1));
    if num_valid > 0 {
        let average = sum / num_valid;
        deltas.iter_mut()
            .filter(|d| **d <= 0)
            .for_each(|d| *d = average);
    }

    let durations = deltas
        .into_iter()
        .map(|d| to_ns(d, time_scale))
        .collect();

    (timestamps, durations)
}

/// Key frames as 1-based sample numbers, from `stss` (or fragment
/// sample flags) and from `rap ` sample groups with a valid
/// group description index.
pub(crate) struct Keyframes {
    all: bool,
    sync: BTreeSet<u64>,
    /// Sorted, non-overlapping `[first, end)` ranges.
    random_access: Vec<(u64, u64)>,
}

impl Keyframes {
    /// `rap ` runs are clamped to `num_samples`.
    pub(crate) fn new(tables: &SampleTables, num_samples: u64) -> Self {
        let mut random_access = Vec::new();

        if let Some(runs) = tables.sample_to_group_tables.get(b"rap ") {
            let num_descriptions = tables.random_access_point_table.len() as u32;
            let limit = num_samples + 1;
            let mut first = 1_u64;
            for run in runs {
                let end = first + run.sample_count as u64;
                if end > limit {
                    warn!(
                        num_samples,
                        first,
                        count = run.sample_count,
                        "Random access group exceeds sample count, truncating"
                    );
                }
                let end = end.min(limit);
                if end > first && (1..=num_descriptions).contains(&run.group_description_index) {
                    random_access.push((first, end));
                }
                if end == limit {
                    break;
                }
                first = end;
            }
        }

        Self {
            all: tables.keyframe_table.is_empty() && !tables.sync_from_fragments,
            sync: tables.keyframe_table.iter().map(|s| *s as u64).collect(),
            random_access,
        }
    }

    pub(crate) fn contains(&self, sample: u64) -> bool {
        self.any_in(sample, 1)
    }

    /// `true` if any of the `count` samples starting at `first` is a key frame.
    pub(crate) fn any_in(&self, first: u64, count: u64) -> bool {
        let end = first + count;
        if self.all || self.sync.range(first..end).next().is_some() {
            return true;
        }
        let i = self.random_access.partition_point(|(_, run_end)| *run_end <= first);
        self.random_access
            .get(i)
            .is_some_and(|(run_first, _)| *run_first < end)
    }
}

/// Composition offset lookup over the raw `ctts` runs
/// for increasing sample numbers.
struct OffsetRuns<'a> {
    runs: std::slice::Iter<'a, FrameOffset>,
    /// 0-based sample number following the current run.
    run_end: u64,
    offset: i64,
}

impl<'a> OffsetRuns<'a> {
    fn new(runs: &'a [FrameOffset]) -> Self {
        Self {
            runs: runs.iter(),
            run_end: 0,
            offset: 0,
        }
    }

    /// Offset for 0-based `sample`, 0 past the last run.
    fn at(&mut self, sample: u64) -> i64 {
        while self.run_end <= sample {
            match self.runs.next() {
                Some(run) => {
                    self.run_end += run.count as u64;
                    self.offset = run.offset as i64;
                }
                None => return 0,
            }
        }
        self.offset
    }
}
