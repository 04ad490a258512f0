//! Raw per-track sample tables, as read from `stbl` and
//! extended by movie fragments, and their resolution into
//! per-sample decode timestamps and byte positions.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    atom_types::{Co64, Ctts, EditListEntry, SampleToGroup, Sbgp, Sgpd, Stsc, Stss, Stsz, Stts},
    Mp4Error,
};

/// Chunk, i.e. a contiguous run of samples.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Chunk {
    /// Absolute byte offset.
    pub pos: u64,
    /// Number of samples in chunk.
    pub size: u32,
    /// Sample description ID (1-based).
    pub desc: u32,
    /// 0-based index of the first sample in chunk.
    pub samples: u64,
}

/// Sample-to-chunk run.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ChunkMap {
    /// 0-based index of the first chunk in the run.
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    pub sample_description_id: u32,
}

/// Single sample.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// Size in bytes.
    pub size: u32,
    /// Decode timestamp in track time scale ticks.
    pub pts: i64,
    /// Absolute byte offset.
    pub pos: u64,
}

/// Run of samples with the same duration.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DurMap {
    pub number: u32,
    /// Duration in track time scale ticks.
    pub duration: u32,
}

/// Run of samples with the same composition time offset.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FrameOffset {
    pub count: u32,
    pub offset: i32,
}

/// Raw sample tables for a single track.
///
/// All tables are append-only while parsing.
/// `update()` resolves them once all atoms,
/// including fragments, have been read.
#[derive(Debug, Default, Clone)]
pub struct SampleTables {
    pub(crate) chunk_table: Vec<Chunk>,
    pub(crate) chunkmap_table: Vec<ChunkMap>,
    pub(crate) sample_table: Vec<RawSample>,
    pub(crate) durmap_table: Vec<DurMap>,
    pub(crate) raw_frame_offset_table: Vec<FrameOffset>,
    /// One offset per sample, expanded from `raw_frame_offset_table`.
    pub(crate) frame_offset_table: Vec<i64>,
    /// 1-based sample numbers.
    pub(crate) keyframe_table: Vec<u32>,
    pub(crate) sample_to_group_tables: HashMap<[u8; 4], Vec<SampleToGroup>>,
    /// `sgpd` entries for grouping type `rap `.
    pub(crate) random_access_point_table: Vec<Vec<u8>>,
    pub(crate) editlist_table: Vec<EditListEntry>,
    /// Sample count declared by `stsz`.
    pub(crate) declared_samples: u64,
    /// Fragments provided sync information,
    /// i.e. an empty `keyframe_table` no longer
    /// means that all samples are key frames.
    pub(crate) sync_from_fragments: bool,
}

impl SampleTables {
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunk_table
    }

    pub fn chunk_map(&self) -> &[ChunkMap] {
        &self.chunkmap_table
    }

    pub fn samples(&self) -> &[RawSample] {
        &self.sample_table
    }

    pub fn durations(&self) -> &[DurMap] {
        &self.durmap_table
    }

    pub fn frame_offsets(&self) -> &[i64] {
        &self.frame_offset_table
    }

    pub fn keyframes(&self) -> &[u32] {
        &self.keyframe_table
    }

    pub fn edit_list(&self) -> &[EditListEntry] {
        &self.editlist_table
    }

    pub(crate) fn add_chunk_offsets(&mut self, co64: Co64) {
        self.chunk_table.extend(co64.offsets.iter().map(|pos| Chunk {
            pos: *pos,
            ..Chunk::default()
        }));
    }

    pub(crate) fn add_sample_to_chunk(&mut self, stsc: Stsc) {
        self.chunkmap_table.extend(stsc.sample_to_chunk_table.iter().map(|s| ChunkMap {
            // stored 0-based
            first_chunk: s.first_chunk.saturating_sub(1),
            samples_per_chunk: s.samples_per_chunk,
            sample_description_id: s.sample_description_id,
        }));
    }

    /// Adds per-sample sizes and returns the constant sample size
    /// (0 if sample sizes vary).
    pub(crate) fn add_sample_sizes(&mut self, stsz: Stsz) -> u32 {
        self.declared_samples += stsz.no_of_entries as u64;
        if stsz.sample_size == 0 {
            self.sample_table.extend(stsz.sizes.iter().map(|size| RawSample {
                size: *size,
                ..RawSample::default()
            }));
        }
        stsz.sample_size
    }

    pub(crate) fn add_time_to_sample(&mut self, stts: Stts) {
        self.durmap_table.extend(stts.table.iter().map(|t| DurMap {
            number: t.sample_count,
            duration: t.sample_duration,
        }));
    }

    pub(crate) fn add_composition_offsets(&mut self, ctts: Ctts) {
        self.raw_frame_offset_table.extend(ctts.offset_table.iter().map(|o| FrameOffset {
            count: o.sample_count,
            offset: o.composition_offset,
        }));
    }

    pub(crate) fn add_sync_samples(&mut self, stss: Stss) {
        self.keyframe_table.extend_from_slice(&stss.sync_sample_table);
    }

    pub(crate) fn add_sample_to_group(&mut self, sbgp: Sbgp) {
        self.sample_to_group_tables
            .entry(sbgp.grouping_type)
            .or_default()
            .extend_from_slice(&sbgp.entries);
    }

    pub(crate) fn add_sample_group_description(&mut self, sgpd: Sgpd) {
        if &sgpd.grouping_type == b"rap " {
            self.random_access_point_table.extend(sgpd.entries);
        }
    }

    /// Total number of samples according to the chunk table.
    /// Only valid after the chunk map has been resolved.
    pub fn num_samples(&self) -> u64 {
        self.chunk_table.iter().map(|c| c.size as u64).sum()
    }

    /// Resolves the raw tables.
    ///
    /// - Assigns sample count and description to every chunk via the chunk map.
    /// - Assigns each chunk the index of its first sample.
    /// - Synthesizes a sample table for constant size, non-PCM tracks
    ///   that lack per-sample sizes, clearing `sample_size`. The table
    ///   holds at most the `stsz` sample count, and no more samples
    ///   than fit in `source_len` bytes.
    /// - Clamps implausibly large sample sizes to 0.
    /// - Variable sample size: derives decode timestamps and byte positions for every sample.
    /// - Variable sample size: expands composition time offsets to one value
    ///   per sample, ignoring offsets past the last sample.
    ///
    /// Constant sample size requires a single sample duration,
    /// otherwise `ConstantSampleSizeVariableDurationUnsupported` is raised.
    pub(crate) fn update(
        &mut self,
        track_id: u32,
        sample_size: &mut u32,
        is_pcm: bool,
        max_sample_size: u32,
        source_len: u64,
    ) -> Result<(), Mp4Error> {
        resolve_chunk_map(&mut self.chunk_table, &self.chunkmap_table);

        let mut num_samples = 0_u64;
        for chunk in self.chunk_table.iter_mut() {
            chunk.samples = num_samples;
            num_samples += chunk.size as u64;
        }

        if self.sample_table.is_empty() && *sample_size > 1 && !is_pcm {
            let limit = self.declared_samples.min(source_len / *sample_size as u64);
            if num_samples > limit {
                warn!(track_id, num_samples, limit, "Chunk map exceeds sample count, truncating");
            }
            let count = num_samples.min(limit);
            debug!(track_id, sample_size = *sample_size, count, "Synthesizing constant size sample table");
            self.sample_table = vec![
                RawSample {
                    size: *sample_size,
                    ..RawSample::default()
                };
                count as usize
            ];
            *sample_size = 0;
        }

        for (i, sample) in self.sample_table.iter_mut().enumerate() {
            if sample.size > max_sample_size {
                let err = Mp4Error::CorruptSampleSize {
                    sample: i as u64,
                    size: sample.size,
                    max: max_sample_size,
                };
                warn!(track_id, "{err}, clamping to 0");
                sample.size = 0;
            }
        }

        if *sample_size != 0 {
            if constant_duration(&self.durmap_table).is_none() {
                return Err(Mp4Error::ConstantSampleSizeVariableDurationUnsupported { track_id });
            }
        } else {
            self.resolve_decode_timestamps();
            self.resolve_positions();
            self.expand_frame_offsets(track_id);
        }

        debug!(
            track_id,
            chunks = self.chunk_table.len(),
            samples = self.sample_table.len(),
            frame_offsets = self.frame_offset_table.len(),
            keyframes = self.keyframe_table.len(),
            "Resolved sample tables"
        );

        Ok(())
    }

    /// One composition offset per sample. Constant sample size
    /// tracks look offsets up in the raw runs instead.
    fn expand_frame_offsets(&mut self, track_id: u32) {
        let num_samples = self.sample_table.len();
        let num_offsets: u64 = self.raw_frame_offset_table.iter().map(|o| o.count as u64).sum();
        if num_offsets > num_samples as u64 {
            warn!(track_id, num_offsets, num_samples, "Composition offsets exceed sample count, truncating");
        }

        self.frame_offset_table = self.raw_frame_offset_table
            .iter()
            .flat_map(|o| std::iter::repeat(o.offset as i64).take(o.count as usize))
            .take(num_samples)
            .collect();
    }

    /// Decode timestamps from the duration map.
    /// Samples not covered by the duration map
    /// continue with the last duration.
    fn resolve_decode_timestamps(&mut self) {
        let mut pts = 0_i64;
        let mut durations = self.durmap_table
            .iter()
            .flat_map(|d| std::iter::repeat(d.duration as i64).take(d.number as usize));
        let last = self.durmap_table.last().map(|d| d.duration as i64).unwrap_or(0);

        for sample in self.sample_table.iter_mut() {
            sample.pts = pts;
            pts += durations.next().unwrap_or(last);
        }
    }

    /// Sample byte positions from chunk offsets
    /// and cumulative sample sizes within each chunk.
    fn resolve_positions(&mut self) {
        let mut samples = self.sample_table.iter_mut();
        'chunks: for chunk in self.chunk_table.iter() {
            let mut pos = chunk.pos;
            for _ in 0..chunk.size {
                let Some(sample) = samples.next() else {
                    break 'chunks;
                };
                sample.pos = pos;
                pos += sample.size as u64;
            }
        }
    }
}

/// Assigns `size` and `desc` to every chunk from the chunk map.
///
/// Runs are walked back to front. Each run applies from its
/// `first_chunk` up to the `first_chunk` of its successor.
/// Chunks that already have a size (e.g. added by fragments)
/// are left untouched.
pub(crate) fn resolve_chunk_map(chunks: &mut [Chunk], chunk_map: &[ChunkMap]) {
    chunk_map
        .iter()
        .rev()
        .fold(chunks.len(), |last, run| {
            let first = (run.first_chunk as usize).min(last);
            chunks[first..last]
                .iter_mut()
                .filter(|c| c.size == 0)
                .for_each(|c| {
                    c.size = run.samples_per_chunk;
                    c.desc = run.sample_description_id;
                });
            first
        });
}

/// Returns the single sample duration, if the duration map
/// describes one. A final run of a single sample with a
/// different duration is accepted.
pub(crate) fn constant_duration(durmap: &[DurMap]) -> Option<u32> {
    match durmap {
        [only] => Some(only.duration),
        [first, last] if last.number == 1 => Some(first.duration),
        _ => None,
    }
}
