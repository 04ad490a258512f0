//! Extends a track's raw sample tables from movie fragments
//! (`moof/traf/tfhd` + `trun`), using per-track defaults from `trex`.

use tracing::debug;

use crate::{
    atom_types::{Tfhd, Trex, Trun},
    consts::sample_flags,
};

use super::tables::{Chunk, DurMap, FrameOffset, RawSample, SampleTables};

/// Per-track fragment defaults from `moov/mvex/trex`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TrackDefaults {
    pub sample_description_id: u32,
    pub sample_duration: u32,
    pub sample_size: u32,
    pub sample_flags: u32,
}

impl From<&Trex> for TrackDefaults {
    fn from(trex: &Trex) -> Self {
        Self {
            sample_description_id: trex.default_sample_description_index,
            sample_duration: trex.default_sample_duration,
            sample_size: trex.default_sample_size,
            sample_flags: trex.default_sample_flags,
        }
    }
}

/// State for a single track fragment (`traf`).
/// Created on `tfhd`, consumed by each following `trun`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Fragment {
    pub track_id: u32,
    /// Absolute offset of the enclosing `moof`.
    pub moof_offset: u64,
    /// Absolute offset directly after the data of the previous run.
    pub implicit_offset: u64,
    pub base_data_offset: u64,
    pub sample_description_id: u32,
    pub sample_duration: u32,
    pub sample_size: u32,
    pub sample_flags: u32,
}

impl Fragment {
    /// Resolves `tfhd` against the track's `trex` defaults.
    ///
    /// The base data offset is, in order of precedence:
    /// the explicit `tfhd` field, the start of the `moof`
    /// if `default-base-is-moof` is set, or `implicit_offset`,
    /// i.e. the end of the previous fragment's data.
    pub(crate) fn new(
        tfhd: &Tfhd,
        defaults: &TrackDefaults,
        moof_offset: u64,
        implicit_offset: u64,
    ) -> Self {
        let base_data_offset = match (tfhd.base_data_offset, tfhd.default_base_is_moof()) {
            (Some(offset), _) => offset,
            (None, true) => moof_offset,
            (None, false) => implicit_offset,
        };

        Self {
            track_id: tfhd.track_id,
            moof_offset,
            implicit_offset: base_data_offset,
            base_data_offset,
            sample_description_id: tfhd
                .sample_description_index
                .unwrap_or(defaults.sample_description_id),
            sample_duration: tfhd
                .default_sample_duration
                .unwrap_or(defaults.sample_duration),
            sample_size: tfhd.default_sample_size.unwrap_or(defaults.sample_size),
            sample_flags: tfhd.default_sample_flags.unwrap_or(defaults.sample_flags),
        }
    }
}

/// `true` unless the sample flags mark the sample as
/// non-sync or as depending on other samples.
pub(crate) fn is_keyframe(flags: u32) -> bool {
    let non_sync = flags & sample_flags::IS_NON_SYNC != 0;
    let depends_on = (flags >> sample_flags::DEPENDS_ON_SHIFT) & 0b11;
    !non_sync && depends_on != sample_flags::DEPENDS_ON_OTHERS
}

impl SampleTables {
    /// Appends the samples of `trun` to the tables,
    /// one chunk per sample, so that index building does not need
    /// to distinguish between fragmented and non-fragmented tracks.
    ///
    /// Returns the absolute offset directly after the run's data.
    pub(crate) fn extend_from_trun(&mut self, fragment: &mut Fragment, trun: &Trun) -> u64 {
        let mut offset = match trun.data_offset {
            Some(rel) => fragment.base_data_offset.saturating_add_signed(rel as i64),
            None => fragment.implicit_offset,
        };

        let existing = self.sample_table.len() as u32;

        // Samples preceding the first fragment are all key frames
        // unless a sync sample table says otherwise.
        if !self.sync_from_fragments {
            if self.keyframe_table.is_empty() {
                self.keyframe_table.extend(1..=existing);
            }
            self.sync_from_fragments = true;
        }

        // Keep composition offsets aligned with samples
        let offsets_covered: u64 = self.raw_frame_offset_table.iter().map(|o| o.count as u64).sum();
        if offsets_covered < existing as u64 {
            self.raw_frame_offset_table.push(FrameOffset {
                count: existing - offsets_covered as u32,
                offset: 0,
            });
        }

        for (i, sample) in trun.samples.iter().enumerate() {
            let duration = sample.duration.unwrap_or(fragment.sample_duration);
            let size = sample.size.unwrap_or(fragment.sample_size);
            let flags = match (i, trun.first_sample_flags) {
                (0, Some(first)) => first,
                _ => sample.flags.unwrap_or(fragment.sample_flags),
            };

            self.durmap_table.push(DurMap { number: 1, duration });
            self.sample_table.push(RawSample {
                size,
                ..RawSample::default()
            });
            self.chunk_table.push(Chunk {
                pos: offset,
                size: 1,
                desc: fragment.sample_description_id,
                samples: 0,
            });
            self.raw_frame_offset_table.push(FrameOffset {
                count: 1,
                offset: sample.composition_time_offset.unwrap_or(0),
            });
            if is_keyframe(flags) {
                self.keyframe_table.push(self.sample_table.len() as u32);
            }

            offset += size as u64;
        }

        debug!(
            track_id = fragment.track_id,
            samples = trun.samples.len(),
            end = offset,
            "Extended track from fragment run"
        );

        fragment.implicit_offset = offset;
        offset
    }
}
