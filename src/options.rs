//! Parse options.

use crate::consts::{MAX_PAYLOAD_SIZE, MAX_SAMPLE_SIZE};

/// Options controlling how an MP4 is parsed and indexed.
///
/// ```rs
/// use qtmp4::{Mp4, ParseOptions};
///
/// let opts = ParseOptions::default()
///     .with_parallel(false)
///     .with_normalize_timestamps(true);
/// let mp4 = Mp4::with_options(Path::new("VIDEO.MOV"), opts)?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Capacity for the file `BufReader`.
    /// Defaults to the `BufReader` default (8KiB).
    pub buffer_capacity: Option<usize>,
    /// Scan for the next top-level atom after an invalid atom header,
    /// instead of aborting.
    pub resync: bool,
    /// Remap the sample index onto the presentation timeline
    /// according to each track's edit list.
    pub apply_edit_lists: bool,
    /// Finalize tracks (index building etc) in parallel.
    pub parallel: bool,
    /// Subtract the smallest timestamp across all tracks
    /// from all timestamps.
    pub normalize_timestamps: bool,
    /// Samples larger than this are considered corrupt
    /// and have their size clamped to 0.
    pub max_sample_size: u32,
    /// Largest leaf atom payload read into memory.
    pub max_payload_size: u64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            buffer_capacity: None,
            resync: true,
            apply_edit_lists: true,
            parallel: true,
            normalize_timestamps: false,
            max_sample_size: MAX_SAMPLE_SIZE,
            max_payload_size: MAX_PAYLOAD_SIZE,
        }
    }
}

impl ParseOptions {
    pub fn with_buffer_capacity(self, capacity: usize) -> Self {
        Self {
            buffer_capacity: Some(capacity),
            ..self
        }
    }

    pub fn with_resync(self, resync: bool) -> Self {
        Self { resync, ..self }
    }

    pub fn with_edit_lists(self, apply_edit_lists: bool) -> Self {
        Self {
            apply_edit_lists,
            ..self
        }
    }

    pub fn with_parallel(self, parallel: bool) -> Self {
        Self { parallel, ..self }
    }

    pub fn with_normalize_timestamps(self, normalize_timestamps: bool) -> Self {
        Self {
            normalize_timestamps,
            ..self
        }
    }

    pub fn with_max_sample_size(self, max_sample_size: u32) -> Self {
        Self {
            max_sample_size,
            ..self
        }
    }

    pub fn with_max_payload_size(self, max_payload_size: u64) -> Self {
        Self {
            max_payload_size,
            ..self
        }
    }
}
