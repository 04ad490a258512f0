//! Seam for external codec inspection.
//!
//! Codec bitstreams (AAC, AVC, HEVC, AC-3 etc) are not parsed here.
//! A `CodecInspector` implementation may look at a track's codec
//! private data or samples and return the parameters the container
//! did not declare. See `Mp4::verify_tracks()`.

use crate::Track;

/// Parameters derived from the codec bitstream.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DerivedParameters {
    pub channels: Option<u32>,
    pub sample_rate: Option<f64>,
    pub bits_per_sample: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

pub trait CodecInspector {
    /// Returns `None` if nothing could be derived for `track`.
    fn derive_parameters(&self, track: &Track) -> Option<DerivedParameters>;
}

/// Inspector that derives nothing, i.e. tracks are
/// verified against container metadata only.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerOnly;

impl CodecInspector for ContainerOnly {
    fn derive_parameters(&self, _track: &Track) -> Option<DerivedParameters> {
        None
    }
}
