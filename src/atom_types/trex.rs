//! Track extends atom (`trex`).
//!
//! Location: `moov/mvex/trex`
//!
//! Per-track defaults for movie fragments.

use binrw::BinRead;

/// Track extends atom (`trex`).
///
/// Location: `moov/mvex/trex`
#[derive(Debug, Default, Clone, Copy, BinRead)]
#[br(big)]
pub struct Trex {
    _version: u8,
    _flags: [u8; 3],
    pub(crate) track_id: u32,
    pub(crate) default_sample_description_index: u32,
    pub(crate) default_sample_duration: u32,
    pub(crate) default_sample_size: u32,
    pub(crate) default_sample_flags: u32,
}

impl Trex {
    pub fn track_id(&self) -> u32 {
        self.track_id
    }
}
