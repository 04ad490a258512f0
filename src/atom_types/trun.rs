//! Track fragment run atom (`trun`).
//!
//! Location: `moof/traf/trun`

use binrw::BinRead;

use crate::{consts::trun, support::flags_to_u32};

/// Track fragment run atom (`trun`).
///
/// Location: `moof/traf/trun`
#[derive(Debug, Default, Clone, BinRead)]
#[br(big)]
pub struct Trun {
    _version: u8,
    #[br(map = |f: [u8; 3]| flags_to_u32(f))]
    pub(crate) flags: u32,
    pub(crate) sample_count: u32,
    /// Relative to the fragment's base data offset.
    #[br(if(flags & trun::DATA_OFFSET != 0))]
    pub(crate) data_offset: Option<i32>,
    /// Overrides the sample flags for the first sample only.
    #[br(if(flags & trun::FIRST_SAMPLE_FLAGS != 0))]
    pub(crate) first_sample_flags: Option<u32>,
    #[br(count = sample_count, args { inner: (flags,) })]
    pub(crate) samples: Vec<TrunSample>,
}

impl Trun {
    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn samples(&self) -> &[TrunSample] {
        &self.samples
    }
}

/// Per-sample fields. Absent fields fall back
/// to `tfhd`/`trex` defaults.
#[derive(Debug, Default, Clone, Copy, BinRead)]
#[br(big, import(run_flags: u32))]
pub struct TrunSample {
    #[br(if(run_flags & trun::SAMPLE_DURATION != 0))]
    pub duration: Option<u32>,
    #[br(if(run_flags & trun::SAMPLE_SIZE != 0))]
    pub size: Option<u32>,
    #[br(if(run_flags & trun::SAMPLE_FLAGS != 0))]
    pub flags: Option<u32>,
    /// Signed for both versions.
    #[br(if(run_flags & trun::SAMPLE_COMPOSITION_TIME_OFFSET != 0))]
    pub composition_time_offset: Option<i32>,
}
