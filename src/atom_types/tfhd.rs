//! Track fragment header atom (`tfhd`).
//!
//! Location: `moof/traf/tfhd`

use binrw::BinRead;

use crate::{consts::tfhd, support::flags_to_u32};

/// Track fragment header atom (`tfhd`).
/// Flags select which of the optional fields are present,
/// in the field order below.
///
/// Location: `moof/traf/tfhd`
#[derive(Debug, Default, Clone, BinRead)]
#[br(big)]
pub struct Tfhd {
    _version: u8,
    #[br(map = |f: [u8; 3]| flags_to_u32(f))]
    pub(crate) flags: u32,
    pub(crate) track_id: u32,
    #[br(if(flags & tfhd::BASE_DATA_OFFSET != 0))]
    pub(crate) base_data_offset: Option<u64>,
    #[br(if(flags & tfhd::SAMPLE_DESCRIPTION_INDEX != 0))]
    pub(crate) sample_description_index: Option<u32>,
    #[br(if(flags & tfhd::DEFAULT_SAMPLE_DURATION != 0))]
    pub(crate) default_sample_duration: Option<u32>,
    #[br(if(flags & tfhd::DEFAULT_SAMPLE_SIZE != 0))]
    pub(crate) default_sample_size: Option<u32>,
    #[br(if(flags & tfhd::DEFAULT_SAMPLE_FLAGS != 0))]
    pub(crate) default_sample_flags: Option<u32>,
}

impl Tfhd {
    pub fn track_id(&self) -> u32 {
        self.track_id
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Base data offset is the start of the enclosing `moof`.
    pub fn default_base_is_moof(&self) -> bool {
        self.flags & tfhd::DEFAULT_BASE_IS_MOOF != 0
    }

    pub fn duration_is_empty(&self) -> bool {
        self.flags & tfhd::DURATION_IS_EMPTY != 0
    }
}
