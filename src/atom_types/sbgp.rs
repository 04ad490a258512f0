//! Sample to group atom (`sbgp`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/sbgp`
//! or `moof/traf/sbgp`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/sample-to-group_atom>

use binrw::BinRead;

/// Sample to group atom (`sbgp`).
/// Assigns runs of samples to a group description in the `sgpd`
/// atom with the same grouping type.
#[derive(Debug, BinRead)]
#[br(big)]
pub struct Sbgp {
    version: u8,
    _flags: [u8; 3],
    /// E.g. `rap ` (random access point), `roll`.
    pub(crate) grouping_type: [u8; 4],
    #[br(if(version == 1))]
    pub(crate) grouping_type_parameter: Option<u32>,
    _entry_count: u32,
    #[br(count = _entry_count)]
    pub(crate) entries: Vec<SampleToGroup>,
}

impl Sbgp {
    pub fn grouping_type(&self) -> &[u8; 4] {
        &self.grouping_type
    }

    pub fn grouping_type_parameter(&self) -> Option<u32> {
        self.grouping_type_parameter
    }

    pub fn entries(&self) -> &[SampleToGroup] {
        &self.entries
    }
}

#[derive(Debug, Clone, Copy, PartialEq, BinRead)]
#[br(big)]
pub struct SampleToGroup {
    /// Number of consecutive samples in this run.
    pub sample_count: u32,
    /// 1-based index into the group description table,
    /// 0 means the samples belong to no group.
    pub group_description_index: u32,
}
