//! Sample description atom (`stsd`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/stsd`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/sample_description_atom>

use binrw::BinRead;

use super::SampleDescription;

/// Sample description atom (`stsd`).
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/sample_description_atom>
#[derive(Debug, Default, Clone, BinRead)]
#[br(big)]
pub struct Stsd {
    _version: u8,
    _flags: [u8; 3],
    _no_of_entries: u32,
    #[br(count = _no_of_entries)]
    pub(crate) descriptions: Vec<SampleDescription>
}

impl Stsd {
    pub fn descriptions(&self) -> &[SampleDescription] {
        &self.descriptions
    }
}
