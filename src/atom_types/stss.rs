//! Sync sample atom (`stss`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/stss`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/sync_sample_atom>

use binrw::BinRead;

/// Sync sample atom (`stss`).
/// Lists the 1-based sample numbers of all key frames.
/// If absent, every sample is a key frame.
///
/// Location: `moov/trak[multiple]/mdia/minf/stbl/stss`
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/sync_sample_atom>
#[derive(Debug, Default, BinRead)]
#[br(big)]
pub struct Stss {
    _version: u8,
    _flags: [u8; 3],
    _number_of_entries: u32,
    #[br(count = _number_of_entries)]
    pub(crate) sync_sample_table: Vec<u32>
}

impl Stss {
    pub fn sync_sample_table(&self) -> &[u32] {
        &self.sync_sample_table
    }
}
