//! Chunk offset atom for file sizes below the 32bit limit (`stco`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/stco`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/chunk_offset_atom>

use binrw::BinRead;

/// Chunk offset atom for file sizes below the 32bit limit (`stco`).
///
/// Location: `moov/trak[multiple]/mdia/minf/stbl/stco`
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/chunk_offset_atom>
#[derive(Debug, Default, BinRead, Clone)]
#[br(big)]
pub struct Stco {
    pub(crate) version: u8,
    pub(crate) flags: [u8; 3],
    pub(crate) no_of_entries: u32,
    /// Chunk offset table consisting of an array of offset values.
    #[br(count = no_of_entries)]
    pub(crate) offsets: Vec<u32>
}

impl Stco {
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }
}
