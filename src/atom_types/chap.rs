//! Chapter track reference (`chap`).
//!
//! Location: `moov/trak[multiple]/tref/chap`

use binrw::{helpers::until_eof, BinRead};

/// Chapter track reference (`chap`).
/// Lists the IDs of the tracks containing chapters
/// for the referencing track.
#[derive(Debug, Default, Clone, BinRead)]
#[br(big)]
pub struct Chap {
    #[br(parse_with = until_eof)]
    pub(crate) track_ids: Vec<u32>,
}

impl Chap {
    pub fn track_ids(&self) -> &[u32] {
        &self.track_ids
    }
}
