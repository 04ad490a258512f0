//! Sample-to-chunk atom (`stsc`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/stsc`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/sample-to-chunk_atom>
//! and <https://github.com/essential61/mp4analyser/wiki/Understanding-The-Sample-Tables:-An-Example>

use binrw::BinRead;

/// Sample to chunk atom (`stsc`)
#[derive(Debug, BinRead)]
#[br(big)]
pub struct Stsc {
    _version: u8,
    _flags: [u8; 3],
    no_of_entries: u32,
    #[br(count = no_of_entries)]
    pub(crate) sample_to_chunk_table: Vec<SampleToChunk>,
}

impl Stsc {
    pub fn sample_to_chunk_table(&self) -> &[SampleToChunk] {
        &self.sample_to_chunk_table
    }
}

#[derive(Debug, Clone, Copy, BinRead)]
#[br(big)]
pub struct SampleToChunk {
    /// 1-based index of first chunk
    /// that contains the number of
    /// samples specified in `samples_per_chunk`.
    /// The following chunks will all contain the
    /// same number of samples until the next
    /// sample to chunk entry.
    pub(crate) first_chunk: u32,
    /// Number of samples for chunk number
    /// specified by `first_chunk` and on,
    /// until the next sample to chunk entry.
    pub(crate) samples_per_chunk: u32,
    pub(crate) sample_description_id: u32,
}
