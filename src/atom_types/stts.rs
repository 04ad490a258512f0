//! Time-to-sample atom (`stts`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/stts`
//!
//! See <https://developer.apple.com/documentation/quicktime-file-format/time-to-sample_atom>

use binrw::BinRead;

#[derive(Debug, Clone, Copy, BinRead)]
#[br(big)]
pub struct TimeToSample {
    pub(crate) sample_count: u32,
    pub(crate) sample_duration: u32,
}

impl TimeToSample {
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn sample_duration(&self) -> u32 {
        self.sample_duration
    }
}

/// Time to sample atom (`stts`).
///
/// Path: `moov/trak[multiple]/mdia/minf/stbl/stts`
///
/// See <https://developer.apple.com/documentation/quicktime-file-format/time-to-sample_atom>
#[derive(Debug, BinRead)]
#[br(big)]
pub struct Stts {
    _version: u8,
    _flags: [u8; 3],
    _no_of_entries: u32,
    #[br(count = _no_of_entries)]
    pub(crate) table: Vec<TimeToSample>
}

impl Stts {
    /// Returns total number of samples.
    ///
    /// If an entry lists a duration for four samples,
    /// it counts as four entries towards the total.
    pub fn len(&self) -> u64 {
        self.table.iter()
            .map(|t| t.sample_count as u64)
            .sum()
    }

    pub fn table(&self) -> &[TimeToSample] {
        &self.table
    }
}
