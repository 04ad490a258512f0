use time::{self, Month, PrimitiveDateTime};

use crate::FourCC;

/// FourCC:s for known "container" atoms.
/// These are nested and contain more atoms,
/// within their specified, total size.
///
/// - `moov`: track tables, timing, metadata
/// - `trak`: moov.trak (multiple)
/// - `tref`: moov.trak.tref, track references (e.g. `chap`)
/// - `edts`: moov.trak.edts, edit list
/// - `mdia`: moov.trak.mdia
/// - `minf`: moov.trak.mdia.minf
/// - `dinf`: moov.trak.mdia.minf.dinf
/// - `stbl`: moov.trak.mdia.minf.stbl, sample tables
/// - `udta`: moov.udta, user data
/// - `mvex`: moov.mvex, fragment defaults (`trex`)
/// - `moof`: movie fragment
/// - `traf`: moof.traf, track fragment
pub const CONTAINER: [FourCC; 12] = [
    FourCC::Moov,
    FourCC::Trak,
    FourCC::Tref,
    FourCC::Edts,
    FourCC::Mdia,
    FourCC::Minf,
    FourCC::Dinf,
    FourCC::Stbl,
    FourCC::Udta,
    FourCC::Mvex,
    FourCC::Moof,
    FourCC::Traf,
];

/// Atoms that may legally appear at the top level.
/// The resync engine scans for these.
pub const TOP_LEVEL: [&[u8; 4]; 8] = [
    b"ftyp", b"pdin", b"moov", b"moof", b"mfra", b"mdat", b"free", b"skip",
];

/// Codec initialization atoms nested in sample descriptions.
pub const CODEC_PRIVATE: [&[u8; 4]; 12] = [
    b"avcC", b"hvcC", b"esds", b"dOps", b"dac3", b"dec3",
    b"dfLa", b"av1C", b"vpcC", b"glbl", b"alac", b"wave",
];

/// Minimum atom header size (32-bit size + FourCC).
pub const HEADER_SIZE: u8 = 8;

/// Atom header size with 64-bit size extension.
pub const HEADER_SIZE_64: u8 = 16;

/// Samples larger than this are considered corrupt
/// and have their size clamped to 0.
pub const MAX_SAMPLE_SIZE: u32 = 100 * 1024 * 1024;

/// Default upper bound for a leaf atom payload read into memory.
pub const MAX_PAYLOAD_SIZE: u64 = 1024 * 1024 * 1024;

/// Nanoseconds per second.
pub const NS_PER_SEC: i64 = 1_000_000_000;

/// Tolerance for the duplicated two-entry edit list heuristic.
pub const DUPLICATE_EDIT_TOLERANCE_NS: i64 = 60 * NS_PER_SEC;

/// `tfhd` flags.
pub mod tfhd {
    pub const BASE_DATA_OFFSET: u32 = 0x00_0001;
    pub const SAMPLE_DESCRIPTION_INDEX: u32 = 0x00_0002;
    pub const DEFAULT_SAMPLE_DURATION: u32 = 0x00_0008;
    pub const DEFAULT_SAMPLE_SIZE: u32 = 0x00_0010;
    pub const DEFAULT_SAMPLE_FLAGS: u32 = 0x00_0020;
    pub const DURATION_IS_EMPTY: u32 = 0x01_0000;
    pub const DEFAULT_BASE_IS_MOOF: u32 = 0x02_0000;
}

/// `trun` flags.
pub mod trun {
    pub const DATA_OFFSET: u32 = 0x00_0001;
    pub const FIRST_SAMPLE_FLAGS: u32 = 0x00_0004;
    pub const SAMPLE_DURATION: u32 = 0x00_0100;
    pub const SAMPLE_SIZE: u32 = 0x00_0200;
    pub const SAMPLE_FLAGS: u32 = 0x00_0400;
    pub const SAMPLE_COMPOSITION_TIME_OFFSET: u32 = 0x00_0800;
}

/// Sample flags (`trex`, `tfhd`, `trun`).
pub mod sample_flags {
    /// `sample_is_non_sync_sample`
    pub const IS_NON_SYNC: u32 = 0x0001_0000;
    /// `sample_depends_on` occupies bits 24-25.
    pub const DEPENDS_ON_SHIFT: u32 = 24;
    /// `sample_depends_on == 1`: depends on other samples.
    pub const DEPENDS_ON_OTHERS: u32 = 1;
}

/// Time zero for MP4 containers. Midnight January 1, 1904.
pub fn mp4_time_zero() -> PrimitiveDateTime {
    match time::Date::from_calendar_date(1904, Month::January, 1) {
        Ok(date) => date.midnight(),
        Err(_) => PrimitiveDateTime::MIN,
    }
}
