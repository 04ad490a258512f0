//! Track header atom (`tkhd`).
//!
//! Location: `moov/trak[multiple]/tkhd`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/track_header_atom>

use binrw::BinRead;
use time::{Duration, PrimitiveDateTime};

use crate::{consts::mp4_time_zero, support::versioned_u64};

/// Track header atom (`tkhd`).
///
/// Location: `moov/trak[multiple]/tkhd`
#[derive(Debug, Clone, BinRead)]
#[br(big)]
pub struct Tkhd {
    version: u8,
    _flags: [u8; 3],
    /// Seconds since 1904-01-01.
    #[br(parse_with = versioned_u64, args(version))]
    pub(crate) creation_time: u64,
    #[br(parse_with = versioned_u64, args(version))]
    pub(crate) modification_time: u64,
    /// Non-zero, unique within the file.
    pub(crate) track_id: u32,
    _reserved1: [u8; 4],
    /// Movie time scale ticks.
    #[br(parse_with = versioned_u64, args(version))]
    pub(crate) duration: u64,
    _reserved2: [u8; 8],
    _layer: u16,
    _alternate_group: u16,
    /// 8.8 fixed point.
    pub(crate) volume: u16,
    _reserved3: [u8; 2],
    _matrix: [u8; 36],
    /// 16.16 fixed point, pixels.
    pub(crate) track_width: u32,
    pub(crate) track_height: u32,
}

impl Tkhd {
    pub fn track_id(&self) -> u32 {
        self.track_id
    }

    /// Presentation width in pixels, 0 for non-visual tracks.
    pub fn width(&self) -> f64 {
        self.track_width as f64 / 65536.0
    }

    /// Presentation height in pixels, 0 for non-visual tracks.
    pub fn height(&self) -> f64 {
        self.track_height as f64 / 65536.0
    }

    /// 1.0 is full volume.
    pub fn volume(&self) -> f64 {
        self.volume as f64 / 256.0
    }

    /// Duration in the movie time scale.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn creation_time(&self) -> PrimitiveDateTime {
        mp4_time_zero() + Duration::seconds(self.creation_time as i64)
    }

    pub fn modification_time(&self) -> PrimitiveDateTime {
        mp4_time_zero() + Duration::seconds(self.modification_time as i64)
    }
}
