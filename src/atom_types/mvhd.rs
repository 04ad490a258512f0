//! Movie header atom (`mvhd`).
//! 
//! Location: `moov/mvhd`
//! 
//! See: <https://developer.apple.com/documentation/quicktime-file-format/movie_header_atom>

use binrw::BinRead;
use time::{Duration, ext::NumericalDuration};

use crate::{mp4_time_zero, support::versioned_u64};

/// Movie header atom (`mvhd`).
/// Version 1 uses 64-bit times and duration.
/// 
/// Location: `moov/mvhd`
/// 
/// See: <https://developer.apple.com/documentation/quicktime-file-format/movie_header_atom>
#[derive(Debug, Clone, BinRead)]
#[br(big)]
pub struct Mvhd {
    version: u8,
    _flags: [u8; 3],
    /// Seconds since midnight, 1904-01-01 UTC
    #[br(parse_with = versioned_u64, args(version))]
    pub(crate) creation_time: u64,
    /// Seconds since midnight, 1904-01-01 UTC
    #[br(parse_with = versioned_u64, args(version))]
    pub(crate) modification_time: u64,
    /// Number of time units that pass in one second
    pub(crate) time_scale: u32,
    /// Unscaled duration. I.e. "time units"
    /// that require dividing by time scale
    /// to derive a value in seconds.
    /// 
    /// Corresponds to the longest track.
    #[br(parse_with = versioned_u64, args(version))]
    pub(crate) duration: u64,
    /// Fixed point number (16.16)
    /// representing preferred play rate
    /// (1.0 = normal playback).
    pub(crate) preferred_rate: u32,
    /// Fixed point number (8.8)
    /// representing preferred volume
    /// (1.0 = full volume).
    pub(crate) preferred_volume: u16,
    _reserved: [u8; 10],
    _matrix: [u8; 36], // row-major matrix
    _preview_time: u32,
    _preview_duration: u32,
    _poster_time: u32,
    _selection_time: u32,
    _selection_duration: u32,
    _current_time: u32,
    pub(crate) next_track_id: u32,
}

impl Mvhd {
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn time_scale(&self) -> u32 {
        self.time_scale
    }

    /// Unscaled duration of the longest track.
    pub fn duration_unscaled(&self) -> u64 {
        self.duration
    }

    /// Creation time as UTC datetime.
    /// May default to MP4 default time
    /// `1904-01-01 00:00:00` depending on device and settings.
    pub fn creation_time(&self) -> time::PrimitiveDateTime {
        mp4_time_zero() + Duration::seconds(self.creation_time as i64)
    }

    /// Modification time as UTC datetime.
    pub fn modification_time(&self) -> time::PrimitiveDateTime {
        mp4_time_zero() + Duration::seconds(self.modification_time as i64)
    }

    /// Duration of the longest track in seconds.
    pub fn duration(&self) -> Duration {
        if self.time_scale == 0 {
            return Duration::ZERO;
        }
        (self.duration as f64 / self.time_scale as f64).seconds()
    }

    /// Preferred play rate (1.0 = normal playback).
    pub fn preferred_rate(&self) -> f64 {
        self.preferred_rate as f64 / 2_u32.pow(16) as f64
    }

    /// Preferred volume (1.0 = full volume).
    pub fn preferred_volume(&self) -> f64 {
        self.preferred_volume as f64 / 2_u16.pow(8) as f64
    }

    pub fn next_track_id(&self) -> u32 {
        self.next_track_id
    }
}
