//! Edit list atom (`elst`).
//!
//! Location: `moov/trak[multiple]/edts/elst`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/edit_list_atom>

use binrw::BinRead;

use crate::support::{versioned_i64, versioned_u64};

/// Edit list atom (`elst`).
///
/// Location: `moov/trak[multiple]/edts/elst`
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/edit_list_atom>
#[derive(Debug, Default, BinRead)]
#[br(big)]
pub struct Elst {
    version: u8,
    _flags: [u8; 3],
    _number_of_entries: u32,
    #[br(count = _number_of_entries, args { inner: (version,) })]
    pub(crate) edit_list_table: Vec<EditListEntry>
}

impl Elst {
    pub fn edit_list_table(&self) -> &[EditListEntry] {
        &self.edit_list_table
    }
}

/// Single edit segment.
#[derive(Debug, Default, Clone, Copy, PartialEq, BinRead)]
#[br(big, import(version: u8))]
pub struct EditListEntry {
    /// Duration of this edit in the movie time scale.
    /// 0 means "until the end of the track".
    #[br(parse_with = versioned_u64, args(version))]
    pub segment_duration: u64,
    /// Start time within the media, in the track time scale.
    /// -1 means an empty edit.
    #[br(parse_with = versioned_i64, args(version))]
    pub media_time: i64,
    /// Integer part of the relative play rate.
    pub media_rate_integer: i16,
    /// Fractional part of the relative play rate.
    pub media_rate_fraction: i16,
}

impl EditListEntry {
    /// `true` for an empty edit, i.e. an offset only.
    pub fn is_empty(&self) -> bool {
        self.media_time == -1
    }

    /// `true` for normal play rate (1.0).
    pub fn is_normal_rate(&self) -> bool {
        self.media_rate_integer == 1 && self.media_rate_fraction == 0
    }

    /// `true` for a dwell, i.e. rate 0 on a non-empty edit.
    pub fn is_dwell(&self) -> bool {
        self.media_rate_integer == 0 && self.media_rate_fraction == 0 && !self.is_empty()
    }
}
