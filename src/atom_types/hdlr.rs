//! Handler reference atom (`hdlr`).
//!
//! > Note: Distinguish from 'Metadata handler atom' with the same FourCC.
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/handler_reference_atom>

use binrw::{helpers::until_eof, BinRead};

use crate::support::{counted_string, string_from_bytes};

/// Handler reference atom (`hdlr`)
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/handler_reference_atom>
#[derive(Debug, Default, Clone, BinRead)]
#[br(big)]
pub struct Hdlr {
    _version: u8,
    _flags: [u8; 3],
    /// Possible values:
    /// - `mhlr`: media handler
    /// - `dhlr`: data handler
    /// - `[0, 0, 0, 0]` (MP4, DJI Osmo)
    pub(crate) component_type: [u8; 4],
    /// Four CC for the type of media or data handler,
    /// e.g. `vide`, `soun`, `sbtl`.
    pub(crate) component_sub_type: [u8; 4],
    /// Reserved, should be set to 0.
    pub(crate) component_manufacturer: u32,
    /// Reserved, should be set to 0.
    pub(crate) component_flags: u32,
    /// Reserved, should be set to 0.
    pub(crate) component_flags_mask: u32,
    /// May be a counted string (first byte specifies size),
    /// null terminated string, or neither.
    #[br(parse_with = until_eof)]
    pub(crate) component_name: Vec<u8>,
}

impl Hdlr {
    /// Returns component type as `String`.
    /// Should be either `mhlr` (media handler),
    /// or `dhlr` (data handler).
    pub fn component_type(&self) -> String {
        string_from_bytes(self.component_type)
    }

    /// Returns component sub type as `String`,
    /// e.g. `vide` for video.
    pub fn component_sub_type(&self) -> String {
        string_from_bytes(self.component_sub_type)
    }

    pub fn component_manufacturer(&self) -> u32 {
        self.component_manufacturer
    }

    pub fn component_flags(&self) -> u32 {
        self.component_flags
    }

    pub fn component_flags_mask(&self) -> u32 {
        self.component_flags_mask
    }

    /// Handler name. QuickTime uses counted strings,
    /// MP4 null terminated strings.
    pub fn component_name(&self) -> String {
        let bytes = self.component_name.as_slice();
        // counted if the count covers the remaining bytes,
        // optionally followed by a single null byte
        if let Some(count) = bytes.first().map(|c| *c as usize) {
            if count > 0 && (count + 1 == bytes.len() || count + 2 == bytes.len()) {
                return counted_string(bytes, true);
            }
        }
        bytes.iter()
            .take_while(|b| **b != 0)
            .map(|b| *b as char)
            .collect()
    }
}
