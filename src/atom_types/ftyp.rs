//! File type compatibility atom (`ftyp`).
//!
//! Location: `ftyp` (the very first atom in an MP4 file)
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/file_type_compatibility_atom>

use binrw::{helpers::until_eof, BinRead};

use crate::support::string_from_bytes;

/// File type compatibility atom (`ftyp`).
///
/// Location: `ftyp` (the very first atom in an MP4 file)
///
/// See: <https://developer.apple.com/documentation/quicktime-file-format/file_type_compatibility_atom>
#[derive(Debug, Default, Clone, BinRead)]
#[br(big)]
pub struct Ftyp {
    pub(crate) major_brand: [u8; 4],
    /// MP4: seems to be set to 0.
    /// QuickTime: Four binary-coded decimal values, indicating the century, year, and month of the file format version.
    pub(crate) minor_version: [u8; 4],
    #[br(parse_with = until_eof)]
    pub(crate) compatible_brands: Vec<[u8; 4]>
}

impl Ftyp {
    pub fn major_brand(&self) -> String {
        string_from_bytes(self.major_brand)
    }

    pub fn minor_version(&self) -> &[u8; 4] {
        &self.minor_version
    }

    pub fn compatible_brands(&self) -> Vec<String> {
        self.compatible_brands
            .iter()
            .map(|c| string_from_bytes(*c))
            .collect()
    }

    /// `true` for QuickTime (`qt  `) files.
    pub fn is_quicktime(&self) -> bool {
        &self.major_brand == b"qt  "
    }
}
