//! Sample group description atom (`sgpd`).
//!
//! Location: `moov/trak[multiple]/mdia/minf/stbl/sgpd`
//!
//! See: <https://developer.apple.com/documentation/quicktime-file-format/sample_group_description_atom>

use binrw::{BinRead, BinResult};

/// Sample group description atom (`sgpd`).
/// Entries are kept as raw bytes, since their layout
/// depends on the grouping type.
#[derive(Debug, BinRead)]
#[br(big)]
pub struct Sgpd {
    version: u8,
    _flags: [u8; 3],
    pub(crate) grouping_type: [u8; 4],
    /// Size of each entry, 0 means variable (version 1).
    #[br(if(version == 1))]
    pub(crate) default_length: Option<u32>,
    #[br(if(version >= 2))]
    pub(crate) default_sample_description_index: Option<u32>,
    _entry_count: u32,
    #[br(parse_with = parse_entries, args(version, default_length.unwrap_or(0), grouping_type, _entry_count))]
    pub(crate) entries: Vec<Vec<u8>>,
}

impl Sgpd {
    pub fn grouping_type(&self) -> &[u8; 4] {
        &self.grouping_type
    }

    pub fn entries(&self) -> &[Vec<u8>] {
        &self.entries
    }

    pub fn default_sample_description_index(&self) -> Option<u32> {
        self.default_sample_description_index
    }
}

/// Entry size for version 0 atoms, where the size is implied
/// by the grouping type.
fn implied_entry_length(grouping_type: &[u8; 4]) -> u32 {
    match grouping_type {
        b"rap " => 1,
        b"roll" | b"prol" => 2,
        _ => 0,
    }
}

#[binrw::parser(reader, endian)]
fn parse_entries(
    version: u8,
    default_length: u32,
    grouping_type: [u8; 4],
    count: u32,
) -> BinResult<Vec<Vec<u8>>> {
    let mut entries = Vec::new();
    for _ in 0..count {
        let length = match (version, default_length) {
            (1, 0) => u32::read_options(reader, endian, ())?,
            (1, len) => len,
            _ => implied_entry_length(&grouping_type),
        };
        let mut entry = vec![0_u8; length as usize];
        reader.read_exact(&mut entry)?;
        entries.push(entry);
    }
    Ok(entries)
}
