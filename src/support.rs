use binrw::{BinRead, BinResult};

use crate::consts::NS_PER_SEC;

/// Single-byte chars from `[u8; 4]`.
/// Maps 0-255 to `char`, exceeding ascii.
pub(crate) fn chars_from_bytes(bytes: [u8; 4]) -> [char; 4] {
    [
        bytes[0] as char,
        bytes[1] as char,
        bytes[2] as char,
        bytes[3] as char,
    ]
}

/// String from `[u8; 4]`, e.g. a brand or a handler type.
pub(crate) fn string_from_bytes(bytes: [u8; 4]) -> String {
    chars_from_bytes(bytes).iter().collect()
}

/// Counted string. Returns an empty string
/// if the count exceeds the available bytes.
pub(crate) fn counted_string(bytes: &[u8], ignore_null: bool) -> String {
    let Some((count, rest)) = bytes.split_first() else {
        return String::new();
    };
    let Some(chars) = rest.get(..*count as usize) else {
        return String::new();
    };
    match ignore_null {
        true => chars.iter()
            .filter_map(|b| if b != &0 {Some(*b as char)} else {None})
            .collect(),
        false => chars.iter()
            .map(|b| *b as char)
            .collect(),
    }
}

/// `true` if all bytes are printable ASCII (space included).
/// Used by the resync scan to reject random byte matches.
pub(crate) fn is_human_readable(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| (0x20..=0x7e).contains(b))
}

/// Converts `value` in `time_scale` ticks to nanoseconds.
///
/// Computed in 128 bits to avoid overflow for large tick counts.
/// Returns 0 for a zero time scale.
pub fn to_ns(value: i64, time_scale: u32) -> i64 {
    if time_scale == 0 {
        return 0;
    }
    let ns = value as i128 * NS_PER_SEC as i128 / time_scale as i128;
    ns.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Reads a `u64` for version 1 full boxes,
/// and a `u32` widened to `u64` otherwise.
#[binrw::parser(reader, endian)]
pub(crate) fn versioned_u64(version: u8) -> BinResult<u64> {
    match version {
        1 => u64::read_options(reader, endian, ()),
        _ => Ok(u32::read_options(reader, endian, ())? as u64),
    }
}

/// Reads an `i64` for version 1 full boxes,
/// and an `i32` widened to `i64` otherwise.
#[binrw::parser(reader, endian)]
pub(crate) fn versioned_i64(version: u8) -> BinResult<i64> {
    match version {
        1 => i64::read_options(reader, endian, ()),
        _ => Ok(i32::read_options(reader, endian, ())? as i64),
    }
}

/// Full box flags as `u32`.
pub(crate) fn flags_to_u32(flags: [u8; 3]) -> u32 {
    u32::from_be_bytes([0, flags[0], flags[1], flags[2]])
}
