//! Recovers stream position after an invalid top-level atom header.

use std::io::{Read, Seek};

use tracing::debug;

use crate::{
    consts::{HEADER_SIZE, HEADER_SIZE_64, TOP_LEVEL},
    support::is_human_readable,
    Mp4Error, Mp4Reader,
};

/// Bytes read per scan step.
const SCAN_CHUNK_SIZE: u64 = 64 * 1024;

/// Scans forward from `failed_pos + 1` for the next valid top-level atom.
///
/// Candidates are 4-byte sequences matching a known top-level FourCC
/// (`ftyp`, `pdin`, `moov`, `moof`, `mfra`, `mdat`, `free`, `skip`).
/// Two header layouts are tested for each candidate, both starting
/// 4 bytes before the FourCC:
/// - 64-bit size: 32-bit size field is 1, followed by a `u64` size after the FourCC
/// - 32-bit size: 32-bit size field is the total size
///
/// The first candidate with a consistent header size and an atom end
/// within the stream is accepted.
///
/// On success the reader is positioned at the start of the header and
/// its offset is returned. Returns `None` if the scan reaches the end
/// of the stream.
pub(crate) fn resync<R: Read + Seek>(
    reader: &mut Mp4Reader<R>,
    failed_pos: u64,
) -> Result<Option<u64>, Mp4Error> {
    let len = reader.len();
    // FourCC must be preceded by a 32-bit size
    let mut scan_pos = (failed_pos + 1).max(4);

    debug!(offset = failed_pos, "Resyncing");

    while scan_pos + 4 <= len {
        let chunk_len = SCAN_CHUNK_SIZE.min(len - scan_pos);
        let chunk = reader.cursor(scan_pos, chunk_len)?.into_inner();

        for (i, window) in chunk.windows(4).enumerate() {
            if !TOP_LEVEL.iter().any(|tag| tag.as_slice() == window) || !is_human_readable(window) {
                continue;
            }
            let tag_pos = scan_pos + i as u64;
            if let Some(start) = validate_candidate(reader, tag_pos, window)? {
                debug!(offset = start, name = %String::from_utf8_lossy(window), "Resynced");
                reader.seek_to(start)?;
                return Ok(Some(start));
            }
        }

        // overlap 3 bytes so that a FourCC spanning two chunks is found
        if chunk_len < 4 {
            break;
        }
        scan_pos += chunk_len - 3;
    }

    Ok(None)
}

/// Tests both header hypotheses for a FourCC found at `tag_pos`.
fn validate_candidate<R: Read + Seek>(
    reader: &mut Mp4Reader<R>,
    tag_pos: u64,
    tag: &[u8],
) -> Result<Option<u64>, Mp4Error> {
    let len = reader.len();
    let start = tag_pos - 4;

    reader.seek_to(start)?;
    let size32 = reader.read_be::<u32>()?;
    let name = reader.read_be::<[u8; 4]>()?;
    if name.as_slice() != tag {
        return Ok(None);
    }

    // 64-bit size
    if size32 == 1 {
        if len - start < HEADER_SIZE_64 as u64 {
            return Ok(None);
        }
        let size64 = reader.read_be::<u64>()?;
        let valid = size64 >= HEADER_SIZE_64 as u64
            && start.checked_add(size64).is_some_and(|end| end <= len);
        return Ok(valid.then_some(start));
    }

    // 32-bit size, 0 extends to end of stream
    let size = match size32 {
        0 => len - start,
        n => n as u64,
    };
    let valid = size >= HEADER_SIZE as u64 && start + size <= len;

    Ok(valid.then_some(start))
}
