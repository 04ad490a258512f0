//! Sample description. Part of `stsd` atom.

use std::io::Cursor;

use binrw::{BinRead, BinReaderExt};

use crate::{consts::CODEC_PRIVATE, support::string_from_bytes, FourCC};

use super::{Audio, AudioFormat, Video};

#[derive(Debug, Default, Clone, BinRead)]
#[br(big)]
pub struct SampleDescription {
    // General fields. Apply to all stsd atoms.
    // 16 bytes.

    /// Sample description size
    size: u32,
    /// Data format, e.g. `avc1`, `mp4a`, `twos`.
    format: [u8; 4],
    /// Reserved. Must be set to 0.
    _reserved: [u8; 6],
    /// Data reference index
    data_reference_index: u16,

    // Media type specific fields followed by
    // optional child atoms (e.g. `avcC`, `esds`).
    // Size is total, so size of preceding fields
    // (16 bytes) is subtracted.
    #[br(count = size.saturating_sub(16))]
    data: Vec<u8>,
}

/// Codec initialization data, stored as a child atom
/// of the sample description (e.g. `avcC`, `esds`, `dOps`).
#[derive(Debug, Clone, PartialEq)]
pub struct CodecPrivate {
    pub name: FourCC,
    /// Atom data load, excluding header.
    pub data: Vec<u8>,
}

impl SampleDescription {
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn format(&self) -> &[u8; 4] {
        &self.format
    }

    pub fn format_string(&self) -> String {
        string_from_bytes(self.format)
    }

    pub fn data_reference_index(&self) -> u16 {
        self.data_reference_index
    }

    /// Media type specific data load as raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn audio_format(&self) -> AudioFormat {
        AudioFormat::from(&self.format)
    }

    /// Parses data load as a video sample description.
    /// Only meaningful for video tracks.
    pub fn video(&self) -> Option<Video> {
        Cursor::new(&self.data).read_be::<Video>().ok()
    }

    /// Parses data load as a sound sample description (version 0, 1, or 2).
    /// Only meaningful for audio tracks.
    pub fn audio(&self) -> Option<Audio> {
        Cursor::new(&self.data).read_be::<Audio>().ok()
    }

    /// Child atoms following the video specific fields.
    pub fn video_extensions(&self) -> Vec<CodecPrivate> {
        child_atoms(self.data.get(Video::SIZE..).unwrap_or_default())
    }

    /// Child atoms following the audio specific fields.
    pub fn audio_extensions(&self) -> Vec<CodecPrivate> {
        let skip = self.audio().map(|a| a.size()).unwrap_or(self.data.len());
        child_atoms(self.data.get(skip..).unwrap_or_default())
    }

    /// Returns resolution in pixels if the sample description is for video.
    pub fn resolution(&self) -> Option<(u16, u16)> {
        let video = self.video()?;
        Some((video.width(), video.height()))
    }
}

/// Returns the first known codec initialization atom in `atoms`.
pub(crate) fn find_codec_private(atoms: Vec<CodecPrivate>) -> Option<CodecPrivate> {
    atoms.into_iter()
        .find(|a| CODEC_PRIVATE.iter().any(|c| **c == a.name.as_bytes()))
}

/// Reads a sequence of atoms in `bytes`.
/// Stops at the first atom that is too small or exceeds the available bytes.
fn child_atoms(bytes: &[u8]) -> Vec<CodecPrivate> {
    let mut atoms = Vec::new();
    let mut cursor = Cursor::new(bytes);
    let len = bytes.len() as u64;

    while len - cursor.position() >= 8 {
        let start = cursor.position();
        let (Ok(size), Ok(name)) = (cursor.read_be::<u32>(), cursor.read_be::<[u8; 4]>()) else {
            break;
        };
        let size = size as u64;
        if size < 8 || start + size > len {
            break;
        }
        let data = bytes[(start + 8) as usize..(start + size) as usize].to_vec();
        atoms.push(CodecPrivate {
            name: FourCC::from_slice(&name),
            data,
        });
        cursor.set_position(start + size);
    }

    atoms
}
