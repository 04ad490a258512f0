use std::io::{Read, Seek};

use crate::{
    consts::{HEADER_SIZE, HEADER_SIZE_64},
    FourCC, Mp4Error, Mp4Reader,
};

/// Atom header.
/// 8 or 16 bytes in MP4, depending on whether
/// 32 or 64-bit sized.
/// ```text
/// | [X X X X] [Y Y Y Y] [Z Z Z Z Z Z Z Z] |
///    |         |         |
///    |         |         64bit size (optional, only if 32 bit size == 1)
///    |         FourCC
///    32bit size (0 = atom extends to end of enclosing stream)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AtomHeader {
    /// Total size in bytes including 8/16 byte header.
    pub atom_size: u64,
    /// FourCC
    pub name: FourCC,
    /// Absolute byte offset for start of atom in MP4,
    /// i.e. byte offset where atom size is specified.
    pub offset: u64,
    /// 8 or 16 bytes.
    pub header_size: u8,
}

impl AtomHeader {
    /// Reads atom header at current position.
    ///
    /// `parent_end` is the absolute end of the enclosing atom
    /// (or the stream length at the top level) and is used to
    /// resolve size 0 ("to end of enclosing stream").
    ///
    /// Raises `InvalidAtomSize` if the declared size is
    /// smaller than the header itself.
    pub(crate) fn read<R: Read + Seek>(
        reader: &mut Mp4Reader<R>,
        parent_end: u64,
    ) -> Result<Self, Mp4Error> {
        let offset = reader.pos()?;

        // Read 32bit total atom size
        let size32 = reader.read_be::<u32>()?;

        // Can not read fourcc name as utf-8 since some
        // manufacturers use single-byte extended ascii/ISO8859-1
        let name = reader.fourcc()?;

        let (atom_size, header_size) = match size32 {
            // 64-bit size directly after FourCC
            1 => (reader.read_be::<u64>()?, HEADER_SIZE_64),
            0 => (parent_end.saturating_sub(offset), HEADER_SIZE),
            n => (n as u64, HEADER_SIZE),
        };

        if atom_size < header_size as u64 {
            return Err(Mp4Error::InvalidAtomSize {
                name,
                size: atom_size,
                header_size,
                offset,
            });
        }

        Ok(Self {
            atom_size,
            name,
            offset,
            header_size,
        })
    }

    /// Convenience method to check whether atom is
    /// a container or not.
    pub fn is_container(&self) -> bool {
        self.name.is_container()
    }

    /// Header size in bytes in MP4.
    /// Returns 8 or 16 bytes.
    pub fn header_size(&self) -> u8 {
        self.header_size
    }

    /// Data load absolute offset
    /// (excludes header).
    pub fn data_offset(&self) -> u64 {
        self.offset + self.header_size as u64
    }

    /// Size of data load, adjusted for header size
    /// (excludes header size).
    pub fn data_size(&self) -> u64 {
        self.atom_size - self.header_size as u64
    }

    /// Absolute offset for the end of this atom,
    /// i.e. the offset of the next sibling.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.atom_size)
    }

    /// `true` if `pos` is within atom bounds.
    pub fn contains(&self, pos: u64) -> bool {
        (self.offset..self.end()).contains(&pos)
    }
}
