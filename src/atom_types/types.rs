//! Closed set of atom kinds handled by the parser.
//! See atom type in <https://developer.apple.com/documentation/quicktime-file-format/atoms>.

use std::io::{Read, Seek};

use binrw::BinReaderExt;

use crate::{AtomHeader, FourCC, Mp4Error, Mp4Reader};

use super::{
    Chap, Co64, Ctts, Elst, Ftyp, Hdlr, Mdhd, Mvhd, Sbgp, Sgpd, Stco, Stsc, Stsd, Stss, Stsz,
    Stts, Tfhd, Tkhd, Trex, Trun,
};

/// Atom kind with parsed data load for leaf atoms.
/// Containers and atoms without a data load
/// only carry the header.
#[derive(Debug)]
pub(crate) enum AtomType {
    // Containers
    Moov(AtomHeader),
    Trak(AtomHeader),
    Tref(AtomHeader),
    Edts(AtomHeader),
    Mdia(AtomHeader),
    Minf(AtomHeader),
    Dinf(AtomHeader),
    Stbl(AtomHeader),
    Udta(AtomHeader),
    Mvex(AtomHeader),
    Moof(AtomHeader),
    Traf(AtomHeader),

    // Leaf atoms
    Ftyp(Ftyp),
    Mvhd(Mvhd),
    Tkhd(Tkhd),
    Mdhd(Mdhd),
    Hdlr(Hdlr),
    Stsd(Stsd),
    Stts(Stts),
    /// Composition offset atom
    Ctts(Ctts),
    Stsc(Stsc),
    Stsz(Stsz),
    /// Chunk offset, 32-bit values
    Stco(Stco),
    /// Chunk offset, 64-bit values
    Co64(Co64),
    Stss(Stss),
    Sbgp(Sbgp),
    Sgpd(Sgpd),
    Elst(Elst),
    Chap(Chap),
    Trex(Trex),
    Tfhd(Tfhd),
    Trun(Trun),

    /// Media data. Never read into memory.
    Mdat(AtomHeader),
    /// Unknown or unhandled atoms. Skipped.
    Other(AtomHeader),
}

impl AtomType {
    /// Reads the atom with `header`.
    /// Leaf atom data loads larger than `max_payload` bytes
    /// raise `PayloadTooLarge`.
    pub(crate) fn read<R: Read + Seek>(
        reader: &mut Mp4Reader<R>,
        header: AtomHeader,
        max_payload: u64,
    ) -> Result<Self, Mp4Error> {
        let atom = match header.name {
            FourCC::Moov => Self::Moov(header),
            FourCC::Trak => Self::Trak(header),
            FourCC::Tref => Self::Tref(header),
            FourCC::Edts => Self::Edts(header),
            FourCC::Mdia => Self::Mdia(header),
            FourCC::Minf => Self::Minf(header),
            FourCC::Dinf => Self::Dinf(header),
            FourCC::Stbl => Self::Stbl(header),
            FourCC::Udta => Self::Udta(header),
            FourCC::Mvex => Self::Mvex(header),
            FourCC::Moof => Self::Moof(header),
            FourCC::Traf => Self::Traf(header),

            FourCC::Ftyp => Self::Ftyp(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Mvhd => Self::Mvhd(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Tkhd => Self::Tkhd(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Mdhd => Self::Mdhd(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Hdlr => Self::Hdlr(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Stsd => Self::Stsd(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Stts => Self::Stts(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Ctts => Self::Ctts(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Stsc => Self::Stsc(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Stsz => Self::Stsz(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Stco => Self::Stco(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Co64 => Self::Co64(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Stss => Self::Stss(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Sbgp => Self::Sbgp(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Sgpd => Self::Sgpd(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Elst => Self::Elst(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Chap => Self::Chap(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Trex => Self::Trex(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Tfhd => Self::Tfhd(reader.atom_cursor(&header, max_payload)?.read_be()?),
            FourCC::Trun => Self::Trun(reader.atom_cursor(&header, max_payload)?.read_be()?),

            FourCC::Mdat => Self::Mdat(header),
            _ => Self::Other(header),
        };
        Ok(atom)
    }
}
