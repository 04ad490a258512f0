//! MP4 atom FourCC.
//! See https://developer.apple.com/library/archive/documentation/QuickTime/QTFF/QTFFChap2/qtff2.html#//apple_ref/doc/uid/TP40000939-CH204-56313.
//! Unknown FourCC are kept as raw bytes, since some
//! manufacturers use single-byte characters above the ASCII range.

use std::fmt::Display;

/// MP4 atom Four CC.
/// See https://developer.apple.com/library/archive/documentation/QuickTime/QTFF/QTFFChap2/qtff2.html#//apple_ref/doc/uid/TP40000939-CH204-56313.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FourCC {
    /// Chapter track reference
    Chap,
    /// Chunk offset, 64-bit values
    Co64,
    /// Composition offset atom
    Ctts,
    /// Data Information Atoms
    Dinf,
    Edts,
    Elst,
    Free,
    Ftyp,
    Hdlr,
    Mdat,
    Mdhd,
    Mdia,
    /// Movie fragment random access
    Mfra,
    /// Movie fragment header
    Mfhd,
    Minf,
    /// Movie fragment
    Moof,
    /// Movie Atom
    Moov,
    /// Movie extends (fragment defaults)
    Mvex,
    /// Movie Header Atom
    Mvhd,
    /// Progressive download information
    Pdin,
    /// Sample to group
    Sbgp,
    /// Sample group description
    Sgpd,
    Skip,
    Stbl,
    /// Chunk offset, 32-bit values
    Stco,
    Stsc,
    Stsd,
    Stss,
    Stsz,
    Stts,
    /// Track fragment header
    Tfhd,
    Tkhd,
    /// Track fragment
    Traf,
    /// Track description
    Trak,
    Tref,
    /// Track extends (per-track fragment defaults)
    Trex,
    /// Track fragment run
    Trun,
    /// User data
    Udta,
    Wide,

    Custom([u8; 4]),
}

impl FourCC {
    pub fn from_slice(fourcc: &[u8; 4]) -> Self {
        match fourcc {
            b"chap" => Self::Chap,
            b"co64" => Self::Co64,
            b"ctts" => Self::Ctts,
            b"dinf" => Self::Dinf,
            b"edts" => Self::Edts,
            b"elst" => Self::Elst,
            b"free" => Self::Free,
            b"ftyp" => Self::Ftyp,
            b"hdlr" => Self::Hdlr,
            b"mdat" => Self::Mdat,
            b"mdhd" => Self::Mdhd,
            b"mdia" => Self::Mdia,
            b"mfra" => Self::Mfra,
            b"mfhd" => Self::Mfhd,
            b"minf" => Self::Minf,
            b"moof" => Self::Moof,
            b"moov" => Self::Moov,
            b"mvex" => Self::Mvex,
            b"mvhd" => Self::Mvhd,
            b"pdin" => Self::Pdin,
            b"sbgp" => Self::Sbgp,
            b"sgpd" => Self::Sgpd,
            b"skip" => Self::Skip,
            b"stbl" => Self::Stbl,
            b"stco" => Self::Stco,
            b"stsc" => Self::Stsc,
            b"stsd" => Self::Stsd,
            b"stss" => Self::Stss,
            b"stsz" => Self::Stsz,
            b"stts" => Self::Stts,
            b"tfhd" => Self::Tfhd,
            b"tkhd" => Self::Tkhd,
            b"traf" => Self::Traf,
            b"trak" => Self::Trak,
            b"tref" => Self::Tref,
            b"trex" => Self::Trex,
            b"trun" => Self::Trun,
            b"udta" => Self::Udta,
            b"wide" => Self::Wide,
            _ => Self::Custom(*fourcc),
        }
    }

    pub fn from_u32(value: u32) -> Self {
        Self::from_slice(&value.to_be_bytes())
    }

    /// Returns FourCC as bytes, in the same form
    /// they are stored in the MP4.
    pub fn as_bytes(&self) -> [u8; 4] {
        match self {
            Self::Chap => *b"chap",
            Self::Co64 => *b"co64",
            Self::Ctts => *b"ctts",
            Self::Dinf => *b"dinf",
            Self::Edts => *b"edts",
            Self::Elst => *b"elst",
            Self::Free => *b"free",
            Self::Ftyp => *b"ftyp",
            Self::Hdlr => *b"hdlr",
            Self::Mdat => *b"mdat",
            Self::Mdhd => *b"mdhd",
            Self::Mdia => *b"mdia",
            Self::Mfra => *b"mfra",
            Self::Mfhd => *b"mfhd",
            Self::Minf => *b"minf",
            Self::Moof => *b"moof",
            Self::Moov => *b"moov",
            Self::Mvex => *b"mvex",
            Self::Mvhd => *b"mvhd",
            Self::Pdin => *b"pdin",
            Self::Sbgp => *b"sbgp",
            Self::Sgpd => *b"sgpd",
            Self::Skip => *b"skip",
            Self::Stbl => *b"stbl",
            Self::Stco => *b"stco",
            Self::Stsc => *b"stsc",
            Self::Stsd => *b"stsd",
            Self::Stss => *b"stss",
            Self::Stsz => *b"stsz",
            Self::Stts => *b"stts",
            Self::Tfhd => *b"tfhd",
            Self::Tkhd => *b"tkhd",
            Self::Traf => *b"traf",
            Self::Trak => *b"trak",
            Self::Tref => *b"tref",
            Self::Trex => *b"trex",
            Self::Trun => *b"trun",
            Self::Udta => *b"udta",
            Self::Wide => *b"wide",
            Self::Custom(b) => *b,
        }
    }

    /// Returns FourCC as `String`.
    ///
    /// Bytes are mapped as ISO8859-1,
    /// since decoding these as UTF-8 may fail.
    pub fn to_str(&self) -> String {
        self.as_bytes().iter().map(|b| *b as char).collect()
    }

    /// Returns `true` if the atom is a container,
    /// i.e. its data load is a sequence of atoms.
    pub fn is_container(&self) -> bool {
        crate::consts::CONTAINER.contains(self)
    }
}

impl Display for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl Default for FourCC {
    fn default() -> Self {
        Self::Custom([0; 4])
    }
}
