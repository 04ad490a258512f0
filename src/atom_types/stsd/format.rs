//! Sound sample description data formats.

use std::fmt::Display;

/// Audio data format from the sample description FourCC.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AudioFormat {
    /// `NONE` or `raw `, 8-bit offset-binary
    Uncompressed,
    /// `twos` signed big endian
    Twos,
    /// `sowt` signed little endian
    Sowt,
    /// `in24`
    In24,
    /// `in32`
    In32,
    /// `fl32`
    Fl32,
    /// `fl64`
    Fl64,
    /// `lpcm`, layout given by a version 2 description
    Lpcm,
    /// `ulaw` G.711 mu-law
    Ulaw,
    /// `alaw` G.711 A-law
    Alaw,
    /// `ima4`
    Ima4,
    /// `mp4a` MPEG-4 audio, usually AAC
    Mp4a,
    /// `.mp3`
    Mp3,
    /// `ac-3`
    Ac3,
    /// Any other format
    Other([u8; 4]),
}

impl Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fourcc = self.fourcc();
        write!(f, "{}", String::from_utf8_lossy(&fourcc))
    }
}

impl From<&[u8; 4]> for AudioFormat {
    fn from(fourcc: &[u8; 4]) -> Self {
        match fourcc {
            b"NONE" | b"raw " | [0, 0, 0, 0] => Self::Uncompressed,
            b"twos" => Self::Twos,
            b"sowt" => Self::Sowt,
            b"in24" => Self::In24,
            b"in32" => Self::In32,
            b"fl32" => Self::Fl32,
            b"fl64" => Self::Fl64,
            b"lpcm" => Self::Lpcm,
            b"ulaw" => Self::Ulaw,
            b"alaw" => Self::Alaw,
            b"ima4" => Self::Ima4,
            b"mp4a" => Self::Mp4a,
            b".mp3" => Self::Mp3,
            b"ac-3" => Self::Ac3,
            other => Self::Other(*other),
        }
    }
}

impl AudioFormat {
    pub fn fourcc(&self) -> [u8; 4] {
        match self {
            Self::Uncompressed => *b"raw ",
            Self::Twos => *b"twos",
            Self::Sowt => *b"sowt",
            Self::In24 => *b"in24",
            Self::In32 => *b"in32",
            Self::Fl32 => *b"fl32",
            Self::Fl64 => *b"fl64",
            Self::Lpcm => *b"lpcm",
            Self::Ulaw => *b"ulaw",
            Self::Alaw => *b"alaw",
            Self::Ima4 => *b"ima4",
            Self::Mp4a => *b"mp4a",
            Self::Mp3 => *b".mp3",
            Self::Ac3 => *b"ac-3",
            Self::Other(fourcc) => *fourcc,
        }
    }

    /// `true` for uncompressed (PCM) audio and the G.711 formats
    /// that are stored the same way, i.e. one sample per
    /// audio frame with a constant sample size.
    pub fn is_pcm(&self) -> bool {
        matches!(
            self,
            Self::Uncompressed
                | Self::Twos
                | Self::Sowt
                | Self::In24
                | Self::In32
                | Self::Fl32
                | Self::Fl64
                | Self::Lpcm
                | Self::Ulaw
                | Self::Alaw
        )
    }
}
