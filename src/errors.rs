//! Various MP4-related errors.

use thiserror::Error;

use crate::FourCC;

/// How far an error propagates before it is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Stream position may be recovered by resyncing
    /// to the next top-level atom.
    Recoverable,
    /// The current atom (and its children) is skipped,
    /// parsing continues at its sibling.
    Atom,
    /// The track is marked as not ok and excluded from output.
    Track,
    /// Parsing is aborted.
    Fatal,
}

/// MP4 parse errors.
#[derive(Debug, Error)]
pub enum Mp4Error {
    /// Declared atom size is smaller than its own header.
    #[error("Invalid atom size {size} for '{name}' @ offset {offset} (header size {header_size})")]
    InvalidAtomSize {
        name: FourCC,
        size: u64,
        header_size: u8,
        offset: u64,
    },
    /// Short read against a declared size.
    #[error("Read {got} bytes, expected {expected} bytes @ offset {offset}")]
    TruncatedRead { got: u64, expected: u64, offset: u64 },
    /// The track uses a layout that can not be indexed.
    #[error("Unsupported layout in track {track_id}: {reason}")]
    UnsupportedLayout { track_id: u32, reason: String },
    /// Constant sample size combined with more than one sample duration.
    #[error("Track {track_id}: constant sample size and variable sample durations are not supported")]
    ConstantSampleSizeVariableDurationUnsupported { track_id: u32 },
    /// No `moov` or no `mdat`.
    #[error("Missing required atom '{0}'")]
    MissingRequiredAtom(FourCC),
    /// Implausibly large sample. Never propagated out of the
    /// table builders, where the size is clamped to 0 instead.
    #[error("Sample {sample} has an implausible size of {size} bytes (max {max})")]
    CorruptSampleSize { sample: u64, size: u32, max: u32 },
    /// Leaf atom payload exceeds the configured maximum.
    #[error("Atom '{name}' @ offset {offset} has a payload of {size} bytes, max is {max} bytes")]
    PayloadTooLarge {
        name: FourCC,
        size: u64,
        max: u64,
        offset: u64,
    },
    /// `tfhd` refers to a track without `trak` or `trex`.
    #[error("Fragment refers to unknown track {0}")]
    UnknownTrack(u32),
    /// `trun` without a preceding `tfhd` in the same `traf`.
    #[error("Track fragment run @ offset {0} without track fragment header")]
    MissingFragmentHeader(u64),
    /// Seek outside the stream.
    #[error("Bounds error: tried to seek to {pos} in stream of {len} bytes")]
    BoundsError { pos: u64, len: u64 },
    /// Resync engine found no further top-level atom.
    #[error("Lost sync @ offset {0}, no further top-level atom found")]
    ResyncExhausted(u64),
    /// Converted `binrw::Error`.
    #[error("{0}")]
    BinReadError(#[from] binrw::Error),
    /// IO error.
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}

impl Mp4Error {
    pub fn severity(&self) -> Severity {
        match self {
            Mp4Error::InvalidAtomSize { .. } => Severity::Recoverable,
            Mp4Error::TruncatedRead { .. }
            | Mp4Error::CorruptSampleSize { .. }
            | Mp4Error::PayloadTooLarge { .. }
            | Mp4Error::UnknownTrack(_)
            | Mp4Error::MissingFragmentHeader(_)
            | Mp4Error::BinReadError(_) => Severity::Atom,
            Mp4Error::UnsupportedLayout { .. }
            | Mp4Error::ConstantSampleSizeVariableDurationUnsupported { .. } => Severity::Track,
            Mp4Error::MissingRequiredAtom(_)
            | Mp4Error::BoundsError { .. }
            | Mp4Error::ResyncExhausted(_)
            | Mp4Error::IOError(_) => Severity::Fatal,
        }
    }

    /// `true` if the resync engine may recover from this error.
    pub fn is_recoverable(&self) -> bool {
        self.severity() == Severity::Recoverable
    }

    pub(crate) fn unsupported(track_id: u32, reason: impl Into<String>) -> Self {
        Mp4Error::UnsupportedLayout {
            track_id,
            reason: reason.into(),
        }
    }
}

/// Converts Mp4Error to std::io::Error
impl From<Mp4Error> for std::io::Error {
    fn from(err: Mp4Error) -> Self {
        std::io::Error::new(std::io::ErrorKind::Other, err)
    }
}
