//! QuickTime/MP4 container parser and sample index builder.
//! Does not and will not support any kind of video de/encoding.
//!
//! Walks the atom tree of a `.mov`/`.mp4` file, reconstructs per-track
//! sample tables (including movie fragments), and builds a flat,
//! presentation ordered sample index per track, corrected by edit lists.
//!
//! The implementation was mostly done with help from
//! <https://developer.apple.com/library/archive/documentation/QuickTime/QTFF/QTFFPreface/qtffPreface.html>
//! and ISO/IEC 14496-12.
//!
//! ```rs
//! use qtmp4::{Mp4, ParseOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), qtmp4::Mp4Error> {
//!     let mp4 = Mp4::with_options(
//!         Path::new("VIDEO.MP4"),
//!         ParseOptions::default().with_normalize_timestamps(true)
//!     )?;
//!
//!     for track in mp4.tracks() {
//!         for entry in track.index() {
//!             println!("{} @{} {}ns key: {}", entry.size, entry.file_pos, entry.timestamp, entry.is_keyframe);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod mp4;
pub mod fourcc;
pub mod atom;
pub mod atom_types;
pub mod consts;
pub mod support;
pub mod track;
pub mod errors;
pub mod inspect;
pub mod options;
mod tests;

// Internal reader and parse session
pub(crate) mod reader;
pub(crate) use reader::Mp4Reader;
pub(crate) mod parser;

pub use mp4::Mp4;
pub use fourcc::FourCC;
pub use atom::AtomHeader;
pub use atom_types::{
    Chap,
    Co64,
    Ctts,
    Elst,
    EditListEntry,
    Ftyp,
    Hdlr,
    Mdhd,
    Mvhd,
    Sbgp,
    Sgpd,
    Stco,
    Stsc,
    Stsd,
    Stss,
    Stsz,
    Stts,
    Tfhd,
    Tkhd,
    Trex,
    Trun,
    Audio, // stsd component
    AudioFormat, // stsd component
    CodecPrivate, // stsd component
    SampleDescription, // stsd component
    Video, // stsd component
};
pub use track::{IndexEntry, Sample, SampleTables, Track, TrackType};
pub use inspect::{CodecInspector, ContainerOnly, DerivedParameters};
pub use options::ParseOptions;
pub use support::to_ns;
pub use consts::{CONTAINER, mp4_time_zero};
pub use errors::{Mp4Error, Severity};
