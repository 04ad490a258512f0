//! Binary layouts for the atoms used to build track sample tables.

mod chap;
mod co64;
mod ctts;
mod elst;
mod ftyp;
mod hdlr;
mod mdhd;
mod mvhd;
mod sbgp;
mod sgpd;
mod stco;
mod stsc;
mod stsd;
mod stss;
mod stsz;
mod stts;
mod tfhd;
mod tkhd;
mod trex;
mod trun;
pub(crate) mod types;

pub use chap::Chap;
pub use co64::Co64;
pub use ctts::{Ctts, OffsetTableEntry};
pub use elst::{Elst, EditListEntry};
pub use ftyp::Ftyp;
pub use hdlr::Hdlr;
pub use mdhd::Mdhd;
pub use mvhd::Mvhd;
pub use sbgp::{Sbgp, SampleToGroup};
pub use sgpd::Sgpd;
pub use stco::Stco;
pub use stsc::{Stsc, SampleToChunk};
pub use stsd::{Audio, AudioFormat, CodecPrivate, SampleDescription, Stsd, Video};
pub(crate) use stsd::find_codec_private;
pub use stss::Stss;
pub use stsz::Stsz;
pub use stts::{Stts, TimeToSample};
pub use tfhd::Tfhd;
pub use tkhd::Tkhd;
pub use trex::Trex;
pub use trun::{Trun, TrunSample};
