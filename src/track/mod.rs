pub(crate) mod editlist;
pub(crate) mod fragment;
pub(crate) mod framerate;
pub(crate) mod index;
mod sample;
pub(crate) mod tables;
mod track;

pub use fragment::{Fragment, TrackDefaults};
pub use index::IndexEntry;
pub use sample::Sample;
pub use tables::{Chunk, ChunkMap, DurMap, FrameOffset, RawSample, SampleTables};
pub use track::{Track, TrackType};
