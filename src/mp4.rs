//! Core MP4 struct and methods.
//!
//! Parsing happens up front: `Mp4::new()` walks the atom tree,
//! resolves every track's sample tables and builds the sample index.
//! Sample data is only read on request.
//!
//! ```rs
//! use qtmp4::Mp4;
//! use std::path::Path;
//!
//! fn main() -> Result<(), qtmp4::Mp4Error> {
//!     let mut mp4 = Mp4::new(Path::new("VIDEO.MOV"))?;
//!
//!     println!("{:?}", mp4.duration());
//!
//!     for track in mp4.tracks() {
//!         println!("{} {:?} {:?}", track.id(), track.kind(), track.frame_rate());
//!     }
//!
//!     // First sample of track 1
//!     let entry = mp4.track(1).and_then(|t| t.index().first().copied());
//!     if let Some(entry) = entry {
//!         let bytes = mp4.read_sample(&entry)?;
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};

use time::{Duration, PrimitiveDateTime};

use crate::{
    atom_types::{Ftyp, Mvhd},
    inspect::CodecInspector,
    parser::{normalize_timestamps, ParseContext},
    track::{IndexEntry, Sample},
    Mp4Error, Mp4Reader, ParseOptions, Track,
};

/// Parsed MP4/QuickTime file or stream.
pub struct Mp4<R: Read + Seek = BufReader<File>> {
    reader: Mp4Reader<R>,
    options: ParseOptions,
    ftyp: Option<Ftyp>,
    mvhd: Option<Mvhd>,
    tracks: Vec<Track>,
    fragmented: bool,
}

impl<R: Read + Seek> std::fmt::Debug for Mp4<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mp4")
            .field("len", &self.reader.len())
            .field("ftyp", &self.ftyp)
            .field("mvhd", &self.mvhd)
            .field("tracks", &self.tracks.len())
            .field("fragmented", &self.fragmented)
            .finish()
    }
}

impl Mp4 {
    /// Opens and parses the MP4 at `path` with default options.
    pub fn new(path: &Path) -> Result<Self, Mp4Error> {
        Self::with_options(path, ParseOptions::default())
    }

    /// Opens and parses the MP4 at `path`.
    pub fn with_options(path: &Path, options: ParseOptions) -> Result<Self, Mp4Error> {
        let file = File::open(path)?;
        let reader = Mp4Reader::with_capacity(file, options.buffer_capacity)?;
        Self::parse(reader, options)
    }
}

impl<R: Read + Seek> Mp4<R> {
    /// Parses any seekable source,
    /// e.g. `Cursor<Vec<u8>>` for an in-memory MP4.
    pub fn from_reader(reader: R, options: ParseOptions) -> Result<Self, Mp4Error> {
        Self::parse(Mp4Reader::new(reader)?, options)
    }

    fn parse(reader: Mp4Reader<R>, options: ParseOptions) -> Result<Self, Mp4Error> {
        let mut ctx = ParseContext::new(reader, options);
        ctx.parse()?;

        Ok(Self {
            reader: ctx.reader,
            options: ctx.options,
            ftyp: ctx.ftyp,
            mvhd: ctx.mvhd,
            tracks: ctx.tracks,
            fragmented: ctx.fragmented,
        })
    }

    /// Returns size in bytes.
    pub fn len(&self) -> u64 {
        self.reader.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reader.len() == 0
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn ftyp(&self) -> Option<&Ftyp> {
        self.ftyp.as_ref()
    }

    pub fn mvhd(&self) -> Option<&Mvhd> {
        self.mvhd.as_ref()
    }

    /// Major brand from `ftyp`, e.g. `qt  ` for QuickTime.
    pub fn major_brand(&self) -> Option<String> {
        self.ftyp.as_ref().map(|f| f.major_brand())
    }

    pub fn compatible_brands(&self) -> Vec<String> {
        self.ftyp.as_ref()
            .map(|f| f.compatible_brands())
            .unwrap_or_default()
    }

    /// Movie time scale from `mvhd`.
    pub fn time_scale(&self) -> Option<u32> {
        self.mvhd.as_ref().map(|m| m.time_scale())
    }

    /// Movie duration from `mvhd`.
    pub fn duration(&self) -> Option<Duration> {
        self.mvhd.as_ref().map(|m| m.duration())
    }

    pub fn creation_time(&self) -> Option<PrimitiveDateTime> {
        self.mvhd.as_ref().map(|m| m.creation_time())
    }

    pub fn modification_time(&self) -> Option<PrimitiveDateTime> {
        self.mvhd.as_ref().map(|m| m.modification_time())
    }

    /// `true` if the file contains movie fragments (`moof`).
    pub fn is_fragmented(&self) -> bool {
        self.fragmented
    }

    /// Tracks that were successfully indexed.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Returns track with ID `id` from `tkhd`.
    pub fn track(&self, id: u32) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == id)
    }

    /// Reads the raw bytes for a single index entry.
    pub fn read_sample(&mut self, entry: &IndexEntry) -> Result<Vec<u8>, Mp4Error> {
        Ok(self.reader.cursor(entry.file_pos, entry.size as u64)?.into_inner())
    }

    /// Returns an iterator over the samples of track `id`,
    /// in presentation order.
    pub fn samples(
        &mut self,
        id: u32,
    ) -> Result<impl Iterator<Item = Result<Sample, Mp4Error>> + '_, Mp4Error> {
        let track = self.tracks
            .iter()
            .find(|t| t.id() == id)
            .ok_or(Mp4Error::UnknownTrack(id))?;
        let reader = &mut self.reader;

        Ok(track.index().iter().map(move |entry| Sample::new(reader, entry)))
    }

    /// Subtracts the smallest timestamp across all tracks from
    /// every index entry, so that the earliest sample starts at 0.
    ///
    /// Done during parsing if `ParseOptions::normalize_timestamps` is set.
    pub fn normalize_timestamps(&mut self) {
        normalize_timestamps(&mut self.tracks)
    }

    /// Verifies every track against its container metadata,
    /// supplemented with whatever `inspector` can derive.
    /// Tracks that lack required codec parameters, and tracks
    /// of unknown type, are dropped.
    ///
    /// Returns the IDs of the dropped tracks.
    pub fn verify_tracks(&mut self, inspector: &dyn CodecInspector) -> Vec<u32> {
        let mut dropped = Vec::new();
        self.tracks.retain_mut(|track| {
            let ok = track.verify(inspector);
            if !ok {
                tracing::warn!(track_id = track.id(), kind = ?track.kind(), "Dropping track without required codec parameters");
                dropped.push(track.id());
            }
            ok
        });
        dropped
    }
}
