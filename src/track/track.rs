//! An MP4 "track", containing compiled information such as time scale,
//! sample descriptions and the final sample index.
//!
//! ```rs
//! let mp4 = Mp4::new(Path::new("VIDEO.MOV"))?;
//! for track in mp4.tracks() {
//!     println!("{} {:?} {} samples", track.id(), track.kind(), track.len());
//! }
//! ```

use time::{Duration, PrimitiveDateTime};
use tracing::{debug, warn};

use crate::{
    atom_types::{find_codec_private, Audio, CodecPrivate, Mdhd, SampleDescription, Tkhd},
    inspect::{CodecInspector, DerivedParameters},
    support::to_ns,
    Mp4Error, ParseOptions,
};

use super::{
    editlist::apply_edit_list,
    framerate::{backfill_durations, estimate_default_duration},
    index::{build_constant, build_variable, IndexEntry},
    tables::SampleTables,
};

/// Media type for a track, derived from the `hdlr` component sub type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackType {
    /// `vide`
    Video,
    /// `soun`
    Audio,
    /// `subp`, `sbtl`, `text`, `subt`, `clcp`, `tx3g`
    Subtitles,
    /// Referenced by another track's `tref/chap`.
    Chapters,
    #[default]
    Unknown,
}

impl TrackType {
    pub fn from_handler(sub_type: &[u8; 4]) -> Self {
        match sub_type {
            b"vide" => Self::Video,
            b"soun" => Self::Audio,
            b"subp" | b"sbtl" | b"text" | b"subt" | b"clcp" | b"tx3g" => Self::Subtitles,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Track {
    /// Track ID from `tkhd`.
    pub(crate) id: u32,
    pub(crate) kind: TrackType,
    /// `hdlr` component sub type.
    pub(crate) handler_type: [u8; 4],
    /// `hdlr` component name.
    pub(crate) name: String,
    pub(crate) tkhd: Option<Tkhd>,
    pub(crate) mdhd: Option<Mdhd>,
    /// Media time scale from `mdhd`.
    pub(crate) time_scale: u32,
    /// Media duration from `mdhd`, in `time_scale` ticks.
    pub(crate) duration: u64,
    /// Constant sample size. 0 if sample sizes vary.
    pub(crate) sample_size: u32,
    pub(crate) descriptions: Vec<SampleDescription>,
    pub(crate) tables: SampleTables,
    /// Track IDs from `tref/chap`.
    pub(crate) chapter_references: Vec<u32>,
    pub(crate) index: Vec<IndexEntry>,
    /// Default sample duration in nanoseconds.
    pub(crate) default_duration: Option<i64>,
    pub(crate) derived: Option<DerivedParameters>,
    /// Set to false on any track level error.
    pub(crate) ok: bool,
}

impl Track {
    pub(crate) fn new() -> Self {
        Self {
            ok: true,
            ..Self::default()
        }
    }

    /// Resolves the raw sample tables and builds the sample index.
    /// `source_len` is the size of the stream in bytes.
    ///
    /// Applies the edit list if enabled, sorts the index by
    /// presentation timestamp, then derives a default sample duration
    /// used to back-fill entries without a valid duration.
    pub(crate) fn finalize(
        &mut self,
        options: &ParseOptions,
        movie_time_scale: u32,
        source_len: u64,
    ) -> Result<(), Mp4Error> {
        if self.time_scale == 0 {
            return Err(Mp4Error::unsupported(self.id, "media time scale is 0"));
        }

        let audio = match self.kind {
            TrackType::Audio => self.descriptions.first().and_then(|d| d.audio()),
            _ => None,
        };
        let is_pcm = self.kind == TrackType::Audio
            && self.descriptions
                .first()
                .is_some_and(|d| d.audio_format().is_pcm());

        self.tables.update(
            self.id,
            &mut self.sample_size,
            is_pcm,
            options.max_sample_size,
            source_len,
        )?;

        let mut index = match self.sample_size {
            0 => build_variable(&self.tables, self.time_scale),
            size => build_constant(&self.tables, size, self.time_scale, audio.as_ref()),
        };

        if self.sample_size == 0 && index.len() != self.tables.sample_table.len() {
            warn!(
                track_id = self.id,
                indexed = index.len(),
                samples = self.tables.sample_table.len(),
                "Chunk table does not cover all samples"
            );
        }

        if options.apply_edit_lists && !self.tables.editlist_table.is_empty() {
            let track_duration = match to_ns(i64::try_from(self.duration).unwrap_or(i64::MAX), self.time_scale) {
                0 => index.iter().map(IndexEntry::end).max().unwrap_or(0),
                d => d,
            };
            apply_edit_list(
                &mut index,
                &self.tables.editlist_table,
                movie_time_scale,
                self.time_scale,
                track_duration,
            );
        }

        // stable, keeps decode order for equal timestamps
        index.sort_by_key(|e| e.timestamp);

        self.default_duration = estimate_default_duration(
            &self.tables,
            self.sample_size,
            self.time_scale,
            &index,
        );
        if let Some(default_duration) = self.default_duration {
            backfill_durations(&mut index, default_duration);
        }

        debug!(
            track_id = self.id,
            kind = ?self.kind,
            entries = index.len(),
            default_duration = ?self.default_duration,
            "Built sample index"
        );

        self.index = index;

        Ok(())
    }

    /// Fills in codec parameters via `inspector` and returns
    /// `true` if the track has what is required to be usable.
    pub(crate) fn verify(&mut self, inspector: &dyn CodecInspector) -> bool {
        let derived = inspector.derive_parameters(self);
        self.derived = derived;

        match self.kind {
            TrackType::Audio => {
                self.channels().is_some_and(|c| c > 0)
                    && self.sample_rate().is_some_and(|r| r > 0.0)
            }
            TrackType::Video => {
                self.width().is_some_and(|w| w > 0)
                    && self.height().is_some_and(|h| h > 0)
            }
            TrackType::Subtitles | TrackType::Chapters => true,
            TrackType::Unknown => false,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> TrackType {
        self.kind
    }

    pub fn is_video(&self) -> bool {
        self.kind == TrackType::Video
    }

    pub fn is_audio(&self) -> bool {
        self.kind == TrackType::Audio
    }

    /// `hdlr` component sub type, e.g. `vide`.
    pub fn handler_type(&self) -> String {
        crate::support::string_from_bytes(self.handler_type)
    }

    /// `hdlr` component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// ISO639-2/T language code. `und` if not specified.
    pub fn language(&self) -> &str {
        self.mdhd.as_ref()
            .map(|m| m.language())
            .unwrap_or("und")
    }

    pub fn time_scale(&self) -> u32 {
        self.time_scale
    }

    /// Media duration in `time_scale` ticks.
    pub fn duration_unscaled(&self) -> u64 {
        self.duration
    }

    /// Media duration.
    pub fn duration(&self) -> Duration {
        Duration::nanoseconds(to_ns(i64::try_from(self.duration).unwrap_or(i64::MAX), self.time_scale))
    }

    pub fn creation_time(&self) -> Option<PrimitiveDateTime> {
        self.mdhd.as_ref().map(|m| m.creation_time())
    }

    pub fn modification_time(&self) -> Option<PrimitiveDateTime> {
        self.mdhd.as_ref().map(|m| m.modification_time())
    }

    pub fn tkhd(&self) -> Option<&Tkhd> {
        self.tkhd.as_ref()
    }

    /// Constant sample size in bytes, 0 if sample sizes vary.
    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }

    pub fn descriptions(&self) -> &[SampleDescription] {
        &self.descriptions
    }

    /// Codec FourCC from the first sample description, e.g. `avc1`.
    pub fn codec(&self) -> Option<String> {
        self.descriptions.first().map(|d| d.format_string())
    }

    /// Codec initialization data (e.g. `avcC`, `esds`)
    /// from the first sample description.
    pub fn codec_private(&self) -> Option<CodecPrivate> {
        let desc = self.descriptions.first()?;
        let atoms = match self.kind {
            TrackType::Video => desc.video_extensions(),
            TrackType::Audio => desc.audio_extensions(),
            _ => return None,
        };
        find_codec_private(atoms)
    }

    fn audio(&self) -> Option<Audio> {
        match self.kind {
            TrackType::Audio => self.descriptions.first()?.audio(),
            _ => None,
        }
    }

    pub fn channels(&self) -> Option<u32> {
        self.audio()
            .map(|a| a.channels())
            .filter(|c| *c > 0)
            .or(self.derived.and_then(|d| d.channels))
    }

    pub fn sample_rate(&self) -> Option<f64> {
        self.audio()
            .map(|a| a.sample_rate())
            .filter(|r| *r > 0.0)
            .or(self.derived.and_then(|d| d.sample_rate))
    }

    pub fn bits_per_sample(&self) -> Option<u32> {
        self.audio()
            .map(|a| a.bits_per_sample())
            .filter(|b| *b > 0)
            .or(self.derived.and_then(|d| d.bits_per_sample))
    }

    /// Width in pixels from the sample description,
    /// the codec inspector, or the track header, in that order.
    pub fn width(&self) -> Option<u32> {
        self.resolution()
            .map(|(w, _)| w)
            .or(self.derived.and_then(|d| d.width))
            .or(self.tkhd.as_ref().map(|t| t.width() as u32).filter(|w| *w > 0))
    }

    /// Height in pixels from the sample description,
    /// the codec inspector, or the track header, in that order.
    pub fn height(&self) -> Option<u32> {
        self.resolution()
            .map(|(_, h)| h)
            .or(self.derived.and_then(|d| d.height))
            .or(self.tkhd.as_ref().map(|t| t.height() as u32).filter(|h| *h > 0))
    }

    fn resolution(&self) -> Option<(u32, u32)> {
        match self.kind {
            TrackType::Video => self.descriptions
                .first()?
                .resolution()
                .map(|(w, h)| (w as u32, h as u32))
                .filter(|(w, h)| *w > 0 && *h > 0),
            _ => None,
        }
    }

    /// Parameters supplied by a `CodecInspector`, if any.
    pub fn derived_parameters(&self) -> Option<&DerivedParameters> {
        self.derived.as_ref()
    }

    pub fn tables(&self) -> &SampleTables {
        &self.tables
    }

    /// Track IDs referenced as chapter tracks.
    pub fn chapter_references(&self) -> &[u32] {
        &self.chapter_references
    }

    /// Sample index, ordered by presentation timestamp.
    pub fn index(&self) -> &[IndexEntry] {
        &self.index
    }

    /// Number of entries in the sample index.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Summed sample size in bytes for the track.
    pub fn size(&self) -> u64 {
        self.index.iter()
            .map(|e| e.size as u64)
            .sum()
    }

    /// Default sample duration in nanoseconds.
    pub fn default_duration(&self) -> Option<i64> {
        self.default_duration
    }

    /// Frames (samples) per second, derived from the default duration.
    pub fn frame_rate(&self) -> Option<f64> {
        self.default_duration
            .filter(|d| *d > 0)
            .map(|d| 1_000_000_000.0 / d as f64)
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }
}
