//! Parse session state, threaded through the atom tree walk.
//!
//! Top-level atoms are read in sequence. `moov` populates per-track
//! sample tables, `moof` extends them. Once the stream has been
//! walked, every track is resolved into a sample index.

use std::{
    collections::{HashMap, HashSet},
    io::{Read, Seek},
};

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::{
    atom::{resync::resync, walker::walk},
    atom_types::{types::AtomType, Co64, Ftyp, Mvhd, Tfhd},
    consts::HEADER_SIZE,
    errors::Severity,
    support::is_human_readable,
    track::{Fragment, TrackDefaults},
    AtomHeader, FourCC, Mp4Error, Mp4Reader, ParseOptions, Track, TrackType,
};

pub(crate) struct ParseContext<R: Read + Seek> {
    pub(crate) reader: Mp4Reader<R>,
    pub(crate) options: ParseOptions,
    pub(crate) ftyp: Option<Ftyp>,
    pub(crate) mvhd: Option<Mvhd>,
    pub(crate) tracks: Vec<Track>,
    /// `trex` defaults per track ID.
    pub(crate) track_defaults: HashMap<u32, TrackDefaults>,
    /// Offset of the current `moof`.
    pub(crate) moof_offset: u64,
    /// End of the data of the most recent fragment run.
    pub(crate) fragment_implicit_offset: u64,
    pub(crate) moov_found: bool,
    pub(crate) mdat_found: bool,
    pub(crate) fragmented: bool,
}

impl<R: Read + Seek> ParseContext<R> {
    pub(crate) fn new(reader: Mp4Reader<R>, options: ParseOptions) -> Self {
        Self {
            reader,
            options,
            ftyp: None,
            mvhd: None,
            tracks: Vec::new(),
            track_defaults: HashMap::new(),
            moof_offset: 0,
            fragment_implicit_offset: 0,
            moov_found: false,
            mdat_found: false,
            fragmented: false,
        }
    }

    /// Walks all top-level atoms, then builds the sample index
    /// for every track. Tracks that fail to resolve are dropped.
    pub(crate) fn parse(&mut self) -> Result<(), Mp4Error> {
        self.parse_top_level()?;

        if !self.moov_found {
            return Err(Mp4Error::MissingRequiredAtom(FourCC::Moov));
        }
        if !self.mdat_found {
            return Err(Mp4Error::MissingRequiredAtom(FourCC::Mdat));
        }

        self.mark_chapter_tracks();
        self.finalize_tracks();

        if self.options.normalize_timestamps {
            normalize_timestamps(&mut self.tracks);
        }

        Ok(())
    }

    fn parse_top_level(&mut self) -> Result<(), Mp4Error> {
        let len = self.reader.len();
        self.reader.seek_to(0)?;

        loop {
            let pos = self.reader.pos()?;
            if len.saturating_sub(pos) < HEADER_SIZE as u64 {
                break;
            }

            let header = match AtomHeader::read(&mut self.reader, len) {
                Ok(hdr) if is_human_readable(&hdr.name.as_bytes()) => Some(hdr),
                Ok(hdr) => {
                    warn!(offset = pos, name = %hdr.name, "Top-level atom name is not readable");
                    None
                }
                Err(err @ (Mp4Error::InvalidAtomSize { .. } | Mp4Error::TruncatedRead { .. })) => {
                    warn!(offset = pos, "{err}");
                    None
                }
                Err(err) => return Err(err),
            };

            let Some(header) = header else {
                if self.options.resync && resync(&mut self.reader, pos)?.is_some() {
                    continue;
                }
                // keep whatever has been parsed so far
                warn!("{}", Mp4Error::ResyncExhausted(pos));
                break;
            };

            if header.end() > len {
                warn!(
                    name = %header.name,
                    offset = header.offset,
                    size = header.atom_size,
                    len,
                    "Top-level atom exceeds stream, truncating"
                );
            }

            trace!(name = %header.name, offset = header.offset, size = header.atom_size, "atom");

            let result = AtomType::read(&mut self.reader, header, self.options.max_payload_size)
                .and_then(|atom| self.handle_top_level(atom));
            if let Err(err) = result {
                match err.severity() {
                    Severity::Fatal => return Err(err),
                    _ => warn!(name = %header.name, offset = header.offset, "Skipped atom: {err}"),
                }
            }

            self.reader.seek_to(header.end().min(len))?;
        }

        Ok(())
    }

    fn handle_top_level(&mut self, atom: AtomType) -> Result<(), Mp4Error> {
        match atom {
            AtomType::Ftyp(ftyp) => self.ftyp = Some(ftyp),
            AtomType::Moov(hdr) => {
                self.moov_found = true;
                self.parse_moov(&hdr)?;
            }
            AtomType::Moof(hdr) => {
                self.fragmented = true;
                self.parse_moof(&hdr)?;
            }
            AtomType::Mdat(hdr) => {
                self.mdat_found = true;
                debug!(offset = hdr.offset, size = hdr.atom_size, "Media data");
            }
            other => trace!("Ignoring top-level {other:?}"),
        }
        Ok(())
    }

    fn read_atom(&mut self, header: AtomHeader) -> Result<AtomType, Mp4Error> {
        AtomType::read(&mut self.reader, header, self.options.max_payload_size)
    }

    fn parse_moov(&mut self, moov: &AtomHeader) -> Result<(), Mp4Error> {
        walk(self, moov, |ctx, child| {
            match ctx.read_atom(child)? {
                AtomType::Mvhd(mvhd) => ctx.mvhd = Some(mvhd),
                AtomType::Trak(hdr) => ctx.parse_trak(&hdr)?,
                AtomType::Mvex(hdr) => ctx.parse_mvex(&hdr)?,
                _ => (),
            }
            Ok(())
        })
    }

    fn parse_trak(&mut self, trak: &AtomHeader) -> Result<(), Mp4Error> {
        let mut track = Track::new();
        walk(self, trak, |ctx, child| ctx.parse_track_atom(&mut track, child))?;

        if track.tkhd.is_none() {
            warn!(offset = trak.offset, "Track without track header");
        }
        debug!(
            track_id = track.id,
            kind = ?track.kind,
            handler = %track.handler_type(),
            time_scale = track.time_scale,
            chunks = track.tables.chunk_table.len(),
            samples = track.tables.sample_table.len(),
            "Read track"
        );

        self.tracks.push(track);
        Ok(())
    }

    /// Handles any atom below `trak`, recursing into containers.
    fn parse_track_atom(&mut self, track: &mut Track, header: AtomHeader) -> Result<(), Mp4Error> {
        match self.read_atom(header)? {
            AtomType::Tref(hdr)
            | AtomType::Edts(hdr)
            | AtomType::Mdia(hdr)
            | AtomType::Minf(hdr)
            | AtomType::Stbl(hdr) => {
                walk(self, &hdr, |ctx, child| ctx.parse_track_atom(track, child))?;
            }
            AtomType::Tkhd(tkhd) => {
                track.id = tkhd.track_id();
                track.tkhd = Some(tkhd);
            }
            AtomType::Mdhd(mdhd) => {
                track.time_scale = mdhd.time_scale();
                track.duration = mdhd.duration_unscaled();
                track.mdhd = Some(mdhd);
            }
            // QuickTime data handler in `minf`
            AtomType::Hdlr(hdlr) if &hdlr.component_type == b"dhlr" => (),
            AtomType::Hdlr(hdlr) => {
                track.handler_type = hdlr.component_sub_type;
                track.kind = TrackType::from_handler(&hdlr.component_sub_type);
                track.name = hdlr.component_name();
            }
            AtomType::Stsd(stsd) => track.descriptions = stsd.descriptions,
            AtomType::Stts(stts) => track.tables.add_time_to_sample(stts),
            AtomType::Ctts(ctts) => track.tables.add_composition_offsets(ctts),
            AtomType::Stsc(stsc) => track.tables.add_sample_to_chunk(stsc),
            AtomType::Stsz(stsz) => track.sample_size = track.tables.add_sample_sizes(stsz),
            AtomType::Stco(stco) => track.tables.add_chunk_offsets(Co64::from(stco)),
            AtomType::Co64(co64) => track.tables.add_chunk_offsets(co64),
            AtomType::Stss(stss) => track.tables.add_sync_samples(stss),
            AtomType::Sbgp(sbgp) => track.tables.add_sample_to_group(sbgp),
            AtomType::Sgpd(sgpd) => track.tables.add_sample_group_description(sgpd),
            AtomType::Elst(elst) => track.tables.editlist_table.extend(elst.edit_list_table),
            AtomType::Chap(chap) => track.chapter_references.extend(chap.track_ids),
            _ => (),
        }
        Ok(())
    }

    fn parse_mvex(&mut self, mvex: &AtomHeader) -> Result<(), Mp4Error> {
        walk(self, mvex, |ctx, child| {
            if let AtomType::Trex(trex) = ctx.read_atom(child)? {
                ctx.track_defaults.insert(trex.track_id(), TrackDefaults::from(&trex));
            }
            Ok(())
        })
    }

    fn parse_moof(&mut self, moof: &AtomHeader) -> Result<(), Mp4Error> {
        self.moof_offset = moof.offset;
        self.fragment_implicit_offset = moof.offset;

        walk(self, moof, |ctx, child| {
            if let AtomType::Traf(hdr) = ctx.read_atom(child)? {
                ctx.parse_traf(&hdr)?;
            }
            Ok(())
        })
    }

    fn parse_traf(&mut self, traf: &AtomHeader) -> Result<(), Mp4Error> {
        let mut fragment: Option<Fragment> = None;

        walk(self, traf, |ctx, child| {
            match ctx.read_atom(child)? {
                AtomType::Tfhd(tfhd) => {
                    // a failed header must not leave the previous fragment in place
                    match ctx.fragment(&tfhd) {
                        Ok(resolved) => fragment = Some(resolved),
                        Err(err) => {
                            fragment = None;
                            return Err(err);
                        }
                    }
                }
                AtomType::Trun(trun) => {
                    let frag = fragment
                        .as_mut()
                        .ok_or(Mp4Error::MissingFragmentHeader(child.offset))?;
                    let track = ctx.tracks
                        .iter_mut()
                        .find(|t| t.id == frag.track_id)
                        .ok_or(Mp4Error::UnknownTrack(frag.track_id))?;
                    // fragments always carry per-sample sizes
                    if track.sample_size != 0 && track.tables.chunk_table.is_empty() {
                        track.sample_size = 0;
                    }
                    ctx.fragment_implicit_offset = track.tables.extend_from_trun(frag, &trun);
                }
                _ => (),
            }
            Ok(())
        })
    }

    /// Resolves `tfhd` against the `trex` defaults for its track.
    fn fragment(&self, tfhd: &Tfhd) -> Result<Fragment, Mp4Error> {
        let track_id = tfhd.track_id();
        if !self.tracks.iter().any(|t| t.id == track_id) {
            return Err(Mp4Error::UnknownTrack(track_id));
        }
        let defaults = match self.track_defaults.get(&track_id) {
            Some(defaults) => *defaults,
            None => {
                debug!(track_id, "No track extends defaults, using zero defaults");
                TrackDefaults::default()
            }
        };
        if tfhd.duration_is_empty() {
            debug!(track_id, "Empty fragment duration");
        }
        Ok(Fragment::new(tfhd, &defaults, self.moof_offset, self.fragment_implicit_offset))
    }

    /// Tracks referenced via `tref/chap` are chapter tracks,
    /// regardless of handler type.
    fn mark_chapter_tracks(&mut self) {
        let chapters = self.tracks
            .iter()
            .flat_map(|t| t.chapter_references.iter().copied())
            .collect::<HashSet<_>>();

        self.tracks
            .iter_mut()
            .filter(|t| chapters.contains(&t.id))
            .for_each(|t| t.kind = TrackType::Chapters);
    }

    fn finalize_tracks(&mut self) {
        let movie_time_scale = self.mvhd.as_ref().map(|m| m.time_scale()).unwrap_or(0);
        let source_len = self.reader.len();
        let options = &self.options;

        let finalize = |track: &mut Track| {
            if let Err(err) = track.finalize(options, movie_time_scale, source_len) {
                warn!(track_id = track.id, severity = ?err.severity(), "Dropping track: {err}");
                track.ok = false;
            }
        };

        if options.parallel {
            self.tracks.par_iter_mut().for_each(&finalize);
        } else {
            self.tracks.iter_mut().for_each(&finalize);
        }

        self.tracks.retain(|t| t.ok);
    }
}

/// Subtracts the smallest timestamp across all tracks
/// from every timestamp, so that the earliest sample starts at 0.
pub(crate) fn normalize_timestamps(tracks: &mut [Track]) {
    let Some(min) = tracks
        .iter()
        .filter_map(|t| t.index.iter().map(|e| e.timestamp).min())
        .min()
    else {
        return;
    };

    debug!(min, "Normalizing timestamps");

    tracks.iter_mut()
        .flat_map(|t| t.index.iter_mut())
        .for_each(|e| e.timestamp -= min);
}
