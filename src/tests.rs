#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use binrw::BinReaderExt;
    use tracing_subscriber::EnvFilter;

    use crate::{
        atom::{resync::resync, walker::walk},
        atom_types::{EditListEntry, Tfhd, Trex, Trun},
        parser::ParseContext,
        track::{
            editlist::apply_edit_list,
            fragment::is_keyframe,
            framerate::estimate_default_duration,
            tables::{resolve_chunk_map, Chunk, ChunkMap, DurMap, RawSample, SampleTables},
            Fragment, IndexEntry, TrackDefaults,
        },
        AtomHeader, CodecInspector, ContainerOnly, DerivedParameters, FourCC, Mp4, Mp4Error,
        Mp4Reader, ParseOptions, Severity, Track, TrackType,
    };

    const NS: i64 = 1_000_000_000;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    // In-memory atom builder

    fn atom(name: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut bytes = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
        bytes.extend_from_slice(name);
        bytes.extend_from_slice(payload);
        bytes
    }

    fn container(name: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
        atom(name, &children.concat())
    }

    /// Full atom payload: version, 24-bit flags, body.
    fn full(version: u8, flags: u32, body: &[u8]) -> Vec<u8> {
        let mut bytes = vec![version];
        bytes.extend_from_slice(&flags.to_be_bytes()[1..]);
        bytes.extend_from_slice(body);
        bytes
    }

    fn be32(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    fn ftyp() -> Vec<u8> {
        atom(b"ftyp", b"qt  \x20\x05\x03\x00qt  isom")
    }

    fn mvhd(time_scale: u32, duration: u32) -> Vec<u8> {
        let mut body = be32(&[0, 0, time_scale, duration, 0x0001_0000]);
        body.extend_from_slice(&0x0100_u16.to_be_bytes());
        body.extend_from_slice(&[0; 10]);
        body.extend_from_slice(&[0; 36]);
        body.extend_from_slice(&be32(&[0, 0, 0, 0, 0, 0, 3]));
        atom(b"mvhd", &full(0, 0, &body))
    }

    fn tkhd(track_id: u32, width: u32, height: u32) -> Vec<u8> {
        let mut body = be32(&[0, 0, track_id, 0, 0]);
        body.extend_from_slice(&[0; 8]);
        body.extend_from_slice(&[0; 8]); // layer, alternate group, volume, reserved
        body.extend_from_slice(&[0; 36]);
        body.extend_from_slice(&be32(&[width << 16, height << 16]));
        atom(b"tkhd", &full(0, 0, &body))
    }

    fn mdhd(time_scale: u32, duration: u32) -> Vec<u8> {
        let mut body = be32(&[0, 0, time_scale, duration]);
        body.extend_from_slice(&0x15C7_u16.to_be_bytes()); // eng
        body.extend_from_slice(&[0; 2]);
        atom(b"mdhd", &full(0, 0, &body))
    }

    fn hdlr(sub_type: &[u8; 4], name: &str) -> Vec<u8> {
        let mut body = vec![0; 4];
        body.extend_from_slice(sub_type);
        body.extend_from_slice(&[0; 12]);
        body.extend_from_slice(name.as_bytes());
        body.push(0);
        atom(b"hdlr", &full(0, 0, &body))
    }

    fn stsd(format: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut entry = ((data.len() + 16) as u32).to_be_bytes().to_vec();
        entry.extend_from_slice(format);
        entry.extend_from_slice(&[0; 6]);
        entry.extend_from_slice(&1_u16.to_be_bytes());
        entry.extend_from_slice(data);
        let mut body = be32(&[1]);
        body.extend(entry);
        atom(b"stsd", &full(0, 0, &body))
    }

    fn stsd_empty() -> Vec<u8> {
        atom(b"stsd", &full(0, 0, &be32(&[0])))
    }

    fn video_description(width: u16, height: u16) -> Vec<u8> {
        let mut data = vec![0; 16]; // version, revision, vendor, temporal + spatial quality
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&be32(&[0x0048_0000, 0x0048_0000, 0]));
        data.extend_from_slice(&1_u16.to_be_bytes());
        data.extend_from_slice(&[0; 32]);
        data.extend_from_slice(&24_i16.to_be_bytes());
        data.extend_from_slice(&(-1_i16).to_be_bytes());
        data
    }

    fn audio_description(channels: u16, bits: u16, sample_rate: u32, v1: Option<[u32; 4]>) -> Vec<u8> {
        let version: u16 = if v1.is_some() { 1 } else { 0 };
        let mut data = version.to_be_bytes().to_vec();
        data.extend_from_slice(&[0; 6]); // revision, vendor
        data.extend_from_slice(&channels.to_be_bytes());
        data.extend_from_slice(&bits.to_be_bytes());
        data.extend_from_slice(&[0; 4]); // compression id, packet size
        data.extend_from_slice(&(sample_rate << 16).to_be_bytes());
        if let Some(v1) = v1 {
            data.extend_from_slice(&be32(&v1));
        }
        data
    }

    fn stts(runs: &[(u32, u32)]) -> Vec<u8> {
        let mut body = be32(&[runs.len() as u32]);
        runs.iter().for_each(|(n, d)| body.extend(be32(&[*n, *d])));
        atom(b"stts", &full(0, 0, &body))
    }

    fn ctts(runs: &[(u32, i32)]) -> Vec<u8> {
        let mut body = be32(&[runs.len() as u32]);
        runs.iter().for_each(|(n, o)| body.extend(be32(&[*n, *o as u32])));
        atom(b"ctts", &full(0, 0, &body))
    }

    fn stsc(runs: &[(u32, u32, u32)]) -> Vec<u8> {
        let mut body = be32(&[runs.len() as u32]);
        runs.iter().for_each(|(f, n, d)| body.extend(be32(&[*f, *n, *d])));
        atom(b"stsc", &full(0, 0, &body))
    }

    fn stsz(sample_size: u32, count: u32, sizes: &[u32]) -> Vec<u8> {
        let mut body = be32(&[sample_size, count]);
        if sample_size == 0 {
            body.extend(be32(sizes));
        }
        atom(b"stsz", &full(0, 0, &body))
    }

    fn stco(offsets: &[u32]) -> Vec<u8> {
        let mut body = be32(&[offsets.len() as u32]);
        body.extend(be32(offsets));
        atom(b"stco", &full(0, 0, &body))
    }

    fn stss(samples: &[u32]) -> Vec<u8> {
        let mut body = be32(&[samples.len() as u32]);
        body.extend(be32(samples));
        atom(b"stss", &full(0, 0, &body))
    }

    /// `(segment_duration, media_time)`, rate 1.0.
    fn edts(edits: &[(u32, i32)]) -> Vec<u8> {
        let mut body = be32(&[edits.len() as u32]);
        for (segment_duration, media_time) in edits {
            body.extend(be32(&[*segment_duration, *media_time as u32, 0x0001_0000]));
        }
        container(b"edts", &[atom(b"elst", &full(0, 0, &body))])
    }

    fn trak(
        id: u32,
        handler: &[u8; 4],
        time_scale: u32,
        duration: u32,
        extra: Vec<Vec<u8>>,
        stbl: Vec<Vec<u8>>,
    ) -> Vec<u8> {
        let mut children = vec![tkhd(id, 0, 0)];
        children.extend(extra);
        children.push(container(b"mdia", &[
            mdhd(time_scale, duration),
            hdlr(handler, "Handler"),
            container(b"minf", &[container(b"stbl", &stbl)]),
        ]));
        container(b"trak", &children)
    }

    /// `ftyp`, `moov`, `mdat`. `moov` receives the
    /// absolute offset of the `mdat` data load.
    fn movie(moov: impl Fn(u32) -> Vec<Vec<u8>>, mdat: &[u8]) -> Vec<u8> {
        let head = ftyp();
        let moov_len = container(b"moov", &moov(0)).len();
        let base = (head.len() + moov_len + 8) as u32;
        [head, container(b"moov", &moov(base)), atom(b"mdat", mdat)].concat()
    }

    fn parse(bytes: Vec<u8>) -> Mp4<Cursor<Vec<u8>>> {
        parse_with(bytes, ParseOptions::default())
    }

    fn parse_with(bytes: Vec<u8>, options: ParseOptions) -> Mp4<Cursor<Vec<u8>>> {
        init_tracing();
        let result = Mp4::from_reader(Cursor::new(bytes), options);
        if let Err(err) = &result {
            println!("{err}");
        }
        assert!(result.is_ok());
        result.unwrap()
    }

    /// Three video samples of 10, 20 and 30 bytes,
    /// one second each, in a single chunk.
    fn scenario_a(extra_stbl: Vec<Vec<u8>>) -> Vec<u8> {
        let payload = [vec![1_u8; 10], vec![2; 20], vec![3; 30]].concat();
        movie(
            |base| {
                let mut stbl = vec![
                    stsd(b"avc1", &video_description(640, 480)),
                    stts(&[(3, 1000)]),
                    stsc(&[(1, 3, 1)]),
                    stsz(0, 3, &[10, 20, 30]),
                    stco(&[base]),
                ];
                stbl.extend(extra_stbl.clone());
                vec![mvhd(1000, 3000), trak(1, b"vide", 1000, 3000, vec![], stbl)]
            },
            &payload,
        )
    }

    /// `n` one second entries, `keyframe(i)` decides key frames.
    fn one_second_index(n: usize, keyframe: impl Fn(usize) -> bool) -> Vec<IndexEntry> {
        (0..n)
            .map(|i| IndexEntry {
                file_pos: i as u64 * 100,
                size: 100,
                timestamp: i as i64 * NS,
                duration: NS,
                is_keyframe: keyframe(i),
            })
            .collect()
    }

    fn edit(segment_duration: u64, media_time: i64) -> EditListEntry {
        EditListEntry {
            segment_duration,
            media_time,
            media_rate_integer: 1,
            media_rate_fraction: 0,
        }
    }

    fn timestamps(index: &[IndexEntry]) -> Vec<i64> {
        index.iter().map(|e| e.timestamp).collect()
    }

    // Atom reader

    #[test]
    fn header_64bit_size() {
        let mut bytes = vec![0, 0, 0, 1];
        bytes.extend_from_slice(b"mdat");
        bytes.extend_from_slice(&24_u64.to_be_bytes());
        bytes.extend_from_slice(&[0; 8]);
        let len = bytes.len() as u64;

        let mut reader = Mp4Reader::new(Cursor::new(bytes)).unwrap();
        let header = AtomHeader::read(&mut reader, len).unwrap();
        assert_eq!(header.name, FourCC::Mdat);
        assert_eq!(header.atom_size, 24);
        assert_eq!(header.header_size(), 16);
        assert_eq!(header.data_offset(), 16);
        assert_eq!(header.data_size(), 8);
    }

    #[test]
    fn header_size_zero_extends_to_parent_end() {
        let mut bytes = vec![0, 0, 0, 0];
        bytes.extend_from_slice(b"mdat");
        bytes.extend_from_slice(&[0; 12]);

        let mut reader = Mp4Reader::new(Cursor::new(bytes)).unwrap();
        let header = AtomHeader::read(&mut reader, 20).unwrap();
        assert_eq!(header.atom_size, 20);
        assert_eq!(header.header_size(), 8);
        assert_eq!(header.end(), 20);
    }

    #[test]
    fn header_smaller_than_itself_is_invalid() {
        let mut bytes = vec![0, 0, 0, 4];
        bytes.extend_from_slice(b"free");

        let mut reader = Mp4Reader::new(Cursor::new(bytes)).unwrap();
        let err = AtomHeader::read(&mut reader, 8).unwrap_err();
        assert!(matches!(err, Mp4Error::InvalidAtomSize { size: 4, offset: 0, .. }));
        assert_eq!(err.severity(), Severity::Recoverable);
    }

    #[test]
    fn error_severities() {
        assert_eq!(Mp4Error::MissingRequiredAtom(FourCC::Moov).severity(), Severity::Fatal);
        assert_eq!(
            Mp4Error::ConstantSampleSizeVariableDurationUnsupported { track_id: 1 }.severity(),
            Severity::Track
        );
        assert_eq!(
            Mp4Error::TruncatedRead { got: 1, expected: 4, offset: 0 }.severity(),
            Severity::Atom
        );
        let io: std::io::Error = Mp4Error::UnknownTrack(3).into();
        assert!(io.to_string().contains('3'));
    }

    // Atom tree walker

    #[test]
    fn walker_stops_at_child_exceeding_parent() {
        init_tracing();
        let mut overrun = 100_u32.to_be_bytes().to_vec();
        overrun.extend_from_slice(b"skip");
        let parent = container(b"moov", &[
            atom(b"free", &[0; 4]),
            atom(b"udta", &[]),
            overrun,
        ]);
        let len = parent.len() as u64;

        let reader = Mp4Reader::new(Cursor::new(parent)).unwrap();
        let mut ctx = ParseContext::new(reader, ParseOptions::default());
        let header = AtomHeader::read(&mut ctx.reader, len).unwrap();

        let mut names = Vec::new();
        let result = walk(&mut ctx, &header, |_, child| {
            names.push(child.name);
            // atom level errors skip the child only
            match child.name {
                FourCC::Free => Err(Mp4Error::TruncatedRead { got: 0, expected: 4, offset: child.offset }),
                _ => Ok(()),
            }
        });

        assert!(result.is_ok());
        assert_eq!(names, vec![FourCC::Free, FourCC::Udta]);
    }

    #[test]
    fn walker_propagates_track_errors() {
        let parent = container(b"moov", &[atom(b"free", &[0; 4]), atom(b"skip", &[])]);
        let len = parent.len() as u64;

        let reader = Mp4Reader::new(Cursor::new(parent)).unwrap();
        let mut ctx = ParseContext::new(reader, ParseOptions::default());
        let header = AtomHeader::read(&mut ctx.reader, len).unwrap();

        let mut visited = 0;
        let result = walk(&mut ctx, &header, |_, _| {
            visited += 1;
            Err(Mp4Error::unsupported(1, "test"))
        });

        assert!(matches!(result, Err(Mp4Error::UnsupportedLayout { track_id: 1, .. })));
        assert_eq!(visited, 1);
    }

    // Track table builder

    #[test]
    fn chunk_map_single_run_covers_all_chunks() {
        let mut chunks = vec![Chunk::default(); 7];
        let map = [ChunkMap { first_chunk: 0, samples_per_chunk: 4, sample_description_id: 1 }];
        resolve_chunk_map(&mut chunks, &map);

        assert!(chunks.iter().all(|c| c.size == 4 && c.desc == 1));

        // idempotent
        resolve_chunk_map(&mut chunks, &map);
        assert!(chunks.iter().all(|c| c.size == 4));
    }

    #[test]
    fn chunk_map_runs_end_at_successor() {
        let mut chunks = vec![Chunk::default(); 5];
        // fragment chunk, already sized
        chunks[4].size = 1;
        let map = [
            ChunkMap { first_chunk: 0, samples_per_chunk: 3, sample_description_id: 1 },
            ChunkMap { first_chunk: 2, samples_per_chunk: 2, sample_description_id: 2 },
        ];
        resolve_chunk_map(&mut chunks, &map);

        let sizes = chunks.iter().map(|c| c.size).collect::<Vec<_>>();
        let descs = chunks.iter().map(|c| c.desc).collect::<Vec<_>>();
        assert_eq!(sizes, vec![3, 3, 2, 2, 1]);
        assert_eq!(descs, vec![1, 1, 2, 2, 0]);
    }

    #[test]
    fn chunk_accounting_matches_sample_table() {
        let mut tables = SampleTables::default();
        tables.chunk_table = vec![
            Chunk { pos: 100, ..Chunk::default() },
            Chunk { pos: 500, ..Chunk::default() },
            Chunk { pos: 900, ..Chunk::default() },
        ];
        tables.chunkmap_table = vec![
            ChunkMap { first_chunk: 0, samples_per_chunk: 2, sample_description_id: 1 },
            ChunkMap { first_chunk: 2, samples_per_chunk: 1, sample_description_id: 1 },
        ];
        tables.sample_table = [10, 20, 30, 40, 50]
            .iter()
            .map(|size| RawSample { size: *size, ..RawSample::default() })
            .collect();
        tables.durmap_table = vec![DurMap { number: 5, duration: 10 }];

        let mut sample_size = 0;
        tables.update(1, &mut sample_size, false, u32::MAX, 1000).unwrap();

        assert_eq!(tables.num_samples(), tables.sample_table.len() as u64);
        let firsts = tables.chunk_table.iter().map(|c| c.samples).collect::<Vec<_>>();
        assert_eq!(firsts, vec![0, 2, 4]);
        let positions = tables.sample_table.iter().map(|s| s.pos).collect::<Vec<_>>();
        assert_eq!(positions, vec![100, 110, 500, 530, 900]);
        let dts = tables.sample_table.iter().map(|s| s.pts).collect::<Vec<_>>();
        assert_eq!(dts, vec![0, 10, 20, 30, 40]);
    }

    #[test]
    fn constant_size_with_variable_duration_is_a_track_error() {
        let mut tables = SampleTables::default();
        tables.chunk_table = vec![Chunk::default()];
        tables.chunkmap_table = vec![ChunkMap { first_chunk: 0, samples_per_chunk: 4, sample_description_id: 1 }];
        tables.durmap_table = vec![DurMap { number: 2, duration: 1 }, DurMap { number: 2, duration: 2 }];

        let mut sample_size = 2;
        let err = tables.update(7, &mut sample_size, true, u32::MAX, 1000).unwrap_err();
        assert!(matches!(err, Mp4Error::ConstantSampleSizeVariableDurationUnsupported { track_id: 7 }));
        assert_eq!(err.severity(), Severity::Track);
    }

    // Index builder

    #[test]
    fn scenario_a_variable_sample_size() {
        let mp4 = parse(scenario_a(vec![]));
        assert_eq!(mp4.tracks().len(), 1);
        assert_eq!(mp4.major_brand().as_deref(), Some("qt  "));
        assert_eq!(mp4.time_scale(), Some(1000));
        assert!(!mp4.is_fragmented());

        let track = mp4.track(1).unwrap();
        assert_eq!(track.kind(), TrackType::Video);
        assert_eq!(track.name(), "Handler");
        assert_eq!(track.language(), "eng");
        assert_eq!(track.codec().as_deref(), Some("avc1"));
        assert_eq!(track.width(), Some(640));
        assert_eq!(track.height(), Some(480));

        let index = track.index();
        assert_eq!(timestamps(index), vec![0, NS, 2 * NS]);
        assert!(index.iter().all(|e| e.duration == NS));
        assert_eq!(index.iter().map(|e| e.size).collect::<Vec<_>>(), vec![10, 20, 30]);
        assert_eq!(index[1].file_pos, index[0].file_pos + 10);
        assert_eq!(index[2].file_pos, index[0].file_pos + 30);
        // no sync sample table, all key frames
        assert!(index.iter().all(|e| e.is_keyframe));

        assert_eq!(track.default_duration(), Some(NS));
        assert_eq!(track.frame_rate(), Some(1.0));
    }

    #[test]
    fn sync_sample_table_selects_keyframes() {
        let mp4 = parse(scenario_a(vec![stss(&[1, 3])]));
        let keyframes = mp4.track(1).unwrap()
            .index()
            .iter()
            .map(|e| e.is_keyframe)
            .collect::<Vec<_>>();
        assert_eq!(keyframes, vec![true, false, true]);
    }

    #[test]
    fn random_access_point_group_promotes_keyframes() {
        // rap group: version 1, default length 1, one entry
        let mut sgpd = b"rap ".to_vec();
        sgpd.extend(be32(&[1, 1]));
        sgpd.push(0x80);
        let mut sbgp = b"rap ".to_vec();
        sbgp.extend(be32(&[3, 1, 0, 1, 1, 1, 0]));

        let mp4 = parse(scenario_a(vec![
            stss(&[1]),
            atom(b"sbgp", &full(0, 0, &sbgp)),
            atom(b"sgpd", &full(1, 0, &sgpd)),
        ]));
        let keyframes = mp4.track(1).unwrap()
            .index()
            .iter()
            .map(|e| e.is_keyframe)
            .collect::<Vec<_>>();
        assert_eq!(keyframes, vec![true, true, false]);
    }

    /// `sbgp` and `sgpd` for a `rap ` group with a single description.
    /// Runs are `(sample_count, group_description_index)`.
    fn rap_groups(runs: &[(u32, u32)]) -> Vec<Vec<u8>> {
        let mut sgpd = b"rap ".to_vec();
        sgpd.extend(be32(&[1, 1]));
        sgpd.push(0x80);
        let mut sbgp = b"rap ".to_vec();
        sbgp.extend(be32(&[runs.len() as u32]));
        runs.iter().for_each(|(n, i)| sbgp.extend(be32(&[*n, *i])));
        vec![atom(b"sbgp", &full(0, 0, &sbgp)), atom(b"sgpd", &full(1, 0, &sgpd))]
    }

    fn keyframes(mp4: &Mp4<Cursor<Vec<u8>>>) -> Vec<bool> {
        mp4.track(1).unwrap()
            .index()
            .iter()
            .map(|e| e.is_keyframe)
            .collect()
    }

    #[test]
    fn random_access_point_group_is_clamped_to_sample_count() {
        let mut extra = vec![stss(&[1])];
        extra.extend(rap_groups(&[(1, 0), (u32::MAX, 1)]));
        let mp4 = parse(scenario_a(extra));
        assert_eq!(keyframes(&mp4), vec![true, true, true]);
    }

    #[test]
    fn random_access_point_group_promotes_constant_size_chunks() {
        let mut extra = vec![stss(&[1])];
        extra.extend(rap_groups(&[(1200, 0), (1200, 1), (u32::MAX, 0)]));
        let description = audio_description(2, 16, 48000, None);
        let mp4 = parse(pcm_movie(b"twos", description, &[(4800, 1)], extra));
        assert_eq!(mp4.track(1).unwrap().sample_size(), 1);
        assert_eq!(keyframes(&mp4), vec![true, true, false, false]);
    }

    #[test]
    fn constant_size_chunks_use_composition_offset_of_first_sample() {
        let description = audio_description(2, 16, 48000, None);
        let extra = vec![ctts(&[(1200, 0), (1200, 480), (u32::MAX, 0)])];
        let mp4 = parse(pcm_movie(b"twos", description, &[(4800, 1)], extra));
        let index = mp4.track(1).unwrap().index();
        assert_eq!(timestamps(index), vec![0, 35_000_000, 50_000_000, 75_000_000]);
    }

    fn pcm_movie(
        format: &[u8; 4],
        description: Vec<u8>,
        durations: &[(u32, u32)],
        extra_stbl: Vec<Vec<u8>>,
    ) -> Vec<u8> {
        let durations = durations.to_vec();
        movie(
            move |base| {
                let mut stbl = vec![
                    stsd(format, &description),
                    stts(&durations),
                    stsc(&[(1, 1200, 1)]),
                    stsz(1, 4800, &[]),
                    stco(&[base, base + 4800, base + 9600, base + 14400]),
                ];
                stbl.extend(extra_stbl.clone());
                vec![mvhd(1000, 100), trak(1, b"soun", 48000, 4800, vec![], stbl)]
            },
            &vec![0; 19200],
        )
    }

    #[test]
    fn constant_sample_size_pcm_uses_channels_and_bit_depth() {
        let bytes = pcm_movie(b"twos", audio_description(2, 16, 48000, None), &[(4800, 1)], vec![]);
        let mp4 = parse(bytes);
        let track = mp4.track(1).unwrap();

        assert_eq!(track.kind(), TrackType::Audio);
        assert_eq!(track.sample_size(), 1);
        assert_eq!(track.channels(), Some(2));
        assert_eq!(track.sample_rate(), Some(48000.0));

        let index = track.index();
        assert_eq!(index.len(), 4);
        assert!(index.iter().all(|e| e.size == 4800));
        assert_eq!(timestamps(index), vec![0, 25_000_000, 50_000_000, 75_000_000]);
        assert!(index.iter().all(|e| e.duration == 25_000_000));
        assert!(index.iter().all(|e| e.is_keyframe));
    }

    #[test]
    fn constant_sample_size_pcm_prefers_bytes_per_frame() {
        // 24-bit stereo declared through version 1 fields
        let description = audio_description(2, 16, 48000, Some([1, 3, 6, 3]));
        let mp4 = parse(pcm_movie(b"in24", description, &[(4800, 1)], vec![]));
        let index = mp4.track(1).unwrap().index();
        assert_eq!(index.len(), 4);
        assert!(index.iter().all(|e| e.size == 7200));
    }

    #[test]
    fn constant_sample_size_with_variable_durations_drops_track() {
        let description = audio_description(2, 16, 48000, None);
        let mp4 = parse(pcm_movie(b"twos", description, &[(2400, 1), (2400, 2)], vec![]));
        assert!(mp4.tracks().is_empty());
    }

    #[test]
    fn constant_sample_size_without_sizes_is_synthesized() {
        let bytes = movie(
            |base| vec![
                mvhd(1000, 3000),
                trak(1, b"vide", 25, 3, vec![], vec![
                    stsd(b"raw ", &video_description(8, 8)),
                    stts(&[(3, 1)]),
                    stsc(&[(1, 3, 1)]),
                    stsz(100, 3, &[]),
                    stco(&[base]),
                ]),
            ],
            &[0; 300],
        );
        let mp4 = parse(bytes);
        let track = mp4.track(1).unwrap();

        // treated as variable sample size
        assert_eq!(track.sample_size(), 0);
        let index = track.index();
        assert_eq!(index.len(), 3);
        assert!(index.iter().all(|e| e.size == 100));
        assert_eq!(index[2].file_pos - index[0].file_pos, 200);
        assert_eq!(timestamps(index), vec![0, 40_000_000, 80_000_000]);
        assert_eq!(track.frame_rate(), Some(25.0));
    }

    #[test]
    fn chunk_map_beyond_sample_count_is_truncated() {
        let bytes = movie(
            |base| vec![
                mvhd(1000, 3000),
                trak(1, b"vide", 25, 3, vec![], vec![
                    stsd(b"raw ", &video_description(8, 8)),
                    stts(&[(3, 1)]),
                    stsc(&[(1, u32::MAX, 1)]),
                    stsz(100, 3, &[]),
                    stco(&[base, base + 300]),
                ]),
            ],
            &[0; 300],
        );
        let mp4 = parse(bytes);
        let track = mp4.track(1).unwrap();

        assert_eq!(track.tables().samples().len(), 3);
        let index = track.index();
        assert_eq!(index.len(), 3);
        assert_eq!(index[1].file_pos, index[0].file_pos + 100);
        assert_eq!(index[2].file_pos, index[0].file_pos + 200);
    }

    #[test]
    fn synthesized_samples_are_bounded_by_stream_length() {
        let bytes = movie(
            |base| vec![
                mvhd(1000, 3000),
                trak(1, b"vide", 25, 3, vec![], vec![
                    stsd(b"raw ", &video_description(8, 8)),
                    stts(&[(u32::MAX, 1)]),
                    stsc(&[(1, u32::MAX, 1)]),
                    stsz(100, u32::MAX, &[]),
                    stco(&[base; 64]),
                ]),
            ],
            &[0; 300],
        );
        let len = bytes.len();
        let mp4 = parse(bytes);
        let track = mp4.track(1).unwrap();

        assert!(!track.is_empty());
        assert!(track.len() * 100 <= len);
    }

    #[test]
    fn composition_offsets_beyond_sample_count_are_ignored() {
        let mp4 = parse(scenario_a(vec![ctts(&[(50_000_000, 0)])]));
        let track = mp4.track(1).unwrap();
        assert_eq!(track.tables().frame_offsets(), &[0, 0, 0]);
        assert_eq!(timestamps(track.index()), vec![0, NS, 2 * NS]);
    }

    #[test]
    fn oversized_samples_are_clamped() {
        let bytes = movie(
            |base| vec![
                mvhd(1000, 3000),
                trak(1, b"vide", 1000, 3000, vec![], vec![
                    stsd(b"avc1", &video_description(8, 8)),
                    stts(&[(3, 1000)]),
                    stsc(&[(1, 3, 1)]),
                    stsz(0, 3, &[10, 500, 30]),
                    stco(&[base]),
                ]),
            ],
            &[0; 40],
        );
        let mp4 = parse_with(bytes, ParseOptions::default().with_max_sample_size(100));
        let index = mp4.track(1).unwrap().index();
        assert_eq!(index.iter().map(|e| e.size).collect::<Vec<_>>(), vec![10, 0, 30]);
        assert_eq!(index[2].file_pos, index[0].file_pos + 10);
    }

    /// Four samples with composition offsets, presentation
    /// order 1, 4, 2, 3 seconds.
    fn reordered_movie(extra: Vec<Vec<u8>>) -> Vec<u8> {
        movie(
            move |base| vec![
                mvhd(1000, 4000),
                trak(1, b"vide", 1000, 4000, extra.clone(), vec![
                    stsd(b"avc1", &video_description(8, 8)),
                    stts(&[(4, 1000)]),
                    ctts(&[(1, 1000), (1, 3000), (2, 0)]),
                    stsc(&[(1, 4, 1)]),
                    stsz(0, 4, &[1, 1, 1, 1]),
                    stco(&[base]),
                    stss(&[1]),
                ]),
            ],
            &[0; 4],
        )
    }

    #[test]
    fn composition_offsets_are_sorted_into_presentation_order() {
        let mp4 = parse(reordered_movie(vec![]));
        let track = mp4.track(1).unwrap();
        let index = track.index();

        assert_eq!(timestamps(index), vec![NS, 2 * NS, 3 * NS, 4 * NS]);
        assert!(index.windows(2).all(|w| w[1].timestamp >= w[0].timestamp));
        // key frame follows the first sample in decode order
        assert!(index[0].is_keyframe);
        assert_eq!(index.iter().filter(|e| e.is_keyframe).count(), 1);
        // estimated from timestamp deltas
        assert_eq!(track.default_duration(), Some(NS));
    }

    #[test]
    fn normalization_starts_at_zero() {
        let options = ParseOptions::default().with_normalize_timestamps(true);
        let mp4 = parse_with(reordered_movie(vec![]), options);
        let index = mp4.track(1).unwrap().index();
        assert_eq!(timestamps(index), vec![0, NS, 2 * NS, 3 * NS]);
    }

    #[test]
    fn sequential_and_parallel_finalization_agree() {
        let parallel = parse(reordered_movie(vec![]));
        let sequential = parse_with(reordered_movie(vec![]), ParseOptions::default().with_parallel(false));
        assert_eq!(parallel.track(1).unwrap().index(), sequential.track(1).unwrap().index());
    }

    // Edit list applier

    #[test]
    fn dwell_edit_is_ignored() {
        let dwell = EditListEntry {
            media_rate_integer: 0,
            ..edit(3000, 4000)
        };
        assert!(dwell.is_dwell());
        assert!(!edit(3000, -1).is_dwell());

        let mut index = one_second_index(10, |_| true);
        apply_edit_list(&mut index, &[dwell, edit(5000, 2000)], 1000, 1000, 10 * NS);
        assert_eq!(timestamps(&index), vec![0, NS, 2 * NS, 3 * NS, 4 * NS]);
    }

    #[test]
    fn missing_movie_time_scale_uses_track_time_scale() {
        let mut index = one_second_index(10, |_| true);
        apply_edit_list(&mut index, &[edit(2000, 0), edit(2000, 5000)], 0, 1000, 10 * NS);
        assert_eq!(timestamps(&index), vec![0, NS, 2 * NS, 3 * NS]);
        assert_eq!(index[2].file_pos, 500);
    }

    #[test]
    fn multiple_edits_on_reordered_samples_stay_in_presentation_order() {
        let mp4 = parse(reordered_movie(vec![edts(&[(2000, 0), (0, 2000)])]));
        let index = mp4.track(1).unwrap().index();

        assert!(index.windows(2).all(|w| w[1].timestamp >= w[0].timestamp));
        assert_eq!(timestamps(index), vec![NS, NS, 2 * NS, 3 * NS, 4 * NS]);
    }

    #[test]
    fn edit_list_window_is_rebased() {
        // 10s track, edit starts at 2s and lasts 5s
        let mut index = one_second_index(10, |_| true);
        apply_edit_list(&mut index, &[edit(5000, 2000)], 1000, 1000, 10 * NS);

        assert_eq!(timestamps(&index), vec![0, NS, 2 * NS, 3 * NS, 4 * NS]);
        assert_eq!(index[0].file_pos, 200);
        // samples at and after 7s are excluded
        assert!(index.iter().all(|e| e.file_pos < 700));
    }

    #[test]
    fn edit_list_window_starts_at_preceding_keyframe() {
        let mut index = one_second_index(10, |i| i % 5 == 0);
        apply_edit_list(&mut index, &[edit(5000, 2000)], 1000, 1000, 10 * NS);

        assert_eq!(index[0].timestamp, -2 * NS);
        assert_eq!(index[0].file_pos, 0);
        assert!(index[0].is_keyframe);
        assert_eq!(index.len(), 7);
    }

    #[test]
    fn empty_edit_delays_presentation() {
        let mut index = one_second_index(10, |_| true);
        let edits = [edit(1000, -1), edit(0, 0)];
        apply_edit_list(&mut index, &edits, 1000, 1000, 10 * NS);

        assert_eq!(index.len(), 10);
        assert_eq!(index[0].timestamp, NS);
        assert_eq!(index[9].timestamp, 10 * NS);
    }

    #[test]
    fn edit_with_unsupported_rate_is_skipped() {
        let mut index = one_second_index(10, |_| true);
        let original = index.clone();
        let fast = EditListEntry {
            media_rate_integer: 2,
            ..edit(5000, 0)
        };
        apply_edit_list(&mut index, &[fast, edit(0, 0)], 1000, 1000, 10 * NS);
        assert_eq!(index, original);
    }

    #[test]
    fn single_edit_covering_track_shifts_timestamps() {
        let mut index = one_second_index(10, |_| true);
        apply_edit_list(&mut index, &[edit(9000, 1000)], 1000, 1000, 10 * NS);

        assert_eq!(index.len(), 10);
        assert_eq!(index[0].timestamp, -NS);
        assert_eq!(index[9].timestamp, 8 * NS);
    }

    #[test]
    fn duplicated_edit_is_ignored() {
        let mut index = one_second_index(10, |_| true);
        let edits = [edit(10_000, 0), edit(10_000, 0)];
        apply_edit_list(&mut index, &edits, 1000, 1000, 10 * NS);
        assert_eq!(index.len(), 10);
        assert_eq!(timestamps(&index), timestamps(&one_second_index(10, |_| true)));
    }

    #[test]
    fn edit_list_without_output_keeps_index() {
        let mut index = one_second_index(10, |_| true);
        let original = index.clone();
        let edits = [edit(1000, 20_000), edit(1000, 30_000)];
        apply_edit_list(&mut index, &edits, 1000, 1000, 10 * NS);
        assert_eq!(index, original);
    }

    #[test]
    fn edit_list_start_offset_in_file() {
        // single edit skipping the composition delay of the first sample
        let mp4 = parse(reordered_movie(vec![edts(&[(4000, 1000)])]));
        let index = mp4.track(1).unwrap().index();
        assert_eq!(timestamps(index), vec![0, NS, 2 * NS, 3 * NS]);

        let disabled = parse_with(
            reordered_movie(vec![edts(&[(4000, 1000)])]),
            ParseOptions::default().with_edit_lists(false),
        );
        assert_eq!(disabled.track(1).unwrap().index()[0].timestamp, NS);
    }

    // Fragment extender

    fn trex(track_id: u32, duration: u32, size: u32, flags: u32) -> Vec<u8> {
        full(0, 0, &be32(&[track_id, 1, duration, size, flags]))
    }

    fn tfhd(flags: u32, track_id: u32) -> Vec<u8> {
        full(0, flags, &be32(&[track_id]))
    }

    /// `(size, flags)` per sample.
    fn trun(data_offset: Option<i32>, samples: &[(u32, u32)]) -> Vec<u8> {
        let mut flags = 0x200 | 0x400;
        let mut body = be32(&[samples.len() as u32]);
        if let Some(offset) = data_offset {
            flags |= 0x1;
            body.extend(be32(&[offset as u32]));
        }
        samples.iter().for_each(|(size, flags)| body.extend(be32(&[*size, *flags])));
        full(0, flags, &body)
    }

    #[test]
    fn fragment_samples_use_track_defaults() {
        let trex = Cursor::new(trex(1, 1000, 0, 0)).read_be::<Trex>().unwrap();
        let tfhd = Cursor::new(tfhd(0x020000, 1)).read_be::<Tfhd>().unwrap();
        // size only
        let mut trun_bytes = be32(&[2, 100]);
        trun_bytes.extend(be32(&[100, 200]));
        let trun = Cursor::new(full(0, 0x200 | 0x1, &trun_bytes)).read_be::<Trun>().unwrap();

        let defaults = TrackDefaults::from(&trex);
        let mut fragment = Fragment::new(&tfhd, &defaults, 1000, 0);
        assert_eq!(fragment.base_data_offset, 1000);

        let mut tables = SampleTables::default();
        let end = tables.extend_from_trun(&mut fragment, &trun);

        assert_eq!(end, 1400);
        assert_eq!(fragment.implicit_offset, 1400);
        assert_eq!(tables.durmap_table, vec![DurMap { number: 1, duration: 1000 }; 2]);
        assert_eq!(tables.chunk_table.iter().map(|c| c.pos).collect::<Vec<_>>(), vec![1100, 1200]);
        assert_eq!(tables.sample_table.iter().map(|s| s.size).collect::<Vec<_>>(), vec![100, 200]);
        assert_eq!(tables.keyframe_table, vec![1, 2]);
        assert!(tables.sync_from_fragments);
    }

    #[test]
    fn fragment_backfills_offsets_and_keyframes() {
        let mut tables = SampleTables::default();
        tables.sample_table = vec![RawSample::default(); 3];
        let trun = Cursor::new(trun(None, &[(10, 0x0101_0000)])).read_be::<Trun>().unwrap();
        let mut fragment = Fragment {
            implicit_offset: 500,
            ..Fragment::default()
        };

        tables.extend_from_trun(&mut fragment, &trun);

        // earlier samples are key frames, the fragment sample is not
        assert_eq!(tables.keyframe_table, vec![1, 2, 3]);
        assert_eq!(tables.raw_frame_offset_table[0].count, 3);
        assert_eq!(tables.raw_frame_offset_table[0].offset, 0);
        assert_eq!(tables.chunk_table[0].pos, 500);
    }

    #[test]
    fn sample_flags_decide_keyframes() {
        assert!(is_keyframe(0));
        assert!(is_keyframe(0x0200_0000));
        assert!(!is_keyframe(0x0001_0000));
        assert!(!is_keyframe(0x0100_0000));
    }

    fn fragmented_movie(traf: impl Fn(i32) -> Vec<Vec<u8>>) -> (Vec<u8>, u64) {
        let moov = container(b"moov", &[
            mvhd(1000, 0),
            trak(1, b"vide", 1000, 0, vec![], vec![
                stsd(b"avc1", &video_description(8, 8)),
                stts(&[]),
                stsc(&[]),
                stsz(0, 0, &[]),
                stco(&[]),
            ]),
            container(b"mvex", &[atom(b"trex", &trex(1, 1000, 0, 0x0101_0000))]),
        ]);
        let moof = |data_offset: i32| container(b"moof", &[
            atom(b"mfhd", &full(0, 0, &be32(&[1]))),
            container(b"traf", &traf(data_offset)),
        ]);
        let data_offset = moof(0).len() as i32 + 8;
        let head = [ftyp(), moov].concat();
        let data_start = (head.len() as i32 + data_offset) as u64;
        let bytes = [head, moof(data_offset), atom(b"mdat", &[0; 150])].concat();
        (bytes, data_start)
    }

    #[test]
    fn fragmented_file_is_indexed() {
        let (bytes, data_start) = fragmented_movie(|data_offset| vec![
            atom(b"tfhd", &tfhd(0x020000, 1)),
            atom(b"trun", &trun(Some(data_offset), &[(100, 0x0200_0000), (50, 0x0101_0000)])),
        ]);
        let mp4 = parse(bytes);
        assert!(mp4.is_fragmented());

        let index = mp4.track(1).unwrap().index();
        assert_eq!(index.len(), 2);
        assert_eq!(index[0].file_pos, data_start);
        assert_eq!(index[1].file_pos, data_start + 100);
        assert_eq!(timestamps(index), vec![0, NS]);
        assert_eq!(index.iter().map(|e| e.is_keyframe).collect::<Vec<_>>(), vec![true, false]);
    }

    #[test]
    fn fragment_run_without_header_is_skipped() {
        let (bytes, _) = fragmented_movie(|data_offset| vec![
            atom(b"trun", &trun(Some(data_offset), &[(100, 0)])),
        ]);
        let mp4 = parse(bytes);
        assert!(mp4.track(1).unwrap().is_empty());
    }

    #[test]
    fn fragment_for_unknown_track_is_skipped() {
        let (bytes, _) = fragmented_movie(|data_offset| vec![
            atom(b"tfhd", &tfhd(0x020000, 9)),
            atom(b"trun", &trun(Some(data_offset), &[(100, 0)])),
        ]);
        let mp4 = parse(bytes);
        assert_eq!(mp4.tracks().len(), 1);
        assert!(mp4.track(1).unwrap().is_empty());
    }

    // Resync engine

    #[test]
    fn resync_finds_next_top_level_atom() {
        let mut bytes = vec![0, 0, 0, 3];
        bytes.extend_from_slice(b"free");
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        bytes.extend(atom(b"skip", &[0; 8]));

        let mut reader = Mp4Reader::new(Cursor::new(bytes)).unwrap();
        assert!(AtomHeader::read(&mut reader, 32).is_err());

        assert_eq!(resync(&mut reader, 0).unwrap(), Some(16));
        assert_eq!(reader.pos().unwrap(), 16);
    }

    #[test]
    fn resync_accepts_64bit_header() {
        let mut bytes = vec![0xff; 5];
        bytes.extend_from_slice(&[0, 0, 0, 1]);
        bytes.extend_from_slice(b"mdat");
        bytes.extend_from_slice(&24_u64.to_be_bytes());
        bytes.extend_from_slice(&[0; 8]);

        let mut reader = Mp4Reader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(resync(&mut reader, 0).unwrap(), Some(5));
    }

    #[test]
    fn resync_exhausted() {
        let mut reader = Mp4Reader::new(Cursor::new(vec![0xab_u8; 100_000])).unwrap();
        assert_eq!(resync(&mut reader, 0).unwrap(), None);
    }

    fn corrupt_movie() -> Vec<u8> {
        let clean = scenario_a(vec![]);
        let ftyp_len = ftyp().len();
        // invalid top-level atom after `ftyp`, chunk offsets are left stale
        let mut corrupt = vec![0, 0, 0, 3];
        corrupt.extend_from_slice(b"free");
        corrupt.extend_from_slice(&[0; 8]);
        [&clean[..ftyp_len], &corrupt, &clean[ftyp_len..]].concat()
    }

    #[test]
    fn parse_resyncs_after_invalid_top_level_atom() {
        let mp4 = parse(corrupt_movie());
        assert_eq!(mp4.tracks().len(), 1);
        assert_eq!(mp4.track(1).unwrap().len(), 3);
    }

    #[test]
    fn parse_without_resync_stops_at_invalid_atom() {
        init_tracing();
        let result = Mp4::from_reader(
            Cursor::new(corrupt_movie()),
            ParseOptions::default().with_resync(false),
        );
        assert!(matches!(result, Err(Mp4Error::MissingRequiredAtom(FourCC::Moov))));
    }

    #[test]
    fn invalid_nested_size_resumes_at_next_top_level_atom() {
        let mut bytes = scenario_a(vec![]);
        let stsz = bytes.windows(4).position(|w| w == b"stsz").unwrap();
        bytes[stsz - 4..stsz].copy_from_slice(&3_u32.to_be_bytes());

        let mp4 = parse(bytes);
        // `stbl` walk stops at `stsz`, `mdat` is still found
        let track = mp4.track(1).unwrap();
        assert!(track.tables().chunks().is_empty());
        assert!(track.is_empty());
    }

    // Parse session

    #[test]
    fn missing_required_atoms() {
        init_tracing();
        let no_moov = [ftyp(), atom(b"mdat", &[0; 8])].concat();
        let result = Mp4::from_reader(Cursor::new(no_moov), ParseOptions::default());
        assert!(matches!(result, Err(Mp4Error::MissingRequiredAtom(FourCC::Moov))));

        let no_mdat = [ftyp(), container(b"moov", &[mvhd(1000, 0)])].concat();
        let result = Mp4::from_reader(Cursor::new(no_mdat), ParseOptions::default());
        assert!(matches!(result, Err(Mp4Error::MissingRequiredAtom(FourCC::Mdat))));
    }

    #[test]
    fn truncated_mdat_is_tolerated() {
        let mut bytes = scenario_a(vec![]);
        // declare a larger mdat than present
        let mdat_start = bytes.len() - 68;
        bytes[mdat_start..mdat_start + 4].copy_from_slice(&1000_u32.to_be_bytes());
        let mp4 = parse(bytes);
        assert_eq!(mp4.track(1).unwrap().len(), 3);
    }

    #[test]
    fn chapter_references_reclassify_tracks() {
        let bytes = movie(
            |base| vec![
                mvhd(1000, 3000),
                trak(1, b"vide", 1000, 1000, vec![container(b"tref", &[atom(b"chap", &be32(&[2]))])], vec![
                    stsd(b"avc1", &video_description(8, 8)),
                    stts(&[(1, 1000)]),
                    stsc(&[(1, 1, 1)]),
                    stsz(0, 1, &[5]),
                    stco(&[base]),
                ]),
                trak(2, b"text", 1000, 1000, vec![], vec![
                    stsd_empty(),
                    stts(&[(1, 1000)]),
                    stsc(&[(1, 1, 1)]),
                    stsz(0, 1, &[5]),
                    stco(&[base + 5]),
                ]),
            ],
            &[0; 10],
        );
        let mp4 = parse(bytes);
        assert_eq!(mp4.track(1).unwrap().kind(), TrackType::Video);
        assert_eq!(mp4.track(1).unwrap().chapter_references(), &[2]);
        assert_eq!(mp4.track(2).unwrap().kind(), TrackType::Chapters);
    }

    #[test]
    fn read_sample_returns_sample_bytes() {
        let mut mp4 = parse(scenario_a(vec![]));
        let entry = mp4.track(1).unwrap().index()[1];
        assert_eq!(mp4.read_sample(&entry).unwrap(), vec![2; 20]);

        let samples = mp4.samples(1).unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[2].raw(), &[3; 30]);
        assert_eq!(samples[2].timestamp(), time::Duration::seconds(2));
        assert!(samples[0].is_keyframe());

        assert!(matches!(mp4.samples(5).err(), Some(Mp4Error::UnknownTrack(5))));
    }

    fn mixed_movie() -> Vec<u8> {
        let table = |base: u32| vec![
            stts(&[(1, 1000)]),
            stsc(&[(1, 1, 1)]),
            stsz(0, 1, &[5]),
            stco(&[base]),
        ];
        movie(
            move |base| {
                let mut video = vec![stsd(b"avc1", &video_description(320, 240))];
                video.extend(table(base));
                // channels and sample rate missing
                let mut audio = vec![stsd(b"mp4a", &audio_description(0, 16, 0, None))];
                audio.extend(table(base));
                let mut meta = vec![stsd_empty()];
                meta.extend(table(base));
                vec![
                    mvhd(1000, 1000),
                    trak(1, b"vide", 1000, 1000, vec![], video),
                    trak(2, b"soun", 44100, 1000, vec![], audio),
                    trak(3, b"meta", 1000, 1000, vec![], meta),
                ]
            },
            &[0; 5],
        )
    }

    struct StereoAudio;

    impl CodecInspector for StereoAudio {
        fn derive_parameters(&self, track: &Track) -> Option<DerivedParameters> {
            track.is_audio().then_some(DerivedParameters {
                channels: Some(2),
                sample_rate: Some(44100.0),
                ..DerivedParameters::default()
            })
        }
    }

    #[test]
    fn verify_tracks_drops_incomplete_tracks() {
        let mut mp4 = parse(mixed_movie());
        assert_eq!(mp4.tracks().len(), 3);
        assert_eq!(mp4.track(3).unwrap().kind(), TrackType::Unknown);

        let dropped = mp4.verify_tracks(&ContainerOnly);
        assert_eq!(dropped, vec![2, 3]);
        assert_eq!(mp4.tracks().len(), 1);
    }

    #[test]
    fn verify_tracks_uses_derived_parameters() {
        let mut mp4 = parse(mixed_movie());
        let dropped = mp4.verify_tracks(&StereoAudio);
        assert_eq!(dropped, vec![3]);

        let audio = mp4.track(2).unwrap();
        assert_eq!(audio.channels(), Some(2));
        assert_eq!(audio.sample_rate(), Some(44100.0));
    }

    // Frame-rate estimator

    #[test]
    fn estimator_prefers_smallest_most_common_delta() {
        let mut tables = SampleTables::default();
        tables.durmap_table = vec![DurMap { number: 2, duration: 1 }, DurMap { number: 2, duration: 2 }];
        let index = [0, 40, 60, 100, 120]
            .iter()
            .map(|ts| IndexEntry { timestamp: *ts, ..IndexEntry::default() })
            .collect::<Vec<_>>();

        // deltas 40, 20, 40, 20
        assert_eq!(estimate_default_duration(&tables, 0, 1000, &index), Some(20));
    }

    #[test]
    fn estimator_uses_single_duration_run() {
        let mut tables = SampleTables::default();
        tables.durmap_table = vec![DurMap { number: 10, duration: 1001 }];
        assert_eq!(estimate_default_duration(&tables, 0, 30000, &[]), Some(33_366_666));
    }
}
