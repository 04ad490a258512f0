//! Remaps a track's sample index onto the presentation timeline
//! described by its edit list (`elst`).

use tracing::{debug, warn};

use crate::{atom_types::EditListEntry, consts::DUPLICATE_EDIT_TOLERANCE_NS, support::to_ns};

use super::index::IndexEntry;

/// Applies `edits` to `index`.
///
/// Segment durations are in the movie time scale (`mvhd`),
/// media times in the track time scale (`mdhd`).
/// A movie time scale of 0 (no `mvhd`) falls back to the track time scale.
/// `track_duration` is the track's duration in nanoseconds.
///
/// Samples outside all edit windows are dropped.
/// If no samples remain the index is left unchanged.
pub(crate) fn apply_edit_list(
    index: &mut Vec<IndexEntry>,
    edits: &[EditListEntry],
    movie_time_scale: u32,
    time_scale: u32,
    track_duration: i64,
) {
    if edits.is_empty() || index.is_empty() {
        return;
    }

    let movie_time_scale = match movie_time_scale {
        0 => time_scale,
        scale => scale,
    };

    let mut timeline_cts = 0_i64;
    let mut edited: Vec<IndexEntry> = Vec::with_capacity(index.len());

    for (idx, edit) in edits.iter().enumerate() {
        let segment_duration = to_ns(edit.segment_duration as i64, movie_time_scale);

        if edit.is_empty() {
            debug!(idx, segment_duration, "Empty edit");
            timeline_cts += segment_duration;
            continue;
        }

        if edit.is_dwell() {
            warn!(idx, media_time = edit.media_time, segment_duration, "Ignoring dwell edit");
            continue;
        }

        if !edit.is_normal_rate() {
            warn!(
                idx,
                rate_integer = edit.media_rate_integer,
                rate_fraction = edit.media_rate_fraction,
                "Ignoring edit with unsupported play rate"
            );
            continue;
        }

        if edit.segment_duration == 0 && idx + 1 < edits.len() {
            debug!(idx, "Ignoring zero duration edit");
            continue;
        }

        let media_time = to_ns(edit.media_time, time_scale);

        if edits.len() == 1
            && edit.media_time > 0
            && (edit.segment_duration == 0 || media_time + segment_duration >= track_duration)
        {
            debug!(media_time, "Single edit covering the track, shifting timestamps");
            index.iter_mut().for_each(|e| e.timestamp -= media_time);
            return;
        }

        if is_duplicate_edit(edits, idx, timeline_cts, track_duration) {
            debug!(idx, "Ignoring duplicate edit");
            continue;
        }

        let start = media_time;
        let end = start + segment_duration;

        let Some(first) = index.iter().position(|e| e.end() > start) else {
            debug!(idx, start, "Edit starts after the last sample");
            continue;
        };

        // decoding must start at a key frame
        let first = index[..=first]
            .iter()
            .rposition(|e| e.is_keyframe)
            .unwrap_or(0);

        let window = index[first..]
            .iter()
            .take_while(|e| edit.segment_duration == 0 || e.timestamp < end)
            .map(|e| IndexEntry {
                timestamp: timeline_cts + e.timestamp - start,
                ..*e
            });
        edited.extend(window);

        timeline_cts += match edit.segment_duration {
            0 => (track_duration - start).max(0),
            _ => segment_duration,
        };
    }

    if edited.is_empty() {
        warn!("Edit list produced no samples, keeping original index");
        return;
    }

    *index = edited;
}

/// Two-entry edit lists where the second entry repeats the first
/// are written by some muxers in error. The repetition is ignored
/// if the timeline so far is within `DUPLICATE_EDIT_TOLERANCE_NS`
/// of the track duration.
fn is_duplicate_edit(
    edits: &[EditListEntry],
    idx: usize,
    timeline_cts: i64,
    track_duration: i64,
) -> bool {
    edits.len() == 2
        && idx == 1
        && edits[0] == edits[1]
        && (timeline_cts - track_duration).abs() <= DUPLICATE_EDIT_TOLERANCE_NS
}
