// crates/subcut-core/src/session.rs
//
// Command processing for the editing session. Front ends emit EditorCommands
// and drain worker results; everything funnels through `apply` and
// `apply_result`, so this file is the single place segment data mutates.
//
// The time-edit rules are the subtle part:
//   - SetTime (keystroke): store the raw string FIRST, then report the first
//     failing check on the error channel. The user keeps typing either way.
//   - CommitTime (blur): bad format reverts the field to the backend-sourced
//     value; a valid-but-inverted bound is pulled to 1 ms inside the opposite
//     bound. After every blur, end > start holds.

use crate::api_types::{ClientResult, SegmentDto};
use crate::commands::EditorCommand;
use crate::helpers::time::is_valid_timestamp;
use crate::state::{Segment, SessionState, TimeBound, TimeField};
use crate::tracker;

/// Smallest representable display-time step. Blur repair places the violating
/// bound exactly this far inside the opposite bound.
const ONE_MS: f64 = 0.001;

impl SessionState {
    /// Replace the session contents with a fresh batch of backend segments.
    /// Everything derived (clock, error, active index, artifacts) resets —
    /// a new upload discards the previous editing pass wholesale.
    pub fn load_segments(&mut self, dtos: Vec<SegmentDto>, filename: String) {
        self.segments = dtos
            .iter()
            .map(|d| Segment::from_backend(d.start, d.end, &d.text))
            .collect();
        self.filename       = filename;
        self.session_error  = None;
        self.current_time   = 0.0;
        self.is_playing     = false;
        self.active_segment = None;
        self.srt_url        = None;
        self.output_video   = None;
    }

    pub fn apply(&mut self, cmd: EditorCommand) {
        match cmd {
            // ── Text editing ─────────────────────────────────────────────────
            EditorCommand::SetText { index, text } => {
                if let Some(seg) = self.segments.get_mut(index) {
                    seg.text = text.trim_start().to_string();
                }
            }

            // ── Time editing ─────────────────────────────────────────────────
            EditorCommand::SetTime { index, bound, value } => {
                self.set_time(index, bound, value);
            }
            EditorCommand::CommitTime { index, bound, value } => {
                self.commit_time(index, bound, value);
            }

            // ── Structure ────────────────────────────────────────────────────
            EditorCommand::MergeWithNext(index) => {
                self.merge_with_next(index);
                self.retrack();
            }
            EditorCommand::InsertAfter(index) => {
                self.insert_after(index);
                self.retrack();
            }
            EditorCommand::Delete(index) => {
                if index < self.segments.len() {
                    self.segments.remove(index);
                    self.retrack();
                }
            }

            // ── Playback ─────────────────────────────────────────────────────
            EditorCommand::SetPlayhead(t) => {
                self.current_time = t;
                self.retrack();
            }
            EditorCommand::Play => {
                self.is_playing = true;
            }
            EditorCommand::Pause => {
                self.is_playing = false;
            }
            EditorCommand::Stop => {
                self.is_playing   = false;
                self.current_time = 0.0;
                self.retrack();
            }

            // ── Session ──────────────────────────────────────────────────────
            EditorCommand::ClearError => {
                self.session_error = None;
            }
        }
    }

    /// Playback-clock callback: update the clock and recompute the active
    /// segment. Returns true only when the active index changed, so observers
    /// re-render once per transition rather than once per tick.
    pub fn playback_tick(&mut self, time: f64) -> bool {
        self.current_time = time;
        self.retrack()
    }

    fn retrack(&mut self) -> bool {
        let idx = tracker::segment_at(&self.segments, self.current_time);
        let changed = idx != self.active_segment;
        self.active_segment = idx;
        changed
    }

    // ── Time-edit rules ──────────────────────────────────────────────────────

    fn set_time(&mut self, index: usize, bound: TimeBound, value: String) {
        let Some(seg) = self.segments.get_mut(index) else { return };

        // The input must reflect keystrokes — store before any check, and
        // never roll back on failure.
        seg.bound_mut(bound).set_raw(value);

        let n = index + 1;
        if !seg.bound(bound).is_strict() {
            self.session_error =
                Some(format!("Invalid time format for segment {n}. Use HH:MM:SS,mmm"));
            return;
        }

        // Strict format guarantees the edited bound parses; the opposite
        // bound may not (mid-edit elsewhere) — that counts as a violation,
        // since the ordering invariant can't be shown to hold.
        let edited   = seg.bound(bound).seconds();
        let opposite = seg.bound(bound.other()).seconds();
        let ordered = match (bound, edited, opposite) {
            (TimeBound::Start, Some(s), Some(e)) => s < e,
            (TimeBound::End,   Some(e), Some(s)) => e > s,
            _                                    => false,
        };
        if !ordered {
            self.session_error = Some(match bound {
                TimeBound::Start => {
                    format!("Start time must be less than end time in segment {n}")
                }
                TimeBound::End => {
                    format!("End time must be greater than start time in segment {n}")
                }
            });
            return;
        }

        self.session_error = None;
    }

    fn commit_time(&mut self, index: usize, bound: TimeBound, value: String) {
        let Some(seg) = self.segments.get_mut(index) else { return };

        if !is_valid_timestamp(&value) {
            // Revert all the way to the value last received from the backend
            // for this bound — not the last valid edit.
            let revert = seg.source_bound(bound);
            *seg.bound_mut(bound) = TimeField::from_seconds(revert);
            self.session_error = None;
            return;
        }

        seg.bound_mut(bound).set_raw(value);

        // Ordering repair: rather than rejecting an inverted bound, pull it
        // to 1 ms inside the opposite one. Precision traded for the
        // guarantee that end > start after every blur.
        let edited   = seg.bound(bound).seconds();
        let opposite = seg.bound(bound.other()).seconds();
        if let (Some(edited), Some(opposite)) = (edited, opposite) {
            let inverted = match bound {
                TimeBound::Start => edited >= opposite,
                TimeBound::End   => edited <= opposite,
            };
            if inverted {
                let repaired = match bound {
                    TimeBound::Start => (opposite - ONE_MS).max(0.0),
                    TimeBound::End   => opposite + ONE_MS,
                };
                *seg.bound_mut(bound) = TimeField::from_seconds(repaired);
            }
        }

        self.session_error = None;
    }

    // ── Structural edits ─────────────────────────────────────────────────────

    fn merge_with_next(&mut self, index: usize) {
        if index + 1 >= self.segments.len() {
            self.session_error = Some("No segment to merge with.".to_string());
            return;
        }
        let next = self.segments.remove(index + 1);
        let seg  = &mut self.segments[index];
        seg.text.push(' ');
        seg.text.push_str(&next.text);
        // Adopt the next segment's end verbatim (display string and revert
        // target both) — the merged span now answers for it.
        seg.end        = next.end;
        seg.source_end = next.source_end;
    }

    fn insert_after(&mut self, index: usize) {
        let Some(seg) = self.segments.get(index) else { return };

        let cur_end = seg.end.seconds().unwrap_or(seg.source_end);
        let new_end = match self.segments.get(index + 1).and_then(|n| n.start.seconds()) {
            // Midpoint of the gap keeps the new segment clear of both
            // neighbors under non-degenerate input.
            Some(next_start) => (cur_end + next_start) / 2.0,
            None             => cur_end + 1.0,
        };

        self.segments.insert(index + 1, Segment::inserted(cur_end, new_end));
    }

    // ── Save gating ──────────────────────────────────────────────────────────

    /// True when every segment's bounds pass strict validation.
    pub fn validate_all(&self) -> bool {
        self.segments
            .iter()
            .all(|s| s.start.is_strict() && s.end.is_strict())
    }

    /// Numeric export of the session, or None when any bound fails strict
    /// validation — the save path must never transmit unparsed timestamps.
    /// Trailing text whitespace is stripped here (commit-time policy).
    pub fn export_seconds(&self) -> Option<Vec<SegmentDto>> {
        if !self.validate_all() {
            return None;
        }
        self.segments
            .iter()
            .map(|s| {
                Some(SegmentDto {
                    start: s.start.seconds()?,
                    end:   s.end.seconds()?,
                    text:  s.text.trim().to_string(),
                })
            })
            .collect()
    }

    /// Gate + payload for SaveCoordinator: the export and the target
    /// filename, or a session error and None when validation fails.
    pub fn start_save(&mut self) -> Option<(Vec<SegmentDto>, String)> {
        match self.export_seconds() {
            Some(dtos) => Some((dtos, self.filename.clone())),
            None => {
                self.session_error =
                    Some("Cannot save: Some segments have invalid time format".to_string());
                None
            }
        }
    }

    // ── Worker results ───────────────────────────────────────────────────────

    /// Fold one BackendWorker result into the session. Results whose job id
    /// no longer matches the in-flight job are stale (superseded) and dropped.
    pub fn apply_result(&mut self, result: ClientResult) {
        match result {
            ClientResult::SegmentsLoaded { job, segments, filename, srt_url } => {
                if self.upload_job != Some(job) {
                    return;
                }
                self.upload_job = None;
                self.load_segments(segments, filename);
                self.srt_url = srt_url;
            }
            ClientResult::Saved { job, srt_url } => {
                if self.save_job != Some(job) {
                    return;
                }
                self.save_job = None;
                self.srt_url  = Some(srt_url);
            }
            ClientResult::VideoRendered { job, output_video } => {
                if self.render_job != Some(job) {
                    return;
                }
                self.render_job   = None;
                self.output_video = Some(output_video);
            }
            ClientResult::ArtifactDownloaded { job: _, path } => {
                self.downloaded = Some(path);
            }
            ClientResult::Error { job, msg } => {
                // Whichever job failed, the operation is abandoned: clear the
                // busy flag and surface the message. Stale ids fall through.
                let known = self.upload_job == Some(job)
                    || self.save_job == Some(job)
                    || self.render_job == Some(job);
                if !known {
                    return;
                }
                if self.upload_job == Some(job) {
                    self.upload_job = None;
                }
                if self.save_job == Some(job) {
                    self.save_job = None;
                }
                if self.render_job == Some(job) {
                    self.render_job = None;
                }
                self.session_error = Some(msg);
            }
        }
    }
}

impl TimeBound {
    /// The opposite end of the segment — the one an ordering check compares
    /// against.
    pub fn other(self) -> TimeBound {
        match self {
            TimeBound::Start => TimeBound::End,
            TimeBound::End   => TimeBound::Start,
        }
    }
}
