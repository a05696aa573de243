// crates/subcut-core/src/state.rs
// Pure session data — no network, no runtime handles.
// Serializable via serde. Used by subcut-client and front-end consumers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::helpers::time::{format_timestamp, is_valid_timestamp, parse_timestamp};

/// Which end of a segment a time edit targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeBound {
    Start,
    End,
}

/// A time value as the user sees it: the raw display string is the source of
/// truth while editing, and numeric seconds are derived on demand.
///
/// The raw string may be transiently malformed — that state is deliberate
/// (the field must reflect keystrokes), and it is what the strict/lenient
/// split in `helpers::time` exists for. Nothing caches the parsed value, so
/// the two representations can never drift.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeField {
    raw: String,
}

impl TimeField {
    pub fn from_seconds(seconds: f64) -> Self {
        Self { raw: format_timestamp(seconds) }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Overwrite with whatever the user typed — no validation here.
    pub fn set_raw(&mut self, value: impl Into<String>) {
        self.raw = value.into();
    }

    /// Lenient numeric view. `None` while the string is unparseable.
    pub fn seconds(&self) -> Option<f64> {
        parse_timestamp(&self.raw)
    }

    /// Strict `HH:MM:SS,mmm` check — the commit/save gate.
    pub fn is_strict(&self) -> bool {
        is_valid_timestamp(&self.raw)
    }
}

/// One timed span of subtitle text.
///
/// Identity is positional: a segment is addressed by its index in
/// `SessionState::segments`, never by a retained id. `source_start` /
/// `source_end` are the numeric bounds last received from the backend (or
/// assigned at insert/merge time) — the blur-repair rule reverts to these,
/// so they ride on the segment itself rather than in an index-parallel list
/// that insert/delete would shift out of alignment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Segment {
    pub start: TimeField,
    pub end:   TimeField,
    pub text:  String,
    pub source_start: f64,
    pub source_end:   f64,
}

impl Segment {
    /// Build a segment from backend-supplied numeric bounds.
    /// Text arrives with whatever padding the transcriber left — trim it.
    pub fn from_backend(start: f64, end: f64, text: &str) -> Self {
        Self {
            start: TimeField::from_seconds(start),
            end:   TimeField::from_seconds(end),
            text:  text.trim().to_string(),
            source_start: start,
            source_end:   end,
        }
    }

    /// Build a user-inserted segment. The assigned bounds become its revert
    /// target — there is no backend original to fall back to.
    pub fn inserted(start: f64, end: f64) -> Self {
        Self {
            start: TimeField::from_seconds(start),
            end:   TimeField::from_seconds(end),
            text:  "New segment".to_string(),
            source_start: start,
            source_end:   end,
        }
    }

    pub fn bound(&self, bound: TimeBound) -> &TimeField {
        match bound {
            TimeBound::Start => &self.start,
            TimeBound::End   => &self.end,
        }
    }

    pub fn bound_mut(&mut self, bound: TimeBound) -> &mut TimeField {
        match bound {
            TimeBound::Start => &mut self.start,
            TimeBound::End   => &mut self.end,
        }
    }

    /// The backend-sourced seconds for one bound (blur revert target).
    pub fn source_bound(&self, bound: TimeBound) -> f64 {
        match bound {
            TimeBound::Start => self.source_start,
            TimeBound::End   => self.source_end,
        }
    }
}

/// The whole editing session.
///
/// Mutated exclusively through `apply` / `apply_result` (session.rs). Job
/// fields follow the encode-status pattern: runtime-only, `#[serde(skip)]`,
/// `Some` exactly while a request of that kind is in flight.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionState {
    pub segments: Vec<Segment>,

    /// Download name offered for the saved SRT. Backend-supplied when an
    /// uploaded `.srt` is re-edited, `<audio-stem>_edited.srt` for generated
    /// content, and this placeholder before any upload completes.
    pub filename: String,

    /// The dismissible session-level message channel: format warnings while
    /// typing, ordering warnings, structural errors (merge at last segment),
    /// and network failures all land here. `None` = no banner.
    #[serde(skip)]
    pub session_error: Option<String>,

    // ── Playback clock ───────────────────────────────────────────────────────
    pub current_time: f64,
    pub is_playing:   bool,
    /// Index of the segment under the playhead, or None in a gap.
    /// Derived — recomputed from `current_time` on every clock mutation.
    #[serde(skip)]
    pub active_segment: Option<usize>,

    // ── In-flight jobs (runtime-only, not serialized) ────────────────────────
    /// Uuid of the running upload job, or None when idle. Results carrying a
    /// different id are stale (a newer upload superseded them) and dropped.
    #[serde(skip)]
    pub upload_job: Option<Uuid>,
    #[serde(skip)]
    pub save_job:   Option<Uuid>,
    #[serde(skip)]
    pub render_job: Option<Uuid>,

    // ── Backend artifacts ────────────────────────────────────────────────────
    /// Server path of the saved SRT (`/download/<name>`), set on save success.
    #[serde(skip)]
    pub srt_url: Option<String>,
    /// Rendered video name, served at `/output/<output_video>`.
    #[serde(skip)]
    pub output_video: Option<String>,
    /// Local path of the last downloaded artifact.
    #[serde(skip)]
    pub downloaded: Option<PathBuf>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            segments:       Vec::new(),
            filename:       "edited_subtitles.srt".to_string(),
            session_error:  None,
            current_time:   0.0,
            is_playing:     false,
            active_segment: None,
            upload_job:     None,
            save_job:       None,
            render_job:     None,
            srt_url:        None,
            output_video:   None,
            downloaded:     None,
        }
    }
}

impl SessionState {
    pub fn has_segments(&self) -> bool {
        !self.segments.is_empty()
    }

    /// True while any backend request is outstanding — callers disable the
    /// triggering control for the duration.
    pub fn is_busy(&self) -> bool {
        self.upload_job.is_some() || self.save_job.is_some() || self.render_job.is_some()
    }
}
