// crates/subcut-core/src/commands.rs
//
// Every user action on a session is expressed as an EditorCommand.
// Front ends emit these; SessionState::apply processes them.
// Adding a new feature = add a variant here + one match arm in session.rs.

use crate::state::TimeBound;

#[derive(Debug, Clone)]
pub enum EditorCommand {
    // ── Text editing ─────────────────────────────────────────────────────────
    /// Replace a segment's text. Leading whitespace is stripped as typed;
    /// trailing whitespace survives until save so the caret isn't fought over
    /// mid-word.
    SetText { index: usize, text: String },

    // ── Time editing ─────────────────────────────────────────────────────────
    /// Live keystroke into a time field. The raw value is always stored (the
    /// input must reflect what was typed); format and ordering problems are
    /// reported on the session error channel without rolling the text back.
    SetTime { index: usize, bound: TimeBound, value: String },
    /// The time field lost focus. Invalid format reverts to the backend
    /// value; a valid-but-inverted bound is pulled to 1 ms inside the
    /// opposite bound so `end > start` holds after every blur.
    CommitTime { index: usize, bound: TimeBound, value: String },

    // ── Structure ────────────────────────────────────────────────────────────
    /// Concatenate with the following segment (single-space separator) and
    /// absorb its end time. Error on the last segment.
    MergeWithNext(usize),
    /// Insert a placeholder segment after this one, sized to fit the gap.
    InsertAfter(usize),
    /// Remove the segment. No confirmation, no undo.
    Delete(usize),

    // ── Playback ─────────────────────────────────────────────────────────────
    SetPlayhead(f64),
    Play,
    Pause,
    Stop,

    // ── Session ──────────────────────────────────────────────────────────────
    /// Dismiss the session-level error banner.
    ClearError,
}
