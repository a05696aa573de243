// crates/subcut-core/src/lib.rs
//
// Pure session data and editing logic — no I/O, no network, no UI types.
// Serializable via serde. Used by subcut-client and by whatever front end
// hosts the editor.
//
// To add a new editing capability:
//   1. Add a variant to commands::EditorCommand
//   2. Add one match arm to SessionState::apply in session.rs

pub mod api_types;
pub mod commands;
pub mod helpers;
pub mod session;
pub mod state;
pub mod tracker;

// Re-export the main public API so downstream imports are simple.
pub use commands::EditorCommand;
pub use state::{Segment, SessionState, TimeBound, TimeField};
pub use tracker::ActiveSegmentTracker;
