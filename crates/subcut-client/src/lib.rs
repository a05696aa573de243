// crates/subcut-client/src/lib.rs
//
// Backend HTTP client for SubCut. No session mutation here — this crate
// talks to the subtitle backend and reports over channels only; the caller
// drains results into the session on its own event thread.
//
// To add a new backend capability:
//   1. Add the endpoint wrapper in api.rs
//   2. Add a submit method + job kind in worker.rs
//   3. Add a ClientResult variant in subcut-core::api_types if the response
//      carries new data

pub mod api;
pub mod classify;
pub mod config;
pub mod log;
pub mod multipart;
pub mod worker;

// Re-export the main public API so front-end imports are simple.
pub use classify::{FileKind, UploadSelection};
pub use worker::BackendWorker;
pub use subcut_core::api_types::ClientResult;
