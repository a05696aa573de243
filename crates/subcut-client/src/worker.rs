// crates/subcut-client/src/worker.rs
//
// BackendWorker: keeps backend round-trips off the caller's event thread.
// All public API that front ends call lives here.
//
// One short-lived thread per job. Results travel back over a bounded
// channel; the caller drains them on its own tick (`drain_results`) and
// folds them into the session with `SessionState::apply_result`. A job kind
// already in flight refuses a second submission — re-armed when the result
// lands — which is the non-UI half of "disable the button while busy".

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use uuid::Uuid;

use subcut_core::api_types::{ClientResult, SegmentDto};

use crate::api::Backend;
use crate::classify::{download_filename, UploadSelection};
use crate::subcut_log;

/// One slot per concurrently-allowed request family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum JobKind {
    Upload,
    Save,
    Render,
    Download,
}

pub struct BackendWorker {
    /// Job results, drained by the caller's event loop.
    pub rx:    Receiver<ClientResult>,
    tx:        Sender<ClientResult>,
    base_url:  String,
    in_flight: Arc<Mutex<HashSet<JobKind>>>,
}

impl BackendWorker {
    /// Worker against the configured backend (env override or localhost).
    pub fn new() -> Self {
        Self::with_base_url(crate::config::backend_base_url())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        // 64 pending results is far beyond anything a single user produces;
        // bounded only so a stalled caller can't grow the queue unboundedly.
        let (tx, rx) = bounded(64);
        Self {
            rx,
            tx,
            base_url:  base_url.into(),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Empty the result channel without blocking.
    pub fn drain_results(&self) -> Vec<ClientResult> {
        self.rx.try_iter().collect()
    }

    // ── Submissions ──────────────────────────────────────────────────────────

    /// Submit the selected files to `/upload-files`. The response's segments
    /// come back as `ClientResult::SegmentsLoaded` with the download
    /// filename already resolved (backend `srt_filename`, else
    /// `<audio-stem>_edited.srt`).
    ///
    /// Err is a LOCAL condition (nothing selected / already uploading) — no
    /// network call was made; show the message or drop it.
    pub fn upload(&self, selection: &UploadSelection) -> Result<Uuid, String> {
        if selection.is_empty() {
            return Err("Please select an audio or subtitle file first.".to_string());
        }
        let audio = selection.audio.clone();
        let srt   = selection.subtitle.clone();

        self.spawn(JobKind::Upload, "upload", move |backend, job| {
            let resp = backend.upload_files(audio.as_deref(), srt.as_deref())?;
            let segments = resp.segments.unwrap_or_default();
            let filename = resp
                .srt_filename
                .or_else(|| audio.as_deref().map(download_filename))
                .unwrap_or_else(|| "edited_subtitles.srt".to_string());
            Ok(ClientResult::SegmentsLoaded {
                job,
                segments,
                filename,
                srt_url: None,
            })
        })
    }

    /// Submit an exported session to `/save-subtitles`.
    pub fn save(&self, segments: Vec<SegmentDto>, filename: String) -> Result<Uuid, String> {
        if segments.is_empty() {
            return Err("Nothing to save: the session has no segments.".to_string());
        }
        self.spawn(JobKind::Save, "save", move |backend, job| {
            let resp = backend.save_subtitles(&segments, &filename)?;
            Ok(ClientResult::Saved { job, srt_url: resp.srt_url })
        })
    }

    /// Submit image + audio (+ optional subtitles) to the `/upload` render
    /// route.
    pub fn render(
        &self,
        image:    PathBuf,
        audio:    PathBuf,
        subtitle: Option<PathBuf>,
    ) -> Result<Uuid, String> {
        self.spawn(JobKind::Render, "render", move |backend, job| {
            let resp = backend.render_video(&image, &audio, subtitle.as_deref())?;
            Ok(ClientResult::VideoRendered { job, output_video: resp.output_video })
        })
    }

    /// Fetch a saved/rendered artifact to a local path.
    pub fn download(&self, server_path: String, dest: PathBuf) -> Result<Uuid, String> {
        self.spawn(JobKind::Download, "download", move |backend, job| {
            let path = backend.download(&server_path, &dest)?;
            Ok(ClientResult::ArtifactDownloaded { job, path })
        })
    }

    // ── Plumbing ─────────────────────────────────────────────────────────────

    fn spawn<F>(&self, kind: JobKind, label: &'static str, run: F) -> Result<Uuid, String>
    where
        F: FnOnce(&Backend, Uuid) -> Result<ClientResult> + Send + 'static,
    {
        {
            let mut busy = self.in_flight.lock().unwrap();
            if !busy.insert(kind) {
                // A duplicate submission is simply ignored until the
                // in-flight request completes or fails.
                return Err(format!("A {label} request is already in progress."));
            }
        }

        let job       = Uuid::new_v4();
        let tx        = self.tx.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let backend   = Backend::new(self.base_url.clone());

        thread::spawn(move || {
            subcut_log!("[worker] {label} {job} started");
            let result = match run(&backend, job) {
                Ok(r) => r,
                Err(e) => {
                    subcut_log!("[worker] {label} {job} failed: {e:#}");
                    ClientResult::Error { job, msg: format!("{e:#}") }
                }
            };
            // Re-arm BEFORE delivering, so a caller reacting to the result
            // can immediately resubmit.
            in_flight.lock().unwrap().remove(&kind);
            let _ = tx.send(result);
        });

        Ok(job)
    }
}

impl Default for BackendWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn recv(worker: &BackendWorker) -> ClientResult {
        worker
            .rx
            .recv_timeout(Duration::from_secs(10))
            .expect("worker result")
    }

    #[test]
    fn empty_selection_is_a_local_error_without_any_job() {
        let worker = BackendWorker::with_base_url("http://127.0.0.1:1");
        let err = worker.upload(&UploadSelection::default()).unwrap_err();
        assert_eq!(err, "Please select an audio or subtitle file first.");
        assert!(worker.drain_results().is_empty());
    }

    #[test]
    fn unreachable_backend_surfaces_as_an_error_result() {
        // Port 1 refuses connections — exercises the transport-failure path
        // without a live backend.
        let worker = BackendWorker::with_base_url("http://127.0.0.1:1");
        let mut sel = UploadSelection::default();

        let dir = tempfile::tempdir().unwrap();
        let srt = dir.path().join("track.srt");
        std::fs::write(&srt, "1\n00:00:00,000 --> 00:00:01,000\nhi\n").unwrap();
        sel.select(srt).unwrap();

        let job = worker.upload(&sel).unwrap();
        match recv(&worker) {
            ClientResult::Error { job: j, msg } => {
                assert_eq!(j, job);
                assert!(!msg.is_empty());
            }
            other => panic!("expected Error, got {other:?}"),
        }
        // The slot re-armed — a second upload is accepted again.
        assert!(worker.upload(&sel).is_ok());
        recv(&worker);
    }

    #[test]
    fn duplicate_inflight_submission_is_refused() {
        let worker = BackendWorker::with_base_url("http://127.0.0.1:1");
        // Hold the Save slot open by hand to avoid racing the tiny job.
        worker.in_flight.lock().unwrap().insert(JobKind::Save);

        let segs = vec![SegmentDto { start: 0.0, end: 1.0, text: "x".into() }];
        let err = worker.save(segs, "out.srt".to_string()).unwrap_err();
        assert!(err.contains("already in progress"));
    }

    #[test]
    fn missing_upload_file_fails_the_job_not_the_caller() {
        let worker = BackendWorker::with_base_url("http://127.0.0.1:1");
        let mut sel = UploadSelection::default();
        sel.select(PathBuf::from("/no/such/audio.mp3")).unwrap();

        worker.upload(&sel).unwrap();
        match recv(&worker) {
            ClientResult::Error { msg, .. } => assert!(msg.contains("/no/such/audio.mp3")),
            other => panic!("expected Error, got {other:?}"),
        }
    }
}
