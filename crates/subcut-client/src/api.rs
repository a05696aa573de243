// crates/subcut-client/src/api.rs
//
// One typed wrapper per backend route. Blocking calls — the worker keeps
// them off the caller's event thread; nothing here should be invoked from a
// UI callback directly.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use subcut_core::api_types::{
    GenerateResponse, RenderResponse, SaveRequest, SaveResponse, SegmentDto, UploadFilesResponse,
    UploadSrtResponse,
};

use crate::config;
use crate::multipart::MultipartForm;
use crate::subcut_log;

pub struct Backend {
    base: String,
}

impl Backend {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Backend at the configured base URL (env override or localhost).
    pub fn from_env() -> Self {
        Self::new(config::backend_base_url())
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Where a rendered video is served: `/output/<output_video>`.
    pub fn output_url(&self, output_video: &str) -> String {
        format!("{}/output/{}", self.base, output_video)
    }

    // ── Routes ───────────────────────────────────────────────────────────────

    /// `POST /generate-subtitles` — transcribe an audio file into segments.
    pub fn generate_subtitles(&self, audio: &Path) -> Result<GenerateResponse> {
        let mut form = MultipartForm::new();
        form.file("audio", audio)?;
        self.post_multipart("/generate-subtitles", form)
    }

    /// `POST /upload-srt` — parse an existing subtitle track into segments.
    pub fn upload_srt(&self, srt: &Path) -> Result<UploadSrtResponse> {
        let mut form = MultipartForm::new();
        form.file("srt", srt)?;
        self.post_multipart("/upload-srt", form)
    }

    /// `POST /upload-files` — the combined route the uploader uses: audio
    /// triggers transcription, an `.srt` is parsed for re-editing. At least
    /// one must be present (the caller guarantees this).
    pub fn upload_files(
        &self,
        audio: Option<&Path>,
        srt:   Option<&Path>,
    ) -> Result<UploadFilesResponse> {
        let mut form = MultipartForm::new();
        if let Some(audio) = audio {
            form.file("audio", audio)?;
        }
        if let Some(srt) = srt {
            form.file("srt", srt)?;
        }
        self.post_multipart("/upload-files", form)
    }

    /// `POST /save-subtitles` — persist the edited segments as an SRT file
    /// the user can download.
    pub fn save_subtitles(&self, segments: &[SegmentDto], filename: &str) -> Result<SaveResponse> {
        let url = format!("{}/save-subtitles", self.base);
        subcut_log!("[api] POST {url} ({} segments → {filename})", segments.len());
        let result = ureq::post(&url).send_json(&SaveRequest { segments, filename });
        read_response(result, &url)
    }

    /// `POST /upload` — render a still image + audio (+ optional burned-in
    /// subtitles) into an MP4.
    pub fn render_video(
        &self,
        image:    &Path,
        audio:    &Path,
        subtitle: Option<&Path>,
    ) -> Result<RenderResponse> {
        let mut form = MultipartForm::new();
        form.file("image", image)?;
        form.file("audio", audio)?;
        if let Some(srt) = subtitle {
            form.file("subtitle", srt)?;
        }
        self.post_multipart("/upload", form)
    }

    /// GET a server artifact (`/download/<name>` or `/output/<name>`) to a
    /// local file. Absolute URLs pass through untouched.
    pub fn download(&self, server_path: &str, dest: &Path) -> Result<PathBuf> {
        let url = if server_path.starts_with("http://") || server_path.starts_with("https://") {
            server_path.to_string()
        } else {
            format!("{}{}", self.base, server_path)
        };
        subcut_log!("[api] GET {url} → {}", dest.display());

        let resp = match ureq::get(&url).call() {
            Ok(r) => r,
            Err(ureq::Error::StatusCode(code)) => bail!("backend returned HTTP {code} for {url}"),
            Err(e) => return Err(e).with_context(|| format!("GET {url}")),
        };

        let mut reader = resp.into_body().into_reader();
        let mut file = std::fs::File::create(dest)
            .with_context(|| format!("creating {}", dest.display()))?;
        std::io::copy(&mut reader, &mut file)
            .with_context(|| format!("writing {}", dest.display()))?;
        Ok(dest.to_path_buf())
    }

    // ── Plumbing ─────────────────────────────────────────────────────────────

    fn post_multipart<T: DeserializeOwned>(&self, route: &str, form: MultipartForm) -> Result<T> {
        let url = format!("{}{}", self.base, route);
        let content_type = form.content_type();
        let body = form.finish();
        subcut_log!("[api] POST {url} ({} bytes)", body.len());

        let result = ureq::post(&url)
            .header("Content-Type", content_type.as_str())
            .send(&body[..]);
        read_response(result, &url)
    }
}

/// Shared response handling: non-2xx and transport errors become one
/// readable message; 2xx bodies must parse as the expected payload.
fn read_response<T: DeserializeOwned>(
    result: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
    url:    &str,
) -> Result<T> {
    match result {
        Ok(mut resp) => resp
            .body_mut()
            .read_json::<T>()
            .with_context(|| format!("unexpected response payload from {url}")),
        Err(ureq::Error::StatusCode(code)) => bail!("backend returned HTTP {code} for {url}"),
        Err(e) => Err(e).with_context(|| format!("POST {url}")),
    }
}
