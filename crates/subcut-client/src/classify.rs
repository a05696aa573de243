// crates/subcut-client/src/classify.rs
//
// Upload-side file rules: what a selected file is, which multipart content
// type it ships with, how the two-slot selection behaves, and how the
// download filename is derived. All pure — the worker does the actual I/O.

use std::path::{Path, PathBuf};

/// What a selected file is to the backend contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    /// Transcription input: `.mp3`, `.wav`, `.mp4`, `.m4a`.
    Audio,
    /// An existing `.srt` track to re-edit.
    Subtitle,
    /// Still image for the render endpoint: `.jpg`, `.jpeg`, `.png`.
    Image,
}

impl FileKind {
    /// Classify by extension (case-insensitive). None = unsupported.
    pub fn from_path(path: &Path) -> Option<FileKind> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "srt"                       => Some(FileKind::Subtitle),
            "mp3" | "wav" | "mp4" | "m4a" => Some(FileKind::Audio),
            "jpg" | "jpeg" | "png"      => Some(FileKind::Image),
            _                           => None,
        }
    }
}

/// MIME type for a file part, by extension. Unknown extensions fall back to
/// octet-stream — the backend routes on field name, not content type, so
/// this only has to be plausible.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp3"  => "audio/mpeg",
        "wav"  => "audio/wav",
        "m4a"  => "audio/mp4",
        "mp4"  => "video/mp4",
        "srt"  => "application/x-subrip",
        "png"  => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _      => "application/octet-stream",
    }
}

/// Download name offered after generating subtitles from audio:
/// `<audio-stem>_edited.srt`. (Re-editing an uploaded `.srt` keeps the
/// uploaded name instead — the backend echoes it as `srt_filename`.)
pub fn download_filename(audio: &Path) -> String {
    let stem = audio
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "subtitles".to_string());
    format!("{stem}_edited.srt")
}

/// The uploader's two slots. Exactly one of {audio-driven generation,
/// subtitle re-editing} is active per upload: selecting a file of one kind
/// clears any previously selected file of the other.
#[derive(Clone, Debug, Default)]
pub struct UploadSelection {
    pub audio:    Option<PathBuf>,
    pub subtitle: Option<PathBuf>,
}

impl UploadSelection {
    /// Take a picked file. Unsupported formats are rejected with the
    /// user-facing message and mutate nothing.
    pub fn select(&mut self, path: PathBuf) -> Result<FileKind, String> {
        match FileKind::from_path(&path) {
            Some(FileKind::Audio) => {
                self.audio    = Some(path);
                self.subtitle = None;
                Ok(FileKind::Audio)
            }
            Some(FileKind::Subtitle) => {
                self.subtitle = Some(path);
                self.audio    = None;
                Ok(FileKind::Subtitle)
            }
            // Images belong to the render form, not the subtitle uploader.
            Some(FileKind::Image) | None => Err(
                "Unsupported format. Only audio files (.mp3, .wav, .mp4, .m4a) \
                 and .srt subtitles are accepted."
                    .to_string(),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_none() && self.subtitle.is_none()
    }

    pub fn clear(&mut self) {
        self.audio    = None;
        self.subtitle = None;
    }
}
