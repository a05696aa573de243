// crates/subcut-core/src/api_types.rs
//
// Types that flow across the boundary between subcut-client and the session:
// backend JSON payloads and the worker→caller channel messages.
// No I/O here — just plain data.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// One segment on the wire. The backend speaks numeric-second STRINGS for
/// `start`/`end` ("3.44"), but the transcriber occasionally emits bare JSON
/// numbers — `sec_str` accepts both on the way in and always writes strings
/// on the way out, so save payloads match the contract regardless.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentDto {
    #[serde(with = "sec_str")]
    pub start: f64,
    #[serde(with = "sec_str")]
    pub end:   f64,
    pub text:  String,
}

/// serde adapter: f64 ⇄ numeric-seconds string, tolerant of bare numbers.
mod sec_str {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&v.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        struct SecVisitor;

        impl<'de> Visitor<'de> for SecVisitor {
            type Value = f64;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("seconds as a number or numeric string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
                Ok(v)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
                v.trim().parse().map_err(|_| E::custom(format!("bad seconds string: {v:?}")))
            }
        }

        d.deserialize_any(SecVisitor)
    }
}

// ── Endpoint payloads ─────────────────────────────────────────────────────────

/// `POST /generate-subtitles` response.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub segments: Vec<SegmentDto>,
    pub srt_url:  Option<String>,
}

/// `POST /upload-srt` response.
#[derive(Debug, Deserialize)]
pub struct UploadSrtResponse {
    pub segments: Vec<SegmentDto>,
}

/// `POST /upload-files` response. `segments` is absent on backend errors
/// reported with a 200 body; `srt_filename` is set when an uploaded `.srt`
/// was parsed (re-edit flow) and drives the download name.
#[derive(Debug, Deserialize)]
pub struct UploadFilesResponse {
    pub segments:     Option<Vec<SegmentDto>>,
    pub srt_filename: Option<String>,
    #[serde(default)]
    pub audio_filename: Option<String>,
}

/// `POST /save-subtitles` request body.
#[derive(Debug, Serialize)]
pub struct SaveRequest<'a> {
    pub segments: &'a [SegmentDto],
    pub filename: &'a str,
}

/// `POST /save-subtitles` response.
#[derive(Debug, Deserialize)]
pub struct SaveResponse {
    pub srt_url: String,
}

/// `POST /upload` (image + audio + optional subtitle → MP4) response.
/// The video is served at `/output/<output_video>`.
#[derive(Debug, Deserialize)]
pub struct RenderResponse {
    pub output_video: String,
}

/// Error payload the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ── Worker results ────────────────────────────────────────────────────────────

/// Results sent from BackendWorker job threads back to the caller's event
/// thread. Every variant carries the job id it answers; the session drops
/// results whose id no longer matches the in-flight job (superseded upload).
#[derive(Debug)]
pub enum ClientResult {
    /// An upload round-trip produced segments. `filename` is already
    /// resolved: the backend's `srt_filename` when present, otherwise
    /// `<audio-stem>_edited.srt`.
    SegmentsLoaded {
        job:      Uuid,
        segments: Vec<SegmentDto>,
        filename: String,
        srt_url:  Option<String>,
    },
    Saved {
        job:     Uuid,
        srt_url: String,
    },
    VideoRendered {
        job:          Uuid,
        output_video: String,
    },
    ArtifactDownloaded {
        job:  Uuid,
        path: PathBuf,
    },
    /// Transport failure, non-2xx status, or an unreadable payload.
    /// The operation is abandoned — no retry, the user re-triggers manually.
    Error {
        job: Uuid,
        msg: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_seconds_from_captured_backend_json() {
        // Shape produced by the save round-trip and the srt parse route.
        let json = r#"{"segments":[{"start":"0.0","end":"2.36","text":"hola"},
                                    {"start":"2.36","end":"5.1","text":"mundo"}],
                       "srt_filename":"episode01.srt"}"#;
        let resp: UploadFilesResponse = serde_json::from_str(json).unwrap();
        let segs = resp.segments.unwrap();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].end, 2.36);
        assert_eq!(segs[1].text, "mundo");
        assert_eq!(resp.srt_filename.as_deref(), Some("episode01.srt"));
    }

    #[test]
    fn parses_bare_number_seconds_from_transcriber_json() {
        // Whisper-style segments arrive as JSON numbers, not strings.
        let json = r#"{"segments":[{"start":0,"end":7.84,"text":" Hello world"}],
                       "srt_url":"/download/clip.srt"}"#;
        let resp: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.segments[0].start, 0.0);
        assert_eq!(resp.segments[0].end, 7.84);
        assert_eq!(resp.srt_url.as_deref(), Some("/download/clip.srt"));
    }

    #[test]
    fn save_request_serializes_seconds_as_strings() {
        let segs = vec![SegmentDto { start: 1.0, end: 2.5, text: "a".into() }];
        let body = serde_json::to_string(&SaveRequest { segments: &segs, filename: "x.srt" }).unwrap();
        assert!(body.contains(r#""start":"1""#), "{body}");
        assert!(body.contains(r#""end":"2.5""#), "{body}");
        assert!(body.contains(r#""filename":"x.srt""#), "{body}");
    }
}
