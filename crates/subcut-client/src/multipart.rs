// crates/subcut-client/src/multipart.rs
//
// Minimal multipart/form-data encoder for the upload endpoints — ureq ships
// no multipart support, and the backend only needs well-formed bodies, not
// streaming. Parts are accumulated in memory; subtitle and audio uploads are
// small enough that this never matters.

use anyhow::{Context, Result};
use std::path::Path;
use uuid::Uuid;

use crate::classify::content_type_for;

#[derive(Debug)]
pub struct MultipartForm {
    boundary: String,
    body:     Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            // Uuid keeps the boundary collision-proof against part contents
            // without pulling in a RNG dependency.
            boundary: format!("----subcut-{}", Uuid::new_v4().simple()),
            body:     Vec::new(),
        }
    }

    /// Append a plain text field.
    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Append a file part read from disk. Filename comes from the path's
    /// final component; the content type from the extension table.
    pub fn file(&mut self, name: &str, path: &Path) -> Result<&mut Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading upload file {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| name.to_string());
        Ok(self.file_bytes(name, &filename, content_type_for(path), &bytes))
    }

    /// Append a file part from an in-memory buffer.
    pub fn file_bytes(
        &mut self,
        name:         &str,
        filename:     &str,
        content_type: &str,
        bytes:        &[u8],
    ) -> &mut Self {
        self.body.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n",
            )
            .as_bytes(),
        );
        self.body
            .extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// The request's Content-Type header value.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Close the body with the terminal boundary and hand it over.
    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn text_and_file_parts_carry_correct_headers() {
        let mut form = MultipartForm::new();
        form.text("filename", "clip_edited.srt");
        form.file_bytes("srt", "clip.srt", "application/x-subrip", b"1\n00:00:00,000");
        let ct = form.content_type();
        let body = String::from_utf8(form.finish()).unwrap();

        let boundary = ct.strip_prefix("multipart/form-data; boundary=").unwrap();
        assert!(body.contains(&format!("--{boundary}\r\n")));
        assert!(body.contains("Content-Disposition: form-data; name=\"filename\"\r\n\r\nclip_edited.srt\r\n"));
        assert!(body.contains(
            "Content-Disposition: form-data; name=\"srt\"; filename=\"clip.srt\"\r\n"
        ));
        assert!(body.contains("Content-Type: application/x-subrip\r\n\r\n1\n00:00:00,000\r\n"));
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn file_part_reads_from_disk_and_names_after_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voice.mp3");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"ID3fakeaudio").unwrap();

        let mut form = MultipartForm::new();
        form.file("audio", &path).unwrap();
        let body = String::from_utf8(form.finish()).unwrap();

        assert!(body.contains("name=\"audio\"; filename=\"voice.mp3\""));
        assert!(body.contains("Content-Type: audio/mpeg"));
        assert!(body.contains("ID3fakeaudio"));
    }

    #[test]
    fn missing_file_is_a_contextual_error() {
        let mut form = MultipartForm::new();
        let err = form.file("audio", Path::new("/no/such/file.mp3")).unwrap_err();
        assert!(err.to_string().contains("/no/such/file.mp3"));
    }

    #[test]
    fn boundaries_differ_between_forms() {
        assert_ne!(MultipartForm::new().content_type(), MultipartForm::new().content_type());
    }
}
