use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::utils::audio_format::{detect_audio_format, mime_for_extension};

/// A voice sample selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioUpload {
    file_name: String,
    mime_type: String,
    data: Bytes,
}

impl AudioUpload {
    /// Wrap in-memory content with a declared MIME type
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Load a sample from disk.
    ///
    /// The MIME type comes from the file's magic bytes, then its extension,
    /// and is `application/octet-stream` when neither is recognised.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;

        let mime_type = match detect_audio_format(&data) {
            Some((mime, _)) => mime,
            None => path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(mime_for_extension)
                .unwrap_or(crate::utils::audio_format::OCTET_STREAM_MIME),
        };

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sample".to_string());

        debug!(file = %file_name, mime_type, bytes = data.len(), "Loaded voice sample");
        Ok(Self::new(file_name, mime_type, data))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_from_path_detects_magic_bytes() {
        let temp_dir = TempDir::new().unwrap();
        // WAV content behind a misleading extension
        let path = temp_dir.path().join("sample.txt");
        let mut wav = b"RIFF\x24\x00\x00\x00WAVEfmt ".to_vec();
        wav.extend_from_slice(&[0u8; 32]);
        std::fs::write(&path, &wav).unwrap();

        let upload = AudioUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.mime_type(), "audio/wav");
        assert_eq!(upload.file_name(), "sample.txt");
        assert_eq!(upload.size(), wav.len() as u64);
    }

    #[tokio::test]
    async fn test_from_path_falls_back_to_extension() {
        let temp_dir = TempDir::new().unwrap();

        let path = temp_dir.path().join("voice.MP3");
        std::fs::write(&path, b"short").unwrap();
        let upload = AudioUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.mime_type(), "audio/mpeg");

        let path = temp_dir.path().join("notes.unknown");
        std::fs::write(&path, b"short").unwrap();
        let upload = AudioUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.mime_type(), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        assert!(AudioUpload::from_path("/nonexistent/sample.wav").await.is_err());
    }
}
