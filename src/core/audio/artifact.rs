use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use uuid::Uuid;

use super::AudioError;

/// Identity of one wrapped audio payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Synthesized audio plus the playable handle created for it.
///
/// The handle is a scratch file holding the bytes; releasing the artifact
/// deletes it. Clones share the same handle, so releasing any clone releases
/// all of them. The source bytes stay available after release, which keeps
/// downloads working.
#[derive(Clone)]
pub struct AudioArtifact {
    inner: Arc<ArtifactInner>,
}

struct ArtifactInner {
    id: ArtifactId,
    bytes: Bytes,
    mime_type: String,
    download_name: String,
    path: PathBuf,
    handle: Mutex<Option<NamedTempFile>>,
}

impl AudioArtifact {
    pub(crate) fn new(
        bytes: Bytes,
        mime_type: String,
        download_name: String,
        handle: NamedTempFile,
    ) -> Self {
        Self {
            inner: Arc::new(ArtifactInner {
                id: ArtifactId::new(),
                bytes,
                mime_type,
                download_name,
                path: handle.path().to_path_buf(),
                handle: Mutex::new(Some(handle)),
            }),
        }
    }

    pub fn id(&self) -> ArtifactId {
        self.inner.id
    }

    pub fn bytes(&self) -> &Bytes {
        &self.inner.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.inner.mime_type
    }

    /// File name offered for download (always ends in `.mp3`)
    pub fn download_name(&self) -> &str {
        &self.inner.download_name
    }

    /// Path of the playable handle while it is live
    pub fn handle_path(&self) -> Option<PathBuf> {
        self.inner
            .handle
            .lock()
            .as_ref()
            .map(|_| self.inner.path.clone())
    }

    pub fn is_released(&self) -> bool {
        self.inner.handle.lock().is_none()
    }

    /// Write the audio into `dir` under its download name
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf, AudioError> {
        let path = dir.join(self.download_name());
        std::fs::write(&path, &self.inner.bytes).map_err(|source| AudioError::Save {
            path: path.clone(),
            source,
        })?;
        debug!(artifact = %self.id(), path = %path.display(), "Saved audio download");
        Ok(path)
    }

    /// Delete the handle. Returns `true` only for the call that actually released it.
    pub(crate) fn release_handle(&self) -> bool {
        let Some(handle) = self.inner.handle.lock().take() else {
            return false;
        };

        if let Err(e) = handle.close() {
            warn!(artifact = %self.id(), error = %e, "Failed to delete audio handle");
        }
        debug!(artifact = %self.id(), "Released audio handle");
        true
    }
}

impl PartialEq for AudioArtifact {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for AudioArtifact {}

impl fmt::Debug for AudioArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioArtifact")
            .field("id", &self.inner.id)
            .field("mime_type", &self.inner.mime_type)
            .field("bytes", &self.inner.bytes.len())
            .field("released", &self.is_released())
            .finish()
    }
}
