use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::artifact::AudioArtifact;
use super::playback::{AudioPlayer, PlaybackError, PlaybackStatus};
use super::AudioError;
use crate::config::{ClientConfig, DEFAULT_DOWNLOAD_FILE_NAME};
use crate::utils::audio_format::{DEFAULT_SPEECH_MIME, extension_for_mime};

/// Owns the playable handle of the audio currently shown to the user.
///
/// At most one handle is live at a time: wrapping new audio releases the
/// previous handle before the new artifact is returned. Dropping the manager
/// releases whatever is still live.
#[derive(Debug)]
pub struct AudioResourceManager {
    scratch_dir: Option<PathBuf>,
    download_name: String,
    autoplay: bool,
    player: Option<Arc<dyn AudioPlayer>>,
    current: Mutex<Option<AudioArtifact>>,
    playback: Mutex<PlaybackStatus>,
    released: AtomicUsize,
}

impl Default for AudioResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioResourceManager {
    pub fn new() -> Self {
        Self {
            scratch_dir: None,
            download_name: DEFAULT_DOWNLOAD_FILE_NAME.to_string(),
            autoplay: false,
            player: None,
            current: Mutex::new(None),
            playback: Mutex::new(PlaybackStatus::Idle),
            released: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let mut manager = Self::new();
        manager.scratch_dir = config.scratch_dir.clone();
        manager.download_name = config.download_file_name.clone();
        manager.autoplay = config.autoplay;
        manager
    }

    pub fn with_player(mut self, player: Arc<dyn AudioPlayer>) -> Self {
        self.player = Some(player);
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Create a playable handle for `bytes`, releasing the previous one first.
    ///
    /// With autoplay enabled the new artifact is started immediately; a refusal
    /// only shows up as [`PlaybackStatus::Blocked`].
    pub fn wrap(&self, bytes: Bytes, mime_type: &str) -> Result<AudioArtifact, AudioError> {
        let mime_type = match mime_type.trim() {
            "" => DEFAULT_SPEECH_MIME,
            declared => declared,
        };

        let artifact = {
            let mut current = self.current.lock();
            if let Some(previous) = current.take() {
                self.release_artifact(&previous);
            }

            let artifact = self.create_artifact(bytes, mime_type)?;
            *current = Some(artifact.clone());
            artifact
        };
        *self.playback.lock() = PlaybackStatus::Idle;

        info!(
            artifact = %artifact.id(),
            mime_type = %artifact.mime_type(),
            bytes = artifact.bytes().len(),
            "Wrapped audio"
        );

        if self.autoplay && self.player.is_some() {
            if let Err(e) = self.play(&artifact) {
                warn!(artifact = %artifact.id(), error = %e, "Autoplay was blocked");
                *self.playback.lock() = PlaybackStatus::Blocked(e.to_string());
            }
        }

        Ok(artifact)
    }

    /// Release `artifact`'s handle. Releasing twice is a no-op.
    pub fn release(&self, artifact: &AudioArtifact) {
        let mut current = self.current.lock();
        if current.as_ref() == Some(artifact) {
            current.take();
        }
        self.release_artifact(artifact);
    }

    /// Release whatever handle is live, if any
    pub fn release_current(&self) {
        if let Some(artifact) = self.current.lock().take() {
            self.release_artifact(&artifact);
        }
    }

    /// The artifact whose handle is currently live
    pub fn current(&self) -> Option<AudioArtifact> {
        self.current.lock().clone()
    }

    /// Number of live handles (0 or 1)
    pub fn live_handles(&self) -> usize {
        self.current
            .lock()
            .as_ref()
            .filter(|artifact| !artifact.is_released())
            .map_or(0, |_| 1)
    }

    /// Number of handles this manager has released so far
    pub fn released_handles(&self) -> usize {
        self.released.load(Ordering::Relaxed)
    }

    pub fn playback_status(&self) -> PlaybackStatus {
        self.playback.lock().clone()
    }

    /// Start playback of `artifact` on request
    pub fn play(&self, artifact: &AudioArtifact) -> Result<(), PlaybackError> {
        let player = self.player.as_ref().ok_or(PlaybackError::NoPlayer)?;
        let path = artifact.handle_path().ok_or(PlaybackError::Released)?;

        player.play(&path)?;
        *self.playback.lock() = PlaybackStatus::Playing;
        Ok(())
    }

    fn create_artifact(&self, bytes: Bytes, mime_type: &str) -> Result<AudioArtifact, AudioError> {
        let suffix = format!(".{}", extension_for_mime(mime_type));
        let mut builder = tempfile::Builder::new();
        builder.prefix("odiadev-tts-").suffix(&suffix);

        let mut handle = match self.scratch_dir {
            Some(ref dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(AudioError::Scratch)?;

        handle
            .write_all(&bytes)
            .and_then(|()| handle.flush())
            .map_err(AudioError::Scratch)?;

        debug!(path = %handle.path().display(), "Created audio handle");
        Ok(AudioArtifact::new(
            bytes,
            mime_type.to_string(),
            self.download_name.clone(),
            handle,
        ))
    }

    fn release_artifact(&self, artifact: &AudioArtifact) {
        if artifact.release_handle() {
            self.released.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Drop for AudioResourceManager {
    fn drop(&mut self) {
        self.release_current();
    }
}
