//! Lifecycle of playable audio derived from synthesized speech.

mod artifact;
mod manager;
mod playback;

use std::path::PathBuf;

use thiserror::Error;

pub use artifact::{ArtifactId, AudioArtifact};
pub use manager::AudioResourceManager;
pub use playback::{AudioPlayer, CommandPlayer, PlaybackError, PlaybackStatus};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Failed to create audio handle: {0}")]
    Scratch(#[source] std::io::Error),

    #[error("Failed to save audio to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
