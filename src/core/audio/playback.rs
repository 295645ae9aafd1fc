//! Playback of wrapped audio through an external player.

use std::fmt;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

/// Observable playback state of the audio manager
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Playing,
    /// Autoplay was refused; the user can still start playback manually
    Blocked(String),
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("No audio player is configured")]
    NoPlayer,

    #[error("Audio artifact has already been released")]
    Released,

    #[error("Failed to launch audio player '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Audio player '{program}' exited with {status}")]
    PlayerFailed { program: String, status: String },
}

/// Something that can start playing an audio file.
///
/// `play` starts playback and returns without waiting for it to finish.
pub trait AudioPlayer: Send + Sync + fmt::Debug {
    fn play(&self, path: &Path) -> Result<(), PlaybackError>;
}

/// Launches an external command-line player, `ffplay` by default
#[derive(Debug)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
    children: Mutex<Vec<Child>>,
}

impl Default for CommandPlayer {
    fn default() -> Self {
        Self::new(
            "ffplay",
            ["-autoexit", "-nodisp", "-loglevel", "error"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }
}

impl CommandPlayer {
    /// `args` are placed before the audio file path
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            children: Mutex::new(Vec::new()),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Number of launched players that have not exited yet
    pub fn running(&self) -> usize {
        let mut children = self.children.lock();
        self.prune_exited(&mut children);
        children.len()
    }

    /// Drop players that already exited; a failed exit is only logged here
    fn prune_exited(&self, children: &mut Vec<Child>) {
        children.retain_mut(|child| match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                if !status.success() {
                    warn!(program = %self.program, %status, "Audio player exited with failure");
                }
                false
            }
            Err(e) => {
                warn!(program = %self.program, error = %e, "Could not poll audio player");
                true
            }
        });
    }

    /// Block until every launched player has exited
    pub fn wait(&self) -> Result<(), PlaybackError> {
        let children = std::mem::take(&mut *self.children.lock());

        let mut first_error = None;
        for mut child in children {
            let result = match child.wait() {
                Ok(status) if status.success() => Ok(()),
                Ok(status) => Err(PlaybackError::PlayerFailed {
                    program: self.program.clone(),
                    status: status.to_string(),
                }),
                Err(source) => Err(PlaybackError::Spawn {
                    program: self.program.clone(),
                    source,
                }),
            };
            if let Err(e) = result {
                warn!(error = %e, "Audio player did not finish cleanly");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AudioPlayer for CommandPlayer {
    fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| PlaybackError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        debug!(program = %self.program, path = %path.display(), "Started playback");
        let mut children = self.children.lock();
        self.prune_exited(&mut children);
        children.push(child);
        Ok(())
    }
}
