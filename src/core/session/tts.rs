use tracing::{debug, warn};

use super::machine::RequestSession;
use super::state::{SessionState, SubmitOutcome};
use crate::config::ClientConfig;
use crate::core::audio::{AudioArtifact, AudioResourceManager, PlaybackError};
use crate::core::transport::{TransportClient, TtsRequest};
use crate::core::validation::validate_tts_text;

/// Shown when a generation fails without a usable detail
pub const TTS_FAILURE_MESSAGE: &str = "Failed to generate audio. Please try again.";

/// Outcome of the last generation, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TtsResult {
    Success { audio: AudioArtifact },
    Error { message: String },
}

/// One text-to-speech view: a request session plus the audio it displays
#[derive(Debug)]
pub struct TtsSession {
    transport: TransportClient,
    audio: AudioResourceManager,
    session: RequestSession<AudioArtifact>,
    default_voice_id: String,
    max_text_chars: usize,
}

impl TtsSession {
    pub fn new(
        transport: TransportClient,
        audio: AudioResourceManager,
        config: &ClientConfig,
    ) -> Self {
        Self {
            transport,
            audio,
            session: RequestSession::new("tts"),
            default_voice_id: config.default_voice_id.clone(),
            max_text_chars: config.max_text_chars,
        }
    }

    /// Generate speech for `text`.
    ///
    /// Rejected synchronously while a generation is pending. Blank or overlong
    /// text is reported as `Invalid` without a state change or network call.
    /// Accepting a submission releases the previously displayed audio. If the
    /// returned future is dropped before the call completes, the session
    /// settles to `Failed` and accepts the next submission.
    pub async fn submit(&self, text: &str, voice_id: Option<&str>) -> SubmitOutcome<AudioArtifact> {
        if let Err(e) = self.session.ensure_available() {
            return SubmitOutcome::Rejected(e);
        }

        let text = match validate_tts_text(text, self.max_text_chars) {
            Ok(text) => text,
            Err(e) => return SubmitOutcome::Invalid(e),
        };
        let request = TtsRequest::new(text, voice_id.or(Some(self.default_voice_id.as_str())));

        let mut admission = match self.session.begin() {
            Ok(admission) => admission,
            Err(e) => return SubmitOutcome::Rejected(e),
        };
        if let SessionState::Succeeded(previous) = admission.take_previous() {
            self.audio.release(&previous);
        }

        let result = self.transport.generate_speech(&request).await;

        let outcome = self.session.finish(admission, |state| match result {
            Ok(speech) => match self.audio.wrap(speech.bytes, &speech.mime_type) {
                Ok(artifact) => {
                    *state = SessionState::Succeeded(artifact.clone());
                    SubmitOutcome::Succeeded(artifact)
                }
                Err(e) => {
                    warn!(error = %e, "Could not create a playable handle");
                    *state = SessionState::Failed(TTS_FAILURE_MESSAGE.to_string());
                    SubmitOutcome::Failed(TTS_FAILURE_MESSAGE.to_string())
                }
            },
            Err(e) => {
                let reason = e.user_message(TTS_FAILURE_MESSAGE);
                *state = SessionState::Failed(reason.clone());
                SubmitOutcome::Failed(reason)
            }
        });

        outcome.unwrap_or_else(|| {
            debug!("Generation finished after reset; result dropped");
            SubmitOutcome::Discarded
        })
    }

    /// Return to idle, releasing the displayed audio
    pub fn reset(&self) {
        if let SessionState::Succeeded(artifact) = self.session.reset() {
            self.audio.release(&artifact);
        }
        self.audio.release_current();
    }

    /// Tear the view down; a generation still in flight is discarded on arrival
    pub fn close(&self) {
        if let SessionState::Succeeded(artifact) = self.session.close() {
            self.audio.release(&artifact);
        }
        self.audio.release_current();
    }

    pub fn state(&self) -> SessionState<AudioArtifact> {
        self.session.state()
    }

    /// The last settled result, if any
    pub fn result(&self) -> Option<TtsResult> {
        match self.session.state() {
            SessionState::Succeeded(audio) => Some(TtsResult::Success { audio }),
            SessionState::Failed(message) => Some(TtsResult::Error { message }),
            SessionState::Idle | SessionState::Pending => None,
        }
    }

    pub fn audio(&self) -> &AudioResourceManager {
        &self.audio
    }

    /// Manually start playback of the displayed audio
    pub fn play(&self) -> Result<(), PlaybackError> {
        match self.session.state() {
            SessionState::Succeeded(artifact) => self.audio.play(&artifact),
            _ => Err(PlaybackError::Released),
        }
    }
}

impl Drop for TtsSession {
    fn drop(&mut self) {
        self.close();
    }
}
