use tracing::debug;

use super::machine::RequestSession;
use super::state::{SessionState, SubmitOutcome};
use crate::config::ClientConfig;
use crate::core::transport::{TransportClient, VoiceCloneResult};
use crate::core::validation::{AudioUpload, UploadValidator};

/// Shown when a clone submission fails without a usable detail
pub const CLONE_FAILURE_MESSAGE: &str = "Failed to clone voice. Please try again.";

/// One voice-cloning view: upload validation in front of a request session
#[derive(Debug)]
pub struct VoiceCloneSession {
    transport: TransportClient,
    validator: UploadValidator,
    session: RequestSession<VoiceCloneResult>,
}

impl VoiceCloneSession {
    pub fn new(transport: TransportClient, config: &ClientConfig) -> Self {
        Self::with_validator(transport, UploadValidator::from_config(config))
    }

    pub fn with_validator(transport: TransportClient, validator: UploadValidator) -> Self {
        Self {
            transport,
            validator,
            session: RequestSession::new("voice-clone"),
        }
    }

    /// Validate and upload a voice sample.
    ///
    /// A failed check returns `Invalid` with the reason for the first failing
    /// check; nothing is sent and the state is unchanged.
    pub async fn submit(
        &self,
        file: Option<AudioUpload>,
        name: &str,
        consent: bool,
    ) -> SubmitOutcome<VoiceCloneResult> {
        if let Err(e) = self.session.ensure_available() {
            return SubmitOutcome::Rejected(e);
        }

        let request = match self.validator.validate(file, name, consent) {
            Ok(request) => request,
            Err(e) => {
                debug!(reason = %e, "Voice clone submission failed validation");
                return SubmitOutcome::Invalid(e);
            }
        };

        let admission = match self.session.begin() {
            Ok(admission) => admission,
            Err(e) => return SubmitOutcome::Rejected(e),
        };

        let result = self.transport.clone_voice(&request).await;

        self.session
            .finish(admission, |state| match result {
                Ok(cloned) => {
                    *state = SessionState::Succeeded(cloned.clone());
                    SubmitOutcome::Succeeded(cloned)
                }
                Err(e) => {
                    let reason = e.user_message(CLONE_FAILURE_MESSAGE);
                    *state = SessionState::Failed(reason.clone());
                    SubmitOutcome::Failed(reason)
                }
            })
            .unwrap_or(SubmitOutcome::Discarded)
    }

    pub fn reset(&self) {
        self.session.reset();
    }

    pub fn close(&self) {
        self.session.close();
    }

    pub fn state(&self) -> SessionState<VoiceCloneResult> {
        self.session.state()
    }
}
