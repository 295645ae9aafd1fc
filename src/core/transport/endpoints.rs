//! Operation catalogue and URL resolution for the remote service.

use std::fmt;

use reqwest::Method;
use url::Url;

use super::error::TransportError;
use crate::config::{ClientConfig, ConfigError};

/// Default path of the generate-speech operation
pub const DEFAULT_GENERATE_SPEECH_PATH: &str = "/api/v1/tts/generate";

/// Generate-speech path used by older deployments of the service
pub const LEGACY_GENERATE_SPEECH_PATH: &str = "/tts";

pub const DEFAULT_CLONE_VOICE_PATH: &str = "/api/v1/voice/clone";
pub const DEFAULT_VOICES_PATH: &str = "/api/v1/voices";
pub const DEFAULT_HEALTH_PATH: &str = "/health";

/// Operations exposed by the TTS service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    HealthCheck,
    GenerateSpeech,
    CloneVoice,
    ListVoices,
    GetVoice,
    DeleteVoice,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HealthCheck => "health-check",
            Self::GenerateSpeech => "generate-speech",
            Self::CloneVoice => "clone-voice",
            Self::ListVoices => "list-voices",
            Self::GetVoice => "get-voice",
            Self::DeleteVoice => "delete-voice",
        }
    }

    /// HTTP method used by the operation
    pub fn method(&self) -> Method {
        match self {
            Self::HealthCheck | Self::ListVoices | Self::GetVoice => Method::GET,
            Self::GenerateSpeech | Self::CloneVoice => Method::POST,
            Self::DeleteVoice => Method::DELETE,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolved absolute URLs for every operation
#[derive(Debug, Clone)]
pub struct Endpoints {
    health: Url,
    generate_speech: Url,
    clone_voice: Url,
    voices: Url,
}

impl Endpoints {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base = config.base_url.trim().trim_end_matches('/');
        let join = |name: &'static str, path: &str| -> Result<Url, ConfigError> {
            Url::parse(&format!("{base}{path}")).map_err(|e| ConfigError::InvalidValue {
                name,
                reason: format!("'{base}{path}' is not a valid URL: {e}"),
            })
        };

        Ok(Self {
            health: join("health_path", &config.health_path)?,
            generate_speech: join("generate_speech_path", &config.generate_speech_path)?,
            clone_voice: join("clone_voice_path", &config.clone_voice_path)?,
            voices: join("voices_path", &config.voices_path)?,
        })
    }

    /// URL of a collection-level operation
    pub fn url(&self, operation: Operation) -> Url {
        match operation {
            Operation::HealthCheck => self.health.clone(),
            Operation::GenerateSpeech => self.generate_speech.clone(),
            Operation::CloneVoice => self.clone_voice.clone(),
            Operation::ListVoices | Operation::GetVoice | Operation::DeleteVoice => {
                self.voices.clone()
            }
        }
    }

    /// URL of a single voice; the id is percent-encoded as one path segment
    pub fn voice_url(&self, voice_id: &str) -> Result<Url, TransportError> {
        if voice_id.trim().is_empty() {
            return Err(TransportError::invalid_request("voice id must not be empty"));
        }

        let mut url = self.voices.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::invalid_request("voices URL cannot carry a voice id"))?
            .pop_if_empty()
            .push(voice_id);
        Ok(url)
    }
}
