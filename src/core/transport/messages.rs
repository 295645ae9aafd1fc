//! Request and response shapes exchanged with the TTS service.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::endpoints::Operation;
use crate::config::DEFAULT_VOICE_ID;
use crate::core::validation::VoiceCloneRequest;

// =============================================================================
// Text-to-speech
// =============================================================================

/// Body of the generate-speech call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TtsRequest {
    pub text: String,
    pub voice_id: String,
}

impl TtsRequest {
    /// Build a request; a missing or blank voice falls back to `"default"`
    pub fn new(text: impl Into<String>, voice_id: Option<&str>) -> Self {
        let voice_id = voice_id
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_VOICE_ID);
        Self {
            text: text.into(),
            voice_id: voice_id.to_string(),
        }
    }
}

/// Whether the service answered from its synthesis cache (`X-Cache` header)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheStatus {
    Hit,
    Miss,
    #[default]
    Unknown,
}

impl CacheStatus {
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("hit") => Self::Hit,
            Some("miss") => Self::Miss,
            _ => Self::Unknown,
        }
    }
}

/// Synthesized audio returned by generate-speech
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub bytes: Bytes,
    pub mime_type: String,
    pub cache_status: CacheStatus,
}

// =============================================================================
// Voice cloning
// =============================================================================

/// Processing status of a cloned voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum CloneStatus {
    #[default]
    Pending,
    Ready,
    Failed,
}

impl CloneStatus {
    /// Unknown statuses (such as `"processing"`) are treated as pending
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ready" | "completed" | "complete" => Self::Ready,
            "failed" | "error" => Self::Failed,
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl From<String> for CloneStatus {
    fn from(value: String) -> Self {
        Self::from_str_or_default(&value)
    }
}

impl std::fmt::Display for CloneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response of the clone-voice call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCloneResult {
    #[serde(alias = "id")]
    pub voice_id: String,
    #[serde(default)]
    pub status: CloneStatus,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Voice catalogue and health
// =============================================================================

/// A voice as listed by the service; fields beyond the id are kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    #[serde(alias = "id")]
    pub voice_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The voices listing arrives either bare or wrapped in `{"voices": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum VoiceListBody {
    Bare(Vec<VoiceDescriptor>),
    Wrapped { voices: Vec<VoiceDescriptor> },
}

impl VoiceListBody {
    pub(crate) fn into_voices(self) -> Vec<VoiceDescriptor> {
        match self {
            Self::Bare(voices) | Self::Wrapped { voices } => voices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(
            self.status.to_ascii_lowercase().as_str(),
            "healthy" | "ok" | "up"
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Tagged call surface
// =============================================================================

/// One call to the service, tagged by operation
#[derive(Debug, Clone)]
pub enum ApiRequest {
    HealthCheck,
    GenerateSpeech(TtsRequest),
    CloneVoice(VoiceCloneRequest),
    ListVoices,
    GetVoice { voice_id: String },
    DeleteVoice { voice_id: String },
}

impl ApiRequest {
    pub fn operation(&self) -> Operation {
        match self {
            Self::HealthCheck => Operation::HealthCheck,
            Self::GenerateSpeech(_) => Operation::GenerateSpeech,
            Self::CloneVoice(_) => Operation::CloneVoice,
            Self::ListVoices => Operation::ListVoices,
            Self::GetVoice { .. } => Operation::GetVoice,
            Self::DeleteVoice { .. } => Operation::DeleteVoice,
        }
    }
}

/// Successful result of an [`ApiRequest`], tagged the same way
#[derive(Debug, Clone)]
pub enum ApiResponse {
    Health(HealthStatus),
    Speech(SpeechAudio),
    VoiceCloned(VoiceCloneResult),
    Voices(Vec<VoiceDescriptor>),
    Voice(VoiceDescriptor),
    Deleted(DeleteConfirmation),
}

impl ApiResponse {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Health(_) => Operation::HealthCheck,
            Self::Speech(_) => Operation::GenerateSpeech,
            Self::VoiceCloned(_) => Operation::CloneVoice,
            Self::Voices(_) => Operation::ListVoices,
            Self::Voice(_) => Operation::GetVoice,
            Self::Deleted(_) => Operation::DeleteVoice,
        }
    }
}
