//! Transport client for the remote TTS and voice-cloning service.
//!
//! One call maps to exactly one HTTP request. Success and failure are
//! normalised into typed results; nothing here touches session or audio state.

mod client;
mod credentials;
mod endpoints;
mod error;
mod messages;

pub use client::TransportClient;
pub use credentials::{
    CredentialStoreError, CredentialSupplier, DEFAULT_API_KEY_HEADER, EnvApiKey, NoCredentials,
    StaticApiKey, StoredApiKey,
};
pub use endpoints::{
    DEFAULT_CLONE_VOICE_PATH, DEFAULT_GENERATE_SPEECH_PATH, DEFAULT_HEALTH_PATH,
    DEFAULT_VOICES_PATH, Endpoints, LEGACY_GENERATE_SPEECH_PATH, Operation,
};
pub use error::{TransportError, extract_error_detail};
pub use messages::{
    ApiRequest, ApiResponse, CacheStatus, CloneStatus, DeleteConfirmation, HealthStatus,
    SpeechAudio, TtsRequest, VoiceCloneResult, VoiceDescriptor,
};
