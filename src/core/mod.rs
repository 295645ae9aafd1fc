pub mod audio;
pub mod session;
pub mod transport;
pub mod validation;

// Re-export commonly used types for convenience
pub use audio::{
    AudioArtifact, AudioError, AudioPlayer, AudioResourceManager, CommandPlayer, PlaybackError,
    PlaybackStatus,
};
pub use session::{
    RequestSession, SessionState, StateError, SubmitOutcome, TtsResult, TtsSession,
    VoiceCloneSession,
};
pub use transport::{
    ApiRequest, ApiResponse, CredentialSupplier, TransportClient, TransportError, TtsRequest,
    VoiceCloneResult,
};
pub use validation::{AudioUpload, UploadValidator, ValidationError, VoiceCloneRequest};
