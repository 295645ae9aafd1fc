//! Client-side checks performed before anything is sent to the service.
//!
//! Every check is pure: no network access and no side effects. A failure
//! carries exactly one human-readable reason.

mod error;
mod text;
mod upload;
mod validator;

pub use error::ValidationError;
pub use text::validate_tts_text;
pub use upload::AudioUpload;
pub use validator::{UploadValidator, VoiceCloneRequest};

/// Maximum length of TTS input text, in characters
pub const DEFAULT_MAX_TEXT_CHARS: usize = 800;

/// Maximum size of a voice sample (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Maximum length of a voice name after trimming
pub const DEFAULT_MAX_VOICE_NAME_CHARS: usize = 50;
