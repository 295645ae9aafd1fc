pub mod audio_format;
pub use audio_format::{detect_audio_format, extension_for_mime, mime_for_extension};
pub mod url_validation;
pub use url_validation::{UrlValidationError, validate_base_url};
