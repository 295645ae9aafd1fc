use super::{
    AudioUpload, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MAX_VOICE_NAME_CHARS, ValidationError,
};
use crate::config::ClientConfig;

/// A voice-clone submission that passed every client-side check.
///
/// Only [`UploadValidator::validate`] creates one, so holding a value means the
/// sample is audio, within the size limit, the name is trimmed and in range,
/// and consent was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCloneRequest {
    audio: AudioUpload,
    name: String,
}

impl VoiceCloneRequest {
    pub fn audio(&self) -> &AudioUpload {
        &self.audio
    }

    /// Trimmed voice name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn consent(&self) -> bool {
        true
    }
}

/// Enforces the upload constraints for voice cloning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadValidator {
    max_upload_bytes: u64,
    max_name_chars: usize,
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MAX_VOICE_NAME_CHARS)
    }
}

impl UploadValidator {
    pub fn new(max_upload_bytes: u64, max_name_chars: usize) -> Self {
        Self {
            max_upload_bytes,
            max_name_chars,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_upload_bytes, config.max_voice_name_chars)
    }

    /// Check a submission, stopping at the first failure.
    ///
    /// Order: file present, audio MIME type, size, name length, consent.
    pub fn validate(
        &self,
        file: Option<AudioUpload>,
        name: &str,
        consent: bool,
    ) -> Result<VoiceCloneRequest, ValidationError> {
        let audio = file.ok_or(ValidationError::MissingFile)?;

        if !audio
            .mime_type()
            .trim()
            .to_ascii_lowercase()
            .starts_with("audio/")
        {
            return Err(ValidationError::UnsupportedType {
                mime_type: audio.mime_type().to_string(),
            });
        }

        if audio.size() > self.max_upload_bytes {
            return Err(ValidationError::FileTooLarge {
                size: audio.size(),
                max: self.max_upload_bytes,
            });
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let length = name.chars().count();
        if length > self.max_name_chars {
            return Err(ValidationError::NameTooLong {
                length,
                max: self.max_name_chars,
            });
        }

        if !consent {
            return Err(ValidationError::ConsentRequired);
        }

        Ok(VoiceCloneRequest {
            audio,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: usize = 1024 * 1024;

    fn audio(mime: &str, size: usize) -> Option<AudioUpload> {
        Some(AudioUpload::new("sample", mime, vec![0u8; size]))
    }

    #[test]
    fn test_valid_submission_is_normalised() {
        let validator = UploadValidator::default();
        let request = validator
            .validate(audio("audio/wav", 1024), "  My Voice  ", true)
            .unwrap();
        assert_eq!(request.name(), "My Voice");
        assert_eq!(request.audio().mime_type(), "audio/wav");
        assert!(request.consent());
    }

    #[test]
    fn test_missing_file() {
        let validator = UploadValidator::default();
        assert_eq!(
            validator.validate(None, "Voice", true),
            Err(ValidationError::MissingFile)
        );
    }

    #[test]
    fn test_png_rejected_regardless_of_size_and_name() {
        let validator = UploadValidator::default();
        for (size, name, consent) in [(10, "Voice", true), (20 * MIB, "", false)] {
            assert_eq!(
                validator.validate(audio("image/png", size), name, consent),
                Err(ValidationError::UnsupportedType {
                    mime_type: "image/png".to_string()
                })
            );
        }
    }

    #[test]
    fn test_eleven_mib_rejected() {
        let validator = UploadValidator::default();
        let result = validator.validate(audio("audio/mpeg", 11 * MIB), "Voice", true);
        assert!(matches!(result, Err(ValidationError::FileTooLarge { .. })));

        // Exactly at the limit is accepted
        assert!(
            validator
                .validate(audio("audio/mpeg", 10 * MIB), "Voice", true)
                .is_ok()
        );
    }

    #[test]
    fn test_name_bounds() {
        let validator = UploadValidator::default();
        assert_eq!(
            validator.validate(audio("audio/wav", 10), "   ", true),
            Err(ValidationError::EmptyName)
        );
        assert!(validator.validate(audio("audio/wav", 10), &"n".repeat(50), true).is_ok());
        assert_eq!(
            validator.validate(audio("audio/wav", 10), &"n".repeat(51), true),
            Err(ValidationError::NameTooLong {
                length: 51,
                max: 50
            })
        );
    }

    #[test]
    fn test_consent_checked_last() {
        let validator = UploadValidator::default();
        assert_eq!(
            validator.validate(audio("audio/wav", 10), "Voice", false),
            Err(ValidationError::ConsentRequired)
        );
        assert_eq!(
            validator.validate(audio("audio/wav", 10), "", false),
            Err(ValidationError::EmptyName)
        );
    }

    #[test]
    fn test_configured_limits() {
        let mut config = ClientConfig::default();
        config.max_upload_bytes = 100;
        config.max_voice_name_chars = 5;
        let validator = UploadValidator::from_config(&config);

        assert!(matches!(
            validator.validate(audio("audio/wav", 101), "Voice", true),
            Err(ValidationError::FileTooLarge { size: 101, max: 100 })
        ));
        assert!(matches!(
            validator.validate(audio("audio/wav", 10), "Voices", true),
            Err(ValidationError::NameTooLong { .. })
        ));
    }
}
