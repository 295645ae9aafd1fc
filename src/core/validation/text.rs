use super::ValidationError;

/// Validate TTS input and return it trimmed.
///
/// Length is counted in Unicode scalar values after trimming.
pub fn validate_tts_text(text: &str, max_chars: usize) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyText);
    }

    let length = trimmed.chars().count();
    if length > max_chars {
        return Err(ValidationError::TextTooLong {
            length,
            max: max_chars,
        });
    }

    Ok(trimmed.to_string())
}
