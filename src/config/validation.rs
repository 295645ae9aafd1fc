use reqwest::header::HeaderName;
use tracing::warn;

use super::{ClientConfig, ConfigError};
use crate::utils::url_validation::{is_local_host, validate_base_url};

/// Validate a fully merged configuration
pub(super) fn validate(config: &ClientConfig) -> Result<(), ConfigError> {
    let url = validate_base_url(&config.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
        url: config.base_url.clone(),
        source,
    })?;

    validate_path("generate_speech_path", &config.generate_speech_path)?;
    validate_path("clone_voice_path", &config.clone_voice_path)?;
    validate_path("voices_path", &config.voices_path)?;
    validate_path("health_path", &config.health_path)?;

    HeaderName::from_bytes(config.api_key_header.as_bytes()).map_err(|e| {
        ConfigError::InvalidValue {
            name: "api_key_header",
            reason: format!("'{}' is not a valid header name: {e}", config.api_key_header),
        }
    })?;

    if config.max_text_chars == 0 {
        return Err(ConfigError::InvalidValue {
            name: "max_text_chars",
            reason: "must be greater than zero".to_string(),
        });
    }
    if config.max_upload_bytes == 0 {
        return Err(ConfigError::InvalidValue {
            name: "max_upload_bytes",
            reason: "must be greater than zero".to_string(),
        });
    }
    if config.max_voice_name_chars == 0 {
        return Err(ConfigError::InvalidValue {
            name: "max_voice_name_chars",
            reason: "must be greater than zero".to_string(),
        });
    }
    if config.default_voice_id.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            name: "default_voice_id",
            reason: "must not be empty".to_string(),
        });
    }
    if !config.download_file_name.to_ascii_lowercase().ends_with(".mp3")
        || config.download_file_name.contains(['/', '\\'])
    {
        return Err(ConfigError::InvalidValue {
            name: "download_file_name",
            reason: format!(
                "'{}' must be a bare file name ending in .mp3",
                config.download_file_name
            ),
        });
    }
    if config.request_timeout_seconds == Some(0) {
        return Err(ConfigError::InvalidValue {
            name: "request_timeout_seconds",
            reason: "must be greater than zero when set".to_string(),
        });
    }

    if config.api_key.is_some() && url.scheme() == "http" && !is_local_host(&url) {
        warn!(
            base_url = %config.base_url,
            "API key will be sent over plain HTTP to a non-local host"
        );
    }

    Ok(())
}

fn validate_path(name: &'static str, path: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::InvalidValue {
            name,
            reason: format!("'{path}' must begin with '/'"),
        });
    }
    if path.contains(['?', '#']) {
        return Err(ConfigError::InvalidValue {
            name,
            reason: format!("'{path}' must not contain a query or fragment"),
        });
    }
    Ok(())
}
