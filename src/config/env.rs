use std::env;
use std::path::PathBuf;

use super::{ClientConfig, ConfigError};

/// Read a non-empty environment variable
fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            name,
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

fn parse_u64(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
        name,
        reason: format!("expected a positive integer, got '{value}': {e}"),
    })
}

/// Overlay environment variables onto `config`
pub(super) fn apply_env(config: &mut ClientConfig) -> Result<(), ConfigError> {
    if let Some(url) = var("ODIADEV_API_URL") {
        config.base_url = url;
    }
    if let Some(path) = var("ODIADEV_GENERATE_PATH") {
        config.generate_speech_path = path;
    }
    if let Some(key) = var("ODIADEV_API_KEY") {
        config.api_key = Some(key);
    }
    if let Some(header) = var("ODIADEV_API_KEY_HEADER") {
        config.api_key_header = header;
    }
    if let Some(path) = var("ODIADEV_API_KEY_FILE") {
        config.api_key_file = Some(PathBuf::from(path));
    }
    if let Some(voice) = var("ODIADEV_VOICE_ID") {
        config.default_voice_id = voice;
    }
    if let Some(value) = var("ODIADEV_AUTOPLAY") {
        config.autoplay = parse_bool("ODIADEV_AUTOPLAY", &value)?;
    }
    if let Some(value) = var("ODIADEV_TIMEOUT_SECONDS") {
        config.request_timeout_seconds = Some(parse_u64("ODIADEV_TIMEOUT_SECONDS", &value)?);
    }
    Ok(())
}
