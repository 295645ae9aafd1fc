//! Configuration module for the ODIADEV TTS client
//!
//! This module handles client configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use odiadev_client::config::ClientConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ClientConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("odiadev.yaml");
//! let config = ClientConfig::from_file(&config_path)?;
//!
//! println!("Talking to {}", config.base_url);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::core::transport::{
    CredentialSupplier, DEFAULT_API_KEY_HEADER, DEFAULT_CLONE_VOICE_PATH,
    DEFAULT_GENERATE_SPEECH_PATH, DEFAULT_HEALTH_PATH, DEFAULT_VOICES_PATH, NoCredentials,
    StaticApiKey, StoredApiKey,
};
use crate::core::validation::{
    DEFAULT_MAX_TEXT_CHARS, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MAX_VOICE_NAME_CHARS,
};

mod env;
mod validation;
mod yaml;

pub use yaml::YamlConfig;

/// Default base URL of the TTS service (local development backend)
pub const DEFAULT_BASE_URL: &str = "http://localhost:8888";

/// Voice used when a request does not name one
pub const DEFAULT_VOICE_ID: &str = "default";

/// File name offered to the user when downloading synthesized audio
pub const DEFAULT_DOWNLOAD_FILE_NAME: &str = "odiadev-tts-output.mp3";

/// Errors raised while loading or validating configuration.
///
/// These are the only errors allowed to escape as hard failures: a client built
/// from a malformed configuration cannot do anything useful.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: crate::utils::UrlValidationError,
    },

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Client configuration
///
/// Contains everything needed to talk to the remote TTS service:
/// - Service location and per-operation paths
/// - Credential settings (API key, header name, persisted key file)
/// - TTS request limits and artifact settings
/// - Voice-clone upload limits
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // Service settings
    pub base_url: String,
    /// Path of the generate-speech operation. Deployments differ between
    /// `/api/v1/tts/generate` and `/tts`.
    pub generate_speech_path: String,
    pub clone_voice_path: String,
    pub voices_path: String,
    pub health_path: String,
    /// Optional caller-side deadline applied by front ends; the transport itself
    /// never times out a call.
    pub request_timeout_seconds: Option<u64>,

    // Credentials
    pub api_key: Option<String>,
    pub api_key_header: String,
    /// Persisted key store (the local-storage variant of authentication)
    pub api_key_file: Option<PathBuf>,

    // Text-to-speech
    pub default_voice_id: String,
    pub max_text_chars: usize,
    pub download_file_name: String,
    pub autoplay: bool,
    /// Directory for scratch audio files; system temp dir when unset
    pub scratch_dir: Option<PathBuf>,

    // Voice cloning
    pub max_upload_bytes: u64,
    pub max_voice_name_chars: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            generate_speech_path: DEFAULT_GENERATE_SPEECH_PATH.to_string(),
            clone_voice_path: DEFAULT_CLONE_VOICE_PATH.to_string(),
            voices_path: DEFAULT_VOICES_PATH.to_string(),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            request_timeout_seconds: None,
            api_key: None,
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            api_key_file: None,
            default_voice_id: DEFAULT_VOICE_ID.to_string(),
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            download_file_name: DEFAULT_DOWNLOAD_FILE_NAME.to_string(),
            autoplay: false,
            scratch_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_voice_name_chars: DEFAULT_MAX_VOICE_NAME_CHARS,
        }
    }
}

/// Zeroize the API key when the configuration is dropped.
impl Drop for ClientConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.api_key {
            key.zeroize();
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables on top of the defaults
    ///
    /// The `.env` file is expected to have been loaded by the binary already.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        env::apply_env(&mut config)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let yaml_config = YamlConfig::from_file(path)?;

        let mut config = Self::default();
        env::apply_env(&mut config)?;
        yaml_config.apply(&mut config);

        validation::validate(&config)?;
        Ok(config)
    }

    /// Validate a configuration assembled in code
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate(self)
    }

    /// Request deadline for front ends that wrap calls in a timeout
    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        self.request_timeout_seconds
            .map(std::time::Duration::from_secs)
    }

    /// Build the credential supplier matching this configuration
    ///
    /// A persisted key file takes precedence over a static key, so a key saved
    /// through `login` wins over one baked into the environment.
    pub fn credential_supplier(&self) -> Arc<dyn CredentialSupplier> {
        if let Some(ref path) = self.api_key_file {
            return Arc::new(StoredApiKey::new(path.clone()));
        }
        match self.api_key {
            Some(ref key) if !key.trim().is_empty() => Arc::new(StaticApiKey::new(key.trim())),
            _ => Arc::new(NoCredentials),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    // Helper to clean up environment variables
    fn cleanup_env_vars() {
        unsafe {
            env::remove_var("ODIADEV_API_URL");
            env::remove_var("ODIADEV_GENERATE_PATH");
            env::remove_var("ODIADEV_API_KEY");
            env::remove_var("ODIADEV_API_KEY_HEADER");
            env::remove_var("ODIADEV_API_KEY_FILE");
            env::remove_var("ODIADEV_VOICE_ID");
            env::remove_var("ODIADEV_AUTOPLAY");
            env::remove_var("ODIADEV_TIMEOUT_SECONDS");
        }
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8888");
        assert_eq!(config.generate_speech_path, "/api/v1/tts/generate");
        assert_eq!(config.api_key_header, "X-API-Key");
        assert_eq!(config.max_text_chars, 800);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.max_voice_name_chars, 50);
        assert_eq!(config.default_voice_id, "default");
        assert!(config.download_file_name.ends_with(".mp3"));
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides_defaults() {
        cleanup_env_vars();
        unsafe {
            env::set_var("ODIADEV_API_URL", "http://localhost:8000");
            env::set_var("ODIADEV_GENERATE_PATH", "/tts");
            env::set_var("ODIADEV_API_KEY", "env-key");
            env::set_var("ODIADEV_AUTOPLAY", "true");
            env::set_var("ODIADEV_TIMEOUT_SECONDS", "45");
        }

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.generate_speech_path, "/tts");
        assert_eq!(config.api_key, Some("env-key".to_string()));
        assert!(config.autoplay);
        assert_eq!(
            config.request_timeout(),
            Some(std::time::Duration::from_secs(45))
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_bool() {
        cleanup_env_vars();
        unsafe {
            env::set_var("ODIADEV_AUTOPLAY", "sometimes");
        }

        let result = ClientConfig::from_env();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                name: "ODIADEV_AUTOPLAY",
                ..
            })
        ));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_overrides_env() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("odiadev.yaml");

        let yaml_content = r#"
api:
  base_url: "https://tts.example.com"
  generate_speech_path: "/tts"

auth:
  api_key: "yaml-key"

tts:
  max_text_chars: 400
"#;
        fs::write(&config_path, yaml_content).unwrap();

        unsafe {
            env::set_var("ODIADEV_API_URL", "http://localhost:9999");
            env::set_var("ODIADEV_API_KEY", "env-key");
            env::set_var("ODIADEV_VOICE_ID", "env-voice");
        }

        let config = ClientConfig::from_file(&config_path).unwrap();

        // YAML overrides ENV
        assert_eq!(config.base_url, "https://tts.example.com");
        assert_eq!(config.api_key, Some("yaml-key".to_string()));
        assert_eq!(config.generate_speech_path, "/tts");
        assert_eq!(config.max_text_chars, 400);
        // ENV value where YAML is silent
        assert_eq!(config.default_voice_id, "env-voice");

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_missing_file() {
        cleanup_env_vars();

        let config_path = PathBuf::from("/nonexistent/odiadev.yaml");
        let result = ClientConfig::from_file(&config_path);

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    #[serial]
    fn test_from_file_invalid_yaml() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid.yaml");
        fs::write(&config_path, "invalid: yaml: [content").unwrap();

        let result = ClientConfig::from_file(&config_path);

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse YAML")
        );
    }

    #[test]
    #[serial]
    fn test_from_file_rejects_bad_base_url() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("odiadev.yaml");
        fs::write(&config_path, "api:\n  base_url: \"ftp://tts.example.com\"\n").unwrap();

        let result = ClientConfig::from_file(&config_path);
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_credential_supplier_selection() {
        let config = ClientConfig::default();
        assert_eq!(config.credential_supplier().api_key(), None);

        let mut config = ClientConfig::default();
        config.api_key = Some("  static-key ".to_string());
        assert_eq!(
            config.credential_supplier().api_key(),
            Some("static-key".to_string())
        );

        let temp_dir = TempDir::new().unwrap();
        let key_file = temp_dir.path().join("key.json");
        StoredApiKey::new(key_file.clone()).store("stored-key").unwrap();

        let mut config = ClientConfig::default();
        config.api_key = Some("static-key".to_string());
        config.api_key_file = Some(key_file);
        assert_eq!(
            config.credential_supplier().api_key(),
            Some("stored-key".to_string())
        );
    }
}
