use serde::Deserialize;
use std::path::PathBuf;

use super::{ClientConfig, ConfigError};

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present here
/// override environment variables.
///
/// # Example YAML structure
/// ```yaml
/// api:
///   base_url: "https://tts.odiadev.example"
///   generate_speech_path: "/api/v1/tts/generate"   # or "/tts"
///   clone_voice_path: "/api/v1/voice/clone"
///   voices_path: "/api/v1/voices"
///   health_path: "/health"
///   timeout_seconds: 60
///
/// auth:
///   api_key: "your-api-key"
///   header: "X-API-Key"
///   key_file: "/home/me/.config/odiadev/key.json"
///
/// tts:
///   default_voice_id: "default"
///   max_text_chars: 800
///   download_file_name: "odiadev-tts-output.mp3"
///   autoplay: true
///   scratch_dir: "/tmp/odiadev"
///
/// clone:
///   max_upload_bytes: 10485760
///   max_name_chars: 50
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub api: Option<ApiYaml>,
    pub auth: Option<AuthYaml>,
    pub tts: Option<TtsYaml>,
    pub clone: Option<CloneYaml>,
}

/// Service location from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ApiYaml {
    pub base_url: Option<String>,
    pub generate_speech_path: Option<String>,
    pub clone_voice_path: Option<String>,
    pub voices_path: Option<String>,
    pub health_path: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Credential settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuthYaml {
    pub api_key: Option<String>,
    pub header: Option<String>,
    pub key_file: Option<String>,
}

/// Text-to-speech settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TtsYaml {
    pub default_voice_id: Option<String>,
    pub max_text_chars: Option<usize>,
    pub download_file_name: Option<String>,
    pub autoplay: Option<bool>,
    pub scratch_dir: Option<String>,
}

/// Voice-clone upload limits from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CloneYaml {
    pub max_upload_bytes: Option<u64>,
    pub max_name_chars: Option<usize>,
}

impl YamlConfig {
    /// Load YAML configuration from a file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Override `config` with every value present in this file
    pub fn apply(&self, config: &mut ClientConfig) {
        if let Some(ref api) = self.api {
            if let Some(ref url) = api.base_url {
                config.base_url = url.clone();
            }
            if let Some(ref path) = api.generate_speech_path {
                config.generate_speech_path = path.clone();
            }
            if let Some(ref path) = api.clone_voice_path {
                config.clone_voice_path = path.clone();
            }
            if let Some(ref path) = api.voices_path {
                config.voices_path = path.clone();
            }
            if let Some(ref path) = api.health_path {
                config.health_path = path.clone();
            }
            if let Some(seconds) = api.timeout_seconds {
                config.request_timeout_seconds = Some(seconds);
            }
        }

        if let Some(ref auth) = self.auth {
            if let Some(ref key) = auth.api_key {
                config.api_key = Some(key.clone());
            }
            if let Some(ref header) = auth.header {
                config.api_key_header = header.clone();
            }
            if let Some(ref path) = auth.key_file {
                config.api_key_file = Some(PathBuf::from(path));
            }
        }

        if let Some(ref tts) = self.tts {
            if let Some(ref voice) = tts.default_voice_id {
                config.default_voice_id = voice.clone();
            }
            if let Some(max) = tts.max_text_chars {
                config.max_text_chars = max;
            }
            if let Some(ref name) = tts.download_file_name {
                config.download_file_name = name.clone();
            }
            if let Some(autoplay) = tts.autoplay {
                config.autoplay = autoplay;
            }
            if let Some(ref dir) = tts.scratch_dir {
                config.scratch_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(ref clone) = self.clone {
            if let Some(max) = clone.max_upload_bytes {
                config.max_upload_bytes = max;
            }
            if let Some(max) = clone.max_name_chars {
                config.max_voice_name_chars = max;
            }
        }
    }
}
