//! Credential suppliers for the `X-API-Key` style authentication the service uses.
//!
//! The transport asks its supplier for a key on every call, so a key stored
//! through [`StoredApiKey::store`] is picked up without rebuilding the client.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use zeroize::Zeroize;

/// Default name of the header carrying the API key
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

/// Source of the API key attached to outbound requests
pub trait CredentialSupplier: Send + Sync + fmt::Debug {
    /// Current key, or `None` to send the request unauthenticated
    fn api_key(&self) -> Option<String>;
}

/// Sends every request without credentials
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialSupplier for NoCredentials {
    fn api_key(&self) -> Option<String> {
        None
    }
}

/// A fixed key held in memory, zeroized on drop
#[derive(Clone)]
pub struct StaticApiKey {
    key: String,
}

impl StaticApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl fmt::Debug for StaticApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticApiKey")
            .field("key", &"<redacted>")
            .finish()
    }
}

impl Drop for StaticApiKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl CredentialSupplier for StaticApiKey {
    fn api_key(&self) -> Option<String> {
        Some(self.key.clone())
    }
}

/// Reads the key from an environment variable at call time
#[derive(Debug, Clone)]
pub struct EnvApiKey {
    variable: String,
}

impl EnvApiKey {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }
}

impl CredentialSupplier for EnvApiKey {
    fn api_key(&self) -> Option<String> {
        std::env::var(&self.variable)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

/// Errors raised while writing or clearing the persisted key store
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("Failed to access key store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode key store: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Refusing to store an empty API key")]
    EmptyKey,
}

#[derive(Serialize, Deserialize)]
struct KeyStoreFile {
    api_key: String,
}

/// A key persisted in a small JSON file, written by `login` and read on every call
#[derive(Debug, Clone)]
pub struct StoredApiKey {
    path: PathBuf,
}

impl StoredApiKey {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `key`, replacing any previously stored key
    pub fn store(&self, key: &str) -> Result<(), CredentialStoreError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialStoreError::EmptyKey);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let mut contents = serde_json::to_string(&KeyStoreFile {
            api_key: key.to_string(),
        })?;
        let result = std::fs::write(&self.path, &contents);
        contents.zeroize();
        result.map_err(|source| self.io_error(source))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|source| self.io_error(source))?;
        }

        debug!(path = %self.path.display(), "Stored API key");
        Ok(())
    }

    /// Remove the stored key; a missing store is not an error
    pub fn clear(&self) -> Result<(), CredentialStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> CredentialStoreError {
        CredentialStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CredentialSupplier for StoredApiKey {
    fn api_key(&self) -> Option<String> {
        let mut contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read key store");
                return None;
            }
        };

        let parsed = serde_json::from_str::<KeyStoreFile>(&contents);
        contents.zeroize();

        match parsed {
            Ok(mut stored) => {
                let key = stored.api_key.trim().to_string();
                stored.api_key.zeroize();
                (!key.is_empty()).then_some(key)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring malformed key store");
                None
            }
        }
    }
}
