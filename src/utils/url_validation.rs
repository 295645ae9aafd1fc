//! Base URL validation for the remote TTS service
//!
//! The client only talks to a single, externally configured service. This module
//! ensures the configured URL:
//! - Is properly formatted
//! - Uses HTTP or HTTPS
//! - Has a host
//! - Carries no query string or fragment (operation paths are appended to it)

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Errors that can occur during base URL validation
#[derive(Debug, Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("URL scheme must be http or https, got: {0}")]
    UnsupportedScheme(String),

    #[error("URL must have a host")]
    MissingHost,

    #[error("URL must not contain a query string or fragment")]
    UnexpectedQueryOrFragment,
}

/// Validates the base URL of the TTS service
///
/// A trailing slash is stripped so operation paths (which always begin with `/`)
/// can be appended without producing `//`.
///
/// # Example
/// ```rust
/// use odiadev_client::utils::url_validation::validate_base_url;
///
/// assert!(validate_base_url("http://localhost:8888").is_ok());
/// assert!(validate_base_url("https://tts.example.com/prefix/").is_ok());
/// assert!(validate_base_url("ftp://tts.example.com").is_err());
/// ```
pub fn validate_base_url(url: &str) -> Result<Url, UrlValidationError> {
    let parsed = Url::parse(url.trim())?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            warn!(scheme = %other, "Rejected base URL with unsupported scheme");
            return Err(UrlValidationError::UnsupportedScheme(other.to_string()));
        }
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(UrlValidationError::UnexpectedQueryOrFragment);
    }

    let trimmed = parsed.as_str().trim_end_matches('/').to_string();
    Ok(Url::parse(&trimmed)?)
}

/// Returns true for hosts that only make sense during local development.
pub fn is_local_host(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain == "localhost",
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
