//! Test Fixtures Module
//!
//! Shared fixtures for the integration tests:
//! - Audio payloads (generated, no files on disk)
//! - Client configuration pointing at a mock server

// Not every test binary uses every fixture
#![allow(dead_code)]

pub mod audio_fixtures;

pub use audio_fixtures::*;

use odiadev_client::ClientConfig;

/// Configuration targeting a wiremock server
pub fn mock_config(server_uri: &str) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.base_url = server_uri.to_string();
    config.api_key = Some("test-api-key".to_string());
    config
}
