use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use super::credentials::CredentialSupplier;
use super::endpoints::{Endpoints, Operation};
use super::error::{TransportError, extract_error_detail};
use super::messages::{
    ApiRequest, ApiResponse, CacheStatus, DeleteConfirmation, HealthStatus, SpeechAudio,
    TtsRequest, VoiceCloneResult, VoiceDescriptor, VoiceListBody,
};
use crate::config::{ClientConfig, ConfigError};
use crate::core::validation::VoiceCloneRequest;
use crate::utils::audio_format::DEFAULT_SPEECH_MIME;

/// Multipart value sent for the consent field; validated requests always carry consent
const CONSENT_FIELD_VALUE: &str = "yes";

/// HTTP client for the TTS service.
///
/// Every call issues exactly one request: no retries, no internal timeout and
/// no shared state beyond the connection pool. Callers that need a deadline
/// wrap the returned future in `tokio::time::timeout`.
#[derive(Debug, Clone)]
pub struct TransportClient {
    http: reqwest::Client,
    endpoints: Arc<Endpoints>,
    credentials: Arc<dyn CredentialSupplier>,
    api_key_header: HeaderName,
}

impl TransportClient {
    /// Build a client from configuration, using the configured credential supplier
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let endpoints = Endpoints::from_config(config)?;
        let api_key_header = HeaderName::from_bytes(config.api_key_header.as_bytes()).map_err(
            |e| ConfigError::InvalidValue {
                name: "api_key_header",
                reason: e.to_string(),
            },
        )?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("odiadev-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            endpoints: Arc::new(endpoints),
            credentials: config.credential_supplier(),
            api_key_header,
        })
    }

    /// Replace the credential supplier
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialSupplier>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialSupplier> {
        &self.credentials
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Dispatch a tagged request to the matching operation
    pub async fn call(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        match request {
            ApiRequest::HealthCheck => self.health().await.map(ApiResponse::Health),
            ApiRequest::GenerateSpeech(req) => {
                self.generate_speech(&req).await.map(ApiResponse::Speech)
            }
            ApiRequest::CloneVoice(req) => self.clone_voice(&req).await.map(ApiResponse::VoiceCloned),
            ApiRequest::ListVoices => self.list_voices().await.map(ApiResponse::Voices),
            ApiRequest::GetVoice { voice_id } => {
                self.get_voice(&voice_id).await.map(ApiResponse::Voice)
            }
            ApiRequest::DeleteVoice { voice_id } => {
                self.delete_voice(&voice_id).await.map(ApiResponse::Deleted)
            }
        }
    }

    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        let operation = Operation::HealthCheck;
        let url = self.endpoints.url(operation);
        let response = self.send(operation, self.request(operation, url)?).await?;
        read_json(operation, response).await
    }

    /// Synthesize `request.text`; yields the raw audio and its MIME type
    pub async fn generate_speech(&self, request: &TtsRequest) -> Result<SpeechAudio, TransportError> {
        let operation = Operation::GenerateSpeech;
        let url = self.endpoints.url(operation);
        let builder = self.request(operation, url)?.json(request);

        let start = Instant::now();
        let response = self.send(operation, builder).await?;
        let status = response.status().as_u16();

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_SPEECH_MIME)
            .to_string();
        let cache_status = CacheStatus::from_header(
            response
                .headers()
                .get("x-cache")
                .and_then(|v| v.to_str().ok()),
        );

        let bytes: Bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::invalid_body(status, e))?;

        info!(
            voice_id = %request.voice_id,
            chars = request.text.chars().count(),
            bytes = bytes.len(),
            mime_type = %mime_type,
            cache = ?cache_status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Speech generated"
        );

        Ok(SpeechAudio {
            bytes,
            mime_type,
            cache_status,
        })
    }

    /// Upload a validated voice sample as `multipart/form-data`
    pub async fn clone_voice(
        &self,
        request: &VoiceCloneRequest,
    ) -> Result<VoiceCloneResult, TransportError> {
        let operation = Operation::CloneVoice;
        let url = self.endpoints.url(operation);
        let audio = request.audio();

        let part = Part::bytes(audio.data().to_vec())
            .file_name(audio.file_name().to_string())
            .mime_str(audio.mime_type())
            .map_err(|e| {
                TransportError::invalid_request(format!("invalid audio MIME type: {e}"))
            })?;

        let form = Form::new()
            .part("audio", part)
            .text("name", request.name().to_string())
            .text("consent", CONSENT_FIELD_VALUE);

        let response = self
            .send(operation, self.request(operation, url)?.multipart(form))
            .await?;
        let result: VoiceCloneResult = read_json(operation, response).await?;

        info!(
            voice_id = %result.voice_id,
            status = %result.status,
            "Voice clone submitted"
        );
        Ok(result)
    }

    pub async fn list_voices(&self) -> Result<Vec<VoiceDescriptor>, TransportError> {
        let operation = Operation::ListVoices;
        let url = self.endpoints.url(operation);
        let response = self.send(operation, self.request(operation, url)?).await?;
        let body: VoiceListBody = read_json(operation, response).await?;
        Ok(body.into_voices())
    }

    pub async fn get_voice(&self, voice_id: &str) -> Result<VoiceDescriptor, TransportError> {
        let operation = Operation::GetVoice;
        let url = self.endpoints.voice_url(voice_id)?;
        let response = self.send(operation, self.request(operation, url)?).await?;
        read_json(operation, response).await
    }

    /// Delete a voice; an empty success body yields an empty confirmation
    pub async fn delete_voice(&self, voice_id: &str) -> Result<DeleteConfirmation, TransportError> {
        let operation = Operation::DeleteVoice;
        let url = self.endpoints.voice_url(voice_id)?;
        let response = self.send(operation, self.request(operation, url)?).await?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::invalid_body(status, e))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(DeleteConfirmation::default());
        }
        serde_json::from_slice(&body).map_err(|e| TransportError::invalid_body(status, e))
    }

    fn request(&self, operation: Operation, url: Url) -> Result<RequestBuilder, TransportError> {
        let builder = self.http.request(operation.method(), url);

        match self.credentials.api_key() {
            Some(key) => {
                let mut value = HeaderValue::from_str(&key).map_err(|_| {
                    TransportError::invalid_request("API key contains invalid header characters")
                })?;
                value.set_sensitive(true);
                Ok(builder.header(self.api_key_header.clone(), value))
            }
            None => Ok(builder),
        }
    }

    /// Send one request; non-2xx responses become a [`TransportError`]
    async fn send(
        &self,
        operation: Operation,
        builder: RequestBuilder,
    ) -> Result<Response, TransportError> {
        debug!(operation = %operation, "Dispatching request");

        let response = builder.send().await.map_err(|e| {
            warn!(operation = %operation, error = %e, "Request failed before a response");
            TransportError::network(format!("Network error: {e}"))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = extract_error_detail(status, &body);
        warn!(
            operation = %operation,
            status = status.as_u16(),
            detail = %detail,
            "Service returned an error"
        );
        Err(TransportError::http(status.as_u16(), detail))
    }
}

async fn read_json<T: DeserializeOwned>(
    operation: Operation,
    response: Response,
) -> Result<T, TransportError> {
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .map_err(|e| TransportError::invalid_body(status, e))?;

    serde_json::from_slice(&body).map_err(|e| {
        warn!(operation = %operation, error = %e, "Undecodable response body");
        TransportError::invalid_body(status, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::StaticApiKey;

    #[test]
    fn test_client_builds_from_default_config() {
        let client = TransportClient::new(&ClientConfig::default()).unwrap();
        assert_eq!(client.credentials().api_key(), None);
        assert_eq!(
            client.endpoints().url(Operation::ListVoices).as_str(),
            "http://localhost:8888/api/v1/voices"
        );
    }

    #[test]
    fn test_with_credentials_replaces_supplier() {
        let client = TransportClient::new(&ClientConfig::default())
            .unwrap()
            .with_credentials(Arc::new(StaticApiKey::new("k")));
        assert_eq!(client.credentials().api_key(), Some("k".to_string()));
    }

    #[test]
    fn test_request_rejects_unencodable_key() {
        let client = TransportClient::new(&ClientConfig::default())
            .unwrap()
            .with_credentials(Arc::new(StaticApiKey::new("bad\nkey")));
        let url = client.endpoints().url(Operation::HealthCheck);
        let err = client.request(Operation::HealthCheck, url).unwrap_err();
        assert!(err.is_local());
        assert!(!err.is_network());
    }
}
