//! Transport client tests against a mocked TTS service.

mod fixtures;

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fixtures::*;
use odiadev_client::core::transport::{
    ApiRequest, ApiResponse, CacheStatus, CloneStatus, NoCredentials, StoredApiKey,
    TransportClient, TtsRequest,
};
use odiadev_client::{AudioUpload, ClientConfig, UploadValidator};

fn client(server: &MockServer) -> TransportClient {
    TransportClient::new(&mock_config(&server.uri())).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "healthy", "service": "dia-tts"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let health = client(&server).health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.service.as_deref(), Some("dia-tts"));
}

#[tokio::test]
async fn test_generate_speech_sends_json_and_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tts/generate"))
        .and(header("X-API-Key", "test-api-key"))
        .and(body_json(json!({"text": "Hello world", "voice_id": "default"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(synthesized_mp3().to_vec(), "audio/mpeg")
                .insert_header("X-Cache", "hit"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let speech = client(&server)
        .generate_speech(&TtsRequest::new("Hello world", None))
        .await
        .unwrap();

    assert_eq!(speech.bytes, synthesized_mp3());
    assert_eq!(speech.mime_type, "audio/mpeg");
    assert_eq!(speech.cache_status, CacheStatus::Hit);
}

#[tokio::test]
async fn test_generate_speech_on_legacy_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tts"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(synthesized_mp3().to_vec(), "audio/mpeg"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = mock_config(&server.uri());
    config.generate_speech_path = "/tts".to_string();
    let client = TransportClient::new(&config).unwrap();

    let speech = client
        .generate_speech(&TtsRequest::new("Ẹ kú àárọ̀", Some("yoruba-female")))
        .await
        .unwrap();
    assert_eq!(speech.cache_status, CacheStatus::Unknown);
}

#[tokio::test]
async fn test_error_detail_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tts/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "model overloaded"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .generate_speech(&TtsRequest::new("Hello", None))
        .await
        .unwrap_err();

    assert_eq!(err.status_code, Some(500));
    assert_eq!(err.detail, "model overloaded");
}

#[tokio::test]
async fn test_error_with_plain_text_and_empty_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/voices"))
        .respond_with(ResponseTemplate::new(502).set_body_string("  bad gateway from proxy \n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client(&server);

    let err = client.list_voices().await.unwrap_err();
    assert_eq!(err.status_code, Some(502));
    assert_eq!(err.detail, "bad gateway from proxy");

    let err = client.health().await.unwrap_err();
    assert_eq!(err.status_code, Some(503));
    assert_eq!(err.detail, "Service Unavailable");
}

#[tokio::test]
async fn test_network_failure_has_no_status() {
    let mut config = ClientConfig::default();
    config.base_url = "http://127.0.0.1:1".to_string();
    let client = TransportClient::new(&config).unwrap();

    let err = client.health().await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.status_code, None);
    assert!(!err.detail.is_empty());
}

#[tokio::test]
async fn test_undecodable_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json at all"))
        .mount(&server)
        .await;

    let err = client(&server).health().await.unwrap_err();
    assert_eq!(err.status_code, Some(200));
    assert!(err.detail.starts_with("invalid response body"));
}

#[tokio::test]
async fn test_clone_voice_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/voice/clone"))
        .and(header("X-API-Key", "test-api-key"))
        .and(body_string_contains("name=\"audio\"; filename=\"sample.wav\""))
        .and(body_string_contains("name=\"name\"\r\n\r\nMy Voice"))
        .and(body_string_contains("name=\"consent\"\r\n\r\nyes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "voice_id": "voice_abc",
            "status": "processing",
            "message": "Voice is being cloned"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // ASCII-only payload keeps the body matchable as a string
    let upload = AudioUpload::new("sample.wav", "audio/wav", b"RIFF0000WAVEfmt sample".to_vec());
    let request = UploadValidator::default()
        .validate(Some(upload), " My Voice ", true)
        .unwrap();
    let result = client(&server).clone_voice(&request).await.unwrap();

    assert_eq!(result.voice_id, "voice_abc");
    assert_eq!(result.status, CloneStatus::Pending);
    assert_eq!(result.message.as_deref(), Some("Voice is being cloned"));
}

#[tokio::test]
async fn test_voice_catalogue_operations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "voices": [
                {"voice_id": "v1", "name": "Ada", "status": "ready"},
                {"id": "v2", "name": "Bola"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/voices/v1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"voice_id": "v1", "name": "Ada", "language": "yo"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/voices/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Voice deleted"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/voices/v2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);

    let voices = client.list_voices().await.unwrap();
    assert_eq!(voices.len(), 2);
    assert_eq!(voices[1].voice_id, "v2");

    let voice = client.get_voice("v1").await.unwrap();
    assert_eq!(voice.extra["language"], "yo");

    let deleted = client.delete_voice("v1").await.unwrap();
    assert_eq!(deleted.message.as_deref(), Some("Voice deleted"));

    let deleted = client.delete_voice("v2").await.unwrap();
    assert_eq!(deleted.message, None);
}

#[tokio::test]
async fn test_tagged_call_dispatch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server).call(ApiRequest::ListVoices).await.unwrap();
    assert!(matches!(response, ApiResponse::Voices(ref voices) if voices.is_empty()));
}

#[tokio::test]
async fn test_requests_without_credentials_omit_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let client = client(&server).with_credentials(Arc::new(NoCredentials));
    client.health().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("x-api-key"));
}

#[tokio::test]
async fn test_stored_key_is_read_per_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header("X-API-Key", "stored-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = tempfile::TempDir::new().unwrap();
    let store = StoredApiKey::new(temp_dir.path().join("key.json"));
    let client = client(&server).with_credentials(Arc::new(store.clone()));

    // Stored after the client was built
    store.store("stored-key").unwrap();
    client.health().await.unwrap();
}
