use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failure of a single call to the TTS service.
///
/// `status_code` is `None` when no HTTP response was received (DNS, connect,
/// TLS or I/O failures). `attempted` is `false` when the request could not be
/// built and nothing was sent. `detail` is the best human-readable explanation
/// that could be extracted from the response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail}")]
pub struct TransportError {
    pub status_code: Option<u16>,
    pub attempted: bool,
    pub detail: String,
}

impl TransportError {
    /// Non-2xx response
    pub fn http(status_code: u16, detail: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            attempted: true,
            detail: detail.into(),
        }
    }

    /// No response was received
    pub fn network(detail: impl Into<String>) -> Self {
        Self {
            status_code: None,
            attempted: true,
            detail: detail.into(),
        }
    }

    /// 2xx response whose body could not be decoded
    pub fn invalid_body(status_code: u16, error: impl std::fmt::Display) -> Self {
        Self::http(status_code, format!("invalid response body: {error}"))
    }

    /// The request could not be built locally; nothing was sent
    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self {
            status_code: None,
            attempted: false,
            detail: detail.into(),
        }
    }

    /// A send was attempted but no response arrived
    pub fn is_network(&self) -> bool {
        self.attempted && self.status_code.is_none()
    }

    /// Failed before anything was sent
    pub fn is_local(&self) -> bool {
        !self.attempted
    }

    /// Message suitable for display; `fallback` is used when no detail exists
    pub fn user_message(&self, fallback: &str) -> String {
        let detail = self.detail.trim();
        if detail.is_empty() {
            fallback.to_string()
        } else {
            detail.to_string()
        }
    }
}

/// Extract a human-readable error detail from a failed response body.
///
/// Recognises the JSON shapes the service and its proxies emit:
/// - `{"detail": "..."}` and the validation form `{"detail": [{"msg": "..."}]}`
/// - `{"error": "..."}` and `{"error": {"message": "..."}}`
/// - `{"message": "..."}`
///
/// Anything else falls back to the trimmed body text, and an empty body to the
/// HTTP reason phrase.
pub fn extract_error_detail(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();

    if let Some(detail) = serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|json| detail_from_json(&json))
    {
        return detail;
    }

    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

fn detail_from_json(json: &Value) -> Option<String> {
    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    match json.get("detail") {
        Some(Value::String(s)) => {
            if let Some(detail) = non_empty(s) {
                return Some(detail);
            }
        }
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }

    match json.get("error") {
        Some(Value::String(s)) => {
            if let Some(detail) = non_empty(s) {
                return Some(detail);
            }
        }
        Some(Value::Object(obj)) => {
            if let Some(detail) = obj.get("message").and_then(Value::as_str).and_then(non_empty)
            {
                return Some(detail);
            }
        }
        _ => {}
    }

    json.get("message").and_then(Value::as_str).and_then(non_empty)
}
