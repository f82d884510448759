use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

/// A completed HTTP exchange, as seen by the datasource.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    /// Canonical reason phrase; may be empty.
    pub status_text: String,
    /// Leniently deserialized body; empty or non-JSON bodies read as null.
    pub body: Value,
}

/// The two failure channels an HTTP layer can produce, made explicit.
///
/// The original host client surfaced either a plain string or an object
/// carrying `statusText` and an optional `data.error` envelope, told apart by
/// runtime type inspection. Both shapes are preserved here as variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// Opaque failure text from the HTTP layer, e.g. a connect error.
    Message(String),
    /// A completed exchange the server rejected, with whatever error
    /// envelope the response body carried.
    Structured {
        status_text: String,
        error_code: Option<i64>,
        error_message: Option<String>,
    },
}

impl TransportFailure {
    /// User-facing message, with `default` standing in for an empty status
    /// line. A present error code is appended as `": <code>. <message>"`.
    pub fn user_message(&self, default: &str) -> String {
        match self {
            TransportFailure::Message(message) => message.clone(),
            TransportFailure::Structured {
                status_text,
                error_code,
                error_message,
            } => {
                let mut message = if status_text.is_empty() {
                    default.to_string()
                } else {
                    status_text.clone()
                };
                if let Some(code) = error_code {
                    message.push_str(&format!(
                        ": {}. {}",
                        code,
                        error_message.clone().unwrap_or_default()
                    ));
                }
                message
            }
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message("request failed"))
    }
}

impl std::error::Error for TransportFailure {}

/// HTTP client seam. Production code goes through [`HttpTransport`]; tests
/// substitute their own implementations.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportFailure>;
    async fn post(&self, url: &str, body: &Value) -> Result<TransportResponse, TransportFailure>;
}

/// Production transport over a shared reqwest client.
///
/// Timeouts and cancellation are inherited from reqwest; no retries.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn lift(response: reqwest::Response) -> Result<TransportResponse, TransportFailure> {
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        if status.is_success() {
            Ok(TransportResponse {
                status: status.as_u16(),
                status_text,
                body,
            })
        } else {
            Err(TransportFailure::Structured {
                status_text,
                error_code: body.pointer("/error/code").and_then(Value::as_i64),
                error_message: body
                    .pointer("/error/message")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            })
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportFailure::Message(e.to_string()))?;
        Self::lift(response).await
    }

    async fn post(&self, url: &str, body: &Value) -> Result<TransportResponse, TransportFailure> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportFailure::Message(e.to_string()))?;
        Self::lift(response).await
    }
}
