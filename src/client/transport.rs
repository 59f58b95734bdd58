//! Transport layer between the kit and the SUT.
//!
//! Provides the `Transport` trait for abstracting over protocol bindings,
//! and `JsonRpcTransport` for JSON-RPC over HTTP.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use crate::config::{ConfigError, SutConfig};
use crate::error::{TckError, TckResult};
use crate::types::JsonRpcRequest;

use super::sse::SseStream;

/// Transport abstraction for talking to a SUT.
///
/// `send` returns the response body parsed as raw JSON. Whether that JSON
/// is a valid JSON-RPC response is for the classifier to decide, so a
/// transport only fails when there is no JSON to classify.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a JSON-RPC request and receive the raw response object.
    async fn send(&self, request: &JsonRpcRequest) -> TckResult<Value>;

    /// Send a JSON-RPC request and receive an SSE event stream.
    ///
    /// Used for streaming methods like `message/stream`.
    async fn send_stream(&self, request: &JsonRpcRequest) -> TckResult<SseStream>;

    /// Close the transport and release any held resources.
    ///
    /// The default implementation is a no-op.
    async fn close(&self) -> TckResult<()> {
        Ok(())
    }
}

/// JSON-RPC over HTTP transport using `reqwest`.
///
/// # Example
///
/// ```no_run
/// use a2a_tck::client::JsonRpcTransport;
/// use a2a_tck::config::SutConfig;
///
/// let config = SutConfig::new("http://localhost:9999").unwrap();
/// let transport = JsonRpcTransport::from_config(&config).unwrap();
/// assert_eq!(transport.url(), "http://localhost:9999");
/// ```
#[derive(Debug, Clone)]
pub struct JsonRpcTransport {
    client: reqwest::Client,
    url: String,
}

impl JsonRpcTransport {
    /// Create a transport honouring the config's timeout and headers.
    pub fn from_config(config: &SutConfig) -> TckResult<Self> {
        Ok(Self::with_client(config.url.clone(), build_http_client(config)?))
    }

    /// Create a transport with an existing `reqwest::Client`.
    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Returns the URL this transport sends requests to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the underlying HTTP client.
    pub fn http_client(&self) -> &reqwest::Client {
        &self.client
    }

    async fn post(&self, request: &JsonRpcRequest, accept: &str) -> TckResult<reqwest::Response> {
        let body = serde_json::to_vec(request).map_err(|e| {
            TckError::InvalidRequest(format!("failed to serialize JSON-RPC request: {e}"))
        })?;

        debug!(method = %request.method, id = %request.id, url = %self.url, "sending request");

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header("Accept", accept)
            .body(body)
            .send()
            .await?;

        Ok(response)
    }
}

/// Builds an HTTP client carrying the config's timeout and headers.
pub(crate) fn build_http_client(config: &SutConfig) -> TckResult<reqwest::Client> {
    let mut default_headers = HeaderMap::new();
    for (key, value) in &config.headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(key.clone()))?;
        let val =
            HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader(key.clone()))?;
        default_headers.insert(name, val);
    }

    reqwest::Client::builder()
        .timeout(config.timeout)
        .default_headers(default_headers)
        .build()
        .map_err(|e| TckError::Transport(format!("failed to build HTTP client: {e}")))
}

#[async_trait]
impl Transport for JsonRpcTransport {
    async fn send(&self, request: &JsonRpcRequest) -> TckResult<Value> {
        let response = self.post(request, "application/json").await?;
        let status = response.status();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TckError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            // Many SUTs report JSON-RPC errors with a 4xx/5xx status. Those
            // bodies are still protocol responses and get classified.
            return match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) if value.is_object() => {
                    debug!(status = status.as_u16(), "JSON-RPC body on non-2xx status");
                    Ok(value)
                }
                _ => Err(TckError::Http {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                }),
            };
        }

        let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
            TckError::InvalidJson(format!("failed to parse JSON-RPC response: {e}"))
        })?;

        debug!(id = %request.id, "received response");
        Ok(value)
    }

    async fn send_stream(&self, request: &JsonRpcRequest) -> TckResult<SseStream> {
        let response = self.post(request, "text/event-stream").await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(TckError::Http {
                status: status.as_u16(),
                body: body_text,
            });
        }

        Ok(SseStream::from_response(response))
    }
}
