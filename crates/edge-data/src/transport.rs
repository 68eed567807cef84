//! Outbound HTTP transport.

use std::time::Duration;

use async_trait::async_trait;

use crate::encode::encode_component;

/// Error type for fetch operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// The upstream answered with a non-success status.
    #[error("HTTP error: {status} for {url}")]
    Http {
        status: u16,
        url: String,
        /// Raw response body, for upstream error details.
        body: String,
    },

    /// The request never produced a response.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The response body did not match the expected shape.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// The request could not be built.
    #[error("Request error: {0}")]
    Request(String),
}

/// A GET request to an upstream API.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    url: String,
    query: Vec<(String, String)>,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    /// Create a GET request for a URL without query string.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Append a query parameter. Key and value are encoded on output.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Authenticate with a bearer token.
    pub fn bearer(self, token: &str) -> Self {
        self.header("authorization", format!("Bearer {}", token))
    }

    /// Look up a header value (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The full URL including the encoded query string.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect();
        format!("{}?{}", self.url, query.join("&"))
    }
}

/// Response from an upstream API.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Completed fetch with its duration, for logging.
#[derive(Debug, Clone)]
pub struct Timed<T> {
    /// The value.
    pub value: T,
    /// Time spent waiting on the upstream.
    pub elapsed: Duration,
}

/// Sends requests to upstream APIs.
///
/// Workloads run single-threaded, so futures are not required to be `Send`.
#[async_trait(?Send)]
pub trait Transport {
    /// Send a request and return the raw response.
    async fn send(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError>;
}

/// Transport backed by Spin's outbound HTTP.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinTransport;

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl Transport for SpinTransport {
    async fn send(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        use spin_sdk::http::{Method, Request, Response};

        let mut builder = Request::builder();
        builder.method(Method::Get).uri(request.url());
        for (name, value) in &request.headers {
            builder.header(name.as_str(), value.as_str());
        }
        let req = builder.build();

        let resp: Response = spin_sdk::http::send(req)
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        Ok(FetchResponse {
            status: *resp.status(),
            body: resp.body().to_vec(),
        })
    }
}
