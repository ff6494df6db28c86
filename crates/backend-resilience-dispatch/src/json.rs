//! Gzip-compressed JSON request bodies.

use backend_resilience_core::{Headers, Method, RequestDescriptor};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// Content type forced on every JSON envelope.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Content encoding forced on every JSON envelope.
pub const GZIP_CONTENT_ENCODING: &str = "gzip";

/// Errors building a JSON envelope.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("failed to serialize request data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to compress request body: {0}")]
    Compress(#[from] std::io::Error),
}

/// A request whose payload is sent as gzip-compressed JSON.
#[derive(Debug, Clone)]
pub struct JsonRequest<D = serde_json::Value> {
    pub method: Method,
    pub url: String,
    pub data: Option<D>,
    pub headers: Headers,
    pub timeout: Option<Duration>,
    pub with_credentials: bool,
}

impl<D> JsonRequest<D> {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            data: None,
            headers: Headers::new(),
            timeout: None,
            with_credentials: false,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>, data: D) -> Self {
        Self::new(Method::Post, url).data(data)
    }

    pub fn put(url: impl Into<String>, data: D) -> Self {
        Self::new(Method::Put, url).data(data)
    }

    pub fn data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = with_credentials;
        self
    }
}

/// Turns a [`JsonRequest`] into a transport-ready [`RequestDescriptor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEnvelope;

impl JsonEnvelope {
    /// Builds the descriptor.
    ///
    /// The body is the gzip-compressed JSON form of `data`, or empty when
    /// there is none. Caller headers are kept, except that `Content-Type`
    /// and `Content-Encoding` are always replaced, whatever their case.
    /// Method, URL, timeout and the credentials flag pass through unchanged.
    pub fn build<D: Serialize>(request: &JsonRequest<D>) -> Result<RequestDescriptor, EnvelopeError> {
        let mut headers = request.headers.clone();
        headers.insert("Content-Type", JSON_CONTENT_TYPE);
        headers.insert("Content-Encoding", GZIP_CONTENT_ENCODING);

        let body = match &request.data {
            Some(data) => Some(gzip(&serde_json::to_vec(data)?)?),
            None => None,
        };

        Ok(RequestDescriptor {
            method: request.method,
            url: request.url.clone(),
            headers,
            body: body.map(Into::into),
            timeout: request.timeout,
            with_credentials: request.with_credentials,
        })
    }
}

fn gzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}
