//! The transport boundary: what a request looks like going out, what a
//! response looks like coming back, and the service trait a transport
//! adapter implements.

use crate::error::TransportError;
use bytes::Bytes;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tower::{Service, ServiceExt};

/// HTTP method of a [`RequestDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Method {
    /// Returns the method token as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered header set with unique, case-insensitive names.
///
/// Inserting a name that already exists under a different ASCII case
/// replaces the existing entry; the spelling of the newest insert wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }

    /// Inserts a header, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => {
                let (_, previous) =
                    std::mem::replace(&mut self.entries[index], (name, value));
                Some(previous)
            }
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Returns the value of a header, matching the name case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|index| self.entries[index].1.as_str())
    }

    /// Returns true if a header with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Removes a header, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|index| self.entries.remove(index).1)
    }

    /// Inserts every entry of `other`, replacing entries with matching names.
    pub fn merge(&mut self, other: &Headers) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the number of headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no headers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// A request to be sent to the backend.
///
/// Descriptors are immutable once dispatched; a replay sends a clone of the
/// original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Bytes>,
    /// Per-request timeout. `None` defers to the transport's own policy.
    pub timeout: Option<Duration>,
    /// Whether the transport should attach ambient credentials (cookies).
    pub with_credentials: bool,
}

impl RequestDescriptor {
    /// Creates a descriptor with no headers, body or timeout.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
            timeout: None,
            with_credentials: false,
        }
    }

    /// Shorthand for a `GET` descriptor.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Shorthand for a `HEAD` descriptor.
    pub fn head(url: impl Into<String>) -> Self {
        Self::new(Method::Head, url)
    }

    /// Shorthand for a `POST` descriptor.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
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

/// A response received from the backend, whatever its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl Response {
    /// Creates a response with an empty body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns true for 401 Unauthorized.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Returns true for any status of 400 or above.
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// A transport adapter: performs one HTTP call per [`RequestDescriptor`].
///
/// Implemented for every cloneable tower [`Service`] with the right request,
/// response and error types, so adapters are written as plain services
/// (or with `tower::service_fn`) and can be wrapped in other tower layers.
pub trait Transport: Clone + Send + Sync + 'static {
    /// Future resolving to the outcome of one call.
    type Future: Future<Output = Result<Response, TransportError>> + Send + 'static;

    /// Dispatches one request, waiting for the service to become ready first.
    fn dispatch(&self, request: RequestDescriptor) -> Self::Future;
}

impl<S> Transport for S
where
    S: Service<RequestDescriptor, Response = Response, Error = TransportError>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    type Future = tower::util::Oneshot<S, RequestDescriptor>;

    fn dispatch(&self, request: RequestDescriptor) -> Self::Future {
        self.clone().oneshot(request)
    }
}
