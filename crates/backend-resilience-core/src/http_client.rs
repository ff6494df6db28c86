//! Transport adapter backed by `reqwest`.

use crate::error::TransportError;
use crate::transport::{Headers, Method, RequestDescriptor, Response};
use futures::future::BoxFuture;
use std::task::{Context, Poll};
use tower::Service;

/// A [`Transport`](crate::Transport) that performs requests with a shared
/// `reqwest::Client`.
///
/// Timeouts reported by reqwest map to [`TransportError::Timeout`]; every
/// other client failure maps to [`TransportError::Network`]. Responses are
/// returned whatever their status code.
///
/// `with_credentials` has no effect here: reqwest attaches whatever its
/// client is configured with (cookie store, default headers).
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport around an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }

    fn map_error(error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::network(error)
        }
    }
}

impl Service<RequestDescriptor> for ReqwestTransport {
    type Response = Response;
    type Error = TransportError;
    type Future = BoxFuture<'static, Result<Response, TransportError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: RequestDescriptor) -> Self::Future {
        let mut builder = self
            .client
            .request(Self::method(request.method), &request.url);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        Box::pin(async move {
            let response = builder.send().await.map_err(Self::map_error)?;
            let status = response.status().as_u16();
            let headers: Headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response.bytes().await.map_err(Self::map_error)?;

            Ok(Response {
                status,
                headers,
                body,
            })
        })
    }
}
