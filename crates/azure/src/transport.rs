//! HTTP transport seam and its reqwest implementation.
//!
//! Retries, auth headers and connection pooling are the transport's
//! business; the engine sends each request once.

use std::time::Duration;

use blockxfer_transfer::{BoxFuture, FetchResponse, StoreResponse, TransportError};
use futures_util::{StreamExt, TryStreamExt};
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

/// A fully built request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self {
            method: Method::Put,
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }
}

/// Sends requests to the store.
///
/// A non-2xx status must be reported as [`TransportError::Status`].
pub trait HttpTransport: Send + Sync {
    /// Sends `request` and buffers the whole response.
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<StoreResponse, TransportError>>;

    /// Sends `request` and hands back the body as a stream.
    fn stream(&self, request: HttpRequest) -> BoxFuture<'_, Result<FetchResponse, TransportError>>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a client; `timeout` bounds each whole request.
    pub fn new(timeout: Option<Duration>) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    /// Wraps an existing client.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Sends the request and turns non-2xx statuses into errors.
    async fn execute(&self, request: HttpRequest) -> Result<reqwest::Response, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
        };
        debug!(%method, url = %redact(&request.url), bytes = request.body.len(), "sending request");

        let mut builder = self.http.request(method, &request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if request.method == Method::Put {
            builder = builder.body(request.body);
        }

        let resp = builder.send().await.map_err(map_error)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<StoreResponse, TransportError>> {
        Box::pin(async move {
            let resp = self.execute(request).await?;
            let status = resp.status().as_u16();
            let headers = collect_headers(resp.headers());
            let body = resp.bytes().await.map_err(map_error)?.to_vec();
            Ok(StoreResponse {
                status,
                headers,
                body,
            })
        })
    }

    fn stream(
        &self,
        request: HttpRequest,
    ) -> BoxFuture<'_, Result<FetchResponse, TransportError>> {
        Box::pin(async move {
            let resp = self.execute(request).await?;
            let status = resp.status().as_u16();
            let headers = collect_headers(resp.headers());
            let total = resp.content_length();
            let body = resp
                .bytes_stream()
                .map_ok(|bytes| bytes.to_vec())
                .map_err(map_error)
                .boxed();
            Ok(FetchResponse {
                status,
                headers,
                total,
                body,
            })
        })
    }
}

fn map_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Http(e.to_string())
    }
}

fn collect_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// Drops the query string so SAS signatures stay out of logs.
fn redact(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}
