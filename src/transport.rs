//! HTTP transport seam.
//!
//! The session client speaks to the network only through [`HttpTransport`],
//! so tests queue canned responses and browsers plug in fetch. Requests and
//! responses are plain data; bodies are text.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::SessionError;

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: HeaderMap::new(), body: None }
    }

    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// `POST` with a JSON body and `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Parse`] if `body` cannot be serialized.
    pub fn post_json<B: Serialize + ?Sized>(url: impl Into<String>, body: &B) -> Result<Self, SessionError> {
        let payload =
            serde_json::to_string(body).map_err(|e| SessionError::Parse(format!("failed to encode request: {e}")))?;
        let mut request = Self::new(Method::POST, url);
        request.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        request.body = Some(payload);
        Ok(request)
    }

    /// Add or replace a header.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or value is not valid HTTP.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, SessionError> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(self)
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// `true` for any 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Parse`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, SessionError> {
        serde_json::from_str(&self.body).map_err(|e| SessionError::Parse(e.to_string()))
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Sends one request and returns the full response.
///
/// Futures are not `Send`: the browser's fetch runs on the UI thread.
#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    /// Send `request`. Any status code is a successful send.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transport`] when no response was received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SessionError>;
}

/// [`HttpTransport`] over a shared `reqwest::Client`.
///
/// No request timeout is configured; the login call relies on the
/// transport's own connection behaviour.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with a fresh client.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transport`] if the HTTP client fails to build.
    pub fn new() -> Result<Self, SessionError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| SessionError::Transport(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http })
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SessionError> {
        let mut builder = self
            .http
            .request(request.method, request.url.as_str())
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(HttpResponse { status, headers, body })
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
