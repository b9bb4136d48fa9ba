//! HTTP transport seam for backend calls.
//!
//! Client-side (hydrate): `GlooBackend` issues real requests via `gloo-net`.
//! Elsewhere the session manager is handed any `HttpBackend`, which is how the
//! tests drive it without a network.
//!
//! ERROR HANDLING
//! ==============
//! Only transport failures are errors here. Non-2xx statuses come back as an
//! ordinary `HttpResponse` so callers can read the backend's `error` body.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use serde::de::DeserializeOwned;

/// Network-level failure (request never produced a response).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("network error: {0}")]
pub struct TransportError(pub String);

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Minimal async HTTP client used by the session manager.
///
/// Futures are not `Send`: everything runs on the browser's event loop.
#[async_trait::async_trait(?Send)]
pub trait HttpBackend {
    /// `GET path`, optionally with `Authorization: Bearer <token>`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response was received.
    async fn get(&self, path: &str, bearer: Option<&str>) -> Result<HttpResponse, TransportError>;

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response was received.
    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<HttpResponse, TransportError>;
}

/// Format a bearer `Authorization` header value.
pub fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

/// `fetch`-backed transport for the browser build.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooBackend;

#[cfg(feature = "hydrate")]
impl GlooBackend {
    async fn finish(resp: gloo_net::http::Response) -> Result<HttpResponse, TransportError> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| TransportError(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(feature = "hydrate")]
#[async_trait::async_trait(?Send)]
impl HttpBackend for GlooBackend {
    async fn get(&self, path: &str, bearer: Option<&str>) -> Result<HttpResponse, TransportError> {
        let mut req = gloo_net::http::Request::get(path);
        if let Some(token) = bearer {
            req = req.header("Authorization", &bearer_header(token));
        }
        let resp = req.send().await.map_err(|e| TransportError(e.to_string()))?;
        Self::finish(resp).await
    }

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<HttpResponse, TransportError> {
        let resp = gloo_net::http::Request::post(path)
            .json(body)
            .map_err(|e| TransportError(e.to_string()))?
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        Self::finish(resp).await
    }
}
