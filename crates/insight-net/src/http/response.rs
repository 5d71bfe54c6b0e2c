//! Received responses.

use bytes::Bytes;
use http::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{NetworkError, Result};

/// A response whose headers have arrived. The body is read by consuming
/// it with [`bytes`](Self::bytes) or [`json`](Self::json).
pub struct HttpResponse {
    inner: reqwest::Response,
}

impl HttpResponse {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    pub fn status_code(&self) -> StatusCode {
        self.inner.status()
    }

    /// The status as a bare number.
    pub fn status(&self) -> u16 {
        self.status_code().as_u16()
    }

    /// 2xx.
    pub fn is_success(&self) -> bool {
        self.status_code().is_success()
    }

    /// The URL that answered, after any redirects.
    pub fn url(&self) -> &url::Url {
        self.inner.url()
    }

    pub async fn bytes(self) -> Result<Bytes> {
        self.inner.bytes().await.map_err(NetworkError::from)
    }

    /// Read the body and decode it as `T`.
    ///
    /// A body of the wrong shape is a [`NetworkError::Json`], regardless of
    /// the `Content-Type` the server sent.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.bytes().await?;
        serde_json::from_slice(&body).map_err(NetworkError::from)
    }

    /// Pass 2xx responses through; turn any other status into
    /// [`NetworkError::HttpStatus`] carrying the body text, if any.
    ///
    /// Redirects that reqwest did not follow (`300`, `304`, a `3xx` without
    /// `Location`) count as failures: their bodies are not the resource.
    pub async fn error_for_status_with_body(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.inner.text().await {
            Ok(body) if !body.trim().is_empty() => Some(body),
            _ => None,
        };
        Err(NetworkError::HttpStatus { status, message })
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status_code())
            .field("url", &self.url().as_str())
            .finish_non_exhaustive()
    }
}
