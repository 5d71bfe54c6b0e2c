//! Request building and sending.

use std::time::Duration;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use super::client::HttpClient;
use super::response::HttpResponse;
use crate::error::{NetworkError, Result};
use insight_core::logging::targets;

/// A GET request under construction. Created by [`HttpClient::get`].
///
/// Setters never fail. The first invalid header is remembered and
/// returned by [`send`](Self::send) without touching the network.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    client: HttpClient,
    url: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    timeout: Option<Duration>,
    error: Option<NetworkError>,
}

impl HttpRequestBuilder {
    pub(crate) fn new(client: HttpClient, url: String) -> Self {
        Self {
            client,
            url,
            query: Vec::new(),
            headers: HeaderMap::new(),
            timeout: None,
            error: None,
        }
    }

    fn fail(&mut self, err: NetworkError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Set a header, replacing any client default of the same name.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            (Err(err), _) => self.fail(err.into()),
            (_, Err(err)) => self.fail(err.into()),
        }
        self
    }

    /// Append a query pair. Pairs are percent-encoded in the order given.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Override the client's timeout for this request only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The URL that will be requested, query included.
    pub fn url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.url)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    /// Send the request.
    ///
    /// Any status counts as a response here; call
    /// [`HttpResponse::error_for_status_with_body`] to reject anything but 2xx.
    pub async fn send(self) -> Result<HttpResponse> {
        let url = self.url()?;
        if let Some(err) = self.error {
            return Err(err);
        }

        tracing::debug!(target: targets::HTTP, %url, "sending request");
        let mut request = self
            .client
            .reqwest()
            .get(url)
            .headers(self.headers);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        tracing::debug!(target: targets::HTTP, status = response.status().as_u16(), "response received");
        Ok(HttpResponse::new(response))
    }
}
