//! Suggestion sources: the network boundary of the subsystem.
//!
//! A [`SuggestionSource`] turns `(query text, field tag)` into an ordered
//! list of labels. The order is the source's relevance order and is never
//! re-sorted downstream. Sources don't retry; every failure is reported
//! once as a [`SuggestionFetchError`].
//!
//! Three implementations are provided:
//!
//! - [`HttpSuggestionSource`] asks the dashboard's suggestions endpoint
//!   (`GET <endpoint>?q=<text>&field=<Tag>`, JSON array of strings).
//! - [`CatalogSource`] prefetches the dashboard's autocomplete catalog once
//!   and answers every lookup locally.
//! - [`StringListSource`] answers from in-memory lists.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use insight_core::PerfSpan;
use insight_core::logging::targets;
use insight_net::{HttpClient, NetworkError};
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::Instrument;
use url::Url;

use crate::field::FieldTag;

/// The future returned by [`SuggestionSource::fetch_suggestions`].
pub type FetchFuture = BoxFuture<'static, Result<Vec<String>, SuggestionFetchError>>;

/// Why a lookup produced no usable result.
///
/// Callers treat every variant the same way: the dropdown closes and the
/// failure is logged. The variants only exist for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuggestionFetchError {
    /// The request never produced a response (connect failure, timeout, ...).
    #[error("suggestion transport failed: {0}")]
    Transport(NetworkError),
    /// The endpoint answered with a non-success status.
    #[error("suggestion endpoint returned HTTP {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// Response body, if any.
        message: Option<String>,
    },
    /// The payload was not a JSON array of strings.
    #[error("malformed suggestion payload: {0}")]
    MalformedPayload(String),
}

impl From<NetworkError> for SuggestionFetchError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::HttpStatus { status, message } => Self::Status { status, message },
            NetworkError::Json(msg) | NetworkError::InvalidBody(msg) => Self::MalformedPayload(msg),
            other => Self::Transport(other),
        }
    }
}

/// A provider of suggestion labels for a query.
pub trait SuggestionSource: Send + Sync {
    /// Look up suggestions for already-normalized `query` text.
    ///
    /// The returned future must not borrow from `self`; implementations
    /// clone whatever they need into it.
    fn fetch_suggestions(&self, query: &str, tag: FieldTag) -> FetchFuture;
}

/// Parse a suggestions payload: a JSON array of strings.
pub fn parse_labels(body: &[u8]) -> Result<Vec<String>, SuggestionFetchError> {
    serde_json::from_slice::<Vec<String>>(body)
        .map_err(|e| SuggestionFetchError::MalformedPayload(e.to_string()))
}

// ============================================================================
// HTTP Source
// ============================================================================

/// Looks suggestions up on the dashboard's suggestions endpoint.
#[derive(Clone, Debug)]
pub struct HttpSuggestionSource {
    client: HttpClient,
    endpoint: Url,
    timeout: Option<Duration>,
}

impl HttpSuggestionSource {
    /// Create a source for the given endpoint URL.
    pub fn new(client: HttpClient, endpoint: Url) -> Self {
        Self {
            client,
            endpoint,
            timeout: None,
        }
    }

    /// Override the client's timeout for lookups.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The endpoint lookups are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl SuggestionSource for HttpSuggestionSource {
    fn fetch_suggestions(&self, query: &str, tag: FieldTag) -> FetchFuture {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let timeout = self.timeout;
        let query = query.to_string();
        let span = tracing::debug_span!(target: targets::SOURCE, "fetch_suggestions", field = %tag, q = %query);

        async move {
            let mut request = client
                .get(endpoint.as_str())
                .query("q", query)
                .query("field", tag.as_str());
            if let Some(timeout) = timeout {
                request = request.timeout(timeout);
            }

            let response = request.send().await?.error_for_status_with_body().await?;
            let body = response.bytes().await?;
            let labels = parse_labels(&body)?;
            tracing::debug!(target: targets::SOURCE, items = labels.len(), "lookup answered");
            Ok::<_, SuggestionFetchError>(labels)
        }
        .instrument(span)
        .boxed()
    }
}

// ============================================================================
// String List Source
// ============================================================================

/// Answers lookups from in-memory per-tag lists.
///
/// Matching is a case-insensitive prefix match; results keep list order.
/// An empty query returns the whole list. Tags without a list yield nothing.
#[derive(Debug, Clone, Default)]
pub struct StringListSource {
    lists: HashMap<FieldTag, Vec<String>>,
}

impl StringListSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the list for a tag using builder pattern.
    pub fn with_items<I, S>(mut self, tag: FieldTag, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_items(tag, items);
        self
    }

    /// Replace the list for a tag.
    pub fn set_items<I, S>(&mut self, tag: FieldTag, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists
            .insert(tag, items.into_iter().map(Into::into).collect());
    }

    /// The list for a tag.
    pub fn items(&self, tag: FieldTag) -> &[String] {
        self.lists.get(&tag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Labels for `tag` whose lowercase form starts with the lowercase `prefix`.
    pub fn completions(&self, tag: FieldTag, prefix: &str) -> Vec<String> {
        let _span = PerfSpan::new("string_list_completions");
        let items = self.items(tag);
        if prefix.is_empty() {
            return items.to_vec();
        }

        let prefix_lower = prefix.to_lowercase();
        items
            .iter()
            .filter(|item| item.to_lowercase().starts_with(&prefix_lower))
            .cloned()
            .collect()
    }
}

impl SuggestionSource for StringListSource {
    fn fetch_suggestions(&self, query: &str, tag: FieldTag) -> FetchFuture {
        futures_util::future::ready(Ok(self.completions(tag, query))).boxed()
    }
}

// ============================================================================
// Catalog Source
// ============================================================================

/// The dashboard's autocomplete catalog payload.
///
/// Missing keys decode as empty lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Known sectors, sorted.
    pub sectors: Vec<String>,
    /// Known skills, most frequent first.
    pub skills: Vec<String>,
    /// Known locations, sorted.
    pub locations: Vec<String>,
}

impl From<Catalog> for StringListSource {
    fn from(catalog: Catalog) -> Self {
        StringListSource::new()
            .with_items(FieldTag::Sector, catalog.sectors)
            .with_items(FieldTag::Skill, catalog.skills)
            .with_items(FieldTag::Location, catalog.locations)
    }
}

/// Prefetches the autocomplete catalog once and filters it locally.
///
/// The first lookup downloads the catalog; later lookups never touch the
/// network. A failed download is not cached, so the next lookup retries it.
/// Clones share the cache.
#[derive(Clone, Debug)]
pub struct CatalogSource {
    client: HttpClient,
    url: Url,
    cache: Arc<OnceCell<StringListSource>>,
}

impl CatalogSource {
    /// Create a source for the given catalog URL.
    pub fn new(client: HttpClient, url: Url) -> Self {
        Self {
            client,
            url,
            cache: Arc::new(OnceCell::new()),
        }
    }

    /// Whether the catalog has been downloaded.
    pub fn is_loaded(&self) -> bool {
        self.cache.initialized()
    }
}

async fn load_catalog(client: HttpClient, url: Url) -> Result<StringListSource, SuggestionFetchError> {
    tracing::debug!(target: targets::SOURCE, url = %url, "loading autocomplete catalog");
    let response = client
        .get(url.as_str())
        .send()
        .await?
        .error_for_status_with_body()
        .await?;
    let catalog: Catalog = response.json().await?;
    tracing::info!(
        target: targets::SOURCE,
        sectors = catalog.sectors.len(),
        skills = catalog.skills.len(),
        locations = catalog.locations.len(),
        "autocomplete catalog loaded"
    );
    Ok(catalog.into())
}

impl SuggestionSource for CatalogSource {
    fn fetch_suggestions(&self, query: &str, tag: FieldTag) -> FetchFuture {
        let client = self.client.clone();
        let url = self.url.clone();
        let cache = Arc::clone(&self.cache);
        let query = query.to_string();

        async move {
            let lists = cache.get_or_try_init(|| load_catalog(client, url)).await?;
            Ok::<_, SuggestionFetchError>(lists.completions(tag, &query))
        }
        .boxed()
    }
}
