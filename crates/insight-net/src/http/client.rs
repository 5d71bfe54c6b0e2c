//! The shared HTTP client.

use std::sync::Arc;
use std::time::Duration;

use http::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use insight_core::logging::targets;

use super::request::HttpRequestBuilder;
use crate::error::{NetworkError, Result};

/// How many redirects a request may follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedirectPolicy {
    /// Redirect responses are returned to the caller as-is.
    None,
    /// Follow at most this many hops, then fail with
    /// [`NetworkError::TooManyRedirects`].
    Limited(usize),
}

impl RedirectPolicy {
    fn to_reqwest(self) -> reqwest::redirect::Policy {
        match self {
            Self::None => reqwest::redirect::Policy::none(),
            Self::Limited(hops) => reqwest::redirect::Policy::limited(hops),
        }
    }
}

/// Settings baked into an [`HttpClient`] when it is built.
///
/// The defaults suit interactive lookups: a request that takes longer than
/// ten seconds is no longer worth showing.
#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Time allowed to establish a connection.
    pub connect_timeout: Duration,
    /// Redirect handling.
    pub redirects: RedirectPolicy,
    /// Sent as `User-Agent` on every request.
    pub user_agent: String,
    /// Route every request through this proxy.
    pub proxy: Option<String>,
    /// Send `Accept: application/json` unless a request overrides it.
    pub accept_json: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(10)),
            connect_timeout: Duration::from_secs(3),
            redirects: RedirectPolicy::Limited(5),
            user_agent: concat!("insight/", env!("CARGO_PKG_VERSION")).to_string(),
            proxy: None,
            accept_json: true,
        }
    }
}

/// Configures and builds an [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
    headers: HeaderMap,
}

impl HttpClientBuilder {
    /// A builder starting from [`HttpClientConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail requests that take longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Let requests run as long as the server takes.
    pub fn without_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn redirects(mut self, policy: RedirectPolicy) -> Self {
        self.config.redirects = policy;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Route requests through `proxy_url`. Checked in [`build`](Self::build).
    pub fn proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy_url.into());
        self
    }

    /// Whether to send `Accept: application/json` by default.
    pub fn accept_json(mut self, enabled: bool) -> Self {
        self.config.accept_json = enabled;
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::try_from(name)?;
        let value = HeaderValue::try_from(value)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn build(self) -> Result<HttpClient> {
        let Self { config, mut headers } = self;
        if config.accept_json && !headers.contains_key(ACCEPT) {
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        }

        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .redirect(config.redirects.to_reqwest())
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url.as_str())
                .map_err(|err| NetworkError::Proxy(format!("{proxy_url}: {err}")))?;
            builder = builder.proxy(proxy);
        }

        Ok(HttpClient::from_parts(builder.build()?, config))
    }
}

struct Shared {
    client: reqwest::Client,
    config: HttpClientConfig,
}

/// A cloneable handle to a pooled HTTP client.
///
/// Clones share one connection pool, so every suggestion source on a page
/// can keep its own handle.
///
/// ```no_run
/// # async fn lookup() -> insight_net::Result<()> {
/// use insight_net::HttpClient;
///
/// let labels: Vec<String> = HttpClient::new()
///     .get("http://127.0.0.1:5000/api/suggestions")
///     .query("q", "bank")
///     .query("field", "Sector")
///     .send()
///     .await?
///     .error_for_status_with_body()
///     .await?
///     .json()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpClient {
    shared: Arc<Shared>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// A client with the default configuration.
    ///
    /// If the TLS backend refuses the tuned settings, falls back to
    /// reqwest's own defaults.
    pub fn new() -> Self {
        match HttpClientBuilder::new().build() {
            Ok(client) => client,
            Err(err) => {
                tracing::warn!(target: targets::HTTP, error = %err, "falling back to a plain HTTP client");
                Self::from_parts(reqwest::Client::new(), HttpClientConfig::default())
            }
        }
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    fn from_parts(client: reqwest::Client, config: HttpClientConfig) -> Self {
        Self {
            shared: Arc::new(Shared { client, config }),
        }
    }

    /// The settings this client was built with.
    pub fn config(&self) -> &HttpClientConfig {
        &self.shared.config
    }

    /// Start a GET request.
    pub fn get(&self, url: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(self.clone(), url.into())
    }

    pub(crate) fn reqwest(&self) -> &reqwest::Client {
        &self.shared.client
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let config = &self.shared.config;
        f.debug_struct("HttpClient")
            .field("timeout", &config.timeout)
            .field("redirects", &config.redirects)
            .field("user_agent", &config.user_agent)
            .finish_non_exhaustive()
    }
}
