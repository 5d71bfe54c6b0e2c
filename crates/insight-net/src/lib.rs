//! Networking module for Insight.
//!
//! The HTTP plumbing behind the dashboard's remote suggestion lookups: a
//! pooled, cloneable [`HttpClient`], a request builder that defers its
//! errors to `send`, and responses that decode JSON bodies and turn error
//! statuses into [`NetworkError::HttpStatus`].
//!
//! ```no_run
//! # async fn run() -> insight_net::Result<()> {
//! use std::time::Duration;
//! use insight_net::HttpClient;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(5))
//!     .user_agent("InsightDashboard/1.0")
//!     .build()?;
//!
//! let catalog: serde_json::Value = client
//!     .get("http://127.0.0.1:5000/api/autocomplete")
//!     .send()
//!     .await?
//!     .error_for_status_with_body()
//!     .await?
//!     .json()
//!     .await?;
//! println!("{catalog}");
//! # Ok(())
//! # }
//! ```

mod error;
pub mod http;

pub use error::{NetworkError, Result};
pub use self::http::{
    HttpClient, HttpClientBuilder, HttpClientConfig, HttpRequestBuilder, HttpResponse,
    RedirectPolicy,
};
