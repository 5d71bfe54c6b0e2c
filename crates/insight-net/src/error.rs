//! Error types for the networking module.

use std::fmt;

/// Everything that can go wrong between building a request and reading
/// its body.
///
/// Variants carry rendered messages rather than source errors so the type
/// stays `Clone + PartialEq`; suggestion lookups compare failures in tests
/// and hand them across tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The URL could not be parsed or is not absolute.
    InvalidUrl(String),
    /// A header name or value was rejected.
    InvalidHeader(String),
    /// The proxy URL was rejected.
    Proxy(String),
    /// No connection could be made.
    Connection(String),
    /// The request or connect timeout elapsed.
    Timeout,
    /// The redirect policy was exhausted.
    TooManyRedirects,
    /// Any other transport failure.
    Request(String),
    /// The server answered with a status other than 2xx.
    HttpStatus {
        /// Status code.
        status: u16,
        /// Response body, if there was one.
        message: Option<String>,
    },
    /// The body could not be read.
    InvalidBody(String),
    /// The body was read but is not the expected JSON.
    Json(String),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(msg) => write!(f, "invalid URL: {msg}"),
            Self::InvalidHeader(msg) => write!(f, "invalid header: {msg}"),
            Self::Proxy(msg) => write!(f, "invalid proxy: {msg}"),
            Self::Connection(msg) => write!(f, "connection failed: {msg}"),
            Self::Timeout => f.write_str("request timed out"),
            Self::TooManyRedirects => f.write_str("too many redirects"),
            Self::Request(msg) => write!(f, "request failed: {msg}"),
            Self::HttpStatus {
                status,
                message: Some(msg),
            } => write!(f, "HTTP {status}: {msg}"),
            Self::HttpStatus { status, message: None } => write!(f, "HTTP {status}"),
            Self::InvalidBody(msg) => write!(f, "unreadable response body: {msg}"),
            Self::Json(msg) => write!(f, "JSON error: {msg}"),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        match () {
            _ if err.is_timeout() => Self::Timeout,
            _ if err.is_connect() => Self::Connection(err.to_string()),
            _ if err.is_redirect() => Self::TooManyRedirects,
            _ if err.is_body() || err.is_decode() => Self::InvalidBody(err.to_string()),
            _ if err.is_builder() => Self::InvalidUrl(err.to_string()),
            _ => Self::Request(err.to_string()),
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<http::header::InvalidHeaderName> for NetworkError {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for NetworkError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

/// A specialized Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
