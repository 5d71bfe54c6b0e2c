//! Error types for Insight.
//!
//! Fetch failures are deliberately absent here: they never leave the
//! controller (see [`SuggestionFetchError`](crate::SuggestionFetchError)).
//! What remains are setup mistakes the host should hear about.

use std::fmt;

use crate::config::ConfigError;
use crate::document::DocumentError;
use crate::field::UnknownFieldTag;
use crate::suggest::BindError;

/// The main error type for Insight setup operations.
#[derive(Debug)]
pub enum InsightError {
    /// Settings could not be loaded or applied.
    Config(ConfigError),
    /// A page element could not be declared or claimed.
    Document(DocumentError),
    /// A field could not be bound.
    Bind(BindError),
    /// A field tag name was not recognized.
    UnknownTag(UnknownFieldTag),
}

impl fmt::Display for InsightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "Configuration error: {err}"),
            Self::Document(err) => write!(f, "Document error: {err}"),
            Self::Bind(err) => write!(f, "Bind error: {err}"),
            Self::UnknownTag(err) => write!(f, "Field error: {err}"),
        }
    }
}

impl std::error::Error for InsightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Document(err) => Some(err),
            Self::Bind(err) => Some(err),
            Self::UnknownTag(err) => Some(err),
        }
    }
}

impl From<ConfigError> for InsightError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<DocumentError> for InsightError {
    fn from(err: DocumentError) -> Self {
        Self::Document(err)
    }
}

impl From<BindError> for InsightError {
    fn from(err: BindError) -> Self {
        Self::Bind(err)
    }
}

impl From<UnknownFieldTag> for InsightError {
    fn from(err: UnknownFieldTag) -> Self {
        Self::UnknownTag(err)
    }
}

/// A specialized Result type for Insight setup operations.
pub type Result<T> = std::result::Result<T, InsightError>;
