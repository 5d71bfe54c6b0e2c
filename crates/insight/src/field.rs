//! Suggestion field identity.
//!
//! A [`Field`] is one bound text input taking part in suggestion lookups,
//! tagged with the semantic category the server filters on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::ElementId;

/// The semantic category of a suggestion field.
///
/// The tag is sent to the suggestions endpoint as its string name
/// (`field=Sector`), so the wire names are part of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldTag {
    /// Posting year.
    Year,
    /// Industry sector.
    Sector,
    /// State or city.
    Location,
    /// Skill keyword.
    Skill,
}

impl FieldTag {
    /// Every known tag, in declaration order.
    pub const ALL: [FieldTag; 4] = [Self::Year, Self::Sector, Self::Location, Self::Skill];

    /// The wire name of this tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::Sector => "Sector",
            Self::Location => "Location",
            Self::Skill => "Skill",
        }
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown field tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field tag: {0}")]
pub struct UnknownFieldTag(pub String);

impl FromStr for FieldTag {
    type Err = UnknownFieldTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFieldTag(s.to_string()))
    }
}

/// One suggestion-enabled input: its element id and its tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    /// The input element the field is bound to.
    pub input: ElementId,
    /// The category sent along with every lookup.
    pub tag: FieldTag,
}

impl Field {
    /// Create a new field.
    pub fn new(input: impl Into<ElementId>, tag: FieldTag) -> Self {
        Self {
            input: input.into(),
            tag,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.input, self.tag)
    }
}
