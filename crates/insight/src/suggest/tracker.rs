//! Per-field query sequencing.
//!
//! Lookups are asynchronous and complete in any order. Every issued query
//! gets the next number from its field's [`SequencedQueryTracker`]; when a
//! response arrives, only the one carrying the highest issued number may
//! touch the dropdown. Everything older is stale and dropped.

use std::fmt;

/// Sequence number of an issued query. Starts at 1 for each field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuerySeq(u64);

impl QuerySeq {
    /// The raw sequence value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for QuerySeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Assigns monotonically increasing sequence numbers and judges currency.
///
/// Besides issuing, the tracker can *retire* the outstanding query: the
/// latest number stays the highest issued, but it is no longer current.
/// Clearing the input, committing a row, dismissing the dropdown and
/// tearing the field down all retire, so a response still in flight can
/// never reopen the dropdown for text the user has moved past.
#[derive(Debug, Default, Clone)]
pub struct SequencedQueryTracker {
    issued: u64,
    retired_through: u64,
}

impl SequencedQueryTracker {
    /// Create a tracker with nothing issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next sequence number.
    pub fn issue(&mut self) -> QuerySeq {
        self.issued += 1;
        QuerySeq(self.issued)
    }

    /// Retire every query issued so far without issuing a new one.
    pub fn retire(&mut self) {
        self.retired_through = self.issued;
    }

    /// The highest sequence number issued, if any.
    pub fn latest(&self) -> Option<QuerySeq> {
        (self.issued > 0).then_some(QuerySeq(self.issued))
    }

    /// Whether a response for `seq` may still be rendered.
    pub fn is_current(&self, seq: QuerySeq) -> bool {
        seq.0 == self.issued && seq.0 > self.retired_through
    }
}
