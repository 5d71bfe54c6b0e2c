//! Element registry for the dashboard page.
//!
//! The suggestion subsystem never touches a real widget tree. Instead the
//! host page declares its text inputs and dropdown containers here, by id,
//! and the binder resolves the ids it is given against this registry.
//! Pointer events then name their target by the same ids (see
//! [`HitTarget`](crate::suggest::HitTarget)).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Identifier of an element on the page (`"sectorInput"`, `"sectorSuggest"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    /// Create an element id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&ElementId> for ElementId {
    fn from(id: &ElementId) -> Self {
        id.clone()
    }
}

/// What kind of element an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A text input.
    Input,
    /// A container that can host a dropdown's option rows.
    Container,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Container => f.write_str("container"),
        }
    }
}

/// Errors raised by [`Document`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// An element with this id already exists.
    #[error("element `{0}` already exists")]
    Duplicate(ElementId),
    /// No element with this id exists.
    #[error("element `{0}` does not exist")]
    Missing(ElementId),
    /// The element exists but has a different kind.
    #[error("element `{id}` is not a {expected}")]
    WrongKind {
        /// The offending id.
        id: ElementId,
        /// The kind the caller needed.
        expected: ElementKind,
    },
    /// The element is already owned by another binding.
    #[error("element `{0}` is already bound")]
    AlreadyClaimed(ElementId),
}

#[derive(Debug)]
struct ElementEntry {
    kind: ElementKind,
    claimed: bool,
}

/// A shared registry of page elements.
///
/// Cloning a `Document` yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct Document {
    elements: Arc<Mutex<HashMap<ElementId, ElementEntry>>>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a text input.
    pub fn add_input(&self, id: impl Into<ElementId>) -> Result<ElementId, DocumentError> {
        self.insert(id.into(), ElementKind::Input)
    }

    /// Declare a container element.
    pub fn add_container(&self, id: impl Into<ElementId>) -> Result<ElementId, DocumentError> {
        self.insert(id.into(), ElementKind::Container)
    }

    /// Create a fresh container for an input's dropdown.
    ///
    /// The container is named `<input>-suggestions`; on collision a numeric
    /// suffix is appended (`-2`, `-3`, ...).
    pub fn create_container_for(&self, input: &ElementId) -> ElementId {
        let mut elements = self.elements.lock();
        let base = format!("{input}-suggestions");
        let mut candidate = ElementId::new(base.clone());
        let mut n = 2;
        while elements.contains_key(&candidate) {
            candidate = ElementId::new(format!("{base}-{n}"));
            n += 1;
        }
        elements.insert(
            candidate.clone(),
            ElementEntry {
                kind: ElementKind::Container,
                claimed: false,
            },
        );
        candidate
    }

    /// Remove an element. Returns `true` if it existed.
    pub fn remove(&self, id: &ElementId) -> bool {
        self.elements.lock().remove(id).is_some()
    }

    /// Whether an element with this id exists.
    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.lock().contains_key(id)
    }

    /// The kind of an element, if it exists.
    pub fn kind(&self, id: &ElementId) -> Option<ElementKind> {
        self.elements.lock().get(id).map(|entry| entry.kind)
    }

    /// Number of declared elements.
    pub fn len(&self) -> usize {
        self.elements.lock().len()
    }

    /// Whether the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.lock().is_empty()
    }

    /// Take exclusive ownership of an element of the given kind.
    pub fn claim(&self, id: &ElementId, expected: ElementKind) -> Result<(), DocumentError> {
        let mut elements = self.elements.lock();
        let entry = elements
            .get_mut(id)
            .ok_or_else(|| DocumentError::Missing(id.clone()))?;
        if entry.kind != expected {
            return Err(DocumentError::WrongKind {
                id: id.clone(),
                expected,
            });
        }
        if entry.claimed {
            return Err(DocumentError::AlreadyClaimed(id.clone()));
        }
        entry.claimed = true;
        Ok(())
    }

    /// Give up ownership of an element.
    pub fn release(&self, id: &ElementId) {
        if let Some(entry) = self.elements.lock().get_mut(id) {
            entry.claimed = false;
        }
    }

    /// Whether an element is currently owned by a binding.
    pub fn is_claimed(&self, id: &ElementId) -> bool {
        self.elements
            .lock()
            .get(id)
            .is_some_and(|entry| entry.claimed)
    }

    fn insert(&self, id: ElementId, kind: ElementKind) -> Result<ElementId, DocumentError> {
        let mut elements = self.elements.lock();
        if elements.contains_key(&id) {
            return Err(DocumentError::Duplicate(id));
        }
        elements.insert(
            id.clone(),
            ElementEntry {
                kind,
                claimed: false,
            },
        );
        Ok(id)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("elements", &self.elements.lock().len())
            .finish()
    }
}
