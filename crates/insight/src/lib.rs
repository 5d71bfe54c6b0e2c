//! Insight - type-ahead suggestion fields for the Insight analytics dashboard.
//!
//! Each bound text input gets its own controller and dropdown. As the user
//! types, the controller asks a [`SuggestionSource`] for matching labels
//! and renders only the answer belonging to the most recently typed text,
//! whatever order the answers arrive in. Clicking a row commits it;
//! clicking anywhere else closes the dropdown.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use insight::{BindOptions, Document, FieldBinder, FieldTag, PointerEvent, SuggestConfig};
//!
//! # async fn run() -> insight::Result<()> {
//! let config = SuggestConfig::default();
//! let source = Arc::new(config.http_source()?);
//!
//! let document = Document::new();
//! document.add_input("sectorInput")?;
//!
//! let binder = FieldBinder::new(document, source).with_settings(config.controller_settings());
//! let sector = binder.bind("sectorInput", FieldTag::Sector, BindOptions::auto_create())?;
//!
//! if let Some(lookup) = sector.input_changed("ban") {
//!     lookup.settled().await;
//! }
//! sector.click_row(0);
//!
//! // Forward page-wide pointer presses so outside clicks close dropdowns.
//! binder.coordinator().pointer_pressed(&PointerEvent::nowhere());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod field;
pub mod suggest;

pub use config::{ConfigError, SuggestConfig};
pub use document::{Document, DocumentError, ElementId, ElementKind};
pub use error::{InsightError, Result};
pub use field::{Field, FieldTag, UnknownFieldTag};
pub use suggest::{
    BindError, BindOptions, CatalogSource, ControllerSettings, DismissalCoordinator, Dismissible,
    DropdownState, DropdownView, FieldBinder, FieldBinding, HitTarget, HttpSuggestionSource,
    LookupOutcome, NavigationKey, PendingLookup, PointerEvent, QuerySeq, SequencedQueryTracker,
    StringListSource, SuggestionController, SuggestionFetchError, SuggestionSource,
};
