//! Type-ahead suggestions.
//!
//! One field's pieces, bottom-up:
//!
//! - [`SequencedQueryTracker`]: numbers queries and judges which answer is current
//! - [`SuggestionSource`]: answers a query with an ordered list of labels
//! - [`DropdownView`]: the rendered rows, highlight and scroll window
//! - [`SuggestionController`]: ties the three together per field
//!
//! Across fields:
//!
//! - [`DismissalCoordinator`]: closes open dropdowns on outside clicks
//! - [`FieldBinder`]: binds inputs and hands out [`FieldBinding`]s

mod binder;
mod controller;
mod dismissal;
mod source;
mod tracker;
mod view;

pub use binder::{BindError, BindOptions, FieldBinder, FieldBinding};
pub use controller::{
    ControllerSettings, DEFAULT_DEBOUNCE, FieldSignals, LookupOutcome, NavigationKey,
    PendingLookup, SuggestionController, normalize_query,
};
pub use dismissal::{DismissalCoordinator, Dismissible, HitTarget, PointerEvent, RegistrationId};
pub use source::{
    Catalog, CatalogSource, FetchFuture, HttpSuggestionSource, StringListSource,
    SuggestionFetchError, SuggestionSource, parse_labels,
};
pub use tracker::{QuerySeq, SequencedQueryTracker};
pub use view::{DEFAULT_MAX_VISIBLE_ITEMS, DropdownState, DropdownView};
