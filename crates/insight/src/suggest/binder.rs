//! Wiring fields into the suggestion subsystem.
//!
//! [`FieldBinder::bind`] turns an input id and a tag into a live
//! [`FieldBinding`]: it claims the input and a dropdown container in the
//! [`Document`], builds the field's [`SuggestionController`] (which owns
//! its [`DropdownView`](crate::suggest::DropdownView)), and registers it
//! with the [`DismissalCoordinator`]. Bindings share nothing but the
//! source and the coordinator, so any number of fields can be bound.
//!
//! Dropping (or [`dispose`](FieldBinding::dispose)-ing) the binding undoes
//! all of it.

use std::ops::Range;
use std::sync::Arc;

use insight_core::logging::targets;
use tokio::runtime::Handle;

use crate::document::{Document, DocumentError, ElementId, ElementKind};
use crate::field::{Field, FieldTag};
use crate::suggest::controller::{
    ControllerSettings, FieldSignals, NavigationKey, PendingLookup, SuggestionController,
};
use crate::suggest::dismissal::{DismissalCoordinator, RegistrationId};
use crate::suggest::source::SuggestionSource;
use crate::suggest::view::DropdownState;

/// How a binding gets its dropdown container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOptions {
    /// Create a fresh container when no `box_id` is given.
    pub auto_create_box: bool,
    /// Use this existing container. Takes precedence over `auto_create_box`.
    pub box_id: Option<ElementId>,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self::auto_create()
    }
}

impl BindOptions {
    /// Create a container named after the input.
    pub fn auto_create() -> Self {
        Self {
            auto_create_box: true,
            box_id: None,
        }
    }

    /// Render into an existing container.
    pub fn existing_box(box_id: impl Into<ElementId>) -> Self {
        Self {
            auto_create_box: false,
            box_id: Some(box_id.into()),
        }
    }
}

/// Errors raised while binding a field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// The input or container could not be claimed.
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// Auto-creation is off and no container was named.
    #[error("no dropdown box configured for `{0}`")]
    MissingBoxId(ElementId),
}

/// Creates [`FieldBinding`]s that share a source and a coordinator.
#[derive(Clone)]
pub struct FieldBinder {
    document: Document,
    coordinator: DismissalCoordinator,
    source: Arc<dyn SuggestionSource>,
    settings: ControllerSettings,
    runtime: Option<Handle>,
}

impl FieldBinder {
    /// Create a binder using the process-wide coordinator and default settings.
    pub fn new(document: Document, source: Arc<dyn SuggestionSource>) -> Self {
        Self {
            document,
            coordinator: DismissalCoordinator::global().clone(),
            source,
            settings: ControllerSettings::default(),
            runtime: None,
        }
    }

    /// Use a specific coordinator using builder pattern.
    pub fn with_coordinator(mut self, coordinator: DismissalCoordinator) -> Self {
        self.coordinator = coordinator;
        self
    }

    /// Set controller settings using builder pattern.
    pub fn with_settings(mut self, settings: ControllerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Run lookups on a specific runtime using builder pattern.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// The document ids are resolved against.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The coordinator bindings register with.
    pub fn coordinator(&self) -> &DismissalCoordinator {
        &self.coordinator
    }

    /// Bind the input `input` as a field tagged `tag`.
    pub fn bind(
        &self,
        input: impl Into<ElementId>,
        tag: FieldTag,
        options: BindOptions,
    ) -> Result<FieldBinding, BindError> {
        let input = input.into();
        self.document.claim(&input, ElementKind::Input)?;

        let (box_id, owns_box) = match self.provision_box(&input, options) {
            Ok(provisioned) => provisioned,
            Err(err) => {
                self.document.release(&input);
                return Err(err);
            }
        };

        let field = Field::new(input, tag);
        let runtime = self
            .runtime
            .clone()
            .unwrap_or_else(insight_core::runtime::handle);
        let controller = Arc::new(SuggestionController::with_runtime(
            field.clone(),
            box_id.clone(),
            Arc::clone(&self.source),
            self.settings,
            runtime,
        ));
        let registration = self.coordinator.register(&controller);

        tracing::info!(target: targets::BINDER, field = %tag, input = %field.input, dropdown = %box_id, "field bound");

        Ok(FieldBinding {
            controller,
            document: self.document.clone(),
            coordinator: self.coordinator.clone(),
            registration,
            field,
            box_id,
            owns_box,
            disposed: false,
        })
    }

    fn provision_box(
        &self,
        input: &ElementId,
        options: BindOptions,
    ) -> Result<(ElementId, bool), BindError> {
        match options.box_id {
            Some(box_id) => {
                self.document.claim(&box_id, ElementKind::Container)?;
                Ok((box_id, false))
            }
            None if options.auto_create_box => {
                let box_id = self.document.create_container_for(input);
                self.document.claim(&box_id, ElementKind::Container)?;
                Ok((box_id, true))
            }
            None => Err(BindError::MissingBoxId(input.clone())),
        }
    }
}

impl std::fmt::Debug for FieldBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinder")
            .field("document", &self.document)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// A bound field. Dropping it tears the binding down.
#[derive(Debug)]
pub struct FieldBinding {
    controller: Arc<SuggestionController>,
    document: Document,
    coordinator: DismissalCoordinator,
    registration: RegistrationId,
    field: Field,
    box_id: ElementId,
    owns_box: bool,
    disposed: bool,
}

impl FieldBinding {
    /// The bound field.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// The dropdown's container.
    pub fn box_id(&self) -> &ElementId {
        &self.box_id
    }

    /// The field's controller.
    pub fn controller(&self) -> &Arc<SuggestionController> {
        &self.controller
    }

    /// The field's signals.
    pub fn signals(&self) -> &FieldSignals {
        self.controller.signals()
    }

    /// Forward an input change.
    pub fn input_changed(&self, raw: &str) -> Option<PendingLookup> {
        self.controller.input_changed(raw)
    }

    /// Forward a hover over row `index`.
    pub fn hover(&self, index: usize) {
        self.controller.hover(index);
    }

    /// Forward a click on row `index`; returns the committed text.
    pub fn click_row(&self, index: usize) -> Option<String> {
        self.controller.select(index)
    }

    /// Forward a navigation key; returns whether it was consumed.
    pub fn key_pressed(&self, key: NavigationKey) -> bool {
        self.controller.key_pressed(key)
    }

    /// The input's current text.
    pub fn value(&self) -> String {
        self.controller.value()
    }

    /// A snapshot of the dropdown state.
    pub fn dropdown_state(&self) -> DropdownState {
        self.controller.dropdown_state()
    }

    /// Whether the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.controller.is_open()
    }

    /// The rows inside the dropdown's scroll window.
    pub fn visible_range(&self) -> Range<usize> {
        self.controller.visible_range()
    }

    /// Tear the binding down now.
    pub fn dispose(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.coordinator.unregister(self.registration);
        self.controller.teardown();
        self.document.release(&self.field.input);
        self.document.release(&self.box_id);
        if self.owns_box {
            self.document.remove(&self.box_id);
        }

        tracing::info!(target: targets::BINDER, field = %self.field.tag, input = %self.field.input, "field unbound");
    }
}

impl Drop for FieldBinding {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::source::StringListSource;

    fn binder(document: &Document) -> FieldBinder {
        FieldBinder::new(document.clone(), Arc::new(StringListSource::new()))
            .with_coordinator(DismissalCoordinator::new())
    }

    #[tokio::test]
    async fn test_auto_created_box_lives_with_the_binding() {
        let document = Document::new();
        document.add_input("stateInput").unwrap();
        let binder = binder(&document);

        let binding = binder
            .bind("stateInput", FieldTag::Location, BindOptions::auto_create())
            .unwrap();
        let box_id = binding.box_id().clone();
        assert_eq!(box_id.as_str(), "stateInput-suggestions");
        assert!(document.is_claimed(&box_id));
        assert_eq!(binder.coordinator().len(), 1);

        binding.dispose();
        assert!(!document.contains(&box_id));
        assert!(!document.is_claimed(&"stateInput".into()));
        assert!(binder.coordinator().is_empty());
    }

    #[tokio::test]
    async fn test_existing_box_is_kept_on_drop() {
        let document = Document::new();
        document.add_input("sectorInput").unwrap();
        document.add_container("sectorSuggest").unwrap();
        let binder = binder(&document);

        {
            let binding = binder
                .bind("sectorInput", FieldTag::Sector, BindOptions::existing_box("sectorSuggest"))
                .unwrap();
            assert_eq!(binding.box_id().as_str(), "sectorSuggest");
        }
        assert!(document.contains(&"sectorSuggest".into()));
        assert!(!document.is_claimed(&"sectorSuggest".into()));
    }

    #[tokio::test]
    async fn test_bind_failures_release_the_input() {
        let document = Document::new();
        document.add_input("yearInput").unwrap();
        let binder = binder(&document);

        let no_box = BindOptions {
            auto_create_box: false,
            box_id: None,
        };
        assert_eq!(
            binder.bind("yearInput", FieldTag::Year, no_box).unwrap_err(),
            BindError::MissingBoxId("yearInput".into())
        );
        assert!(matches!(
            binder.bind("yearInput", FieldTag::Year, BindOptions::existing_box("yearSuggest")),
            Err(BindError::Document(DocumentError::Missing(_)))
        ));
        assert!(!document.is_claimed(&"yearInput".into()));

        let _bound = binder
            .bind("yearInput", FieldTag::Year, BindOptions::auto_create())
            .unwrap();
        assert!(matches!(
            binder.bind("yearInput", FieldTag::Year, BindOptions::auto_create()),
            Err(BindError::Document(DocumentError::AlreadyClaimed(_)))
        ));
    }
}
