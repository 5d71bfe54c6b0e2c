//! Per-field suggestion controller.
//!
//! A [`SuggestionController`] drives one field's lookup cycle:
//!
//! 1. The host reports every input change with [`SuggestionController::input_changed`].
//! 2. Empty (or too short) text closes the dropdown immediately. No lookup
//!    is issued and no sequence number is consumed.
//! 3. Otherwise a sequence number is issued and a lookup task is spawned.
//!    The task waits out the debounce window, gives up if a newer query
//!    was issued meanwhile, and asks the [`SuggestionSource`].
//! 4. When the source answers, the task renders the result only if its
//!    sequence number is still current. Older answers are discarded.
//!
//! Fetch failures never reach the user: they are logged and the dropdown
//! closes, exactly as if the source had answered with no matches.
//!
//! # Signals
//!
//! - `activated(String)`: a row was committed as the field's value
//! - `highlighted(String)`: the highlight moved to a row
//! - `visibility_changed(bool)`: the dropdown opened or closed
//!
//! Signals are always emitted after the field's state lock is released, so
//! slots may call back into the controller.
//!
//! Each state change and the signals it causes form one transition, and a
//! field runs one transition at a time: a lookup settling on a worker
//! thread waits for a host call's slots to return. A field's
//! `visibility_changed` emissions therefore arrive in the order its
//! dropdown opened and closed. Slots must not block on another thread that
//! is itself driving the same field.

use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use insight_core::logging::targets;
use insight_core::{PerfSpan, Signal};
use parking_lot::{Mutex, MutexGuard, ReentrantMutex};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::document::ElementId;
use crate::field::Field;
use crate::suggest::dismissal::{Dismissible, HitTarget};
use crate::suggest::source::{SuggestionFetchError, SuggestionSource};
use crate::suggest::tracker::{QuerySeq, SequencedQueryTracker};
use crate::suggest::view::{DEFAULT_MAX_VISIBLE_ITEMS, DropdownState, DropdownView};

/// Default debounce window between the last keystroke and the lookup.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Tunables shared by every controller a binder creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Input inactivity required before a lookup is sent. Zero disables it.
    pub debounce: Duration,
    /// Minimum normalized length that triggers a lookup. Values below 1 act as 1.
    pub min_chars: usize,
    /// Dropdown scroll window size.
    pub max_visible_items: usize,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            min_chars: 1,
            max_visible_items: DEFAULT_MAX_VISIBLE_ITEMS,
        }
    }
}

impl ControllerSettings {
    /// Settings with no debounce window.
    pub fn immediate() -> Self {
        Self {
            debounce: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Set the debounce window using builder pattern.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the minimum query length using builder pattern.
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// Set the scroll window size using builder pattern.
    pub fn with_max_visible_items(mut self, count: usize) -> Self {
        self.max_visible_items = count;
        self
    }
}

/// Normalize raw input text for querying: trimmed and lowercased.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Keys the dropdown reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationKey {
    /// Move the highlight up.
    Up,
    /// Move the highlight down.
    Down,
    /// Commit the highlighted row.
    Enter,
    /// Close the dropdown.
    Escape,
}

/// How an issued lookup ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The result was current and rendered this many rows.
    Rendered(usize),
    /// The result was current and empty; the dropdown closed.
    Closed,
    /// The lookup failed; the dropdown closed and the failure was logged.
    Failed,
    /// A newer query was issued (or the field retired its queries) before
    /// the answer arrived; the answer was discarded.
    Stale,
    /// A newer query was issued inside the debounce window; no request was sent.
    Superseded,
    /// The lookup task panicked or was cancelled.
    Aborted,
}

/// Handle to an issued lookup.
///
/// Dropping the handle does not cancel the lookup.
#[derive(Debug)]
pub struct PendingLookup {
    seq: QuerySeq,
    task: JoinHandle<LookupOutcome>,
}

impl PendingLookup {
    /// The sequence number the lookup was issued with.
    pub fn seq(&self) -> QuerySeq {
        self.seq
    }

    /// Whether the lookup task has finished.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the lookup to settle.
    pub async fn settled(self) -> LookupOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(target: targets::CONTROLLER, seq = %self.seq, error = %err, "lookup task aborted");
                LookupOutcome::Aborted
            }
        }
    }
}

/// The notifications one field emits.
#[derive(Debug)]
pub struct FieldSignals {
    activated: Arc<Signal<String>>,
    highlighted: Arc<Signal<String>>,
    visibility_changed: Arc<Signal<bool>>,
}

impl FieldSignals {
    fn new() -> Self {
        Self {
            activated: Arc::new(Signal::new()),
            highlighted: Arc::new(Signal::new()),
            visibility_changed: Arc::new(Signal::new()),
        }
    }

    /// Emitted with the row text when a row is committed.
    pub fn activated(&self) -> &Arc<Signal<String>> {
        &self.activated
    }

    /// Emitted with the row text when the highlight moves.
    pub fn highlighted(&self) -> &Arc<Signal<String>> {
        &self.highlighted
    }

    /// Emitted when the dropdown opens (`true`) or closes (`false`).
    pub fn visibility_changed(&self) -> &Arc<Signal<bool>> {
        &self.visibility_changed
    }

    fn disconnect_all(&self) {
        self.activated.disconnect_all();
        self.highlighted.disconnect_all();
        self.visibility_changed.disconnect_all();
    }
}

struct FieldState {
    /// The input's current text, as typed or committed.
    value: String,
    view: DropdownView,
    tracker: SequencedQueryTracker,
}

/// State shared between the controller and its lookup tasks.
struct FieldCell {
    field: Field,
    /// Held across a state change and its emissions. Reentrant so slots
    /// may call back into the controller.
    transition: ReentrantMutex<()>,
    state: Mutex<FieldState>,
    signals: FieldSignals,
}

impl FieldCell {
    /// Apply a lookup result if its sequence number is still current.
    fn settle(
        &self,
        seq: QuerySeq,
        result: Result<Vec<String>, SuggestionFetchError>,
    ) -> LookupOutcome {
        let _transition = self.transition.lock();
        let mut state = self.state.lock();
        if !state.tracker.is_current(seq) {
            drop(state);
            tracing::trace!(target: targets::CONTROLLER, field = %self.field.tag, seq = %seq, "discarding stale response");
            return LookupOutcome::Stale;
        }

        let (outcome, visibility) = match result {
            Ok(items) if items.is_empty() => {
                (LookupOutcome::Closed, state.view.close().then_some(false))
            }
            Ok(items) => {
                let count = items.len();
                let opened = state.view.render(items);
                (LookupOutcome::Rendered(count), opened.then_some(true))
            }
            Err(err) => {
                tracing::warn!(
                    target: targets::CONTROLLER,
                    field = %self.field.tag,
                    input = %self.field.input,
                    seq = %seq,
                    error = %err,
                    "suggestion lookup failed"
                );
                (LookupOutcome::Failed, state.view.close().then_some(false))
            }
        };
        drop(state);

        tracing::debug!(target: targets::CONTROLLER, field = %self.field.tag, seq = %seq, outcome = ?outcome, "lookup settled");
        if let Some(open) = visibility {
            self.signals.visibility_changed.emit(open);
        }
        outcome
    }

    fn is_current(&self, seq: QuerySeq) -> bool {
        self.state.lock().tracker.is_current(seq)
    }
}

async fn run_lookup(
    cell: Arc<FieldCell>,
    source: Arc<dyn SuggestionSource>,
    seq: QuerySeq,
    query: String,
    debounce: Duration,
) -> LookupOutcome {
    if !debounce.is_zero() {
        tokio::time::sleep(debounce).await;
        if !cell.is_current(seq) {
            tracing::trace!(target: targets::CONTROLLER, field = %cell.field.tag, seq = %seq, "superseded inside debounce window");
            return LookupOutcome::Superseded;
        }
    }

    let result = source
        .fetch_suggestions(&query, cell.field.tag)
        .instrument(PerfSpan::for_future("suggestion_lookup"))
        .await;
    cell.settle(seq, result)
}

/// Drives suggestion lookups for one field.
pub struct SuggestionController {
    cell: Arc<FieldCell>,
    source: Arc<dyn SuggestionSource>,
    settings: ControllerSettings,
    runtime: Handle,
}

impl SuggestionController {
    /// Create a controller rendering into `box_id`.
    ///
    /// Lookups run on the current tokio runtime, or on the process-wide
    /// fallback runtime when called outside one.
    pub fn new(
        field: Field,
        box_id: ElementId,
        source: Arc<dyn SuggestionSource>,
        settings: ControllerSettings,
    ) -> Self {
        Self::with_runtime(field, box_id, source, settings, insight_core::runtime::handle())
    }

    /// Create a controller whose lookups run on `runtime`.
    pub fn with_runtime(
        field: Field,
        box_id: ElementId,
        source: Arc<dyn SuggestionSource>,
        settings: ControllerSettings,
        runtime: Handle,
    ) -> Self {
        let view = DropdownView::new(box_id).with_max_visible_items(settings.max_visible_items);
        Self {
            cell: Arc::new(FieldCell {
                field,
                transition: ReentrantMutex::new(()),
                state: Mutex::new(FieldState {
                    value: String::new(),
                    view,
                    tracker: SequencedQueryTracker::new(),
                }),
                signals: FieldSignals::new(),
            }),
            source,
            settings,
            runtime,
        }
    }

    /// The field this controller drives.
    pub fn field(&self) -> &Field {
        &self.cell.field
    }

    /// The controller's settings.
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// The field's signals.
    pub fn signals(&self) -> &FieldSignals {
        &self.cell.signals
    }

    /// The input's current text.
    pub fn value(&self) -> String {
        self.cell.state.lock().value.clone()
    }

    /// A snapshot of the dropdown state.
    pub fn dropdown_state(&self) -> DropdownState {
        self.cell.state.lock().view.state().clone()
    }

    /// Whether the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.cell.state.lock().view.is_open()
    }

    /// The dropdown's container element.
    pub fn box_id(&self) -> ElementId {
        self.cell.state.lock().view.box_id().clone()
    }

    /// The rows inside the dropdown's scroll window.
    pub fn visible_range(&self) -> Range<usize> {
        self.cell.state.lock().view.visible_range()
    }

    /// The highest sequence number issued so far.
    pub fn latest_seq(&self) -> Option<QuerySeq> {
        self.cell.state.lock().tracker.latest()
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Report that the input's text changed to `raw`.
    ///
    /// Returns the issued lookup, or `None` when the text normalizes to
    /// something shorter than `min_chars`. In that case the dropdown is
    /// closed, every outstanding lookup is retired, and the source is not
    /// called.
    pub fn input_changed(&self, raw: &str) -> Option<PendingLookup> {
        let query = normalize_query(raw);
        let field = &self.cell.field;

        let _transition = self.cell.transition.lock();
        let mut state = self.cell.state.lock();
        state.value = raw.to_string();

        if query.chars().count() < self.settings.min_chars.max(1) {
            state.tracker.retire();
            let was_open = state.view.close();
            drop(state);
            tracing::debug!(target: targets::CONTROLLER, field = %field.tag, input = %field.input, "query too short, closing");
            if was_open {
                self.cell.signals.visibility_changed.emit(false);
            }
            return None;
        }

        let seq = state.tracker.issue();
        drop(state);
        tracing::debug!(target: targets::CONTROLLER, field = %field.tag, input = %field.input, seq = %seq, q = %query, "lookup issued");

        let task = self.runtime.spawn(run_lookup(
            Arc::clone(&self.cell),
            Arc::clone(&self.source),
            seq,
            query,
            self.settings.debounce,
        ));
        Some(PendingLookup { seq, task })
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// The pointer moved over row `index`.
    pub fn hover(&self, index: usize) {
        let _transition = self.cell.transition.lock();
        let highlighted = self.cell.state.lock().view.hover(index);
        if let Some(text) = highlighted {
            self.cell.signals.highlighted.emit(text);
        }
    }

    /// The pointer left the rows.
    pub fn clear_hover(&self) {
        self.cell.state.lock().view.clear_hover();
    }

    /// Commit row `index` as the field's value and close the dropdown.
    ///
    /// Returns the committed text, or `None` if no such row is rendered.
    pub fn select(&self, index: usize) -> Option<String> {
        let _transition = self.cell.transition.lock();
        let mut state = self.cell.state.lock();
        let text = state.view.activate(index)?;
        Some(self.commit(state, text))
    }

    /// Store an activated row's text as the value, retire outstanding
    /// lookups, then notify. `state` must be the guard the row was
    /// activated under.
    fn commit(&self, mut state: MutexGuard<'_, FieldState>, text: String) -> String {
        state.value = text.clone();
        state.tracker.retire();
        drop(state);

        let field = &self.cell.field;
        tracing::debug!(target: targets::CONTROLLER, field = %field.tag, input = %field.input, value = %text, "suggestion committed");
        self.cell.signals.visibility_changed.emit(false);
        self.cell.signals.activated.emit(text.clone());
        text
    }

    /// Handle a navigation key.
    ///
    /// Returns `true` if the key was consumed. Keys are never consumed
    /// while the dropdown is closed, and `Enter` is not consumed without a
    /// highlighted row, so the host form keeps its default behavior.
    pub fn key_pressed(&self, key: NavigationKey) -> bool {
        let _transition = self.cell.transition.lock();
        let mut state = self.cell.state.lock();
        if !state.view.is_open() {
            return false;
        }

        match key {
            NavigationKey::Up | NavigationKey::Down => {
                let moved = if key == NavigationKey::Up {
                    state.view.move_up()
                } else {
                    state.view.move_down()
                };
                drop(state);
                if let Some(text) = moved {
                    self.cell.signals.highlighted.emit(text);
                }
                true
            }
            NavigationKey::Enter => {
                let Some(text) = state.view.activate_highlighted() else {
                    return false;
                };
                self.commit(state, text);
                true
            }
            NavigationKey::Escape => {
                drop(state);
                self.dismiss();
                true
            }
        }
    }

    /// Close the dropdown and retire outstanding lookups.
    ///
    /// Returns `true` if the dropdown was open.
    pub fn dismiss(&self) -> bool {
        let _transition = self.cell.transition.lock();
        let mut state = self.cell.state.lock();
        state.tracker.retire();
        let was_open = state.view.close();
        drop(state);

        if was_open {
            tracing::debug!(target: targets::CONTROLLER, field = %self.cell.field.tag, "dropdown dismissed");
            self.cell.signals.visibility_changed.emit(false);
        }
        was_open
    }

    /// Final teardown: retire lookups, close silently, drop every slot.
    pub(crate) fn teardown(&self) {
        let _transition = self.cell.transition.lock();
        {
            let mut state = self.cell.state.lock();
            state.tracker.retire();
            state.view.close();
        }
        self.cell.signals.disconnect_all();
    }
}

impl Dismissible for SuggestionController {
    fn is_open(&self) -> bool {
        SuggestionController::is_open(self)
    }

    fn region_contains(&self, target: &HitTarget) -> bool {
        self.cell.state.lock().view.contains(target)
    }

    fn anchor_contains(&self, target: &HitTarget) -> bool {
        matches!(target, HitTarget::Element(id) if *id == self.cell.field.input)
    }

    fn dismiss(&self) -> bool {
        SuggestionController::dismiss(self)
    }
}

impl std::fmt::Debug for SuggestionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionController")
            .field("field", &self.cell.field)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
