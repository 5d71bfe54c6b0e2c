//! Dropdown view: the visual projection of one field's suggestion list.
//!
//! [`DropdownView`] owns the [`DropdownState`] of exactly one field. It
//! never decides *what* to show; the controller hands it items to render
//! and tells it when to close. The view handles row highlighting (pointer
//! hover and keyboard), the scroll window, and row activation.

use std::ops::Range;

use crate::document::ElementId;
use crate::suggest::dismissal::HitTarget;

/// Default number of rows visible without scrolling.
pub const DEFAULT_MAX_VISIBLE_ITEMS: usize = 7;

/// The state of one field's dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DropdownState {
    /// Nothing rendered; no rows exist.
    #[default]
    Closed,
    /// Rows are rendered.
    Open {
        /// Row labels, in the order the source returned them.
        items: Vec<String>,
        /// The highlighted row, if any.
        highlighted: Option<usize>,
    },
}

impl DropdownState {
    /// Whether the dropdown is open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// The rendered rows (empty when closed).
    pub fn items(&self) -> &[String] {
        match self {
            Self::Open { items, .. } => items,
            Self::Closed => &[],
        }
    }

    /// The highlighted row index.
    pub fn highlighted(&self) -> Option<usize> {
        match self {
            Self::Open { highlighted, .. } => *highlighted,
            Self::Closed => None,
        }
    }
}

/// Renders one field's option rows and tracks highlight and scrolling.
#[derive(Debug, Clone)]
pub struct DropdownView {
    /// The container element hosting the rows.
    box_id: ElementId,
    state: DropdownState,
    /// Maximum number of visible rows.
    max_visible_items: usize,
    /// First visible row when there are more rows than fit.
    scroll_offset: usize,
}

impl DropdownView {
    /// Create a closed view rendering into `box_id`.
    pub fn new(box_id: ElementId) -> Self {
        Self {
            box_id,
            state: DropdownState::Closed,
            max_visible_items: DEFAULT_MAX_VISIBLE_ITEMS,
            scroll_offset: 0,
        }
    }

    /// Set maximum visible rows using builder pattern.
    pub fn with_max_visible_items(mut self, count: usize) -> Self {
        self.max_visible_items = count.max(1);
        self
    }

    /// The container element hosting the rows.
    pub fn box_id(&self) -> &ElementId {
        &self.box_id
    }

    /// The current state.
    pub fn state(&self) -> &DropdownState {
        &self.state
    }

    /// Whether the dropdown is open.
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// The rendered rows.
    pub fn items(&self) -> &[String] {
        self.state.items()
    }

    /// The highlighted row index.
    pub fn highlighted_index(&self) -> Option<usize> {
        self.state.highlighted()
    }

    /// The highlighted row's label.
    pub fn highlighted_text(&self) -> Option<&str> {
        let idx = self.highlighted_index()?;
        self.items().get(idx).map(String::as_str)
    }

    /// Maximum visible rows.
    pub fn max_visible_items(&self) -> usize {
        self.max_visible_items
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Replace the rows with `items`, in the given order, with no highlight.
    ///
    /// An empty list closes the dropdown instead: an open dropdown always
    /// has at least one row. Returns `true` if visibility changed.
    pub fn render(&mut self, items: Vec<String>) -> bool {
        if items.is_empty() {
            return self.close();
        }

        let was_open = self.is_open();
        self.state = DropdownState::Open {
            items,
            highlighted: None,
        };
        self.scroll_offset = 0;
        !was_open
    }

    /// Remove all rows. Returns `true` if the dropdown was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = DropdownState::Closed;
        self.scroll_offset = 0;
        was_open
    }

    // =========================================================================
    // Highlighting
    // =========================================================================

    /// Highlight the row under the pointer.
    ///
    /// Returns the row's label if the highlight moved to it.
    pub fn hover(&mut self, index: usize) -> Option<String> {
        self.set_highlight(index)
    }

    /// The pointer left the rows.
    pub fn clear_hover(&mut self) {
        if let DropdownState::Open { highlighted, .. } = &mut self.state {
            *highlighted = None;
        }
    }

    /// Move the highlight up, wrapping to the last row.
    pub fn move_up(&mut self) -> Option<String> {
        let len = self.items().len();
        if len == 0 {
            return None;
        }
        let target = match self.highlighted_index() {
            Some(idx) if idx > 0 => idx - 1,
            _ => len - 1,
        };
        self.set_highlight(target)
    }

    /// Move the highlight down, wrapping to the first row.
    pub fn move_down(&mut self) -> Option<String> {
        let len = self.items().len();
        if len == 0 {
            return None;
        }
        let target = match self.highlighted_index() {
            Some(idx) if idx + 1 < len => idx + 1,
            _ => 0,
        };
        self.set_highlight(target)
    }

    fn set_highlight(&mut self, index: usize) -> Option<String> {
        let DropdownState::Open { items, highlighted } = &mut self.state else {
            return None;
        };
        if index >= items.len() || *highlighted == Some(index) {
            return None;
        }
        *highlighted = Some(index);
        let text = items[index].clone();
        self.ensure_highlighted_visible();
        Some(text)
    }

    // =========================================================================
    // Activation
    // =========================================================================

    /// Activate (click) a row: close the dropdown and return its label.
    ///
    /// Returns `None` when closed or when `index` is out of range; there
    /// are no rows to select then.
    pub fn activate(&mut self, index: usize) -> Option<String> {
        let text = self.items().get(index)?.clone();
        self.close();
        Some(text)
    }

    /// Activate the highlighted row.
    pub fn activate_highlighted(&mut self) -> Option<String> {
        let idx = self.highlighted_index()?;
        self.activate(idx)
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// The range of rows inside the scroll window.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.scroll_offset;
        let end = (start + self.max_visible_items).min(self.items().len());
        start..end
    }

    /// Scroll so the highlighted row is inside the window.
    pub fn ensure_highlighted_visible(&mut self) {
        let Some(idx) = self.highlighted_index() else {
            return;
        };
        if idx < self.scroll_offset {
            self.scroll_offset = idx;
        } else if idx >= self.scroll_offset + self.max_visible_items {
            self.scroll_offset = idx + 1 - self.max_visible_items;
        }
    }

    // =========================================================================
    // Hit Testing
    // =========================================================================

    /// Whether a pointer target lies in this dropdown's rendered region.
    ///
    /// A closed dropdown has no region.
    pub fn contains(&self, target: &HitTarget) -> bool {
        if !self.is_open() {
            return false;
        }
        match target {
            HitTarget::Element(id) => *id == self.box_id,
            HitTarget::Row { dropdown, index } => {
                *dropdown == self.box_id && *index < self.items().len()
            }
            HitTarget::Nothing => false,
        }
    }
}
