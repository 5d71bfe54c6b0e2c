//! Outside-click dismissal of open dropdowns.
//!
//! The host page forwards every pointer press to one
//! [`DismissalCoordinator`]. For each registered dropdown that is open, the
//! coordinator closes it unless the press landed inside it or on its own
//! input. Each dropdown is judged on its own, so several can be open at
//! once and clicking in one never closes another.

use std::sync::{Arc, OnceLock, Weak};

use insight_core::logging::targets;
use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::document::ElementId;

new_key_type! {
    /// Handle of a registration with a [`DismissalCoordinator`].
    pub struct RegistrationId;
}

/// What a pointer event landed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// A page element, by id (an input, a dropdown container, anything else).
    Element(ElementId),
    /// An option row inside a dropdown container.
    Row {
        /// The container hosting the row.
        dropdown: ElementId,
        /// The row's index.
        index: usize,
    },
    /// Empty page background.
    Nothing,
}

/// A pointer press (or other activation) somewhere on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    /// Where the press landed.
    pub target: HitTarget,
}

impl PointerEvent {
    /// A press on the given target.
    pub fn new(target: HitTarget) -> Self {
        Self { target }
    }

    /// A press on a page element.
    pub fn on_element(id: impl Into<ElementId>) -> Self {
        Self::new(HitTarget::Element(id.into()))
    }

    /// A press on a dropdown row.
    pub fn on_row(dropdown: impl Into<ElementId>, index: usize) -> Self {
        Self::new(HitTarget::Row {
            dropdown: dropdown.into(),
            index,
        })
    }

    /// A press on the page background.
    pub fn nowhere() -> Self {
        Self::new(HitTarget::Nothing)
    }
}

/// Something that closes when the user clicks elsewhere.
pub trait Dismissible: Send + Sync {
    /// Whether it is currently open.
    fn is_open(&self) -> bool;

    /// Whether `target` lies in its rendered region.
    fn region_contains(&self, target: &HitTarget) -> bool;

    /// Whether `target` is the element it is anchored to.
    fn anchor_contains(&self, target: &HitTarget) -> bool;

    /// Close it. Returns `true` if it was open.
    fn dismiss(&self) -> bool;
}

/// Registry of dismissible dropdowns, fed with pointer events.
///
/// The registry holds weak references only; a client dropped without
/// unregistering is skipped and pruned on the next event. Cloning yields
/// another handle to the same registry.
#[derive(Clone, Default)]
pub struct DismissalCoordinator {
    clients: Arc<Mutex<SlotMap<RegistrationId, Weak<dyn Dismissible>>>>,
}

static GLOBAL: OnceLock<DismissalCoordinator> = OnceLock::new();

impl DismissalCoordinator {
    /// Create an empty coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide coordinator.
    pub fn global() -> &'static DismissalCoordinator {
        GLOBAL.get_or_init(DismissalCoordinator::new)
    }

    /// Register a client.
    pub fn register<D: Dismissible + 'static>(&self, client: &Arc<D>) -> RegistrationId {
        let weak: Weak<dyn Dismissible> = Arc::downgrade(client) as Weak<D>;
        self.clients.lock().insert(weak)
    }

    /// Unregister a client. Returns `true` if it was registered.
    pub fn unregister(&self, id: RegistrationId) -> bool {
        self.clients.lock().remove(id).is_some()
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.clients.lock().len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.clients.lock().is_empty()
    }

    /// Process a pointer press. Returns how many dropdowns were closed.
    ///
    /// A press inside any open dropdown leaves every dropdown alone.
    /// Otherwise each open dropdown closes unless the press was on its
    /// own input.
    pub fn pointer_pressed(&self, event: &PointerEvent) -> usize {
        // Clients run without the registry lock, so they may unregister
        // (or be dropped) while the event is being handled.
        let open: Vec<Arc<dyn Dismissible>> = self
            .live_clients()
            .into_iter()
            .filter(|c| c.is_open())
            .collect();

        if open.iter().any(|c| c.region_contains(&event.target)) {
            tracing::trace!(target: targets::DISMISSAL, target_hit = ?event.target, "press inside an open dropdown");
            return 0;
        }

        let closed = open
            .iter()
            .filter(|c| !c.anchor_contains(&event.target))
            .filter(|c| c.dismiss())
            .count();

        if closed > 0 {
            tracing::debug!(target: targets::DISMISSAL, closed, target_hit = ?event.target, "dismissed dropdowns");
        }
        closed
    }

    fn live_clients(&self) -> Vec<Arc<dyn Dismissible>> {
        let mut clients = self.clients.lock();
        clients.retain(|_, weak| weak.strong_count() > 0);
        clients.values().filter_map(Weak::upgrade).collect()
    }
}

impl std::fmt::Debug for DismissalCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DismissalCoordinator")
            .field("registrations", &self.len())
            .finish()
    }
}
