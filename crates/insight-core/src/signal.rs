//! Change notification between components.
//!
//! A [`Signal`] is a list of callbacks ("slots") invoked with a borrowed
//! argument each time the signal is emitted. Suggestion fields publish
//! three of them: a committed value, a highlight move and dropdown
//! visibility.
//!
//! Slots run synchronously on the emitting thread, after the signal's own
//! lock has been released. A slot may connect, disconnect or emit on the
//! same signal; slots connected during an emission first run on the next
//! one.
//!
//! ```
//! use insight_core::Signal;
//!
//! let visibility_changed = Signal::<bool>::new();
//! let id = visibility_changed.connect(|open| println!("dropdown open: {open}"));
//!
//! visibility_changed.emit(true);
//! assert!(visibility_changed.disconnect(id));
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Identifies one connected slot. Stays valid until disconnected.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A notification source with any number of connected slots.
///
/// `Signal` is `Send + Sync`; share it behind an `Arc` to hand out
/// [`ConnectionGuard`]s.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// A signal with nothing connected.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect `slot`; it runs on every emission until disconnected.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.slots.lock().insert(Arc::new(slot))
    }

    /// Connect `slot` for as long as the returned guard lives.
    ///
    /// The guard holds its own reference to the signal, so it may outlive
    /// every other owner.
    pub fn connect_scoped<F>(self: &Arc<Self>, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        ConnectionGuard {
            id: self.connect(slot),
            signal: Arc::clone(self),
        }
    }

    /// Disconnect one slot. Returns `false` if it was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    /// Disconnect every slot.
    pub fn disconnect_all(&self) {
        self.slots.lock().clear();
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Invoke every connected slot with `args`.
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        if slots.is_empty() {
            return;
        }
        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emit");
        for slot in &slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.lock().len())
            .finish()
    }
}

/// Disconnects its slot when dropped. Created by [`Signal::connect_scoped`].
pub struct ConnectionGuard<Args: 'static> {
    signal: Arc<Signal<Args>>,
    id: ConnectionId,
}

impl<Args: 'static> ConnectionGuard<Args> {
    /// The guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args: 'static> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        self.signal.disconnect(self.id);
    }
}

impl<Args: 'static> std::fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ConnectionGuard").field(&self.id).finish()
    }
}
