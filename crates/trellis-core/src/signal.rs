//! Signal/slot system for Trellis.
//!
//! Signals are the toolkit-neutral notification spine of the framework. A
//! component emits a [`Signal`] when its state changes and connected slots
//! (closures) are invoked with the emitted arguments. Native toolkit event
//! objects are normalized by the event adapter *before* they reach a signal,
//! so nothing downstream ever depends on a concrete toolkit's object model.
//!
//! Slots run synchronously on the emitting thread. Trellis mutates all UI
//! state on the UI thread (see the `worker` module for how background results
//! come home), so direct invocation is the only dispatch mode needed here.
//!
//! # Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let row_added = Signal::<usize>::new();
//!
//! let id = row_added.connect(|index| {
//!     println!("row {index} added");
//! });
//!
//! row_added.emit(3);
//! row_added.disconnect(id);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};
use static_assertions::assert_impl_all;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Returned by [`Signal::connect`]; pass it to [`Signal::disconnect`] to
    /// remove the slot. IDs are never reused while the connection is live.
    pub struct ConnectionId;
}

/// Internal storage for a single connection.
struct Connection<Args> {
    slot: Arc<dyn Fn(&Args) + Send + Sync>,
}

/// A type-safe signal with any number of connected slots.
///
/// # Type Parameter
///
/// - `Args`: the argument type passed to slots. Use `()` for signals without
///   arguments, or a tuple such as `(usize, String)` for several.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync`. Emission walks a snapshot of the
/// connection list, so a slot may connect or disconnect other slots without
/// deadlocking the signal.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    /// Whether emission is temporarily blocked.
    blocked: AtomicBool,
}

assert_impl_all!(Signal<()>: Send, Sync);

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Creates a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connects a slot (closure) to this signal.
    ///
    /// Returns a [`ConnectionId`] that can be used to disconnect later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Connection {
            slot: Arc::new(slot),
        })
    }

    /// Disconnects a previously connected slot.
    ///
    /// Returns `true` if the connection existed. Disconnecting an already
    /// removed connection is a no-op, not an error.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnects all slots.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Emits the signal, invoking every connected slot with `args`.
    ///
    /// Slots are invoked in connection order. Emission is skipped entirely
    /// while the signal is [blocked](Self::set_blocked).
    pub fn emit(&self, args: Args) {
        if self.blocked.load(Ordering::Acquire) {
            return;
        }

        // Snapshot the slots so connections can change re-entrantly.
        let slots: Vec<Arc<dyn Fn(&Args) + Send + Sync>> = self
            .connections
            .lock()
            .values()
            .map(|c| c.slot.clone())
            .collect();

        for slot in slots {
            slot(&args);
        }
    }

    /// Blocks or unblocks emission.
    ///
    /// While blocked, `emit` does nothing. Returns the previous state.
    pub fn set_blocked(&self, blocked: bool) -> bool {
        self.blocked.swap(blocked, Ordering::AcqRel)
    }

    /// Returns the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }
}

/// RAII guard that disconnects a connection when dropped.
///
/// Useful for tying a subscription's lifetime to an owning object:
///
/// ```
/// use trellis_core::{ConnectionGuard, Signal};
///
/// let signal = Signal::<()>::new();
/// {
///     let _guard = ConnectionGuard::new(&signal, signal.connect(|_| {}));
///     assert_eq!(signal.connection_count(), 1);
/// }
/// assert_eq!(signal.connection_count(), 0);
/// ```
pub struct ConnectionGuard<'a, Args> {
    signal: &'a Signal<Args>,
    id: Option<ConnectionId>,
}

impl<'a, Args> ConnectionGuard<'a, Args> {
    /// Creates a guard for the given connection.
    pub fn new(signal: &'a Signal<Args>, id: ConnectionId) -> Self {
        Self {
            signal,
            id: Some(id),
        }
    }

    /// Releases the connection without disconnecting it.
    pub fn release(mut self) -> ConnectionId {
        self.id.take().expect("guard already released")
    }
}

impl<Args> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.signal.disconnect(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_connect_and_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let recv = received.clone();
        signal.connect(move |value| {
            recv.lock().push(*value);
        });

        signal.emit(1);
        signal.emit(2);

        assert_eq!(*received.lock(), vec![1, 2]);
    }

    #[test]
    fn test_disconnect() {
        let signal = Signal::<()>::new();
        let count = Arc::new(Mutex::new(0));

        let c = count.clone();
        let id = signal.connect(move |_| *c.lock() += 1);

        signal.emit(());
        assert!(signal.disconnect(id));
        signal.emit(());

        assert_eq!(*count.lock(), 1);
        // Second disconnect is a no-op.
        assert!(!signal.disconnect(id));
    }

    #[test]
    fn test_multiple_slots_invoked_in_order() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let o = order.clone();
            signal.connect(move |_| o.lock().push(tag));
        }

        signal.emit(());
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_blocked_signal_does_not_emit() {
        let signal = Signal::<()>::new();
        let count = Arc::new(Mutex::new(0));

        let c = count.clone();
        signal.connect(move |_| *c.lock() += 1);

        signal.set_blocked(true);
        signal.emit(());
        assert_eq!(*count.lock(), 0);

        signal.set_blocked(false);
        signal.emit(());
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_connection_guard_disconnects_on_drop() {
        let signal = Signal::<()>::new();
        let id = signal.connect(|_| {});
        {
            let _guard = ConnectionGuard::new(&signal, id);
            assert_eq!(signal.connection_count(), 1);
        }
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_reentrant_disconnect_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let count = Arc::new(Mutex::new(0));

        let sig = signal.clone();
        let c = count.clone();
        let id = Arc::new(Mutex::new(None));
        let id_slot = id.clone();
        let conn = signal.connect(move |_| {
            *c.lock() += 1;
            // Disconnect ourselves while the signal is emitting.
            if let Some(own) = id_slot.lock().take() {
                sig.disconnect(own);
            }
        });
        *id.lock() = Some(conn);

        signal.emit(());
        signal.emit(());
        assert_eq!(*count.lock(), 1);
    }
}
