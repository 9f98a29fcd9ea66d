// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for session observers.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::{DeviceState, StateChange};

/// Unique identifier for a subscription.
///
/// Returned when registering a callback; pass it to `unsubscribe` to remove
/// the callback. IDs are unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;
type ConnectedCallback = Arc<dyn Fn(&DeviceState) + Send + Sync>;
type DisconnectedCallback = Arc<dyn Fn() + Send + Sync>;

/// Registry for session callbacks.
///
/// Callbacks are invoked from the session's background tasks. They are
/// copied out of the registry before being called, so a callback may
/// subscribe or unsubscribe without deadlocking. A panicking callback is
/// caught and logged and does not affect the other callbacks.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
    connected_callbacks: RwLock<HashMap<SubscriptionId, ConnectedCallback>>,
    disconnected_callbacks: RwLock<HashMap<SubscriptionId, DisconnectedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state_changed_callbacks: RwLock::new(HashMap::new()),
            connected_callbacks: RwLock::new(HashMap::new()),
            disconnected_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for state change notifications.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for when the push channel connects.
    ///
    /// The callback receives the mirrored state at connection time.
    pub fn on_connected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.connected_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for when the push channel drops.
    pub fn on_disconnected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.disconnected_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state_changed_callbacks.write().remove(&id).is_some()
            || self.connected_callbacks.write().remove(&id).is_some()
            || self.disconnected_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.state_changed_callbacks.write().clear();
        self.connected_callbacks.write().clear();
        self.disconnected_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches a state change to every state callback.
    pub fn dispatch(&self, change: &StateChange) {
        let callbacks: Vec<_> = self.state_changed_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            guarded("state_changed", || callback(change));
        }
    }

    /// Dispatches the connected event.
    pub fn dispatch_connected(&self, state: &DeviceState) {
        let callbacks: Vec<_> = self.connected_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            guarded("connected", || callback(state));
        }
    }

    /// Dispatches the disconnected event.
    pub fn dispatch_disconnected(&self) {
        let callbacks: Vec<_> = self
            .disconnected_callbacks
            .read()
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            guarded("disconnected", || callback());
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.state_changed_callbacks.read().len()
            + self.connected_callbacks.read().len()
            + self.disconnected_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

fn guarded(kind: &'static str, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        tracing::error!(callback = kind, "Subscriber callback panicked");
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ChangeDetector, StateUpdate};
    use std::sync::atomic::AtomicU32;

    fn sample_change() -> StateChange {
        let mut detector = ChangeDetector::new();
        let mut state = DeviceState::new();
        detector.observe(state.clone());
        state.apply(StateUpdate::parse(r#"{"brightness": 1}"#).unwrap());
        detector.observe(state).unwrap()
    }

    #[test]
    fn subscription_id_display() {
        assert_eq!(SubscriptionId::new(42).to_string(), "Sub(42)");
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.callback_count(), 0);
    }

    #[test]
    fn registry_state_changed_callback() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = registry.on_state_changed(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&sample_change());
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        assert!(registry.unsubscribe(id));
        assert!(registry.is_empty());

        registry.dispatch(&sample_change());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_connection_callbacks() {
        let registry = CallbackRegistry::new();
        let connected = Arc::new(AtomicU32::new(0));
        let disconnected = Arc::new(AtomicU32::new(0));
        let c = connected.clone();
        let d = disconnected.clone();

        registry.on_connected(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        registry.on_disconnected(move || {
            d.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch_connected(&DeviceState::new());
        registry.dispatch_disconnected();
        registry.dispatch_disconnected();

        assert_eq!(connected.load(Ordering::SeqCst), 1);
        assert_eq!(disconnected.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panicking_callback_does_not_stop_others() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        registry.on_state_changed(|_| panic!("observer bug"));
        registry.on_state_changed(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&sample_change());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let slot = Arc::new(parking_lot::Mutex::new(None::<SubscriptionId>));

        let registry_clone = Arc::clone(&registry);
        let slot_clone = Arc::clone(&slot);
        let id = registry.on_state_changed(move |_| {
            if let Some(id) = slot_clone.lock().take() {
                registry_clone.unsubscribe(id);
            }
        });
        *slot.lock() = Some(id);

        registry.dispatch(&sample_change());
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn registry_clear() {
        let registry = CallbackRegistry::new();
        registry.on_state_changed(|_| {});
        registry.on_connected(|_| {});
        registry.on_disconnected(|| {});
        assert_eq!(registry.callback_count(), 3);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_unique_ids() {
        let registry = CallbackRegistry::new();
        let id1 = registry.on_state_changed(|_| {});
        let id2 = registry.on_connected(|_| {});
        let id3 = registry.on_disconnected(|| {});

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }
}
