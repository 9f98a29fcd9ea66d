// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that emit session events.

use crate::state::{DeviceState, StateChange};
use crate::subscription::SubscriptionId;

/// Trait for types that support event subscriptions.
///
/// # Examples
///
/// ```no_run
/// use obegraensad_sync::session::{DeviceSession, SessionConfig};
/// use obegraensad_sync::subscription::Subscribable;
///
/// # async fn example() -> obegraensad_sync::Result<()> {
/// let session = DeviceSession::start(SessionConfig::new("192.168.1.60"))?;
///
/// let sub_id = session.on_state_changed(|change| {
///     println!("changed: {:?}", change.fields());
/// });
///
/// session.on_disconnected(|| println!("device went away"));
///
/// session.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to state change notifications.
    ///
    /// Called at most once per poll cycle, listing every field that changed.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Subscribes to connection events.
    ///
    /// The callback receives the mirrored state at connection time.
    fn on_connected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static;

    /// Subscribes to disconnection events.
    fn on_disconnected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
