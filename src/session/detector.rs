// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic change detection task.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::state::ChangeDetector;

use super::Shared;

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Polls the store and publishes one event per cycle in which anything changed.
///
/// The first tick fires immediately and only records the baseline.
pub(super) async fn run(shared: Arc<Shared>, poll_interval: Duration) {
    let mut detector = ChangeDetector::new();
    let mut ticker = tokio::time::interval(poll_interval.max(MIN_POLL_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = shared.cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        if let Some(change) = detector.observe(shared.store.snapshot()) {
            shared.state_tx.send_replace(change.state().clone());
            shared.callbacks.dispatch(&change);
        }
    }

    tracing::debug!("Change detector stopped");
}
