// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot-diffing change detector.
//!
//! The push channel can drop updates across reconnects, so observers are not
//! driven by frames directly. Instead the mirror is polled on a fixed cadence
//! and each snapshot is compared with the previous one.

use super::{DeviceState, StateChange};

/// Compares successive snapshots and reports deltas.
///
/// The first observed snapshot only establishes the baseline. Every later
/// snapshot replaces the cache, so an unchanged field never fires twice.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last: Option<DeviceState>,
}

impl ChangeDetector {
    /// Creates a detector with no baseline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once a baseline snapshot has been observed.
    #[must_use]
    pub fn has_baseline(&self) -> bool {
        self.last.is_some()
    }

    /// Feeds the next snapshot.
    ///
    /// Returns a single [`StateChange`] listing every field that differs from
    /// the previous snapshot, or `None` for the baseline and for unchanged
    /// snapshots.
    pub fn observe(&mut self, snapshot: DeviceState) -> Option<StateChange> {
        let Some(last) = self.last.replace(snapshot.clone()) else {
            tracing::trace!("Change detector baseline established");
            return None;
        };

        let fields = last.diff(&snapshot);
        if fields.is_empty() {
            return None;
        }

        for field in &fields {
            tracing::debug!(field = %field, "Change detected");
        }

        Some(StateChange::new(fields, snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{StateField, StateUpdate};

    fn with(state: &DeviceState, raw: &str) -> DeviceState {
        let mut next = state.clone();
        next.apply(StateUpdate::parse(raw).unwrap());
        next
    }

    #[test]
    fn baseline_does_not_fire() {
        let mut detector = ChangeDetector::new();
        let state = with(&DeviceState::new(), r#"{"brightness": 200, "plugin": 1}"#);

        assert!(detector.observe(state).is_none());
        assert!(detector.has_baseline());
    }

    #[test]
    fn unchanged_snapshot_does_not_fire() {
        let mut detector = ChangeDetector::new();
        detector.observe(DeviceState::new());
        assert!(detector.observe(DeviceState::new()).is_none());
        assert!(detector.observe(DeviceState::new()).is_none());
    }

    #[test]
    fn multiple_fields_fire_once() {
        let mut detector = ChangeDetector::new();
        let base = DeviceState::new();
        detector.observe(base.clone());

        let next = with(&base, r#"{"brightness": 5, "rotation": 1, "scheduleActive": true}"#);
        let change = detector.observe(next).unwrap();

        assert_eq!(
            change.fields(),
            &[
                StateField::Brightness,
                StateField::Rotation,
                StateField::ScheduleActive
            ]
        );
    }

    #[test]
    fn change_fires_only_once() {
        let mut detector = ChangeDetector::new();
        let base = DeviceState::new();
        detector.observe(base.clone());

        let next = with(&base, r#"{"persist-plugin": 3}"#);
        assert!(detector.observe(next.clone()).is_some());
        assert!(detector.observe(next).is_none());
    }

    #[test]
    fn change_back_to_original_fires() {
        let mut detector = ChangeDetector::new();
        let base = DeviceState::new();
        detector.observe(base.clone());

        detector.observe(with(&base, r#"{"brightness": 9}"#));
        let change = detector.observe(base).unwrap();
        assert_eq!(change.fields(), &[StateField::Brightness]);
    }
}
