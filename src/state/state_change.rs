// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change notifications.
//!
//! A [`StateChange`] is emitted by the change detector once per poll cycle in
//! which at least one tracked field differs from the previous snapshot. It
//! names every field that changed and carries the snapshot that was observed.

use std::fmt;

use serde::Serialize;

use super::DeviceState;

/// A tracked field of [`DeviceState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateField {
    /// Panel brightness.
    Brightness,
    /// Display orientation.
    Rotation,
    /// Currently running plugin.
    ActivePlugin,
    /// Plugin persisted as default.
    PersistedPlugin,
    /// Schedule running flag.
    ScheduleActive,
    /// Schedule entries.
    Schedule,
    /// Advertised plugin list.
    AvailablePlugins,
}

impl StateField {
    /// All tracked fields, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Brightness,
        Self::Rotation,
        Self::ActivePlugin,
        Self::PersistedPlugin,
        Self::ScheduleActive,
        Self::Schedule,
        Self::AvailablePlugins,
    ];

    /// Returns the field name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Rotation => "rotation",
            Self::ActivePlugin => "active_plugin",
            Self::PersistedPlugin => "persisted_plugin",
            Self::ScheduleActive => "schedule_active",
            Self::Schedule => "schedule",
            Self::AvailablePlugins => "available_plugins",
        }
    }
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One change notification.
///
/// # Examples
///
/// ```
/// use obegraensad_sync::state::{ChangeDetector, DeviceState, StateField, StateUpdate};
///
/// let mut detector = ChangeDetector::new();
/// let mut state = DeviceState::new();
/// assert!(detector.observe(state.clone()).is_none()); // baseline
///
/// state.apply(StateUpdate::parse(r#"{"brightness": 90}"#).unwrap());
/// let change = detector.observe(state).unwrap();
/// assert!(change.contains(StateField::Brightness));
/// assert_eq!(change.state().brightness().value(), 90);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateChange {
    fields: Vec<StateField>,
    state: DeviceState,
}

impl StateChange {
    pub(crate) fn new(fields: Vec<StateField>, state: DeviceState) -> Self {
        Self { fields, state }
    }

    /// Fields that changed since the previous poll.
    #[must_use]
    pub fn fields(&self) -> &[StateField] {
        &self.fields
    }

    /// Returns `true` if `field` is among the changed fields.
    #[must_use]
    pub fn contains(&self, field: StateField) -> bool {
        self.fields.contains(&field)
    }

    /// The snapshot in which the change was observed.
    #[must_use]
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Consumes the change and returns the snapshot.
    #[must_use]
    pub fn into_state(self) -> DeviceState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names() {
        assert_eq!(StateField::PersistedPlugin.to_string(), "persisted_plugin");
        assert_eq!(StateField::ALL.len(), 7);
    }

    #[test]
    fn change_contains() {
        let change = StateChange::new(vec![StateField::Rotation], DeviceState::new());
        assert!(change.contains(StateField::Rotation));
        assert!(!change.contains(StateField::Brightness));
    }
}
