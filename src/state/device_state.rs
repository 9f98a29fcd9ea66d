// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use serde::Serialize;
use serde_json::Value;

use crate::types::{Brightness, PluginDescriptor, PluginId, Rotation};

use super::{StateField, StateUpdate};

/// Mirrored state of a device.
///
/// Starts from the device's power-on defaults and is updated field by field
/// from push frames. Fields absent from a frame keep their previous value.
///
/// # Examples
///
/// ```
/// use obegraensad_sync::state::{DeviceState, StateUpdate};
///
/// let mut state = DeviceState::new();
/// let update = StateUpdate::parse(r#"{"brightness": 200, "plugin": 3}"#).unwrap();
/// state.apply(update);
///
/// assert_eq!(state.brightness().value(), 200);
/// assert_eq!(state.active_plugin().map(|p| p.value()), Some(3));
/// assert_eq!(state.rotation().degrees(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceState {
    brightness: Brightness,
    rotation: Rotation,
    active_plugin: Option<PluginId>,
    persisted_plugin: Option<PluginId>,
    schedule_active: bool,
    schedule: Vec<Value>,
    available_plugins: Vec<PluginDescriptor>,
}

impl DeviceState {
    /// Creates a state with the device defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a push frame into this state.
    ///
    /// Only the keys present in `update` are written. Returns `true` if any
    /// field value actually changed.
    pub fn apply(&mut self, update: StateUpdate) -> bool {
        let before = self.clone();

        if let Some(brightness) = update.brightness {
            self.brightness = brightness;
        }
        if let Some(rotation) = update.rotation {
            self.rotation = rotation;
        }
        if let Some(plugin) = update.active_plugin {
            self.active_plugin = Some(plugin);
        }
        if let Some(plugin) = update.persisted_plugin {
            self.persisted_plugin = Some(plugin);
        }
        if let Some(active) = update.schedule_active {
            self.schedule_active = active;
        }
        if let Some(schedule) = update.schedule {
            self.schedule = schedule;
        }
        if let Some(plugins) = update.available_plugins {
            self.available_plugins = plugins;
        }

        *self != before
    }

    /// Returns the fields whose values differ between `self` and `other`.
    #[must_use]
    pub fn diff(&self, other: &Self) -> Vec<StateField> {
        let mut fields = Vec::new();
        if self.brightness != other.brightness {
            fields.push(StateField::Brightness);
        }
        if self.rotation != other.rotation {
            fields.push(StateField::Rotation);
        }
        if self.active_plugin != other.active_plugin {
            fields.push(StateField::ActivePlugin);
        }
        if self.persisted_plugin != other.persisted_plugin {
            fields.push(StateField::PersistedPlugin);
        }
        if self.schedule_active != other.schedule_active {
            fields.push(StateField::ScheduleActive);
        }
        if self.schedule != other.schedule {
            fields.push(StateField::Schedule);
        }
        if self.available_plugins != other.available_plugins {
            fields.push(StateField::AvailablePlugins);
        }
        fields
    }

    // ========== Accessors ==========

    /// Raw brightness (0-255).
    #[must_use]
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Brightness as a percentage rounded to one decimal.
    #[must_use]
    pub fn brightness_percent(&self) -> f32 {
        self.brightness.as_percent()
    }

    /// Display orientation.
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Display orientation in degrees.
    #[must_use]
    pub fn rotation_degrees(&self) -> u16 {
        self.rotation.degrees()
    }

    /// Currently running plugin, unknown until the first push.
    #[must_use]
    pub fn active_plugin(&self) -> Option<PluginId> {
        self.active_plugin
    }

    /// Plugin persisted as the device default, if the firmware reports it.
    #[must_use]
    pub fn persisted_plugin(&self) -> Option<PluginId> {
        self.persisted_plugin
    }

    /// Whether the plugin schedule is running.
    #[must_use]
    pub fn schedule_active(&self) -> bool {
        self.schedule_active
    }

    /// Schedule entries as reported by the device.
    #[must_use]
    pub fn schedule(&self) -> &[Value] {
        &self.schedule
    }

    /// Plugins the device advertises.
    #[must_use]
    pub fn available_plugins(&self) -> &[PluginDescriptor] {
        &self.available_plugins
    }

    /// Looks up an advertised plugin by id.
    #[must_use]
    pub fn plugin(&self, id: PluginId) -> Option<&PluginDescriptor> {
        self.available_plugins.iter().find(|p| p.id == id)
    }

    /// Display name of the active plugin.
    ///
    /// Falls back to `"Plugin <id>"` when the plugin is not advertised or has
    /// no name. Returns `None` when no plugin is active.
    #[must_use]
    pub fn active_plugin_name(&self) -> Option<String> {
        let id = self.active_plugin?;
        Some(
            self.plugin(id)
                .map(|p| p.name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("Plugin {id}")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(raw: &str) -> StateUpdate {
        StateUpdate::parse(raw).unwrap()
    }

    #[test]
    fn new_state_has_defaults() {
        let state = DeviceState::new();
        assert_eq!(state.brightness(), Brightness::MIN);
        assert_eq!(state.rotation_degrees(), 0);
        assert!(state.active_plugin().is_none());
        assert!(state.persisted_plugin().is_none());
        assert!(!state.schedule_active());
        assert!(state.schedule().is_empty());
        assert!(state.available_plugins().is_empty());
    }

    #[test]
    fn apply_partial_update_keeps_other_fields() {
        let mut state = DeviceState::new();
        state.apply(update(r#"{"brightness": 10, "rotation": 2}"#));
        state.apply(update(r#"{"scheduleActive": true}"#));

        assert_eq!(state.brightness().value(), 10);
        assert_eq!(state.rotation_degrees(), 180);
        assert!(state.schedule_active());
    }

    #[test]
    fn apply_returns_whether_changed() {
        let mut state = DeviceState::new();
        assert!(state.apply(update(r#"{"brightness": 10}"#)));
        assert!(!state.apply(update(r#"{"brightness": 10}"#)));
        assert!(!state.apply(update("{}")));
    }

    #[test]
    fn apply_is_last_write_wins() {
        let mut state = DeviceState::new();
        for raw in [
            r#"{"brightness": 1, "plugin": 1}"#,
            r#"{"brightness": 2}"#,
            r#"{"plugin": 5, "persist-plugin": 4}"#,
            r#"{"schedule": [{"pluginId": 1}]}"#,
        ] {
            state.apply(update(raw));
        }

        assert_eq!(state.brightness().value(), 2);
        assert_eq!(state.active_plugin(), Some(PluginId::new(5)));
        assert_eq!(state.persisted_plugin(), Some(PluginId::new(4)));
        assert_eq!(state.schedule(), &[json!({"pluginId": 1})]);
    }

    #[test]
    fn diff_lists_changed_fields() {
        let before = DeviceState::new();
        let mut after = before.clone();
        after.apply(update(r#"{"rotation": 1, "plugins": [{"id": 1, "name": "Clock"}]}"#));

        assert_eq!(
            before.diff(&after),
            vec![StateField::Rotation, StateField::AvailablePlugins]
        );
        assert!(after.diff(&after).is_empty());
    }

    #[test]
    fn active_plugin_name_lookup() {
        let mut state = DeviceState::new();
        assert_eq!(state.active_plugin_name(), None);

        state.apply(update(
            r#"{"plugin": 2, "plugins": [{"id": 1, "name": "Draw"}, {"id": 2, "name": "Snake"}]}"#,
        ));
        assert_eq!(state.active_plugin_name().as_deref(), Some("Snake"));

        state.apply(update(r#"{"plugin": 9}"#));
        assert_eq!(state.active_plugin_name().as_deref(), Some("Plugin 9"));
    }

    #[test]
    fn brightness_percent_view() {
        let mut state = DeviceState::new();
        state.apply(update(r#"{"brightness": 255}"#));
        assert!((state.brightness_percent() - 100.0).abs() < f32::EPSILON);
    }
}
