// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound push frames.
//!
//! The device pushes JSON objects carrying any subset of its state keys.
//! A [`StateUpdate`] holds exactly the keys that were present; applying it
//! to a [`DeviceState`](super::DeviceState) overwrites only those fields.
//!
//! # Wire keys
//!
//! | Key | Field |
//! |-----|-------|
//! | `brightness` | brightness |
//! | `rotation` | rotation |
//! | `plugin` | active plugin |
//! | `persist-plugin` | persisted plugin |
//! | `scheduleActive` | schedule active |
//! | `schedule` | schedule |
//! | `plugins` | available plugins |
//!
//! Unknown keys are ignored.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;
use crate::types::{Brightness, PluginDescriptor, PluginId, Rotation};

/// A partial state update decoded from one push frame.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StateUpdate {
    /// New brightness.
    #[serde(default)]
    pub brightness: Option<Brightness>,
    /// New orientation.
    #[serde(default)]
    pub rotation: Option<Rotation>,
    /// New active plugin.
    ///
    /// An explicit `null` is ignored like an absent key, so it never clears a
    /// plugin that was already mirrored.
    #[serde(default, rename = "plugin")]
    pub active_plugin: Option<PluginId>,
    /// New persisted plugin. The firmware uses a hyphenated key for it.
    /// An explicit `null` is ignored.
    #[serde(default, rename = "persist-plugin")]
    pub persisted_plugin: Option<PluginId>,
    /// New schedule running flag.
    #[serde(default, rename = "scheduleActive")]
    pub schedule_active: Option<bool>,
    /// New schedule entries.
    #[serde(default)]
    pub schedule: Option<Vec<Value>>,
    /// New plugin list.
    #[serde(default, rename = "plugins")]
    pub available_plugins: Option<Vec<PluginDescriptor>>,
}

impl StateUpdate {
    /// Decodes a push frame.
    ///
    /// # Errors
    ///
    /// - `ParseError::Json` if the payload is not valid JSON or a known key
    ///   carries a value of the wrong type
    /// - `ParseError::UnexpectedFormat` if the payload is not a JSON object
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(ParseError::UnexpectedFormat(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Returns `true` if the frame carried none of the recognized keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_frame() {
        let update = StateUpdate::parse(
            r#"{
                "brightness": 128,
                "rotation": 3,
                "plugin": 4,
                "persist-plugin": 2,
                "scheduleActive": true,
                "schedule": [{"pluginId": 4, "duration": 60}],
                "plugins": [{"id": 4, "name": "Rain"}]
            }"#,
        )
        .unwrap();

        assert_eq!(update.brightness, Some(Brightness::from(128)));
        assert_eq!(update.rotation, Some(Rotation::new(3)));
        assert_eq!(update.active_plugin, Some(PluginId::new(4)));
        assert_eq!(update.persisted_plugin, Some(PluginId::new(2)));
        assert_eq!(update.schedule_active, Some(true));
        assert_eq!(update.schedule.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            update.available_plugins,
            Some(vec![PluginDescriptor::new(4_i64, "Rain")])
        );
    }

    #[test]
    fn parse_partial_frame() {
        let update = StateUpdate::parse(r#"{"rotation": 1}"#).unwrap();
        assert_eq!(update.rotation, Some(Rotation::new(1)));
        assert!(update.brightness.is_none());
        assert!(update.available_plugins.is_none());
    }

    #[test]
    fn null_plugin_keeps_mirrored_plugin() {
        let update = StateUpdate::parse(r#"{"plugin": null, "persist-plugin": null}"#).unwrap();
        assert!(update.active_plugin.is_none());
        assert!(update.is_empty());

        let mut state = crate::state::DeviceState::new();
        assert!(state.apply(StateUpdate::parse(r#"{"plugin": 4}"#).unwrap()));
        assert!(!state.apply(update));
        assert_eq!(state.active_plugin(), Some(PluginId::new(4)));
    }

    #[test]
    fn camel_case_persisted_key_is_not_recognized() {
        // Only the hyphenated firmware key maps to the persisted plugin
        let update = StateUpdate::parse(r#"{"persistPlugin": 3}"#).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn parse_ignores_unknown_keys() {
        let update = StateUpdate::parse(r#"{"event": "info", "uptime": 5}"#).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn parse_rejects_invalid_json() {
        assert!(matches!(
            StateUpdate::parse("{brightness"),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn parse_rejects_non_object() {
        assert!(matches!(
            StateUpdate::parse("[1, 2, 3]"),
            Err(ParseError::UnexpectedFormat(_))
        ));
    }

    #[test]
    fn parse_rejects_wrong_types() {
        assert!(StateUpdate::parse(r#"{"brightness": "high"}"#).is_err());
        assert!(StateUpdate::parse(r#"{"brightness": 300}"#).is_err());
    }
}
