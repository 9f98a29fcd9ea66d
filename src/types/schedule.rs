// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schedule payload uploaded to the device.

use serde_json::Value;

use crate::error::ValueError;

/// A schedule ready to be posted to the device.
///
/// The schedule entries are opaque to this library; the payload is carried
/// as the JSON text the firmware expects in its `schedule` form field.
///
/// # Examples
///
/// ```
/// use obegraensad_sync::types::Schedule;
/// use serde_json::json;
///
/// let schedule = Schedule::from_json(&json!([{"pluginId": 1, "duration": 30}])).unwrap();
/// assert_eq!(schedule.as_str(), r#"[{"duration":30,"pluginId":1}]"#);
///
/// assert!(Schedule::from_json(&json!([])).is_err());
/// assert!(Schedule::from_text("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule(String);

impl Schedule {
    /// Builds a schedule from structured JSON.
    ///
    /// A JSON string is taken as already-encoded schedule text.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::EmptySchedule` for `null`, a blank string, or an
    /// empty array or object.
    pub fn from_json(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Err(ValueError::EmptySchedule),
            Value::Array(entries) if entries.is_empty() => Err(ValueError::EmptySchedule),
            Value::Object(fields) if fields.is_empty() => Err(ValueError::EmptySchedule),
            Value::String(text) => Self::from_text(text.clone()),
            other => Ok(Self(other.to_string())),
        }
    }

    /// Builds a schedule from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::EmptySchedule` if the text is blank.
    pub fn from_text(text: impl Into<String>) -> Result<Self, ValueError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValueError::EmptySchedule);
        }
        Ok(Self(text))
    }

    /// Returns the encoded schedule.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_rejects_null() {
        assert_eq!(Schedule::from_json(&Value::Null), Err(ValueError::EmptySchedule));
    }

    #[test]
    fn from_json_passes_strings_through() {
        let schedule = Schedule::from_json(&json!("[1,2]")).unwrap();
        assert_eq!(schedule.as_str(), "[1,2]");
    }

    #[test]
    fn from_json_rejects_empty_structures() {
        assert_eq!(Schedule::from_json(&json!([])), Err(ValueError::EmptySchedule));
        assert_eq!(Schedule::from_json(&json!({})), Err(ValueError::EmptySchedule));
    }

    #[test]
    fn from_json_encodes_structures() {
        let schedule = Schedule::from_json(&json!([{"pluginId": 2}])).unwrap();
        assert_eq!(schedule.as_str(), r#"[{"pluginId":2}]"#);

        let schedule = Schedule::from_json(&json!({"entries": [1]})).unwrap();
        assert_eq!(schedule.as_str(), r#"{"entries":[1]}"#);
    }

    #[test]
    fn from_text_rejects_blank() {
        assert_eq!(Schedule::from_text(""), Err(ValueError::EmptySchedule));
    }
}
