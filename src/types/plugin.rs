// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plugin identifiers and descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a device-side plugin (display mode).
///
/// No range is enforced locally: the device validates plugin ids itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginId(i64);

impl PluginId {
    /// Creates a plugin id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for PluginId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A plugin advertised by the device in its `plugins` list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Plugin id, as accepted by the `plugin` command.
    pub id: PluginId,
    /// Human-readable plugin name.
    #[serde(default)]
    pub name: String,
}

impl PluginDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(id: impl Into<PluginId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
