// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Push channel connection state.

use std::fmt;

/// Connection state of a session's push channel.
///
/// Transitions follow `Disconnected -> Connecting -> Connected ->
/// Disconnected -> ...` until shutdown, which ends in `ShuttingDown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// Not connected; waiting for the next attempt.
    #[default]
    Disconnected,
    /// A handshake is in progress.
    Connecting,
    /// Connected and receiving updates.
    Connected,
    /// The session has been shut down. Terminal.
    ShuttingDown,
}

impl ConnectionState {
    /// Returns true if the push channel is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns true once the session has been shut down.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ShuttingDown)
    }

    /// Returns the state name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::ShuttingDown => "shutting_down",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
