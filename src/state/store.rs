// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The locked state mirror.

use parking_lot::Mutex;

use crate::error::ParseError;

use super::{DeviceState, StateUpdate};

/// Thread-safe owner of the mirrored [`DeviceState`].
///
/// Writes come only from the push-channel message handler
/// ([`handle_frame`](Self::handle_frame)); everything else reads through
/// [`snapshot`](Self::snapshot) or [`read`](Self::read).
///
/// The lock is a synchronous `parking_lot::Mutex` and is only held for
/// field assignments or a clone, never across an `.await`.
#[derive(Debug, Default)]
pub struct StateStore {
    state: Mutex<DeviceState>,
}

impl StateStore {
    /// Creates a store holding the device defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a raw push frame and applies it.
    ///
    /// Decoding happens before the lock is taken. Returns `true` if the
    /// frame changed any field.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the frame is malformed; the state is left
    /// untouched in that case.
    pub fn handle_frame(&self, raw: &str) -> Result<bool, ParseError> {
        let update = StateUpdate::parse(raw)?;
        Ok(self.apply(update))
    }

    /// Applies an already-decoded update.
    pub fn apply(&self, update: StateUpdate) -> bool {
        self.state.lock().apply(update)
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> DeviceState {
        self.state.lock().clone()
    }

    /// Runs `f` against the current state under the lock.
    ///
    /// Use for cheap reads that do not need a full copy. `f` must not block.
    pub fn read<R>(&self, f: impl FnOnce(&DeviceState) -> R) -> R {
        f(&self.state.lock())
    }
}
