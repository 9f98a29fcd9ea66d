// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Management of sessions for several devices.
//!
//! [`SessionRegistry`] keeps one [`DeviceSession`](crate::session::DeviceSession)
//! per host and resolves commands that omit the host to the single
//! registered device.

mod session_registry;

pub use session_registry::SessionRegistry;
