// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state mirroring.
//!
//! - [`DeviceState`] - the mirrored device state
//! - [`StateUpdate`] - a decoded push frame (partial update)
//! - [`StateStore`] - the locked owner of the mirror
//! - [`ChangeDetector`] - snapshot differ producing [`StateChange`] events
//!
//! # Examples
//!
//! ```
//! use obegraensad_sync::state::{ChangeDetector, StateStore};
//!
//! let store = StateStore::new();
//! let mut detector = ChangeDetector::new();
//! detector.observe(store.snapshot());
//!
//! store.handle_frame(r#"{"rotation": 1}"#).unwrap();
//! let change = detector.observe(store.snapshot()).unwrap();
//! assert_eq!(change.state().rotation_degrees(), 90);
//! ```

mod change_detector;
mod device_state;
mod state_change;
mod state_update;
mod store;

pub use change_detector::ChangeDetector;
pub use device_state::DeviceState;
pub use state_change::{StateChange, StateField};
pub use state_update::StateUpdate;
pub use store::StateStore;
