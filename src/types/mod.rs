// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for device control.
//!
//! This module provides type-safe representations of values exchanged with
//! the device. Each type checks its constraints at construction time, so
//! commands built from them never need to be validated again.
//!
//! # Types
//!
//! - [`Brightness`] - Raw panel brightness (0-255)
//! - [`Rotation`] - Orientation in quarter-turns
//! - [`RotateDirection`] - Relative rotation (`left`/`right`)
//! - [`PluginId`] / [`PluginDescriptor`] - Display plugins
//! - [`Message`] / [`Graph`] - Scrolling text messages
//! - [`Schedule`] - Plugin schedule payload

mod brightness;
mod message;
mod plugin;
mod rotation;
mod schedule;

pub use brightness::Brightness;
pub use message::{Graph, Message, MessageBuilder};
pub use plugin::{PluginDescriptor, PluginId};
pub use rotation::{RotateDirection, Rotation};
pub use schedule::Schedule;
