// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport channels to the device.
//!
//! # Channels
//!
//! - [`HttpClient`]: stateless request/response calls under `/api`
//!   (schedule, messages, storage, raw data, identity probe)
//! - [`websocket`]: the persistent push channel at `/ws`, carrying state
//!   updates from the device and fire-and-forget commands to it

mod http;
pub mod websocket;

pub use http::{DeviceInfo, HttpClient};
pub use websocket::{OutboundEvent, WsReader, WsWriter};
