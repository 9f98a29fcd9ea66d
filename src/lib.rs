// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `obegraensad_sync` - A Rust library to mirror and control IKEA
//! OBEGRÄNSAD LED matrix devices running the open-source controller
//! firmware.
//!
//! The device pushes its state over a WebSocket (`ws://<host>/ws`) and
//! accepts commands on that socket and on a small HTTP API
//! (`http://<host>/api`). A [`DeviceSession`] keeps the socket connected,
//! mirrors the pushed state locally, and notifies subscribers when it
//! changes.
//!
//! # Supported Features
//!
//! - **State mirroring**: brightness, rotation, active and persisted plugin,
//!   schedule, plugin catalogue
//! - **Change notification**: callbacks and a `watch` channel, one event per
//!   poll cycle listing every changed field
//! - **Push commands**: brightness, rotation, plugin switch, plugin persist
//! - **HTTP commands**: schedule upload/start/stop/clear, text messages with
//!   graphs, storage reset, raw display buffer download, device probe
//! - **Automatic reconnection** with a fixed backoff
//!
//! # Quick Start
//!
//! ```no_run
//! use obegraensad_sync::{DeviceSession, SessionConfig, Subscribable};
//! use obegraensad_sync::types::Message;
//!
//! #[tokio::main]
//! async fn main() -> obegraensad_sync::Result<()> {
//!     let session = DeviceSession::start(SessionConfig::new("192.168.1.60"))?;
//!
//!     session.on_state_changed(|change| {
//!         let state = change.state();
//!         println!(
//!             "brightness {}%, rotation {}°, plugin {:?}",
//!             state.brightness_percent(),
//!             state.rotation_degrees(),
//!             state.active_plugin_name(),
//!         );
//!     });
//!
//!     session.set_brightness(200).await?;
//!
//!     let message = Message::builder("hello").repeat(2).build()?;
//!     if !session.add_message(&message).await {
//!         eprintln!("device rejected the message");
//!     }
//!
//!     session.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! # Validating a Host
//!
//! ```no_run
//! use obegraensad_sync::protocol::HttpClient;
//!
//! # async fn example() -> obegraensad_sync::Result<()> {
//! let info = HttpClient::new("192.168.1.60")?.probe_info().await?;
//! println!("device reports brightness {:?}", info.brightness());
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod error;
pub mod manager;
pub mod protocol;
pub mod session;
pub mod state;
pub mod subscription;
pub mod types;

pub use command::{Command, CommandOutcome};
pub use error::{Error, ParseError, ProtocolError, Result, ValueError};
pub use manager::SessionRegistry;
pub use session::{ConnectionState, DeviceControl, DeviceSession, SessionConfig};
pub use state::{DeviceState, StateChange, StateField};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{
    Brightness, Graph, Message, PluginDescriptor, PluginId, RotateDirection, Rotation, Schedule,
};
