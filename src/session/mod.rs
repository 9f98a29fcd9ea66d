// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device sessions.
//!
//! A [`DeviceSession`] mirrors one device. It runs two background tasks:
//!
//! - the supervisor, which keeps the push channel connected and feeds every
//!   inbound frame into the state store
//! - the change detector, which snapshots the store on a fixed interval and
//!   publishes one [`StateChange`] per cycle in which anything changed
//!
//! Commands go out on the push channel (brightness, rotation, plugins) or
//! over HTTP (schedule, messages, storage, raw data).
//!
//! # Examples
//!
//! ```no_run
//! use obegraensad_sync::session::{DeviceSession, SessionConfig};
//! use obegraensad_sync::subscription::Subscribable;
//!
//! # async fn example() -> obegraensad_sync::Result<()> {
//! let session = DeviceSession::start(SessionConfig::new("192.168.1.60"))?;
//!
//! session.on_state_changed(|change| {
//!     println!("{:?} -> {:?}", change.fields(), change.state());
//! });
//!
//! session.set_brightness(128).await?;
//! session.start_schedule().await;
//!
//! session.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod config;
mod connection;
mod detector;
mod supervisor;

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::command::{Command, CommandOutcome};
use crate::error::{Error, ProtocolError, Result};
use crate::protocol::{DeviceInfo, HttpClient, OutboundEvent, WsWriter, websocket};
use crate::state::{DeviceState, StateChange, StateStore};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{Brightness, Message, PluginId, RotateDirection, Schedule};

pub use config::SessionConfig;
pub use connection::ConnectionState;

/// State shared between a session and its background tasks.
pub(crate) struct Shared {
    store: StateStore,
    callbacks: CallbackRegistry,
    writer: Mutex<Option<WsWriter>>,
    state_tx: watch::Sender<DeviceState>,
    connection_tx: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
}

impl Shared {
    fn new() -> Self {
        Self {
            store: StateStore::new(),
            callbacks: CallbackRegistry::new(),
            writer: Mutex::new(None),
            state_tx: watch::Sender::new(DeviceState::new()),
            connection_tx: watch::Sender::new(ConnectionState::Disconnected),
            cancel: CancellationToken::new(),
        }
    }

    fn set_connection(&self, state: ConnectionState) {
        self.connection_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                tracing::debug!(from = %current, to = %state, "Connection state changed");
                *current = state;
                true
            }
        });
    }
}

/// A live session with one device.
///
/// Dropping the session cancels its background tasks; call
/// [`shutdown`](Self::shutdown) to also wait for them to finish.
pub struct DeviceSession {
    config: SessionConfig,
    shared: Arc<Shared>,
    http: HttpClient,
    tasks: parking_lot::Mutex<Vec<JoinHandle<()>>>,
}

impl DeviceSession {
    /// Starts a session: spawns the supervisor and the change detector.
    ///
    /// Returns immediately; the push channel connects in the background.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the host is empty, or
    /// `ProtocolError::Http` if the HTTP client cannot be created.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start(config: SessionConfig) -> Result<Self> {
        if config.host().trim().is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()).into());
        }
        let http = HttpClient::new(config.http_base_url())?
            .with_request_timeout(config.request_timeout())
            .with_data_timeout(config.data_timeout());

        let shared = Arc::new(Shared::new());

        let supervisor = tokio::spawn(supervisor::run(Arc::clone(&shared), config.clone()));
        let detector = tokio::spawn(detector::run(Arc::clone(&shared), config.poll_interval()));

        tracing::info!(host = %config.host(), "Device session started");

        Ok(Self {
            config,
            shared,
            http,
            tasks: parking_lot::Mutex::new(vec![supervisor, detector]),
        })
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the device host.
    #[must_use]
    pub fn host(&self) -> &str {
        self.config.host()
    }

    /// Returns the HTTP client used for request/response commands.
    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    // ========== State ==========

    /// Returns a copy of the mirrored state.
    ///
    /// Reflects every frame received so far, not only those already
    /// reported through a change event.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.shared.store.snapshot()
    }

    /// Returns a receiver that is updated on every change event.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<DeviceState> {
        self.shared.state_tx.subscribe()
    }

    /// Returns the current connection state.
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        *self.shared.connection_tx.borrow()
    }

    /// Returns a receiver for connection state transitions.
    #[must_use]
    pub fn watch_connection(&self) -> watch::Receiver<ConnectionState> {
        self.shared.connection_tx.subscribe()
    }

    /// Returns true if the push channel is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection_state().is_connected()
    }

    // ========== Push channel commands ==========

    /// Sets the panel brightness.
    ///
    /// # Errors
    ///
    /// - `ValueError::OutOfRange` unless `0 <= value <= 255`
    /// - `Error::NotConnected` if the push channel is down
    /// - `ProtocolError::WebSocket` if the frame cannot be written
    /// - `ProtocolError::Timeout` if the write stalls past the connect timeout
    pub async fn set_brightness(&self, value: i64) -> Result<()> {
        let brightness = Brightness::new(value)?;
        self.send_event(OutboundEvent::Brightness { brightness })
            .await
    }

    /// Rotates the display by direction name (`left` or `right`).
    ///
    /// # Errors
    ///
    /// - `ValueError::InvalidDirection` for any other name
    /// - `Error::NotConnected` if the push channel is down
    /// - `ProtocolError::WebSocket` if the frame cannot be written
    pub async fn set_rotation(&self, direction: &str) -> Result<()> {
        let direction: RotateDirection = direction.parse()?;
        self.rotate(direction).await
    }

    /// Rotates the display one quarter-turn.
    ///
    /// # Errors
    ///
    /// - `Error::NotConnected` if the push channel is down
    /// - `ProtocolError::WebSocket` if the frame cannot be written
    pub async fn rotate(&self, direction: RotateDirection) -> Result<()> {
        self.send_event(OutboundEvent::Rotate { direction }).await
    }

    /// Switches to a plugin. The device ignores unknown ids.
    ///
    /// # Errors
    ///
    /// - `Error::NotConnected` if the push channel is down
    /// - `ProtocolError::WebSocket` if the frame cannot be written
    pub async fn set_plugin(&self, plugin: impl Into<PluginId>) -> Result<()> {
        self.send_event(OutboundEvent::Plugin {
            plugin: plugin.into(),
        })
        .await
    }

    /// Persists the active plugin as the device default.
    ///
    /// # Errors
    ///
    /// - `Error::NotConnected` if the push channel is down
    /// - `ProtocolError::WebSocket` if the frame cannot be written
    pub async fn persist_plugin(&self) -> Result<()> {
        self.send_event(OutboundEvent::PersistPlugin).await
    }

    async fn send_event(&self, event: OutboundEvent) -> Result<()> {
        let mut writer = self.shared.writer.lock().await;
        let Some(writer) = writer.as_mut() else {
            tracing::warn!(event = event.name(), "Push channel not connected, command rejected");
            return Err(Error::NotConnected);
        };

        websocket::within(self.config.connect_timeout(), writer.send(&event))
            .await
            .map_err(|e| {
                tracing::warn!(event = event.name(), error = %e, "Failed to send command frame");
                Error::Protocol(e)
            })
    }

    // ========== HTTP commands ==========

    /// Uploads a schedule. Returns true on `200 OK`.
    pub async fn set_schedule(&self, schedule: &Schedule) -> bool {
        self.http.set_schedule(schedule).await
    }

    /// Clears the schedule. Returns true on `200 OK`.
    pub async fn clear_schedule(&self) -> bool {
        self.http.clear_schedule().await
    }

    /// Starts the schedule. Returns true on `200 OK`.
    pub async fn start_schedule(&self) -> bool {
        self.http.start_schedule().await
    }

    /// Stops the schedule. Returns true on `200 OK`.
    pub async fn stop_schedule(&self) -> bool {
        self.http.stop_schedule().await
    }

    /// Clears persistent storage. Returns true on `200 OK`.
    pub async fn clear_storage(&self) -> bool {
        self.http.clear_storage().await
    }

    /// Queues a text message. Returns true on `200 OK`.
    pub async fn add_message(&self, message: &Message) -> bool {
        self.http.add_message(message).await
    }

    /// Removes a queued message. Returns true on `200 OK`.
    pub async fn remove_message(&self, id: u16) -> bool {
        self.http.remove_message(id).await
    }

    /// Downloads the raw display buffer. Returns `None` on any failure.
    pub async fn fetch_raw_data(&self) -> Option<Vec<u8>> {
        self.http.fetch_raw_data().await
    }

    /// Fetches device information.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is unreachable or the response is not
    /// a device info object.
    pub async fn probe_info(&self) -> Result<DeviceInfo> {
        self.http.probe_info().await
    }

    // ========== Dispatch ==========

    /// Executes a command on its channel.
    ///
    /// # Errors
    ///
    /// Only push channel commands fail; see [`set_brightness`](Self::set_brightness).
    pub async fn dispatch(&self, command: Command) -> Result<CommandOutcome> {
        tracing::debug!(command = command.name(), "Dispatching command");

        if let Some(event) = command.to_event() {
            self.send_event(event).await?;
            return Ok(CommandOutcome::Sent);
        }

        let outcome = match command {
            Command::SetSchedule(schedule) => {
                CommandOutcome::Completed(self.set_schedule(&schedule).await)
            }
            Command::ClearSchedule => CommandOutcome::Completed(self.clear_schedule().await),
            Command::StartSchedule => CommandOutcome::Completed(self.start_schedule().await),
            Command::StopSchedule => CommandOutcome::Completed(self.stop_schedule().await),
            Command::ClearStorage => CommandOutcome::Completed(self.clear_storage().await),
            Command::AddMessage(message) => {
                CommandOutcome::Completed(self.add_message(&message).await)
            }
            Command::RemoveMessage(id) => CommandOutcome::Completed(self.remove_message(id).await),
            Command::FetchRawData => CommandOutcome::Data(self.fetch_raw_data().await),
            Command::SetBrightness(_)
            | Command::Rotate(_)
            | Command::SetPlugin(_)
            | Command::PersistPlugin => CommandOutcome::Sent,
        };

        Ok(outcome)
    }

    // ========== Lifecycle ==========

    /// Stops the session and waits for its background tasks to finish.
    ///
    /// Closes the push channel if it is open. Commands already sent are not
    /// recalled; push channel commands issued afterwards fail with
    /// `Error::NotConnected`. Calling this more than once is harmless.
    pub async fn shutdown(&self) {
        self.shared.cancel.cancel();

        let tasks: Vec<_> = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Session task ended abnormally");
            }
        }

        tracing::info!(host = %self.config.host(), "Device session shut down");
    }

    /// Returns true once shutdown has been requested.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}

impl std::fmt::Debug for DeviceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("host", &self.config.host())
            .field("connection_state", &self.connection_state())
            .field("callbacks", &self.shared.callbacks)
            .finish_non_exhaustive()
    }
}

impl Subscribable for DeviceSession {
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_state_changed(callback)
    }

    fn on_connected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_connected(callback)
    }

    fn on_disconnected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.shared.callbacks.on_disconnected(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.callbacks.unsubscribe(id)
    }
}

/// Everything a consumer needs from a device: read, observe, command.
///
/// Implemented by [`DeviceSession`]; integration layers can depend on this
/// trait alone.
#[allow(async_fn_in_trait)]
pub trait DeviceControl {
    /// Returns a copy of the current state.
    fn state(&self) -> DeviceState;

    /// Registers a change listener.
    fn subscribe<F>(&self, on_change: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Executes a command.
    ///
    /// # Errors
    ///
    /// Returns an error if a push channel command cannot be sent.
    async fn dispatch(&self, command: Command) -> Result<CommandOutcome>;
}

impl DeviceControl for DeviceSession {
    fn state(&self) -> DeviceState {
        DeviceSession::state(self)
    }

    fn subscribe<F>(&self, on_change: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.on_state_changed(on_change)
    }

    async fn dispatch(&self, command: Command) -> Result<CommandOutcome> {
        DeviceSession::dispatch(self, command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unreachable_config() -> SessionConfig {
        // Port 9 (discard) is closed on test hosts.
        SessionConfig::new("127.0.0.1")
            .with_port(9)
            .with_reconnect_delay(Duration::from_millis(50))
            .with_poll_interval(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn empty_host_is_rejected() {
        let result = DeviceSession::start(SessionConfig::new(""));
        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::InvalidAddress(_)))
        ));
    }

    #[tokio::test]
    async fn push_commands_fail_when_disconnected() {
        let session = DeviceSession::start(unreachable_config()).unwrap();

        assert!(matches!(
            session.set_brightness(10).await,
            Err(Error::NotConnected)
        ));
        assert!(matches!(
            session.rotate(RotateDirection::Left).await,
            Err(Error::NotConnected)
        ));
        assert!(matches!(session.set_plugin(1_i64).await, Err(Error::NotConnected)));
        assert!(matches!(
            session.persist_plugin().await,
            Err(Error::NotConnected)
        ));
        assert!(matches!(
            session.dispatch(Command::PersistPlugin).await,
            Err(Error::NotConnected)
        ));

        session.shutdown().await;
    }

    #[tokio::test]
    async fn dispatch_sends_every_push_command_over_the_channel() {
        let session = DeviceSession::start(unreachable_config()).unwrap();

        for command in [
            Command::brightness(10).unwrap(),
            Command::Rotate(RotateDirection::Right),
            Command::plugin(2_i64),
            Command::PersistPlugin,
        ] {
            assert!(
                matches!(session.dispatch(command.clone()).await, Err(Error::NotConnected)),
                "{}",
                command.name()
            );
        }

        session.shutdown().await;
    }

    #[tokio::test]
    async fn validation_precedes_connection_check() {
        let session = DeviceSession::start(unreachable_config()).unwrap();

        assert!(matches!(session.set_brightness(256).await, Err(e) if e.is_validation()));
        assert!(matches!(session.set_brightness(-1).await, Err(e) if e.is_validation()));
        assert!(matches!(session.set_rotation("up").await, Err(e) if e.is_validation()));

        session.shutdown().await;
    }

    #[tokio::test]
    async fn initial_state_is_default() {
        let session = DeviceSession::start(unreachable_config()).unwrap();
        assert_eq!(session.state(), DeviceState::new());
        assert_eq!(*session.watch_state().borrow(), DeviceState::new());
        assert!(!session.is_connected());
        session.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_reaches_terminal_state() {
        let session = DeviceSession::start(unreachable_config()).unwrap();
        session.shutdown().await;

        assert!(session.is_shut_down());
        assert_eq!(session.connection_state(), ConnectionState::ShuttingDown);

        // Second call is a no-op
        session.shutdown().await;
        assert!(matches!(
            session.set_brightness(1).await,
            Err(Error::NotConnected)
        ));
    }

    #[tokio::test]
    async fn capability_trait_exposes_state() {
        async fn read_brightness(device: &impl DeviceControl) -> u8 {
            device.state().brightness().value()
        }

        let session = DeviceSession::start(unreachable_config()).unwrap();
        assert_eq!(read_brightness(&session).await, 0);
        session.shutdown().await;
    }
}
