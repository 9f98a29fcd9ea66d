// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WebSocket push channel of the device.
//!
//! [`connect`] performs the handshake against `ws://<host>/ws` and returns
//! independent writer and reader halves, so the session can hold the writer
//! for outbound commands while the supervisor drives the reader.
//!
//! Outbound frames are JSON objects tagged by `event`:
//!
//! ```
//! use obegraensad_sync::protocol::OutboundEvent;
//! use obegraensad_sync::types::RotateDirection;
//!
//! let frame = OutboundEvent::Rotate { direction: RotateDirection::Left }.to_json().unwrap();
//! assert_eq!(frame, r#"{"event":"rotate","direction":"left"}"#);
//! ```

use std::future::Future;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::error::{ParseError, ProtocolError};
use crate::types::{Brightness, PluginId, RotateDirection};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A command frame sent to the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum OutboundEvent {
    /// Set the panel brightness.
    #[serde(rename = "brightness")]
    Brightness {
        /// New brightness.
        brightness: Brightness,
    },
    /// Switch to a plugin.
    #[serde(rename = "plugin")]
    Plugin {
        /// Plugin to activate.
        plugin: PluginId,
    },
    /// Rotate the display by a quarter-turn.
    #[serde(rename = "rotate")]
    Rotate {
        /// Rotation direction.
        direction: RotateDirection,
    },
    /// Persist the active plugin as the device default.
    #[serde(rename = "persist-plugin")]
    PersistPlugin,
}

impl OutboundEvent {
    /// Returns the `event` name of the frame.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Brightness { .. } => "brightness",
            Self::Plugin { .. } => "plugin",
            Self::Rotate { .. } => "rotate",
            Self::PersistPlugin => "persist-plugin",
        }
    }

    /// Encodes the frame as JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Write half of the push channel.
#[derive(Debug)]
pub struct WsWriter {
    sink: SplitSink<WsStream, WsMessage>,
}

impl WsWriter {
    /// Sends one command frame.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::WebSocket` if the connection is gone.
    pub async fn send(&mut self, event: &OutboundEvent) -> Result<(), ProtocolError> {
        let payload = event
            .to_json()
            .map_err(|e| ProtocolError::ConnectionFailed(e.to_string()))?;

        tracing::debug!(payload = %payload, "Sending WebSocket frame");

        self.sink.send(WsMessage::text(payload)).await?;
        Ok(())
    }

    /// Sends an empty ping. The peer answers with a pong once it reads it.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::WebSocket` if the connection is gone.
    pub async fn ping(&mut self) -> Result<(), ProtocolError> {
        self.sink.send(WsMessage::Ping(Vec::new())).await?;
        Ok(())
    }

    /// Sends a close frame and flushes the sink.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::WebSocket` if closing fails.
    pub async fn close(&mut self) -> Result<(), ProtocolError> {
        self.sink.close().await?;
        Ok(())
    }
}

/// Read half of the push channel.
#[derive(Debug)]
pub struct WsReader {
    stream: SplitStream<WsStream>,
    last_activity: Instant,
}

impl WsReader {
    /// Returns when the last frame of any kind arrived, or when the channel
    /// opened if nothing arrived yet.
    #[must_use]
    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// Waits for the next text frame.
    ///
    /// Returns `None` once the peer closes the connection or the stream
    /// ends. Binary and control frames are skipped but still count as
    /// activity.
    pub async fn next_text(&mut self) -> Option<Result<String, ProtocolError>> {
        loop {
            let frame = self.stream.next().await?;
            if frame.is_ok() {
                self.last_activity = Instant::now();
            }
            match frame {
                Ok(WsMessage::Text(text)) => return Some(Ok(text.to_string())),
                Ok(WsMessage::Close(frame)) => {
                    tracing::debug!(?frame, "WebSocket closed by peer");
                    return None;
                }
                Ok(WsMessage::Binary(data)) => {
                    tracing::debug!(len = data.len(), "Ignoring binary WebSocket frame");
                }
                Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_)) => {}
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Opens the push channel.
///
/// # Errors
///
/// - `ProtocolError::Timeout` if the handshake does not finish within `timeout`
/// - `ProtocolError::WebSocket` if the connection or handshake fails
pub async fn connect(url: &str, timeout: Duration) -> Result<(WsWriter, WsReader), ProtocolError> {
    let (stream, _response) = within(timeout, async {
        Ok(tokio_tungstenite::connect_async(url).await?)
    })
    .await?;

    let (sink, stream) = stream.split();
    let reader = WsReader {
        stream,
        last_activity: Instant::now(),
    };
    Ok((WsWriter { sink }, reader))
}

/// Runs a channel operation, failing with `ProtocolError::Timeout` once
/// `timeout` elapses.
///
/// # Errors
///
/// Returns the operation's own error, or `ProtocolError::Timeout`.
pub async fn within<T, F>(timeout: Duration, operation: F) -> Result<T, ProtocolError>
where
    F: Future<Output = Result<T, ProtocolError>>,
{
    tokio::time::timeout(timeout, operation).await.map_err(|_| {
        // Safe: channel timeouts are far below u64::MAX milliseconds
        #[allow(clippy::cast_possible_truncation)]
        let timeout_ms = timeout.as_millis() as u64;
        ProtocolError::Timeout(timeout_ms)
    })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_frame() {
        let frame = OutboundEvent::Brightness {
            brightness: Brightness::from(255),
        };
        assert_eq!(
            frame.to_json().unwrap(),
            r#"{"event":"brightness","brightness":255}"#
        );
    }

    #[test]
    fn plugin_frame() {
        let frame = OutboundEvent::Plugin {
            plugin: PluginId::new(7),
        };
        assert_eq!(frame.to_json().unwrap(), r#"{"event":"plugin","plugin":7}"#);
    }

    #[test]
    fn persist_plugin_frame_has_only_event() {
        let frame = OutboundEvent::PersistPlugin;
        assert_eq!(frame.to_json().unwrap(), r#"{"event":"persist-plugin"}"#);
        assert_eq!(frame.name(), "persist-plugin");
    }

    #[tokio::test(start_paused = true)]
    async fn within_reports_stalled_operation_as_timeout() {
        let stalled = std::future::pending::<Result<(), ProtocolError>>();
        let result = within(Duration::from_millis(250), stalled).await;
        assert!(matches!(result, Err(ProtocolError::Timeout(250))));
    }

    #[tokio::test]
    async fn within_passes_through_result() {
        let result = within(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);

        let result: Result<(), _> = within(Duration::from_secs(1), async {
            Err(ProtocolError::ConnectionFailed("reset".to_string()))
        })
        .await;
        assert!(matches!(result, Err(ProtocolError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn connect_to_closed_port_fails() {
        let result = connect("ws://127.0.0.1:9/ws", Duration::from_secs(2)).await;
        assert!(result.is_err());
    }
}
