// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconnection supervisor for the push channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

use crate::error::ProtocolError;
use crate::protocol::websocket;
use crate::protocol::{WsReader, WsWriter};

use super::{ConnectionState, SessionConfig, Shared};

const MIN_KEEP_ALIVE: Duration = Duration::from_millis(1);

/// Why the receive loop returned.
enum ReceiveEnd {
    Cancelled,
    Dropped,
}

/// Keeps the push channel connected until the session is cancelled.
///
/// Every attempt is followed by the same fixed delay, with no retry limit.
pub(super) async fn run(shared: Arc<Shared>, config: SessionConfig) {
    let url = config.ws_url();

    loop {
        shared.set_connection(ConnectionState::Connecting);
        tracing::debug!(url = %url, "Connecting push channel");

        let attempt = tokio::select! {
            biased;
            () = shared.cancel.cancelled() => break,
            attempt = websocket::connect(&url, config.connect_timeout()) => attempt,
        };

        match attempt {
            Ok((writer, mut reader)) => {
                *shared.writer.lock().await = Some(writer);
                shared.set_connection(ConnectionState::Connected);
                tracing::info!(url = %url, "Push channel connected");
                shared
                    .callbacks
                    .dispatch_connected(&shared.store.snapshot());

                let end = receive(&shared, &mut reader, &config).await;

                let writer = take_writer(&shared).await;
                if let (Some(mut writer), ReceiveEnd::Cancelled) = (writer, &end) {
                    close_quietly(&mut writer, config.connect_timeout()).await;
                }
                shared.set_connection(ConnectionState::Disconnected);
                shared.callbacks.dispatch_disconnected();

                if matches!(end, ReceiveEnd::Cancelled) {
                    break;
                }
            }
            Err(e) => {
                shared.set_connection(ConnectionState::Disconnected);
                tracing::warn!(url = %url, error = %e, "Push channel connection failed");
            }
        }

        tracing::debug!(delay = ?config.reconnect_delay(), "Waiting before reconnecting");
        tokio::select! {
            biased;
            () = shared.cancel.cancelled() => break,
            () = tokio::time::sleep(config.reconnect_delay()) => {}
        }
    }

    take_writer(&shared).await;
    shared.set_connection(ConnectionState::ShuttingDown);
    tracing::info!(url = %url, "Push channel supervisor stopped");
}

/// Hands every text frame to the state store, in receive order.
///
/// Pings the device every keep-alive interval. The channel counts as dropped
/// when nothing at all arrives within one interval of a ping.
async fn receive(shared: &Shared, reader: &mut WsReader, config: &SessionConfig) -> ReceiveEnd {
    let period = config.keep_alive().max(MIN_KEEP_ALIVE);
    let mut keep_alive = tokio::time::interval_at(Instant::now() + period, period);
    keep_alive.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ping_sent: Option<Instant> = None;

    loop {
        let frame = tokio::select! {
            biased;
            () = shared.cancel.cancelled() => return ReceiveEnd::Cancelled,
            frame = reader.next_text() => Some(frame),
            _ = keep_alive.tick() => None,
        };

        let Some(frame) = frame else {
            if ping_sent.is_some_and(|sent| reader.last_activity() < sent) {
                tracing::warn!(
                    keep_alive = ?period,
                    "Device stopped answering, dropping push channel"
                );
                return ReceiveEnd::Dropped;
            }
            if let Err(e) = ping(shared, config.connect_timeout()).await {
                tracing::warn!(error = %e, "Keep-alive ping failed");
                return ReceiveEnd::Dropped;
            }
            ping_sent = Some(Instant::now());
            continue;
        };

        match frame {
            Some(Ok(text)) => match shared.store.handle_frame(&text) {
                Ok(changed) => tracing::trace!(changed, "Applied state frame"),
                Err(e) => tracing::warn!(error = %e, frame = %text, "Discarding malformed frame"),
            },
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Push channel receive failed");
                return ReceiveEnd::Dropped;
            }
            None => {
                tracing::info!("Push channel closed by device");
                return ReceiveEnd::Dropped;
            }
        }
    }
}

async fn ping(shared: &Shared, timeout: Duration) -> Result<(), ProtocolError> {
    websocket::within(timeout, async {
        match shared.writer.lock().await.as_mut() {
            Some(writer) => writer.ping().await,
            None => Ok(()),
        }
    })
    .await
}

/// Removes the writer from the session, giving up if the session is
/// cancelled while a command still holds it.
async fn take_writer(shared: &Shared) -> Option<WsWriter> {
    tokio::select! {
        biased;
        mut writer = shared.writer.lock() => writer.take(),
        () = shared.cancel.cancelled() => {
            tracing::debug!("Writer busy at shutdown, leaving it in place");
            None
        }
    }
}

async fn close_quietly(writer: &mut WsWriter, timeout: Duration) {
    match tokio::time::timeout(timeout, writer.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::debug!(error = %e, "Close frame not delivered"),
        Err(_) => tracing::debug!("Close frame timed out"),
    }
}
