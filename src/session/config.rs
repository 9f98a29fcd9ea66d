// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session configuration.

use std::time::Duration;

/// Connection parameters for a device session.
///
/// HTTP and WebSocket normally share one port. Either can be overridden for
/// devices behind a proxy or for tests.
///
/// # Examples
///
/// ```
/// use obegraensad_sync::session::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig::new("192.168.1.60");
/// assert_eq!(config.ws_url(), "ws://192.168.1.60/ws");
/// assert_eq!(config.http_base_url(), "http://192.168.1.60");
///
/// let config = SessionConfig::new("matrix.local")
///     .with_port(8080)
///     .with_reconnect_delay(Duration::from_secs(1));
/// assert_eq!(config.ws_url(), "ws://matrix.local:8080/ws");
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    host: String,
    http_port: u16,
    ws_port: u16,
    reconnect_delay: Duration,
    poll_interval: Duration,
    connect_timeout: Duration,
    request_timeout: Duration,
    data_timeout: Duration,
    keep_alive: Duration,
}

impl SessionConfig {
    /// Default port for both channels.
    pub const DEFAULT_PORT: u16 = 80;
    /// Fixed wait between reconnection attempts.
    pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);
    /// Change detector polling interval.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
    /// Upper bound on one WebSocket handshake.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Timeout for HTTP commands.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    /// Timeout for the raw data download.
    pub const DEFAULT_DATA_TIMEOUT: Duration = Duration::from_secs(15);
    /// Ping interval on the push channel.
    ///
    /// The channel is dropped when nothing arrives within one interval of a
    /// ping.
    pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(20);

    /// Creates a configuration for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the device
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            http_port: Self::DEFAULT_PORT,
            ws_port: Self::DEFAULT_PORT,
            reconnect_delay: Self::DEFAULT_RECONNECT_DELAY,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            data_timeout: Self::DEFAULT_DATA_TIMEOUT,
            keep_alive: Self::DEFAULT_KEEP_ALIVE,
        }
    }

    /// Sets the port for both channels.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self.ws_port = port;
        self
    }

    /// Sets the HTTP port only.
    #[must_use]
    pub fn with_http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    /// Sets the WebSocket port only.
    #[must_use]
    pub fn with_ws_port(mut self, port: u16) -> Self {
        self.ws_port = port;
        self
    }

    /// Sets the wait between reconnection attempts.
    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Sets the change detector polling interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the WebSocket handshake timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the HTTP command timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the raw data download timeout.
    #[must_use]
    pub fn with_data_timeout(mut self, timeout: Duration) -> Self {
        self.data_timeout = timeout;
        self
    }

    /// Sets the push channel ping interval.
    #[must_use]
    pub fn with_keep_alive(mut self, interval: Duration) -> Self {
        self.keep_alive = interval;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the HTTP port.
    #[must_use]
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Returns the WebSocket port.
    #[must_use]
    pub fn ws_port(&self) -> u16 {
        self.ws_port
    }

    /// Returns the reconnection delay.
    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        self.reconnect_delay
    }

    /// Returns the polling interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the handshake timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the HTTP command timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the raw data download timeout.
    #[must_use]
    pub fn data_timeout(&self) -> Duration {
        self.data_timeout
    }

    /// Returns the push channel ping interval.
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        self.keep_alive
    }

    /// Returns the HTTP origin, e.g. `http://192.168.1.60:8080`.
    #[must_use]
    pub fn http_base_url(&self) -> String {
        format!("http://{}", authority(&self.host, self.http_port))
    }

    /// Returns the push channel URL, e.g. `ws://192.168.1.60/ws`.
    #[must_use]
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", authority(&self.host, self.ws_port))
    }
}

fn authority(host: &str, port: u16) -> String {
    if port == SessionConfig::DEFAULT_PORT {
        host.to_string()
    } else {
        format!("{host}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = SessionConfig::new("192.168.1.60");
        assert_eq!(config.host(), "192.168.1.60");
        assert_eq!(config.http_port(), 80);
        assert_eq!(config.ws_port(), 80);
        assert_eq!(config.reconnect_delay(), Duration::from_secs(5));
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.data_timeout(), Duration::from_secs(15));
        assert_eq!(config.keep_alive(), Duration::from_secs(20));
    }

    #[test]
    fn default_port_is_omitted() {
        let config = SessionConfig::new("matrix.local");
        assert_eq!(config.http_base_url(), "http://matrix.local");
        assert_eq!(config.ws_url(), "ws://matrix.local/ws");
    }

    #[test]
    fn with_port_sets_both_channels() {
        let config = SessionConfig::new("10.0.0.2").with_port(8080);
        assert_eq!(config.http_base_url(), "http://10.0.0.2:8080");
        assert_eq!(config.ws_url(), "ws://10.0.0.2:8080/ws");
    }

    #[test]
    fn ports_can_differ() {
        let config = SessionConfig::new("10.0.0.2")
            .with_http_port(8080)
            .with_ws_port(81);
        assert_eq!(config.http_base_url(), "http://10.0.0.2:8080");
        assert_eq!(config.ws_url(), "ws://10.0.0.2:81/ws");
    }

    #[test]
    fn with_timings() {
        let config = SessionConfig::new("10.0.0.2")
            .with_reconnect_delay(Duration::from_millis(100))
            .with_poll_interval(Duration::from_millis(20))
            .with_connect_timeout(Duration::from_secs(1))
            .with_request_timeout(Duration::from_secs(2))
            .with_data_timeout(Duration::from_secs(3))
            .with_keep_alive(Duration::from_millis(200));
        assert_eq!(config.reconnect_delay(), Duration::from_millis(100));
        assert_eq!(config.poll_interval(), Duration::from_millis(20));
        assert_eq!(config.connect_timeout(), Duration::from_secs(1));
        assert_eq!(config.request_timeout(), Duration::from_secs(2));
        assert_eq!(config.data_timeout(), Duration::from_secs(3));
        assert_eq!(config.keep_alive(), Duration::from_millis(200));
    }
}
