// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP API of the device.
//!
//! Every endpoint lives under `http://<host>/api`. Command helpers are soft:
//! a transport error, a timeout or any status other than `200 OK` is logged
//! and reported as `false` (or `None` for binary data). Only
//! [`HttpClient::probe_info`] returns a typed error, since setup validation
//! needs to know why a device was rejected.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{Map, Value};

use crate::error::{Error, ParseError, ProtocolError};
use crate::types::{Brightness, Message, Schedule};

/// HTTP client for the device REST API.
///
/// # Examples
///
/// ```no_run
/// use obegraensad_sync::protocol::HttpClient;
///
/// # async fn example() -> obegraensad_sync::Result<()> {
/// let client = HttpClient::new("192.168.1.60")?;
/// if client.start_schedule().await {
///     println!("schedule started");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    request_timeout: Duration,
    data_timeout: Duration,
}

impl HttpClient {
    /// Default timeout for command requests.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default timeout for the binary data download.
    pub const DEFAULT_DATA_TIMEOUT: Duration = Duration::from_secs(15);
    /// Timeout for the identity probe.
    pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a client for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - Hostname or IP address, optionally with a port, or a full
    ///   `http://` URL
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "host is required".to_string(),
            ));
        }

        let origin = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("http://{host}")
        };

        let client = Client::builder().build().map_err(ProtocolError::Http)?;

        Ok(Self {
            base_url: format!("{origin}/api"),
            client,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            data_timeout: Self::DEFAULT_DATA_TIMEOUT,
        })
    }

    /// Sets the timeout for command requests.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the timeout for the binary data download.
    #[must_use]
    pub fn with_data_timeout(mut self, timeout: Duration) -> Self {
        self.data_timeout = timeout;
        self
    }

    /// Returns the API base URL (`http://<host>/api`).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Builds the URL for the message endpoint.
    ///
    /// Parameter order is fixed; `graph` is appended only when present.
    fn message_url(&self, message: &Message) -> String {
        let mut url = format!(
            "{}?text={}&repeat={}&id={}&delay={}&miny={}&maxy={}",
            self.endpoint("message"),
            urlencoding::encode(message.text()),
            message.repeat(),
            message.id(),
            message.delay(),
            message.min_y(),
            message.max_y(),
        );
        if let Some(graph) = message.graph() {
            url.push_str("&graph=");
            url.push_str(&graph.to_csv());
        }
        url
    }

    // ========== Schedule ==========

    /// Uploads a schedule (`POST /api/schedule`, form field `schedule`).
    pub async fn set_schedule(&self, schedule: &Schedule) -> bool {
        let request = self
            .client
            .post(self.endpoint("schedule"))
            .form(&[("schedule", schedule.as_str())]);
        self.soft("set_schedule", request).await
    }

    /// Clears the schedule (`GET /api/schedule/clear`).
    pub async fn clear_schedule(&self) -> bool {
        self.soft_get("clear_schedule", "schedule/clear").await
    }

    /// Starts the schedule (`GET /api/schedule/start`).
    pub async fn start_schedule(&self) -> bool {
        self.soft_get("start_schedule", "schedule/start").await
    }

    /// Stops the schedule (`GET /api/schedule/stop`).
    pub async fn stop_schedule(&self) -> bool {
        self.soft_get("stop_schedule", "schedule/stop").await
    }

    // ========== Messages ==========

    /// Queues a text message (`GET /api/message`).
    pub async fn add_message(&self, message: &Message) -> bool {
        let request = self.client.get(self.message_url(message));
        self.soft("add_message", request).await
    }

    /// Removes a queued message (`GET /api/removemessage?id=<id>`).
    pub async fn remove_message(&self, id: u16) -> bool {
        let url = format!("{}?id={id}", self.endpoint("removemessage"));
        self.soft("remove_message", self.client.get(url)).await
    }

    // ========== Storage & data ==========

    /// Clears persistent storage on the device (`GET /api/storage/clear`).
    pub async fn clear_storage(&self) -> bool {
        self.soft_get("clear_storage", "storage/clear").await
    }

    /// Downloads the raw display buffer (`GET /api/data`).
    ///
    /// Returns the exact response body on `200 OK`, `None` otherwise.
    pub async fn fetch_raw_data(&self) -> Option<Vec<u8>> {
        let url = self.endpoint("data");
        let result = async {
            let response = self.execute(self.client.get(&url), self.data_timeout).await?;
            let body = response.bytes().await.map_err(ProtocolError::Http)?;
            Ok::<_, ProtocolError>(body.to_vec())
        }
        .await;

        match result {
            Ok(body) => {
                tracing::debug!(url = %url, bytes = body.len(), "Fetched raw data");
                Some(body)
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Failed to fetch raw data");
                None
            }
        }
    }

    // ========== Probe ==========

    /// Checks that the host is a compatible device (`GET /api/info`).
    ///
    /// # Errors
    ///
    /// - `ProtocolError` if the request fails or the status is not `200 OK`
    /// - `ParseError` if the body is not a JSON object with a `brightness` field
    pub async fn probe_info(&self) -> Result<DeviceInfo, Error> {
        let url = self.endpoint("info");
        tracing::debug!(url = %url, "Probing device");

        let response = self
            .execute(self.client.get(&url), Self::PROBE_TIMEOUT)
            .await?;
        let body = response.text().await.map_err(ProtocolError::Http)?;

        DeviceInfo::from_json(&body).map_err(Error::Parse)
    }

    // ========== Internals ==========

    /// Sends a request and requires `200 OK`.
    async fn execute(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<reqwest::Response, ProtocolError> {
        let response = request.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                // Safe: configured timeouts are far below u64::MAX milliseconds
                #[allow(clippy::cast_possible_truncation)]
                let timeout_ms = timeout.as_millis() as u64;
                ProtocolError::Timeout(timeout_ms)
            } else {
                ProtocolError::Http(e)
            }
        })?;

        if response.status() != StatusCode::OK {
            return Err(ProtocolError::Status(response.status().as_u16()));
        }

        Ok(response)
    }

    async fn soft_get(&self, operation: &'static str, path: &str) -> bool {
        let request = self.client.get(self.endpoint(path));
        self.soft(operation, request).await
    }

    /// Runs a command request, folding every failure into `false`.
    async fn soft(&self, operation: &'static str, request: RequestBuilder) -> bool {
        match self.execute(request, self.request_timeout).await {
            Ok(_) => {
                tracing::debug!(operation, "HTTP command succeeded");
                true
            }
            Err(e) => {
                tracing::debug!(operation, error = %e, "HTTP command failed");
                false
            }
        }
    }
}

/// Identity information returned by `GET /api/info`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    fields: Map<String, Value>,
}

impl DeviceInfo {
    /// Parses an info response body.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the body is not a JSON object containing
    /// `brightness`.
    pub fn from_json(body: &str) -> Result<Self, ParseError> {
        let Value::Object(fields) = serde_json::from_str::<Value>(body)? else {
            return Err(ParseError::UnexpectedFormat(
                "device info is not a JSON object".to_string(),
            ));
        };
        if !fields.contains_key("brightness") {
            return Err(ParseError::MissingField("brightness".to_string()));
        }
        Ok(Self { fields })
    }

    /// Brightness reported by the device, if it is a valid raw value.
    #[must_use]
    pub fn brightness(&self) -> Option<Brightness> {
        self.fields
            .get("brightness")
            .and_then(Value::as_i64)
            .and_then(|v| Brightness::new(v).ok())
    }

    /// Returns any other field of the info document.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Graph;

    #[test]
    fn base_url_from_host() {
        let client = HttpClient::new("192.168.1.60").unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.60/api");
    }

    #[test]
    fn base_url_from_url() {
        let client = HttpClient::new("http://127.0.0.1:8080/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080/api");
    }

    #[test]
    fn empty_host_is_rejected() {
        assert!(matches!(
            HttpClient::new(" "),
            Err(ProtocolError::InvalidAddress(_))
        ));
    }

    #[test]
    fn message_url_with_graph() {
        let client = HttpClient::new("10.0.0.2").unwrap();
        let message = Message::builder("hi")
            .graph(Graph::new(vec![1, 2, 3]))
            .build()
            .unwrap();

        assert_eq!(
            client.message_url(&message),
            "http://10.0.0.2/api/message?text=hi&repeat=1&id=0&delay=50&miny=0&maxy=15&graph=1,2,3"
        );
    }

    #[test]
    fn message_url_without_graph_encodes_text() {
        let client = HttpClient::new("10.0.0.2").unwrap();
        let message = Message::builder("a b&c")
            .repeat(3)
            .id(65535)
            .delay(0)
            .min_y(-5)
            .max_y(20)
            .build()
            .unwrap();

        assert_eq!(
            client.message_url(&message),
            "http://10.0.0.2/api/message?text=a%20b%26c&repeat=3&id=65535&delay=0&miny=-5&maxy=20"
        );
    }

    #[test]
    fn default_timeouts() {
        let client = HttpClient::new("host").unwrap();
        assert_eq!(client.request_timeout, Duration::from_secs(10));
        assert_eq!(client.data_timeout, Duration::from_secs(15));
    }

    #[test]
    fn device_info_requires_brightness() {
        assert!(matches!(
            DeviceInfo::from_json(r#"{"name": "panel"}"#),
            Err(ParseError::MissingField(_))
        ));
        assert!(matches!(
            DeviceInfo::from_json("[]"),
            Err(ParseError::UnexpectedFormat(_))
        ));

        let info = DeviceInfo::from_json(r#"{"brightness": 80, "rotation": 1}"#).unwrap();
        assert_eq!(info.brightness(), Some(Brightness::from(80)));
        assert_eq!(info.get("rotation"), Some(&Value::from(1)));
    }
}
