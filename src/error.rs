// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `obegraensad_sync` library.
//!
//! The hierarchy mirrors the failure classes of a device session: invalid
//! command input, transport failures, malformed payloads, and commands issued
//! while the push channel is down.
//!
//! HTTP command helpers never surface these errors; they report a plain
//! success flag instead. Errors are returned by push-channel commands, by
//! value constructors, and by the device probe.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The WebSocket channel is not connected.
    #[error("device is not connected")]
    NotConnected,

    /// No session is registered for the requested host.
    #[error("no session found for {0}")]
    SessionNotFound(String),
}

impl Error {
    /// Returns `true` for errors caused by invalid caller input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Returns `true` for errors caused by the push channel being unavailable.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::NotConnected | Self::Protocol(_))
    }
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values. They are always raised before any network I/O.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// A rotation direction other than `left` or `right` was provided.
    #[error("invalid rotation direction: {0:?} (expected \"left\" or \"right\")")]
    InvalidDirection(String),

    /// A message text was empty.
    #[error("message text must not be empty")]
    EmptyText,

    /// A graph definition could not be parsed into integers.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// A schedule payload was null or blank.
    #[error("schedule payload must not be empty")]
    EmptySchedule,
}

/// Errors related to protocol communication (HTTP/WebSocket).
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket connection or communication failed.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The device answered with a non-success status code.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing device payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),

    /// Unexpected payload format.
    #[error("unexpected payload format: {0}")]
    UnexpectedFormat(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
