// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of device sessions keyed by host.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::session::{DeviceSession, SessionConfig};

/// Registry of running device sessions.
///
/// Sessions are keyed by host. Commands that do not name a device are routed
/// to the only registered session, if there is exactly one.
///
/// # Examples
///
/// ```no_run
/// use obegraensad_sync::manager::SessionRegistry;
/// use obegraensad_sync::session::SessionConfig;
///
/// # async fn example() -> obegraensad_sync::Result<()> {
/// let registry = SessionRegistry::new();
/// registry.start(SessionConfig::new("192.168.1.60")).await?;
///
/// // With a single device the host may be omitted
/// let session = registry.get(None).await?;
/// session.start_schedule().await;
///
/// registry.shutdown_all().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<DeviceSession>>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Session Management
    // =========================================================================

    /// Starts a session for the configured host and registers it.
    ///
    /// If a session for the host is already registered, that session is
    /// returned and no new one is started.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be started.
    pub async fn start(&self, config: SessionConfig) -> Result<Arc<DeviceSession>> {
        let mut sessions = self.sessions.write().await;
        if let Some(existing) = sessions.get(config.host()) {
            tracing::debug!(host = %config.host(), "Session already registered");
            return Ok(Arc::clone(existing));
        }

        let host = config.host().to_string();
        let session = Arc::new(DeviceSession::start(config)?);
        sessions.insert(host, Arc::clone(&session));
        Ok(session)
    }

    /// Registers an already started session.
    ///
    /// Returns the session previously registered for the same host, which the
    /// caller is responsible for shutting down.
    pub async fn insert(&self, session: Arc<DeviceSession>) -> Option<Arc<DeviceSession>> {
        let host = session.host().to_string();
        self.sessions.write().await.insert(host, session)
    }

    /// Looks up a session.
    ///
    /// With `Some(host)` returns the session for that host. A host that is
    /// not registered falls back to the only registered session, if there is
    /// exactly one. With `None` returns the only registered session.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionNotFound` if the registry does not hold exactly
    /// one session and `host` does not name one of them.
    pub async fn get(&self, host: Option<&str>) -> Result<Arc<DeviceSession>> {
        let sessions = self.sessions.read().await;
        if let Some(session) = host.and_then(|host| sessions.get(host)) {
            return Ok(Arc::clone(session));
        }

        let mut iter = sessions.values();
        match (iter.next(), iter.next(), host) {
            (Some(only), None, Some(host)) => {
                tracing::debug!(
                    requested = %host,
                    host = %only.host(),
                    "Unknown host, using the only registered session"
                );
                Ok(Arc::clone(only))
            }
            (Some(only), None, None) => Ok(Arc::clone(only)),
            (_, _, Some(host)) => Err(Error::SessionNotFound(host.to_string())),
            (None, _, None) => Err(Error::SessionNotFound(
                "default device (no sessions registered)".to_string(),
            )),
            (Some(_), Some(_), None) => Err(Error::SessionNotFound(format!(
                "default device ({} sessions registered, host required)",
                sessions.len()
            ))),
        }
    }

    /// Unregisters a session without shutting it down.
    pub async fn remove(&self, host: &str) -> Option<Arc<DeviceSession>> {
        self.sessions.write().await.remove(host)
    }

    /// Shuts down and unregisters every session.
    pub async fn shutdown_all(&self) {
        let sessions: Vec<_> = self.sessions.write().await.drain().collect();
        for (host, session) in sessions {
            tracing::debug!(host = %host, "Shutting down session");
            session.shutdown().await;
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns the registered hosts.
    pub async fn hosts(&self) -> Vec<String> {
        self.sessions.read().await.keys().cloned().collect()
    }

    /// Returns the number of registered sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns true if no session is registered.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
