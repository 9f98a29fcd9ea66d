// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device command definitions.
//!
//! A [`Command`] is a fully validated intent. Each command is routed to one
//! channel:
//!
//! | Command | Channel | Outcome |
//! |---------|---------|---------|
//! | [`Command::SetBrightness`] | WebSocket `brightness` | [`CommandOutcome::Sent`] |
//! | [`Command::Rotate`] | WebSocket `rotate` | [`CommandOutcome::Sent`] |
//! | [`Command::SetPlugin`] | WebSocket `plugin` | [`CommandOutcome::Sent`] |
//! | [`Command::PersistPlugin`] | WebSocket `persist-plugin` | [`CommandOutcome::Sent`] |
//! | [`Command::SetSchedule`] | `POST /api/schedule` | [`CommandOutcome::Completed`] |
//! | [`Command::ClearSchedule`] | `GET /api/schedule/clear` | [`CommandOutcome::Completed`] |
//! | [`Command::StartSchedule`] | `GET /api/schedule/start` | [`CommandOutcome::Completed`] |
//! | [`Command::StopSchedule`] | `GET /api/schedule/stop` | [`CommandOutcome::Completed`] |
//! | [`Command::ClearStorage`] | `GET /api/storage/clear` | [`CommandOutcome::Completed`] |
//! | [`Command::AddMessage`] | `GET /api/message` | [`CommandOutcome::Completed`] |
//! | [`Command::RemoveMessage`] | `GET /api/removemessage` | [`CommandOutcome::Completed`] |
//! | [`Command::FetchRawData`] | `GET /api/data` | [`CommandOutcome::Data`] |
//!
//! # Examples
//!
//! ```
//! use obegraensad_sync::command::Command;
//!
//! // Constructors validate raw input before anything is sent
//! assert!(Command::brightness(128).is_ok());
//! assert!(Command::brightness(256).is_err());
//! assert!(Command::rotate("left").unwrap().is_push());
//! assert!(Command::rotate("up").is_err());
//! ```

use crate::error::ValueError;
use crate::protocol::OutboundEvent;
use crate::types::{Brightness, Message, PluginId, RotateDirection, Schedule};

/// A command for the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set the panel brightness.
    SetBrightness(Brightness),
    /// Rotate the display one quarter-turn.
    Rotate(RotateDirection),
    /// Switch to a plugin.
    SetPlugin(PluginId),
    /// Persist the active plugin as the device default.
    PersistPlugin,
    /// Upload a schedule.
    SetSchedule(Schedule),
    /// Clear the schedule.
    ClearSchedule,
    /// Start the schedule.
    StartSchedule,
    /// Stop the schedule.
    StopSchedule,
    /// Clear persistent storage.
    ClearStorage,
    /// Queue a text message.
    AddMessage(Message),
    /// Remove a queued message.
    RemoveMessage(u16),
    /// Download the raw display buffer.
    FetchRawData,
}

impl Command {
    /// Builds a brightness command from raw input.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` unless `0 <= value <= 255`.
    pub fn brightness(value: i64) -> Result<Self, ValueError> {
        Brightness::new(value).map(Self::SetBrightness)
    }

    /// Builds a rotation command from a direction name.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidDirection` unless `direction` is `left` or `right`.
    pub fn rotate(direction: &str) -> Result<Self, ValueError> {
        direction.parse().map(Self::Rotate)
    }

    /// Builds a plugin switch command. The device validates the id.
    #[must_use]
    pub fn plugin(id: impl Into<PluginId>) -> Self {
        Self::SetPlugin(id.into())
    }

    /// Returns the push frame for commands sent over the WebSocket.
    #[must_use]
    pub fn to_event(&self) -> Option<OutboundEvent> {
        match self {
            Self::SetBrightness(brightness) => Some(OutboundEvent::Brightness {
                brightness: *brightness,
            }),
            Self::Rotate(direction) => Some(OutboundEvent::Rotate {
                direction: *direction,
            }),
            Self::SetPlugin(plugin) => Some(OutboundEvent::Plugin { plugin: *plugin }),
            Self::PersistPlugin => Some(OutboundEvent::PersistPlugin),
            _ => None,
        }
    }

    /// Returns `true` if the command travels over the push channel.
    #[must_use]
    pub fn is_push(&self) -> bool {
        self.to_event().is_some()
    }

    /// Returns a short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetBrightness(_) => "set_brightness",
            Self::Rotate(_) => "rotate",
            Self::SetPlugin(_) => "set_plugin",
            Self::PersistPlugin => "persist_plugin",
            Self::SetSchedule(_) => "set_schedule",
            Self::ClearSchedule => "clear_schedule",
            Self::StartSchedule => "start_schedule",
            Self::StopSchedule => "stop_schedule",
            Self::ClearStorage => "clear_storage",
            Self::AddMessage(_) => "add_message",
            Self::RemoveMessage(_) => "remove_message",
            Self::FetchRawData => "fetch_raw_data",
        }
    }
}

/// Result of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The push frame was written to the WebSocket.
    Sent,
    /// An HTTP command finished; `true` on `200 OK`.
    Completed(bool),
    /// Raw data download result; `None` on any failure.
    Data(Option<Vec<u8>>),
}

impl CommandOutcome {
    /// Returns `true` if the command reached the device successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Sent => true,
            Self::Completed(ok) => *ok,
            Self::Data(data) => data.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_commands_map_to_events() {
        assert_eq!(
            Command::brightness(10).unwrap().to_event(),
            Some(OutboundEvent::Brightness {
                brightness: Brightness::from(10)
            })
        );
        assert_eq!(
            Command::PersistPlugin.to_event(),
            Some(OutboundEvent::PersistPlugin)
        );
        assert_eq!(
            Command::plugin(3_i64).to_event(),
            Some(OutboundEvent::Plugin {
                plugin: PluginId::new(3)
            })
        );
    }

    #[test]
    fn http_commands_have_no_event() {
        for command in [
            Command::ClearSchedule,
            Command::StartSchedule,
            Command::StopSchedule,
            Command::ClearStorage,
            Command::RemoveMessage(1),
            Command::FetchRawData,
        ] {
            assert!(!command.is_push(), "{}", command.name());
        }
    }

    #[test]
    fn brightness_validation() {
        assert!(Command::brightness(0).is_ok());
        assert!(Command::brightness(255).is_ok());
        assert!(Command::brightness(-1).is_err());
        assert!(Command::brightness(256).is_err());
    }

    #[test]
    fn rotate_validation() {
        assert_eq!(
            Command::rotate("right"),
            Ok(Command::Rotate(RotateDirection::Right))
        );
        assert_eq!(
            Command::rotate("down"),
            Err(ValueError::InvalidDirection("down".to_string()))
        );
    }

    #[test]
    fn outcome_success() {
        assert!(CommandOutcome::Sent.is_success());
        assert!(!CommandOutcome::Completed(false).is_success());
        assert!(CommandOutcome::Data(Some(vec![1])).is_success());
        assert!(!CommandOutcome::Data(None).is_success());
    }
}
