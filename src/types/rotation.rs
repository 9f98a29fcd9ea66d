// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Display rotation types.
//!
//! The device reports its orientation as a number of quarter-turns and
//! accepts relative `left`/`right` rotation commands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Display orientation in quarter-turns, as reported by the device.
///
/// Values outside 0-3 are reduced modulo 4, so any reported value maps to a
/// valid orientation.
///
/// # Examples
///
/// ```
/// use obegraensad_sync::types::Rotation;
///
/// assert_eq!(Rotation::new(1).degrees(), 90);
/// assert_eq!(Rotation::new(3).degrees(), 270);
/// assert_eq!(Rotation::new(4).degrees(), 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rotation(u8);

impl Rotation {
    /// Creates a rotation from a quarter-turn count.
    #[must_use]
    pub const fn new(quarter_turns: u8) -> Self {
        Self(quarter_turns)
    }

    /// Returns the raw quarter-turn count as reported.
    #[must_use]
    pub const fn quarter_turns(&self) -> u8 {
        self.0
    }

    /// Returns the orientation in degrees (0, 90, 180 or 270).
    #[must_use]
    pub fn degrees(&self) -> u16 {
        u16::from(self.0) * 90 % 360
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Direction for a relative rotation command.
///
/// # Examples
///
/// ```
/// use obegraensad_sync::types::RotateDirection;
///
/// let dir: RotateDirection = "left".parse().unwrap();
/// assert_eq!(dir, RotateDirection::Left);
/// assert!("up".parse::<RotateDirection>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotateDirection {
    /// Rotate counter-clockwise.
    Left,
    /// Rotate clockwise.
    Right,
}

impl RotateDirection {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for RotateDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RotateDirection {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(ValueError::InvalidDirection(other.to_string())),
        }
    }
}
