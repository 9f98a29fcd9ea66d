// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type for the LED matrix.
//!
//! The device uses a raw 8-bit brightness scale (0-255). This type keeps
//! caller-supplied values inside that range before anything is sent.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Raw panel brightness (0-255).
///
/// # Examples
///
/// ```
/// use obegraensad_sync::types::Brightness;
///
/// let b = Brightness::new(128).unwrap();
/// assert_eq!(b.value(), 128);
///
/// // Out-of-range values are rejected
/// assert!(Brightness::new(256).is_err());
/// assert!(Brightness::new(-1).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Brightness(u8);

impl Brightness {
    /// Panel off.
    pub const MIN: Self = Self(0);

    /// Full brightness.
    pub const MAX: Self = Self(255);

    /// Creates a brightness value from any integer.
    ///
    /// Accepts a wide integer so that callers forwarding untrusted input get
    /// a range error instead of a silent truncation.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the value is outside 0-255.
    pub fn new(value: i64) -> Result<Self, ValueError> {
        u8::try_from(value)
            .map(Self)
            .map_err(|_| ValueError::OutOfRange {
                min: 0,
                max: 255,
                actual: value,
            })
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns the brightness as a percentage, rounded to one decimal.
    ///
    /// # Examples
    ///
    /// ```
    /// use obegraensad_sync::types::Brightness;
    ///
    /// assert!((Brightness::MAX.as_percent() - 100.0).abs() < f32::EPSILON);
    /// assert!((Brightness::new(128).unwrap().as_percent() - 50.2).abs() < 0.01);
    /// ```
    #[must_use]
    pub fn as_percent(&self) -> f32 {
        (f32::from(self.0) / 255.0 * 1000.0).round() / 10.0
    }
}

impl From<u8> for Brightness {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for Brightness {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
