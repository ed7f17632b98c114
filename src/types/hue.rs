//! Hue angle representation.

use serde::{Deserialize, Serialize};

use super::{PROTOCOL_MAX, parse_number};
use crate::errors::ValidationError;

/// Hue on the color wheel.
///
/// The operator speaks degrees (0-360); the device stores the angle as a
/// 16-bit fraction of a full turn (0-65535).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hue {
    pub(crate) units: u16,
}

impl Hue {
    const MAX_DEGREES: f64 = 360.0;

    /// Encode an angle in degrees.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifx_console::Hue;
    ///
    /// assert_eq!(Hue::from_degrees(0.0).unwrap().units(), 0);
    /// assert_eq!(Hue::from_degrees(120.0).unwrap().units(), 21845);
    /// assert_eq!(Hue::from_degrees(360.0).unwrap().units(), 65535);
    /// assert!(Hue::from_degrees(361.0).is_err());
    /// assert!(Hue::from_degrees(-1.0).is_err());
    /// ```
    pub fn from_degrees(degrees: f64) -> Result<Self, ValidationError> {
        if !(0.0..=Self::MAX_DEGREES).contains(&degrees) {
            return Err(ValidationError::out_of_range(
                "hue",
                degrees,
                0.0,
                Self::MAX_DEGREES,
            ));
        }
        Ok(Hue {
            units: (degrees * PROTOCOL_MAX / Self::MAX_DEGREES).round() as u16,
        })
    }

    /// Parse an operator token in degrees.
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        Self::from_degrees(parse_number("hue", token)?)
    }

    /// Wrap a raw protocol value.
    pub fn from_units(units: u16) -> Self {
        Hue { units }
    }

    /// Get the protocol value.
    pub fn units(&self) -> u16 {
        self.units
    }

    /// Decode back to whole degrees.
    pub fn degrees(&self) -> u16 {
        (f64::from(self.units) * Self::MAX_DEGREES / PROTOCOL_MAX).round() as u16
    }
}
