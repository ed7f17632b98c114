//! Saturation and brightness levels.

use serde::{Deserialize, Serialize};

use super::{PROTOCOL_MAX, parse_number};
use crate::errors::ValidationError;

/// A percentage channel (saturation or brightness) scaled to 0-65535.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub(crate) units: u16,
}

impl Level {
    const MAX_PERCENT: f64 = 100.0;
    /// Full scale used by the white command; kept as the device firmware
    /// has always received it from this console.
    const LEGACY_WHITE_SCALE: f64 = 65365.0;

    /// Encode a percentage.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifx_console::Level;
    ///
    /// assert_eq!(Level::from_percent("brightness", 100.0).unwrap().units(), 65535);
    /// assert_eq!(Level::from_percent("brightness", 50.0).unwrap().units(), 32768);
    /// assert!(Level::from_percent("saturation", 100.5).is_err());
    /// ```
    pub fn from_percent(field: &'static str, percent: f64) -> Result<Self, ValidationError> {
        Self::scaled(field, percent, PROTOCOL_MAX)
    }

    /// Encode a white-command brightness with the legacy 65365 full scale.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifx_console::Level;
    ///
    /// assert_eq!(Level::legacy_white(100.0).unwrap().units(), 65365);
    /// ```
    pub fn legacy_white(percent: f64) -> Result<Self, ValidationError> {
        Self::scaled("brightness", percent, Self::LEGACY_WHITE_SCALE)
    }

    /// Parse an operator token as a percentage.
    pub fn parse(field: &'static str, token: &str) -> Result<Self, ValidationError> {
        Self::from_percent(field, parse_number(field, token)?)
    }

    /// Wrap a raw protocol value.
    pub fn from_units(units: u16) -> Self {
        Level { units }
    }

    /// Get the protocol value.
    pub fn units(&self) -> u16 {
        self.units
    }

    /// Decode back to a whole percentage.
    pub fn percent(&self) -> u8 {
        (f64::from(self.units) * Self::MAX_PERCENT / PROTOCOL_MAX).round() as u8
    }

    fn scaled(field: &'static str, percent: f64, scale: f64) -> Result<Self, ValidationError> {
        if !(0.0..=Self::MAX_PERCENT).contains(&percent) {
            return Err(ValidationError::out_of_range(
                field,
                percent,
                0.0,
                Self::MAX_PERCENT,
            ));
        }
        Ok(Level {
            units: (percent * scale / Self::MAX_PERCENT).round() as u16,
        })
    }
}
