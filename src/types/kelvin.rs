//! Color temperature control.

use serde::{Deserialize, Serialize};

use super::parse_number;
use crate::errors::ValidationError;

/// Color temperature in Kelvin.
///
/// Two contexts apply different bounds: white light accepts 2500K-9000K and
/// rejects anything else, while switch button backlights accept 1500K-9000K
/// and clamp anything else to the nearest bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kelvin {
    pub(crate) kelvin: u16,
}

impl Default for Kelvin {
    fn default() -> Self {
        Kelvin {
            kelvin: Self::NEUTRAL,
        }
    }
}

impl Kelvin {
    /// Temperature sent alongside colored light.
    pub const NEUTRAL: u16 = 3500;
    pub const WHITE_MIN: u16 = 2500;
    pub const BACKLIGHT_MIN: u16 = 1500;
    pub const MAX: u16 = 9000;

    /// Get the kelvin value.
    pub fn kelvin(&self) -> u16 {
        self.kelvin
    }

    /// Validate a white-light temperature.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifx_console::Kelvin;
    ///
    /// assert!(Kelvin::white(2499.0).is_err());
    /// assert_eq!(Kelvin::white(3500.4).unwrap().kelvin(), 3500);
    /// assert!(Kelvin::white(9001.0).is_err());
    /// ```
    pub fn white(value: f64) -> Result<Self, ValidationError> {
        Self::bounded("kelvin", value, Self::WHITE_MIN)
    }

    /// Validate a button backlight temperature.
    pub fn backlight(value: f64) -> Result<Self, ValidationError> {
        Self::bounded("backlight kelvin", value, Self::BACKLIGHT_MIN)
    }

    /// Clamp a button backlight temperature into range.
    ///
    /// Each side clamps to its own bound: values above 9000K become 9000K,
    /// not the lower bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifx_console::Kelvin;
    ///
    /// assert_eq!(Kelvin::backlight_clamped(1000.0).kelvin(), 1500);
    /// assert_eq!(Kelvin::backlight_clamped(12000.0).kelvin(), 9000);
    /// ```
    pub fn backlight_clamped(value: f64) -> Self {
        let clamped = value
            .round()
            .clamp(f64::from(Self::BACKLIGHT_MIN), f64::from(Self::MAX));
        Kelvin {
            kelvin: clamped as u16,
        }
    }

    /// Parse a white-light temperature token.
    pub fn parse_white(token: &str) -> Result<Self, ValidationError> {
        Self::white(parse_number("kelvin", token)?)
    }

    /// Wrap a raw protocol value without validation.
    pub fn from_raw(kelvin: u16) -> Self {
        Kelvin { kelvin }
    }

    fn bounded(field: &'static str, value: f64, min: u16) -> Result<Self, ValidationError> {
        let rounded = value.round();
        if !(f64::from(min)..=f64::from(Self::MAX)).contains(&rounded) {
            return Err(ValidationError::out_of_range(
                field,
                value,
                f64::from(min),
                f64::from(Self::MAX),
            ));
        }
        Ok(Kelvin {
            kelvin: rounded as u16,
        })
    }
}
