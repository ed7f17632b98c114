//! Firmware effects for multizone strips.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::errors::ValidationError;

/// Firmware effect running on a multizone device.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum EffectKind {
    Off = 0,
    Move = 1,
}

impl EffectKind {
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        token
            .parse()
            .map_err(|_| ValidationError::unknown_token("effect", token, "off, move"))
    }
}

/// Travel direction of a moving effect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum EffectDirection {
    Right = 0,
    Left = 1,
}

impl EffectDirection {
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        token
            .parse()
            .map_err(|_| ValidationError::unknown_token("direction", token, "left, right"))
    }
}

/// Settings for starting or stopping a multizone firmware effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultizoneEffectRequest {
    pub kind: EffectKind,
    pub speed_ms: u32,
    pub direction: EffectDirection,
}

impl MultizoneEffectRequest {
    /// Speed of a move effect started from the console.
    pub const DEFAULT_SPEED_MS: u32 = 3000;

    /// Stop whatever effect is running.
    pub fn stop() -> Self {
        MultizoneEffectRequest {
            kind: EffectKind::Off,
            speed_ms: Self::DEFAULT_SPEED_MS,
            direction: EffectDirection::Right,
        }
    }

    /// Parse `<off|move> <left|right>`, reporting the first bad token.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifx_console::{EffectDirection, EffectKind, MultizoneEffectRequest};
    ///
    /// let request = MultizoneEffectRequest::parse("Move", "left").unwrap();
    /// assert_eq!(request.kind, EffectKind::Move);
    /// assert_eq!(request.direction, EffectDirection::Left);
    /// assert!(MultizoneEffectRequest::parse("flame", "left").is_err());
    /// assert!(MultizoneEffectRequest::parse("move", "up").is_err());
    /// ```
    pub fn parse(effect: &str, direction: &str) -> Result<Self, ValidationError> {
        Ok(MultizoneEffectRequest {
            kind: EffectKind::parse(effect)?,
            speed_ms: Self::DEFAULT_SPEED_MS,
            direction: EffectDirection::parse(direction)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_uppercase() {
        assert_eq!(EffectKind::Move.to_string(), "MOVE");
        assert_eq!(EffectDirection::Left.to_string(), "LEFT");
    }

    #[test]
    fn test_stop_request() {
        assert_eq!(MultizoneEffectRequest::stop().kind, EffectKind::Off);
    }
}
