//! Power state for lights and relays.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Power state for a light or a switch relay.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// Turn the output on
    On,
    /// Turn the output off
    Off,
}

impl PowerState {
    /// Relay level reported for an energised relay.
    pub const LEVEL_ON: u16 = 65535;

    /// Parse `on`/`1`/`true` or `off`/`0`/`false`, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifx_console::PowerState;
    ///
    /// assert_eq!(PowerState::parse("power", "ON").unwrap(), PowerState::On);
    /// assert_eq!(PowerState::parse("power", "0").unwrap(), PowerState::Off);
    /// assert!(PowerState::parse("power", "maybe").is_err());
    /// ```
    pub fn parse(field: &'static str, token: &str) -> Result<Self, ValidationError> {
        match token.to_ascii_lowercase().as_str() {
            "on" | "1" | "true" => Ok(PowerState::On),
            "off" | "0" | "false" => Ok(PowerState::Off),
            _ => Err(ValidationError::unknown_token(
                field,
                token,
                "on, 1, true, off, 0, false",
            )),
        }
    }

    pub fn is_on(self) -> bool {
        matches!(self, PowerState::On)
    }

    /// Interpret a relay level; only full scale counts as on.
    pub fn from_level(level: u16) -> Self {
        if level == Self::LEVEL_ON {
            PowerState::On
        } else {
            PowerState::Off
        }
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerState::On => write!(f, "On"),
            PowerState::Off => write!(f, "Off"),
        }
    }
}
