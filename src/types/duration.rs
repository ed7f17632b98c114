//! Durations for HEV cycles, haptics and effect telemetry.

use serde::{Deserialize, Serialize};

use super::parse_integer;
use crate::errors::ValidationError;

/// Convert a millisecond count to seconds for display.
pub fn ms_to_secs(ms: u32) -> f64 {
    f64::from(ms) / 1e3
}

/// Convert a nanosecond count to seconds for display.
pub fn ns_to_secs(ns: u64) -> f64 {
    ns as f64 / 1e9
}

/// Request to start or abort an HEV cleaning cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HevCycleRequest {
    pub enable: bool,
    pub duration_s: u32,
}

impl HevCycleRequest {
    /// Parse whole seconds; a negative value aborts the running cycle.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifx_console::HevCycleRequest;
    ///
    /// let start = HevCycleRequest::parse("7200").unwrap();
    /// assert!(start.enable);
    /// assert_eq!(start.duration_s, 7200);
    ///
    /// let abort = HevCycleRequest::parse("-1").unwrap();
    /// assert!(!abort.enable);
    /// assert_eq!(abort.duration_s, 0);
    /// ```
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        let seconds = parse_integer("duration", token)?;
        if seconds < 0 {
            return Ok(HevCycleRequest {
                enable: false,
                duration_s: 0,
            });
        }
        let duration_s = u32::try_from(seconds).map_err(|_| {
            ValidationError::out_of_range("duration", seconds as f64, 0.0, f64::from(u32::MAX))
        })?;
        Ok(HevCycleRequest {
            enable: true,
            duration_s,
        })
    }
}

/// Default HEV cycle settings: indication flag and duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HevConfigRequest {
    pub indication: bool,
    pub duration_s: u32,
}

impl HevConfigRequest {
    pub fn parse(indication: &str, duration: &str) -> Result<Self, ValidationError> {
        let indication = parse_integer("indication", indication)? != 0;
        let seconds = parse_integer("duration", duration)?;
        let duration_s = u32::try_from(seconds).map_err(|_| {
            ValidationError::out_of_range("duration", seconds as f64, 0.0, f64::from(u32::MAX))
        })?;
        Ok(HevConfigRequest {
            indication,
            duration_s,
        })
    }
}

/// Haptic feedback length for switch buttons, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HapticDuration(pub(crate) u16);

impl HapticDuration {
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        let ms = parse_integer("haptic duration", token)?;
        u16::try_from(ms).map(HapticDuration).map_err(|_| {
            ValidationError::out_of_range("haptic duration", ms as f64, 0.0, f64::from(u16::MAX))
        })
    }

    pub fn ms(self) -> u16 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_conversions() {
        assert_eq!(ms_to_secs(3000), 3.0);
        assert_eq!(ns_to_secs(1_500_000_000), 1.5);
    }

    #[test]
    fn test_hev_config_indication_is_any_non_zero() {
        let config = HevConfigRequest::parse("2", "3600").unwrap();
        assert!(config.indication);
        assert_eq!(config.duration_s, 3600);
        assert!(!HevConfigRequest::parse("0", "10").unwrap().indication);
    }

    #[test]
    fn test_hev_config_rejects_negative_duration() {
        assert!(HevConfigRequest::parse("1", "-5").is_err());
    }

    #[test]
    fn test_haptic_bounds() {
        assert_eq!(HapticDuration::parse("20").unwrap().ms(), 20);
        assert!(HapticDuration::parse("70000").is_err());
        assert!(HapticDuration::parse("-1").is_err());
        assert!(HapticDuration::parse("short").is_err());
    }
}
