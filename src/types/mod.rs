//! Value types for operator arguments and their protocol encodings.
//!
//! Every constructor validates its input domain and fails with a
//! [`ValidationError`] instead of producing an out-of-range protocol value.

mod duration;
mod effect;
mod hsbk;
mod hue;
mod kelvin;
mod level;
mod power;
mod relay;
mod waveform;

pub use duration::{HapticDuration, HevCycleRequest, HevConfigRequest, ms_to_secs, ns_to_secs};
pub use effect::{EffectDirection, EffectKind, MultizoneEffectRequest};
pub use hsbk::Hsbk;
pub use hue::Hue;
pub use kelvin::Kelvin;
pub use level::Level;
pub use power::PowerState;
pub use relay::RelayIndex;
pub use waveform::{Waveform, WaveformKind};

use crate::errors::ValidationError;

/// Full scale of the protocol's 16-bit fixed-point channels.
pub(crate) const PROTOCOL_MAX: f64 = 65535.0;

/// Parse a finite decimal number.
pub(crate) fn parse_number(field: &'static str, token: &str) -> Result<f64, ValidationError> {
    match token.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::not_numeric(field, token)),
    }
}

/// Parse a whole number.
pub(crate) fn parse_integer(field: &'static str, token: &str) -> Result<i64, ValidationError> {
    token
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::not_numeric(field, token))
}
