//! Waveform (pulse) effects.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::Hsbk;

/// Shape of a waveform effect. The console only sends saw waves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum WaveformKind {
    #[default]
    Saw = 0,
}

/// A waveform effect towards `color`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waveform {
    pub color: Hsbk,
    /// Return to the original color once the cycles finish.
    pub transient: bool,
    pub period_ms: u32,
    pub cycles: f32,
    pub skew_ratio: i16,
    pub kind: WaveformKind,
}

impl Waveform {
    /// The console's pulse: 30 transient saw cycles of 100ms each.
    pub fn pulse(color: Hsbk) -> Self {
        Waveform {
            color,
            transient: true,
            period_ms: 100,
            cycles: 30.0,
            skew_ratio: 0,
            kind: WaveformKind::Saw,
        }
    }
}
