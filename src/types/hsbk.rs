//! Hue, saturation, brightness and kelvin color tuples.

use serde::{Deserialize, Serialize};

use super::{Hue, Kelvin, Level};

/// A color as the device receives it: four 16-bit protocol channels.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Hsbk {
    pub hue: u16,
    pub saturation: u16,
    pub brightness: u16,
    pub kelvin: u16,
}

impl Hsbk {
    /// Hue the white command has always been sent with; it is ignored by the
    /// device because saturation is zero.
    pub const WHITE_HUE: u16 = 58275;

    /// Build a colored tuple.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifx_console::{Hsbk, Hue, Kelvin, Level};
    ///
    /// let color = Hsbk::new(
    ///     Hue::from_degrees(360.0).unwrap(),
    ///     Level::from_percent("saturation", 100.0).unwrap(),
    ///     Level::from_percent("brightness", 0.0).unwrap(),
    ///     Kelvin::default(),
    /// );
    /// assert_eq!(color.as_array(), [65535, 65535, 0, 3500]);
    /// ```
    pub fn new(hue: Hue, saturation: Level, brightness: Level, kelvin: Kelvin) -> Self {
        Hsbk {
            hue: hue.units(),
            saturation: saturation.units(),
            brightness: brightness.units(),
            kelvin: kelvin.kelvin(),
        }
    }

    /// Build a white tuple.
    pub fn white(brightness: Level, kelvin: Kelvin) -> Self {
        Hsbk {
            hue: Self::WHITE_HUE,
            saturation: 0,
            brightness: brightness.units(),
            kelvin: kelvin.kelvin(),
        }
    }

    pub fn as_array(&self) -> [u16; 4] {
        [self.hue, self.saturation, self.brightness, self.kelvin]
    }

    /// Decode into operator units: degrees, percent, percent, kelvin.
    pub fn to_human(&self) -> (u16, u8, u8, u16) {
        (
            Hue::from_units(self.hue).degrees(),
            Level::from_units(self.saturation).percent(),
            Level::from_units(self.brightness).percent(),
            self.kelvin,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_tuple() {
        let white = Hsbk::white(Level::legacy_white(100.0).unwrap(), Kelvin::white(3500.0).unwrap());
        assert_eq!(white.as_array(), [58275, 0, 65365, 3500]);
    }

    #[test]
    fn test_to_human() {
        let color = Hsbk {
            hue: 21845,
            saturation: 32768,
            brightness: 65535,
            kelvin: 2700,
        };
        assert_eq!(color.to_human(), (120, 50, 100, 2700));
    }
}
