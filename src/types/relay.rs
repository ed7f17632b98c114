//! Switch relay addressing.

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Zero-based relay index as the device addresses it.
///
/// Operators count relays from one; [`RelayIndex::parse`] does the shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayIndex(pub(crate) u8);

impl RelayIndex {
    /// Parse a one-based relay number for a switch with `relay_count` relays.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifx_console::RelayIndex;
    ///
    /// assert_eq!(RelayIndex::parse("1", 4).unwrap().index(), 0);
    /// assert_eq!(RelayIndex::parse("4", 4).unwrap().number(), 4);
    /// assert!(RelayIndex::parse("0", 4).is_err());
    /// assert!(RelayIndex::parse("5", 4).is_err());
    /// assert!(RelayIndex::parse("one", 4).is_err());
    /// ```
    pub fn parse(token: &str, relay_count: u8) -> Result<Self, Error> {
        let number: i64 = token
            .trim()
            .parse()
            .map_err(|_| Error::parse("relay", token))?;
        if number < 1 || number > i64::from(relay_count) {
            return Err(Error::range("relay", number, 1, i64::from(relay_count)));
        }
        Ok(RelayIndex((number - 1) as u8))
    }

    /// Wrap a zero-based index.
    pub fn from_index(index: u8) -> Self {
        RelayIndex(index)
    }

    /// Zero-based protocol index.
    pub fn index(self) -> u8 {
        self.0
    }

    /// One-based operator number.
    pub fn number(self) -> u16 {
        u16::from(self.0) + 1
    }
}
