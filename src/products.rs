//! Product descriptors and the capability set derived from them.

use log::warn;
use serde::{Deserialize, Serialize};

/// Color temperature range (Kelvin).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KelvinRange {
    pub min: u16,
    pub max: u16,
}

/// A feature a command can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Color,
    ColorTemperature,
    Hev,
    Multizone,
    Relays,
}

impl Capability {
    /// Wording used in menus and error messages.
    pub fn describe(self) -> &'static str {
        match self {
            Capability::Color => "color",
            Capability::ColorTemperature => "white color temperature",
            Capability::Hev => "HEV cleaning cycles",
            Capability::Multizone => "multizone firmware effects",
            Capability::Relays => "relays",
        }
    }
}

/// Feature flags for a product.
///
/// Derived once from the product id and never changed afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    pub color: bool,
    pub color_temperature: bool,
    pub hev: bool,
    pub multizone: bool,
    pub relays: bool,
    pub relay_count: u8,
}

impl Features {
    /// Look up the features of a product id.
    ///
    /// Unknown products get an empty feature set, which leaves only the
    /// always-available commands.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifx_console::{Capability, Features};
    ///
    /// let clean = Features::for_product(Some(90));
    /// assert!(clean.supports(Capability::Hev));
    /// assert!(!clean.supports(Capability::Multizone));
    ///
    /// assert_eq!(Features::for_product(None), Features::default());
    /// ```
    pub fn for_product(product_id: Option<u32>) -> Self {
        let Some(pid) = product_id else {
            return Features::default();
        };
        match ProductDescriptor::lookup(pid) {
            Some(descriptor) => descriptor.features(),
            None => {
                warn!("unknown product id {pid}; assuming no optional features");
                Features::default()
            }
        }
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Color => self.color,
            Capability::ColorTemperature => self.color_temperature,
            Capability::Hev => self.hev,
            Capability::Multizone => self.multizone,
            Capability::Relays => self.relays,
        }
    }
}

/// One row of the static product table.
#[derive(Debug, Clone, Copy)]
pub struct ProductDescriptor {
    pub pid: u32,
    pub name: &'static str,
    pub color: bool,
    pub hev: bool,
    pub multizone: bool,
    pub relays: bool,
    pub kelvin_range: Option<KelvinRange>,
}

const fn bulb(pid: u32, name: &'static str, color: bool, min: u16, max: u16) -> ProductDescriptor {
    ProductDescriptor {
        pid,
        name,
        color,
        hev: false,
        multizone: false,
        relays: false,
        kelvin_range: Some(KelvinRange { min, max }),
    }
}

const fn strip(pid: u32, name: &'static str) -> ProductDescriptor {
    ProductDescriptor {
        multizone: true,
        ..bulb(pid, name, true, 2500, 9000)
    }
}

const fn clean(pid: u32, name: &'static str) -> ProductDescriptor {
    ProductDescriptor {
        hev: true,
        ..bulb(pid, name, true, 1500, 9000)
    }
}

const fn switch(pid: u32, name: &'static str) -> ProductDescriptor {
    ProductDescriptor {
        pid,
        name,
        color: false,
        hev: false,
        multizone: false,
        relays: true,
        kelvin_range: None,
    }
}

const PRODUCTS: &[ProductDescriptor] = &[
    bulb(1, "LIFX Original 1000", true, 2500, 9000),
    bulb(3, "LIFX Color 650", true, 2500, 9000),
    bulb(10, "LIFX White 800 (Low Voltage)", false, 2700, 6500),
    bulb(11, "LIFX White 800 (High Voltage)", false, 2700, 6500),
    bulb(15, "LIFX Color 1000 BR30", true, 2500, 9000),
    bulb(22, "LIFX Color 1000", true, 2500, 9000),
    bulb(27, "LIFX A19", true, 2500, 9000),
    bulb(28, "LIFX BR30", true, 2500, 9000),
    strip(31, "LIFX Z"),
    strip(32, "LIFX Z"),
    strip(38, "LIFX Beam"),
    bulb(49, "LIFX Mini Color", true, 1500, 9000),
    bulb(50, "LIFX Mini White to Warm", false, 1500, 6500),
    bulb(51, "LIFX Mini White", false, 2700, 2700),
    bulb(55, "LIFX Tile", true, 2500, 9000),
    switch(70, "LIFX Switch"),
    switch(71, "LIFX Switch"),
    switch(89, "LIFX Switch"),
    clean(90, "LIFX Clean"),
    clean(99, "LIFX Clean"),
    strip(117, "LIFX Z"),
];

impl ProductDescriptor {
    /// Relays on every switch model in the table.
    pub const SWITCH_RELAYS: u8 = 4;

    pub fn lookup(pid: u32) -> Option<&'static ProductDescriptor> {
        PRODUCTS.iter().find(|product| product.pid == pid)
    }

    pub fn all() -> &'static [ProductDescriptor] {
        PRODUCTS
    }

    pub fn features(&self) -> Features {
        Features {
            color: self.color,
            color_temperature: self.kelvin_range.is_some(),
            hev: self.hev,
            multizone: self.multizone,
            relays: self.relays,
            relay_count: if self.relays { Self::SWITCH_RELAYS } else { 0 },
        }
    }
}
