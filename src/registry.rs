//! Known devices, ordered for display.

use std::collections::HashMap;

use log::debug;

use crate::device::DeviceHandle;
use crate::products::Features;

/// The devices the console currently knows about.
///
/// Entries are unique by hardware address and always kept sorted by display
/// name (label, or hardware address while no label is known). Labels can
/// arrive after discovery, so callers re-sort with [`Registry::refresh`]
/// before presenting indices. Product features are derived once, when a
/// device is added.
#[derive(Default)]
pub struct Registry {
    devices: Vec<DeviceHandle>,
    features: HashMap<String, Features>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device; a device with the same hardware address is replaced.
    pub fn add(&mut self, device: DeviceHandle) {
        let mac = device.hardware_address().to_string();
        self.features
            .insert(mac.clone(), Features::for_product(device.product_id()));
        if let Some(existing) = self.position(&mac) {
            debug!("replacing registered device {mac}");
            self.devices[existing] = device;
        } else {
            debug!("registering device {mac}");
            self.devices.push(device);
        }
        self.refresh();
    }

    /// Remove the device with this hardware address.
    pub fn remove(&mut self, mac: &str) -> Option<DeviceHandle> {
        let removed = self.position(mac).map(|index| self.devices.remove(index));
        if removed.is_some() {
            debug!("unregistered device {mac}");
            self.features.remove(mac);
            self.refresh();
        }
        removed
    }

    /// Re-sort from the devices' current labels.
    pub fn refresh(&mut self) {
        self.devices
            .sort_by_cached_key(|device| device.display_name());
    }

    /// Devices in display order.
    pub fn list(&self) -> &[DeviceHandle] {
        &self.devices
    }

    /// Look up by 1-based display index.
    pub fn get(&self, index: usize) -> Option<&DeviceHandle> {
        index.checked_sub(1).and_then(|i| self.devices.get(i))
    }

    pub fn find(&self, mac: &str) -> Option<&DeviceHandle> {
        self.devices
            .iter()
            .find(|device| device.hardware_address() == mac)
    }

    /// Features of a registered device; empty for unknown addresses.
    pub fn features(&self, mac: &str) -> Features {
        self.features.get(mac).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    fn position(&self, mac: &str) -> Option<usize> {
        self.devices
            .iter()
            .position(|device| device.hardware_address() == mac)
    }
}
