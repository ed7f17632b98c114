//! Device arrival and departure notifications.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::mpsc;

use crate::device::{Device, DeviceHandle};
use crate::simulator::SimulatedDevice;

/// A change in the set of reachable devices.
pub enum DiscoveryEvent {
    /// A device announced itself
    Registered(DeviceHandle),
    /// The device with this hardware address is gone
    Unregistered(String),
}

impl std::fmt::Debug for DiscoveryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryEvent::Registered(device) => f
                .debug_tuple("Registered")
                .field(&device.hardware_address())
                .finish(),
            DiscoveryEvent::Unregistered(mac) => f.debug_tuple("Unregistered").field(mac).finish(),
        }
    }
}

/// Description of one simulated bulb: `<label>:<product id>`.
///
/// # Examples
///
/// ```
/// use lifx_console::BulbSpec;
///
/// let spec: BulbSpec = "Living Room:27".parse().unwrap();
/// assert_eq!(spec.label, "Living Room");
/// assert_eq!(spec.product, 27);
/// assert!("Living Room".parse::<BulbSpec>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulbSpec {
    pub label: String,
    pub product: u32,
}

impl FromStr for BulbSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        let (label, product) = s
            .rsplit_once(':')
            .ok_or_else(|| "Expected format: <label>:<product id>".to_string())?;
        let product = product
            .trim()
            .parse()
            .map_err(|_| format!("invalid product id {product:?}"))?;
        Ok(BulbSpec {
            label: label.trim().to_string(),
            product,
        })
    }
}

/// Shortest interval between reachability checks.
const PRESENCE_POLL: Duration = Duration::from_millis(100);

/// A set of simulated bulbs that announce themselves one by one.
#[derive(Debug, Clone)]
pub struct SimulatedFleet {
    specs: Vec<BulbSpec>,
    latency: Duration,
    stagger: Duration,
}

impl SimulatedFleet {
    pub fn new(specs: Vec<BulbSpec>, latency: Duration, stagger: Duration) -> Self {
        SimulatedFleet {
            specs,
            latency,
            stagger,
        }
    }

    /// A mixed household: color, white, HEV, multizone and a switch.
    pub fn default_specs() -> Vec<BulbSpec> {
        [
            ("Kitchen", 27),
            ("Bathroom", 90),
            ("Hallway Strip", 31),
            ("Entry Switch", 70),
            ("Desk Lamp", 10),
        ]
        .into_iter()
        .map(|(label, product)| BulbSpec {
            label: label.to_string(),
            product,
        })
        .collect()
    }

    /// Build the devices and start announcing them.
    ///
    /// Each device is registered without a label; the label follows one
    /// latency later, the way real devices answer the label query only after
    /// they have been discovered. Afterwards every device is watched: one
    /// that stops answering is unregistered, and registered again once it
    /// answers. Must be called inside a tokio runtime.
    pub fn start(self) -> (Vec<Arc<SimulatedDevice>>, mpsc::UnboundedReceiver<DiscoveryEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut devices = Vec::with_capacity(self.specs.len());

        for (i, spec) in self.specs.into_iter().enumerate() {
            let device = SimulatedDevice::builder(&simulated_mac(i))
                .product(spec.product)
                .latency(self.latency)
                .location("Home")
                .group("Lights")
                .build();
            devices.push(Arc::clone(&device));

            let delay = self.stagger * i as u32;
            tokio::spawn(announce(device, spec, delay, self.latency, tx.clone()));
        }

        (devices, rx)
    }
}

async fn announce(
    device: Arc<SimulatedDevice>,
    spec: BulbSpec,
    delay: Duration,
    latency: Duration,
    tx: mpsc::UnboundedSender<DiscoveryEvent>,
) {
    tokio::time::sleep(delay).await;
    info!(
        "discovered {} (product {})",
        device.hardware_address(),
        spec.product
    );
    if tx.send(DiscoveryEvent::Registered(device.clone())).is_err() {
        debug!("discovery listener closed");
        return;
    }
    tokio::time::sleep(latency).await;
    device.set_label(&spec.label);

    let mut present = true;
    let poll = latency.max(PRESENCE_POLL);
    while !tx.is_closed() {
        tokio::time::sleep(poll).await;
        if device.is_reachable() == present {
            continue;
        }
        present = !present;
        let event = if present {
            info!("{} answers again", device.hardware_address());
            DiscoveryEvent::Registered(device.clone())
        } else {
            info!("lost {}", device.hardware_address());
            DiscoveryEvent::Unregistered(device.hardware_address().to_string())
        };
        if tx.send(event).is_err() {
            break;
        }
    }
    debug!("stopped watching {}", device.hardware_address());
}

fn simulated_mac(index: usize) -> String {
    format!("d0:73:d5:00:{:02x}:{:02x}", (index >> 8) & 0xff, (index + 1) & 0xff)
}
