//! Payloads delivered by devices in answer to queries.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::types::{EffectDirection, EffectKind, Hsbk, PowerState, RelayIndex};

/// Cached identity and location of a device.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub label: Option<String>,
    pub mac: String,
    pub ip: Option<String>,
    pub location: Option<String>,
    pub group: Option<String>,
    pub power: Option<PowerState>,
    pub vendor: Option<u32>,
    pub product: Option<u32>,
    pub version: Option<u32>,
}

/// Cached firmware versions of a device.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirmwareInfo {
    pub host_version: Option<String>,
    /// Build timestamp, nanoseconds since the epoch
    pub host_build_ns: Option<u64>,
    pub wifi_version: Option<String>,
    pub wifi_build_ns: Option<u64>,
}

/// Radio statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WifiInfo {
    /// Received signal in milliwatts
    pub signal_mw: f32,
    pub tx_bytes: u32,
    pub rx_bytes: u32,
}

impl WifiInfo {
    pub fn signal_dbm(&self) -> f32 {
        10.0 * self.signal_mw.log10()
    }
}

/// Device clock and run time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    pub time_ns: u64,
    pub uptime_ns: u64,
    pub downtime_ns: u64,
}

/// State of the current HEV cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HevCycle {
    pub duration_s: u32,
    pub remaining_s: u32,
    pub last_power: bool,
}

/// How the previous HEV cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum HevCycleResult {
    #[strum(serialize = "Success")]
    Success,
    #[strum(serialize = "Busy")]
    Busy,
    #[strum(serialize = "Interrupted by reset")]
    InterruptedByReset,
    #[strum(serialize = "Interrupted by HomeKit")]
    InterruptedByHomekit,
    #[strum(serialize = "Interrupted by LAN")]
    InterruptedByLan,
    #[strum(serialize = "Interrupted by cloud")]
    InterruptedByCloud,
    #[strum(serialize = "None")]
    NoCycle,
}

/// Default HEV cycle settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HevConfig {
    pub indication: bool,
    pub duration_s: u32,
}

/// Firmware effect currently running on a multizone device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultizoneEffect {
    pub kind: EffectKind,
    /// Milliseconds per cycle
    pub speed_ms: u32,
    /// Total run time in nanoseconds; zero runs forever
    pub duration_ns: u64,
    pub direction: EffectDirection,
}

/// Power level of one relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayPower {
    pub relay: RelayIndex,
    pub level: u16,
}

impl RelayPower {
    pub fn state(&self) -> PowerState {
        PowerState::from_level(self.level)
    }
}

/// Physical gesture that triggers a button action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ButtonGesture {
    Press,
    HoldPress,
    PressPress,
    PressPressPress,
}

/// What a button action controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonTarget {
    Reserved,
    Relays(Vec<RelayIndex>),
    Device(String),
    Location(String),
    Group(String),
    Scene(String),
    DeviceRelays(String),
}

/// One configured action of a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonAction {
    pub gesture: ButtonGesture,
    pub target: ButtonTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub actions: Vec<ButtonAction>,
}

/// Button bindings of a switch.
///
/// `buttons` may hold more entries than `buttons_count`; only the first
/// `buttons_count` are meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonState {
    pub count: u8,
    pub index: u8,
    pub buttons_count: u8,
    pub buttons: Vec<Button>,
}

/// Haptic and backlight settings of a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonConfig {
    pub haptic_duration_ms: u16,
    pub backlight_on_color: Hsbk,
    pub backlight_off_color: Hsbk,
}
