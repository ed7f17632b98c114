//! The device API the console drives.
//!
//! Devices are owned by whatever discovers them; the console only holds
//! [`DeviceHandle`]s. Setters return immediately. Queries return a [`Reply`]
//! that resolves once when the matching response arrives, or resolves to
//! `None` if the device never answers.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::response::{
    ButtonConfig, ButtonState, DeviceInfo, FirmwareInfo, HevConfig, HevCycle, HevCycleResult,
    HostInfo, MultizoneEffect, RelayPower, WifiInfo,
};
use crate::types::{
    HapticDuration, HevConfigRequest, HevCycleRequest, Hsbk, MultizoneEffectRequest, PowerState,
    RelayIndex, Waveform,
};

/// Shared reference to a discovered device.
pub type DeviceHandle = Arc<dyn Device>;

/// Pending answer to a device query.
///
/// Awaiting yields `Some(response)` exactly once, or `None` when the device
/// side gave up without answering.
#[derive(Debug)]
pub struct Reply<T>(oneshot::Receiver<T>);

/// Device-side half of a [`Reply`]. Consumed by [`Responder::resolve`], so a
/// reply can be answered at most once.
#[derive(Debug)]
pub struct Responder<T>(oneshot::Sender<T>);

impl<T> Reply<T> {
    pub fn channel() -> (Responder<T>, Reply<T>) {
        let (tx, rx) = oneshot::channel();
        (Responder(tx), Reply(rx))
    }

    /// A reply that is already answered.
    pub fn ready(value: T) -> Reply<T> {
        let (responder, reply) = Self::channel();
        responder.resolve(value);
        reply
    }
}

impl<T> Responder<T> {
    pub fn resolve(self, value: T) {
        // The console may have stopped listening; nothing to do then.
        let _ = self.0.send(value);
    }
}

impl<T> Future for Reply<T> {
    type Output = Option<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx).map(Result::ok)
    }
}

/// Button configuration to write to a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonConfigRequest {
    pub haptic_duration: HapticDuration,
    pub backlight_on_color: Hsbk,
    pub backlight_off_color: Hsbk,
}

/// A smart-lighting device as seen by the console.
pub trait Device: Send + Sync {
    /// User-assigned label, if one has been received yet.
    fn label(&self) -> Option<String>;

    fn hardware_address(&self) -> &str;

    fn product_id(&self) -> Option<u32>;

    /// Label when known, hardware address otherwise.
    fn display_name(&self) -> String {
        match self.label() {
            Some(label) if !label.is_empty() => label,
            _ => self.hardware_address().to_string(),
        }
    }

    /// Last known identity and location details.
    fn info(&self) -> DeviceInfo;

    /// Last known firmware details.
    fn firmware(&self) -> FirmwareInfo;

    fn set_power(&self, power: PowerState);

    fn set_color(&self, color: Hsbk);

    fn set_waveform(&self, waveform: Waveform);

    fn set_multizone_effect(&self, effect: MultizoneEffectRequest);

    fn reboot(&self);

    fn get_wifi_info(&self) -> Reply<WifiInfo>;

    fn get_host_info(&self) -> Reply<HostInfo>;

    fn get_hev_cycle(&self) -> Reply<HevCycle>;

    fn set_hev_cycle(&self, request: HevCycleRequest) -> Reply<HevCycle>;

    fn get_last_hev_cycle_result(&self) -> Reply<HevCycleResult>;

    fn get_hev_configuration(&self) -> Reply<HevConfig>;

    fn set_hev_configuration(&self, request: HevConfigRequest) -> Reply<HevConfig>;

    fn get_multizone_effect(&self) -> Reply<MultizoneEffect>;

    fn get_relay_power(&self, relay: RelayIndex) -> Reply<RelayPower>;

    fn set_relay_power(&self, relay: RelayIndex, power: PowerState) -> Reply<RelayPower>;

    fn get_button(&self) -> Reply<ButtonState>;

    fn get_button_config(&self) -> Reply<ButtonConfig>;

    fn set_button_config(&self, request: ButtonConfigRequest) -> Reply<ButtonConfig>;
}
