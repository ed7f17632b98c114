//! In-memory devices implementing [`Device`].
//!
//! There is no wire protocol here: calls mutate local state and queries are
//! answered after a configurable latency. An unreachable device accepts calls
//! but never answers, which is how a real device that dropped off the network
//! looks to the console.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use log::debug;
use serde::Serialize;
use serde_json::{Value, json};

use crate::device::{ButtonConfigRequest, Device, Reply};
use crate::history::{CallLog, MessageType};
use crate::products::Features;
use crate::response::{
    Button, ButtonAction, ButtonConfig, ButtonGesture, ButtonState, ButtonTarget, DeviceInfo,
    FirmwareInfo, HevConfig, HevCycle, HevCycleResult, HostInfo, MultizoneEffect, RelayPower,
    WifiInfo,
};
use crate::types::{
    EffectDirection, EffectKind, HevConfigRequest, HevCycleRequest, Hsbk, MultizoneEffectRequest,
    PowerState, RelayIndex, Waveform,
};

struct SimState {
    label: Option<String>,
    location: Option<String>,
    group: Option<String>,
    power: PowerState,
    color: Hsbk,
    booted: Instant,
    effect: MultizoneEffect,
    hev_cycle: HevCycle,
    hev_config: HevConfig,
    last_hev_result: HevCycleResult,
    relays: Vec<u16>,
    buttons: ButtonState,
    button_config: ButtonConfig,
}

/// A device that lives in memory.
///
/// # Example
///
/// ```
/// use lifx_console::{Device, SimulatedDevice};
///
/// let lamp = SimulatedDevice::builder("d0:73:d5:00:00:01")
///     .label("Desk")
///     .product(27)
///     .build();
/// assert_eq!(lamp.display_name(), "Desk");
/// assert!(lamp.call_log().is_empty());
/// ```
pub struct SimulatedDevice {
    mac: String,
    product: Option<u32>,
    latency: Duration,
    reachable: AtomicBool,
    state: Mutex<SimState>,
    log: Mutex<CallLog>,
}

/// Builder for [`SimulatedDevice`].
pub struct SimulatedDeviceBuilder {
    mac: String,
    label: Option<String>,
    product: Option<u32>,
    latency: Duration,
    location: Option<String>,
    group: Option<String>,
    reachable: bool,
}

impl SimulatedDeviceBuilder {
    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn product(mut self, pid: u32) -> Self {
        self.product = Some(pid);
        self
    }

    /// Delay before queries are answered. Zero answers immediately.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    pub fn build(self) -> Arc<SimulatedDevice> {
        let relay_count = Features::for_product(self.product).relay_count;
        let state = SimState {
            label: self.label,
            location: self.location,
            group: self.group,
            power: PowerState::Off,
            color: Hsbk {
                hue: 0,
                saturation: 0,
                brightness: 65535,
                kelvin: 3500,
            },
            booted: Instant::now(),
            effect: MultizoneEffect {
                kind: EffectKind::Off,
                speed_ms: 0,
                duration_ns: 0,
                direction: EffectDirection::Right,
            },
            hev_cycle: HevCycle::default(),
            hev_config: HevConfig {
                indication: true,
                duration_s: 7200,
            },
            last_hev_result: HevCycleResult::NoCycle,
            relays: vec![0; usize::from(relay_count)],
            buttons: default_buttons(relay_count),
            button_config: ButtonConfig {
                haptic_duration_ms: 20,
                backlight_on_color: Hsbk {
                    hue: 0,
                    saturation: 0,
                    brightness: 65535,
                    kelvin: 3500,
                },
                backlight_off_color: Hsbk {
                    hue: 0,
                    saturation: 0,
                    brightness: 0,
                    kelvin: 3500,
                },
            },
        };

        Arc::new(SimulatedDevice {
            mac: self.mac,
            product: self.product,
            latency: self.latency,
            reachable: AtomicBool::new(self.reachable),
            state: Mutex::new(state),
            log: Mutex::new(CallLog::new()),
        })
    }
}

impl SimulatedDevice {
    pub fn builder(mac: &str) -> SimulatedDeviceBuilder {
        SimulatedDeviceBuilder {
            mac: mac.to_string(),
            label: None,
            product: None,
            latency: Duration::ZERO,
            location: None,
            group: None,
            reachable: true,
        }
    }

    /// Simulate the label arriving (or changing) after discovery.
    pub fn set_label(&self, label: &str) {
        self.state().label = Some(label.to_string());
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    pub fn call_log(&self) -> CallLog {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn power(&self) -> PowerState {
        self.state().power
    }

    pub fn color(&self) -> Hsbk {
        self.state().color
    }

    pub fn relay_level(&self, relay: RelayIndex) -> Option<u16> {
        self.state().relays.get(usize::from(relay.index())).copied()
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, msg_type: MessageType, method: &str, params: Value) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(msg_type, &json!({"method": method, "params": params}));
    }

    /// Record a query and schedule its answer.
    fn answer<T>(&self, method: &str, params: Value, value: Option<T>) -> Reply<T>
    where
        T: Serialize + Send + 'static,
    {
        self.record(MessageType::Call, method, params);

        let (responder, reply) = Reply::channel();
        let Some(value) = value.filter(|_| self.is_reachable()) else {
            debug!("{} will not answer {method}", self.mac);
            drop(responder);
            return reply;
        };

        self.record(MessageType::Reply, method, json!(value));
        if self.latency.is_zero() {
            responder.resolve(value);
        } else {
            let latency = self.latency;
            tokio::spawn(async move {
                tokio::time::sleep(latency).await;
                responder.resolve(value);
            });
        }
        reply
    }
}

impl Device for SimulatedDevice {
    fn label(&self) -> Option<String> {
        self.state().label.clone()
    }

    fn hardware_address(&self) -> &str {
        &self.mac
    }

    fn product_id(&self) -> Option<u32> {
        self.product
    }

    fn info(&self) -> DeviceInfo {
        let state = self.state();
        DeviceInfo {
            label: state.label.clone(),
            mac: self.mac.clone(),
            ip: None,
            location: state.location.clone(),
            group: state.group.clone(),
            power: Some(state.power),
            vendor: Some(1),
            product: self.product,
            version: Some(0),
        }
    }

    fn firmware(&self) -> FirmwareInfo {
        FirmwareInfo {
            host_version: Some("3.70".to_string()),
            host_build_ns: Some(1_600_000_000_000_000_000),
            wifi_version: Some("0.0".to_string()),
            wifi_build_ns: None,
        }
    }

    fn set_power(&self, power: PowerState) {
        self.record(MessageType::Call, "set_power", json!(power.is_on()));
        self.state().power = power;
    }

    fn set_color(&self, color: Hsbk) {
        self.record(MessageType::Call, "set_color", json!(color.as_array()));
        self.state().color = color;
    }

    fn set_waveform(&self, waveform: Waveform) {
        self.record(MessageType::Call, "set_waveform", json!(waveform));
    }

    fn set_multizone_effect(&self, effect: MultizoneEffectRequest) {
        self.record(MessageType::Call, "set_multizone_effect", json!(effect));
        self.state().effect = MultizoneEffect {
            kind: effect.kind,
            speed_ms: effect.speed_ms,
            duration_ns: 0,
            direction: effect.direction,
        };
    }

    fn reboot(&self) {
        self.record(MessageType::Call, "reboot", Value::Null);
        self.state().booted = Instant::now();
    }

    fn get_wifi_info(&self) -> Reply<WifiInfo> {
        let traffic = (self.call_log().summary().call_count * 64) as u32;
        let info = WifiInfo {
            signal_mw: 0.0001,
            tx_bytes: traffic,
            rx_bytes: traffic,
        };
        self.answer("get_wifi_info", Value::Null, Some(info))
    }

    fn get_host_info(&self) -> Reply<HostInfo> {
        let time_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let info = HostInfo {
            time_ns,
            uptime_ns: self.state().booted.elapsed().as_nanos() as u64,
            downtime_ns: 0,
        };
        self.answer("get_host_info", Value::Null, Some(info))
    }

    fn get_hev_cycle(&self) -> Reply<HevCycle> {
        let cycle = self.state().hev_cycle;
        self.answer("get_hev_cycle", Value::Null, Some(cycle))
    }

    fn set_hev_cycle(&self, request: HevCycleRequest) -> Reply<HevCycle> {
        let cycle = {
            let mut state = self.state();
            if request.enable {
                state.hev_cycle = HevCycle {
                    duration_s: request.duration_s,
                    remaining_s: request.duration_s,
                    last_power: state.power.is_on(),
                };
                state.last_hev_result = HevCycleResult::Busy;
            } else {
                state.hev_cycle.remaining_s = 0;
                state.last_hev_result = HevCycleResult::InterruptedByLan;
            }
            state.hev_cycle
        };
        self.answer("set_hev_cycle", json!(request), Some(cycle))
    }

    fn get_last_hev_cycle_result(&self) -> Reply<HevCycleResult> {
        let result = self.state().last_hev_result;
        self.answer("get_last_hev_cycle_result", Value::Null, Some(result))
    }

    fn get_hev_configuration(&self) -> Reply<HevConfig> {
        let config = self.state().hev_config;
        self.answer("get_hev_configuration", Value::Null, Some(config))
    }

    fn set_hev_configuration(&self, request: HevConfigRequest) -> Reply<HevConfig> {
        let config = HevConfig {
            indication: request.indication,
            duration_s: request.duration_s,
        };
        self.state().hev_config = config;
        self.answer("set_hev_configuration", json!(request), Some(config))
    }

    fn get_multizone_effect(&self) -> Reply<MultizoneEffect> {
        let effect = self.state().effect;
        self.answer("get_multizone_effect", Value::Null, Some(effect))
    }

    fn get_relay_power(&self, relay: RelayIndex) -> Reply<RelayPower> {
        let power = self
            .relay_level(relay)
            .map(|level| RelayPower { relay, level });
        self.answer("get_relay_power", json!(relay.index()), power)
    }

    fn set_relay_power(&self, relay: RelayIndex, power: PowerState) -> Reply<RelayPower> {
        let level = if power.is_on() { PowerState::LEVEL_ON } else { 0 };
        let updated = self
            .state()
            .relays
            .get_mut(usize::from(relay.index()))
            .map(|slot| {
                *slot = level;
                RelayPower { relay, level }
            });
        self.answer(
            "set_relay_power",
            json!([relay.index(), power.is_on()]),
            updated,
        )
    }

    fn get_button(&self) -> Reply<ButtonState> {
        let buttons = self.state().buttons.clone();
        self.answer("get_button", Value::Null, Some(buttons))
    }

    fn get_button_config(&self) -> Reply<ButtonConfig> {
        let config = self.state().button_config;
        self.answer("get_button_config", Value::Null, Some(config))
    }

    fn set_button_config(&self, request: ButtonConfigRequest) -> Reply<ButtonConfig> {
        let config = ButtonConfig {
            haptic_duration_ms: request.haptic_duration.ms(),
            backlight_on_color: request.backlight_on_color,
            backlight_off_color: request.backlight_off_color,
        };
        self.state().button_config = config;
        self.answer("set_button_config", json!(config), Some(config))
    }
}

fn default_buttons(relay_count: u8) -> ButtonState {
    let buttons = (0..relay_count)
        .map(|relay| Button {
            actions: vec![
                ButtonAction {
                    gesture: ButtonGesture::Press,
                    target: ButtonTarget::Relays(vec![RelayIndex::from_index(relay)]),
                },
                ButtonAction {
                    gesture: ButtonGesture::PressPress,
                    target: ButtonTarget::Scene("Evening".to_string()),
                },
                ButtonAction {
                    gesture: ButtonGesture::HoldPress,
                    target: ButtonTarget::Group("Downstairs".to_string()),
                },
                ButtonAction {
                    gesture: ButtonGesture::PressPressPress,
                    target: ButtonTarget::Reserved,
                },
            ],
        })
        .collect();

    ButtonState {
        count: 1,
        index: 0,
        buttons_count: relay_count,
        buttons,
    }
}
