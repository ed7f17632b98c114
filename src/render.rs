//! Console output and the formatting of device responses.
//!
//! Everything the console shows goes through an [`Output`]. Query responses
//! are rendered by [`deliver`] whenever the device answers, which may be long
//! after the menu was redrawn, so their text can land in the middle of the
//! operator's next line.

use log::debug;
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::mpsc;

use crate::device::Reply;
use crate::errors::Error;
use crate::products::ProductDescriptor;
use crate::response::{
    ButtonConfig, ButtonState, ButtonTarget, DeviceInfo, FirmwareInfo, HevConfig, HevCycle,
    HevCycleResult, HostInfo, MultizoneEffect, RelayPower, WifiInfo,
};
use crate::types::{Hsbk, ms_to_secs, ns_to_secs};

type Result<T> = std::result::Result<T, Error>;

/// Cloneable handle for writing console text.
#[derive(Debug, Clone)]
pub struct Output(mpsc::UnboundedSender<String>);

/// Receiving end of an [`Output`].
#[derive(Debug)]
pub struct OutputReceiver(mpsc::UnboundedReceiver<String>);

impl Output {
    pub fn channel() -> (Output, OutputReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Output(tx), OutputReceiver(rx))
    }

    /// Write text as-is.
    pub fn print(&self, text: impl Into<String>) {
        if self.0.send(text.into()).is_err() {
            debug!("console output closed");
        }
    }

    /// Write text followed by a newline.
    pub fn line(&self, text: impl AsRef<str>) {
        self.print(format!("{}\n", text.as_ref()))
    }
}

impl OutputReceiver {
    pub async fn recv(&mut self) -> Option<String> {
        self.0.recv().await
    }

    /// Everything written so far, without waiting.
    pub fn drain(&mut self) -> String {
        let mut text = String::new();
        while let Ok(chunk) = self.0.try_recv() {
            text.push_str(&chunk);
        }
        text
    }

    /// Copy output to stdout until every [`Output`] is dropped.
    pub async fn pipe_to(mut self, mut stdout: Stdout) -> Result<()> {
        while let Some(chunk) = self.recv().await {
            stdout
                .write_all(chunk.as_bytes())
                .await
                .map_err(|e| Error::io("write", e))?;
            stdout.flush().await.map_err(|e| Error::io("flush", e))?;
        }
        Ok(())
    }
}

/// Print the response to `reply` once it arrives.
///
/// Nothing is printed if the device never answers.
pub fn deliver<T, F>(out: &Output, reply: Reply<T>, render: F)
where
    T: Send + 'static,
    F: FnOnce(&T) -> String + Send + 'static,
{
    let out = out.clone();
    tokio::spawn(async move {
        match reply.await {
            Some(response) => out.print(format!("\n{}\n", render(&response))),
            None => debug!("query went unanswered"),
        }
    });
}

fn or_unknown<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "Unknown".to_string())
}

pub fn device_info(info: &DeviceInfo, indent: &str) -> String {
    let descriptor = info.product.and_then(ProductDescriptor::lookup);
    let product = descriptor
        .map(|p| p.name.to_string())
        .unwrap_or_else(|| or_unknown(&info.product));
    let kelvin = descriptor
        .and_then(|p| p.kelvin_range)
        .map(|range| format!("{}-{}", range.min, range.max))
        .unwrap_or_else(|| "None".to_string());
    [
        format!("{indent}Label: {}", or_unknown(&info.label)),
        format!("{indent}MAC Address: {}", info.mac),
        format!("{indent}IP Address: {}", or_unknown(&info.ip)),
        format!("{indent}Location: {}", or_unknown(&info.location)),
        format!("{indent}Group: {}", or_unknown(&info.group)),
        format!("{indent}Power: {}", or_unknown(&info.power)),
        format!("{indent}Vendor: {}", or_unknown(&info.vendor)),
        format!("{indent}Product: {product}"),
        format!("{indent}Kelvin range: {kelvin}"),
        format!("{indent}Version: {}", or_unknown(&info.version)),
    ]
    .join("\n")
}

pub fn firmware(info: &FirmwareInfo, indent: &str) -> String {
    let build = |ns: &Option<u64>| {
        ns.map(|ns| format!("{:.0}", ns_to_secs(ns)))
            .unwrap_or_else(|| "Unknown".to_string())
    };
    [
        format!("{indent}Host Firmware Version: {}", or_unknown(&info.host_version)),
        format!("{indent}Host Firmware Build (s): {}", build(&info.host_build_ns)),
        format!("{indent}Wifi Firmware Version: {}", or_unknown(&info.wifi_version)),
        format!("{indent}Wifi Firmware Build (s): {}", build(&info.wifi_build_ns)),
    ]
    .join("\n")
}

pub fn wifi(info: &WifiInfo) -> String {
    format!(
        "Signal: {:.1} dBm\nTx: {} bytes\nRx: {} bytes",
        info.signal_dbm(),
        info.tx_bytes,
        info.rx_bytes
    )
}

pub fn host_time(info: &HostInfo) -> String {
    format!(
        "Uptime: {:.1} s\nDowntime: {:.1} s",
        ns_to_secs(info.uptime_ns),
        ns_to_secs(info.downtime_ns)
    )
}

pub fn hev_cycle(cycle: &HevCycle) -> String {
    format!(
        "HEV: duration={}, remaining={}, last_power={}",
        cycle.duration_s, cycle.remaining_s, cycle.last_power
    )
}

pub fn hev_result(result: &HevCycleResult) -> String {
    format!("HEV result: {result}")
}

pub fn hev_config(config: &HevConfig) -> String {
    format!(
        "HEV: indication={}, duration={}",
        config.indication, config.duration_s
    )
}

pub fn multizone_effect(effect: &MultizoneEffect) -> String {
    format!(
        "Current effect={}\nSpeed={}\nDuration={:.6}\nDirection={}",
        effect.kind,
        ms_to_secs(effect.speed_ms),
        ns_to_secs(effect.duration_ns),
        effect.direction
    )
}

pub fn relay_power(power: &RelayPower) -> String {
    format!("Relay {}: {}", power.relay.number(), power.state())
}

fn action_name(index: usize) -> String {
    match index {
        0 => "Single Press".to_string(),
        1 => "Double Press".to_string(),
        2 => "Long Press".to_string(),
        _ => format!("Action {}", index + 1),
    }
}

fn target(target: &ButtonTarget) -> String {
    match target {
        ButtonTarget::Reserved => "Reserved".to_string(),
        ButtonTarget::Relays(relays) => {
            let numbers: Vec<String> = relays.iter().map(|r| r.number().to_string()).collect();
            format!("Relays: {}", numbers.join(", "))
        }
        ButtonTarget::Device(id) => format!("Device: {id}"),
        ButtonTarget::Location(id) => format!("Location: {id}"),
        ButtonTarget::Group(id) => format!("Group: {id}"),
        ButtonTarget::Scene(id) => format!("Scene: {id}"),
        ButtonTarget::DeviceRelays(id) => format!("Device relays: {id}"),
    }
}

pub fn button(state: &ButtonState) -> String {
    // Only single, double and long press are configurable from the app.
    const MAX_ACTIONS: usize = 3;

    let mut buttons = String::new();
    for (i, button) in state
        .buttons
        .iter()
        .take(usize::from(state.buttons_count))
        .enumerate()
    {
        buttons.push_str(&format!("Button {}:\n", i + 1));
        for (j, action) in button.actions.iter().take(MAX_ACTIONS).enumerate() {
            buttons.push_str(&format!(
                "\t{}\n\t\tGesture: {}\n\t\t{}\n",
                action_name(j),
                action.gesture,
                target(&action.target)
            ));
        }
    }
    format!(
        "Count: {}\nIndex: {}\nButtons Count: {}\nButtons:\n{}",
        state.count, state.index, state.buttons_count, buttons
    )
}

fn backlight(color: &Hsbk) -> String {
    let (hue, saturation, brightness, kelvin) = color.to_human();
    format!("hue: {hue}, saturation: {saturation}, brightness: {brightness}, kelvin: {kelvin}")
}

pub fn button_config(config: &ButtonConfig) -> String {
    format!(
        "Haptic Duration (ms): {}\nBacklight on color: {}\nBacklight off color: {}",
        config.haptic_duration_ms,
        backlight(&config.backlight_on_color),
        backlight(&config.backlight_off_color)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{Button, ButtonAction, ButtonGesture};
    use crate::types::{EffectDirection, EffectKind, RelayIndex};

    #[test]
    fn test_multizone_effect_units() {
        let text = multizone_effect(&MultizoneEffect {
            kind: EffectKind::Move,
            speed_ms: 3000,
            duration_ns: 2_500_000_000,
            direction: EffectDirection::Left,
        });
        assert_eq!(
            text,
            "Current effect=MOVE\nSpeed=3\nDuration=2.500000\nDirection=LEFT"
        );
    }

    #[test]
    fn test_button_config_converts_to_human_units() {
        let text = button_config(&ButtonConfig {
            haptic_duration_ms: 20,
            backlight_on_color: Hsbk {
                hue: 21845,
                saturation: 65535,
                brightness: 32768,
                kelvin: 2700,
            },
            backlight_off_color: Hsbk::default(),
        });
        assert_eq!(
            text,
            "Haptic Duration (ms): 20\n\
             Backlight on color: hue: 120, saturation: 100, brightness: 50, kelvin: 2700\n\
             Backlight off color: hue: 0, saturation: 0, brightness: 0, kelvin: 0"
        );
    }

    #[test]
    fn test_button_limits_buttons_and_actions() {
        let action = |gesture| ButtonAction {
            gesture,
            target: ButtonTarget::Relays(vec![RelayIndex::from_index(0)]),
        };
        let pressed = Button {
            actions: vec![
                action(ButtonGesture::Press),
                action(ButtonGesture::PressPress),
                action(ButtonGesture::HoldPress),
                action(ButtonGesture::PressPressPress),
            ],
        };
        let text = button(&ButtonState {
            count: 1,
            index: 0,
            buttons_count: 1,
            buttons: vec![pressed.clone(), pressed],
        });

        assert!(text.contains("Button 1:"));
        assert!(!text.contains("Button 2:"));
        assert!(text.contains("Long Press"));
        assert!(!text.contains("Action 4"));
        assert!(text.contains("\t\tRelays: 1\n"));
    }

    #[test]
    fn test_relay_power_is_one_based() {
        let text = relay_power(&RelayPower {
            relay: RelayIndex::from_index(2),
            level: 65535,
        });
        assert_eq!(text, "Relay 3: On");
    }

    #[test]
    fn test_device_info_names_product() {
        let text = device_info(
            &DeviceInfo {
                mac: "d0:73:d5:00:00:01".to_string(),
                product: Some(90),
                ..DeviceInfo::default()
            },
            "  ",
        );
        assert!(text.contains("  Product: LIFX Clean"));
        assert!(text.contains("  Kelvin range: 1500-9000"));
        assert!(text.contains("  Label: Unknown"));
    }

    #[test]
    fn test_device_info_switch_has_no_kelvin_range() {
        let text = device_info(
            &DeviceInfo {
                mac: "d0:73:d5:00:00:02".to_string(),
                product: Some(70),
                ..DeviceInfo::default()
            },
            "",
        );
        assert!(text.contains("Product: LIFX Switch\nKelvin range: None\n"));
    }

    #[tokio::test]
    async fn test_deliver_prints_when_answered() {
        let (out, mut rx) = Output::channel();
        deliver(&out, Reply::ready(HevConfig::default()), hev_config);
        let text = rx.recv().await.unwrap();
        assert_eq!(text, "\nHEV: indication=false, duration=0\n");
    }

    #[tokio::test]
    async fn test_deliver_silent_when_unanswered() {
        let (out, mut rx) = Output::channel();
        let (responder, reply) = Reply::<HevConfig>::channel();
        deliver(&out, reply, hev_config);
        drop(responder);
        drop(out);
        assert_eq!(rx.recv().await, None);
    }
}
