//! Per-command handlers.
//!
//! Every handler converts all of its arguments before touching the device,
//! so a bad argument never leaves a half-applied command behind.

use log::debug;

use crate::command::{Command, CommandDefinition};
use crate::device::{ButtonConfigRequest, DeviceHandle};
use crate::errors::Error;
use crate::products::Features;
use crate::render::{self, Output, deliver};
use crate::types::{
    EffectKind, HapticDuration, HevConfigRequest, HevCycleRequest, Hsbk, Hue, Kelvin, Level,
    MultizoneEffectRequest, PowerState, RelayIndex, Waveform, parse_number,
};

type Result<T> = std::result::Result<T, Error>;

/// What the session should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Done; return to device selection.
    Completed,
    /// Schedule a reboot of the selected device and keep it selected.
    Reboot,
}

/// Everything a handler needs: the target device, its features, the
/// operator's arguments and where to print.
pub struct Invocation<'a> {
    pub device: &'a DeviceHandle,
    pub features: &'a Features,
    pub args: &'a [&'a str],
    pub out: &'a Output,
}

/// Run a resolved command.
pub fn run(definition: &CommandDefinition, invocation: &Invocation<'_>) -> Result<Outcome> {
    definition.check_arity(invocation.args)?;
    debug!(
        "{} on {} with {:?}",
        definition.command,
        invocation.device.hardware_address(),
        invocation.args
    );

    match definition.command {
        Command::Power => power(invocation),
        Command::White => white(invocation),
        Command::Colour => colour(invocation),
        Command::Info => info(invocation),
        Command::Firmware => firmware(invocation),
        Command::Wifi => wifi(invocation),
        Command::Uptime => uptime(invocation),
        Command::Pulse => pulse(invocation),
        Command::HevCycle => hev_cycle(invocation),
        Command::HevConfiguration => hev_configuration(invocation),
        Command::MultizoneEffectStatus => multizone_effect_status(invocation),
        Command::MultizoneEffect => multizone_effect(invocation),
        Command::Relays => relays(invocation),
        Command::Button => button(invocation),
        Command::ButtonConfig => button_config(invocation),
        Command::Reboot => Ok(Outcome::Reboot),
    }
}

fn power(inv: &Invocation<'_>) -> Result<Outcome> {
    let power = PowerState::parse("power", inv.args[0])?;
    inv.device.set_power(power);
    Ok(Outcome::Completed)
}

fn white(inv: &Invocation<'_>) -> Result<Outcome> {
    let brightness = Level::legacy_white(parse_number("brightness", inv.args[0])?)?;
    let kelvin = Kelvin::parse_white(inv.args[1])?;
    inv.device.set_color(Hsbk::white(brightness, kelvin));
    Ok(Outcome::Completed)
}

/// Parse `<hue> <saturation> <brightness>` at the neutral temperature.
fn parse_color(args: &[&str]) -> Result<Hsbk> {
    Ok(Hsbk::new(
        Hue::parse(args[0])?,
        Level::parse("saturation", args[1])?,
        Level::parse("brightness", args[2])?,
        Kelvin::default(),
    ))
}

fn colour(inv: &Invocation<'_>) -> Result<Outcome> {
    let color = parse_color(inv.args)?;
    inv.device.set_color(color);
    Ok(Outcome::Completed)
}

fn info(inv: &Invocation<'_>) -> Result<Outcome> {
    inv.out.line(render::device_info(&inv.device.info(), "    "));
    Ok(Outcome::Completed)
}

fn firmware(inv: &Invocation<'_>) -> Result<Outcome> {
    inv.out.line(render::firmware(&inv.device.firmware(), "   "));
    Ok(Outcome::Completed)
}

fn wifi(inv: &Invocation<'_>) -> Result<Outcome> {
    deliver(inv.out, inv.device.get_wifi_info(), render::wifi);
    Ok(Outcome::Completed)
}

fn uptime(inv: &Invocation<'_>) -> Result<Outcome> {
    deliver(inv.out, inv.device.get_host_info(), render::host_time);
    Ok(Outcome::Completed)
}

fn pulse(inv: &Invocation<'_>) -> Result<Outcome> {
    let color = parse_color(inv.args)?;
    inv.out.line(format!("Sending {:?}", color.as_array()));
    inv.device.set_waveform(Waveform::pulse(color));
    Ok(Outcome::Completed)
}

fn hev_cycle(inv: &Invocation<'_>) -> Result<Outcome> {
    let Some(duration) = inv.args.first() else {
        inv.out.line("Getting current HEV state");
        deliver(inv.out, inv.device.get_hev_cycle(), render::hev_cycle);
        deliver(
            inv.out,
            inv.device.get_last_hev_cycle_result(),
            render::hev_result,
        );
        return Ok(Outcome::Completed);
    };

    let request = HevCycleRequest::parse(duration)?;
    if request.enable {
        inv.out.line(format!(
            "Running HEV cycle for {} second(s)",
            request.duration_s
        ));
    } else {
        inv.out.line("Aborting HEV cycle");
    }
    deliver(inv.out, inv.device.set_hev_cycle(request), render::hev_cycle);
    Ok(Outcome::Completed)
}

fn hev_configuration(inv: &Invocation<'_>) -> Result<Outcome> {
    let [indication, duration] = inv.args else {
        inv.out.line("Getting current HEV configuration");
        deliver(
            inv.out,
            inv.device.get_hev_configuration(),
            render::hev_config,
        );
        return Ok(Outcome::Completed);
    };

    let request = HevConfigRequest::parse(indication, duration)?;
    inv.out.line(format!(
        "Configuring default HEV cycle with {}indication for {} second(s)",
        if request.indication { "" } else { "no " },
        request.duration_s
    ));
    deliver(
        inv.out,
        inv.device.set_hev_configuration(request),
        render::hev_config,
    );
    Ok(Outcome::Completed)
}

fn multizone_effect_status(inv: &Invocation<'_>) -> Result<Outcome> {
    inv.out
        .line("Getting current firmware effect state from multizone device");
    deliver(
        inv.out,
        inv.device.get_multizone_effect(),
        render::multizone_effect,
    );
    Ok(Outcome::Completed)
}

fn multizone_effect(inv: &Invocation<'_>) -> Result<Outcome> {
    let request = match inv.args {
        [effect, direction] => MultizoneEffectRequest::parse(effect, direction)?,
        [effect] => {
            // A lone argument stops the effect; it still has to be a known effect name.
            EffectKind::parse(effect)?;
            MultizoneEffectRequest::stop()
        }
        _ => unreachable!("arity is checked before dispatch"),
    };
    inv.device.set_multizone_effect(request);
    Ok(Outcome::Completed)
}

fn relays(inv: &Invocation<'_>) -> Result<Outcome> {
    let relay_count = inv.features.relay_count;
    match inv.args {
        [] => {
            for index in 0..relay_count {
                deliver(
                    inv.out,
                    inv.device.get_relay_power(RelayIndex::from_index(index)),
                    render::relay_power,
                );
            }
        }
        [relay] => {
            let relay = RelayIndex::parse(relay, relay_count)?;
            deliver(
                inv.out,
                inv.device.get_relay_power(relay),
                render::relay_power,
            );
        }
        [relay, state] => {
            let relay = RelayIndex::parse(relay, relay_count)?;
            let power = PowerState::parse("relay state", state)?;
            deliver(
                inv.out,
                inv.device.set_relay_power(relay, power),
                render::relay_power,
            );
        }
        _ => unreachable!("arity is checked before dispatch"),
    }
    Ok(Outcome::Completed)
}

fn button(inv: &Invocation<'_>) -> Result<Outcome> {
    deliver(inv.out, inv.device.get_button(), render::button);
    Ok(Outcome::Completed)
}

/// Parse a backlight `<hue> <saturation> <brightness> <kelvin>`.
///
/// An out-of-range kelvin is clamped rather than rejected; the returned
/// message says so.
fn parse_backlight(args: &[&str]) -> Result<(Hsbk, Option<String>)> {
    let hue = Hue::parse(args[0])?;
    let saturation = Level::parse("saturation", args[1])?;
    let brightness = Level::parse("brightness", args[2])?;
    let requested = parse_number("backlight kelvin", args[3])?;

    let (kelvin, warning) = match Kelvin::backlight(requested) {
        Ok(kelvin) => (kelvin, None),
        Err(err) => {
            let kelvin = Kelvin::backlight_clamped(requested);
            let warning = format!("Warning: {err}; using {}", kelvin.kelvin());
            (kelvin, Some(warning))
        }
    };
    Ok((Hsbk::new(hue, saturation, brightness, kelvin), warning))
}

fn button_config(inv: &Invocation<'_>) -> Result<Outcome> {
    if inv.args.is_empty() {
        deliver(
            inv.out,
            inv.device.get_button_config(),
            render::button_config,
        );
        return Ok(Outcome::Completed);
    }

    let haptic_duration = HapticDuration::parse(inv.args[0])?;
    let (backlight_on_color, on_warning) = parse_backlight(&inv.args[1..5])?;
    let (backlight_off_color, off_warning) = parse_backlight(&inv.args[5..9])?;
    for warning in [on_warning, off_warning].into_iter().flatten() {
        inv.out.line(warning);
    }

    let request = ButtonConfigRequest {
        haptic_duration,
        backlight_on_color,
        backlight_off_color,
    };
    deliver(
        inv.out,
        inv.device.set_button_config(request),
        render::button_config,
    );
    Ok(Outcome::Completed)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::command::resolve;
    use crate::device::Device;
    use crate::errors::ValidationError;
    use crate::simulator::SimulatedDevice;

    fn invoke(device: &Arc<SimulatedDevice>, code: u32, args: &[&str]) -> (Result<Outcome>, String) {
        let (out, mut rx) = Output::channel();
        let handle: DeviceHandle = device.clone();
        let features = Features::for_product(device.product_id());
        let result = resolve(code, &features, "test").and_then(|definition| {
            run(
                definition,
                &Invocation {
                    device: &handle,
                    features: &features,
                    args,
                    out: &out,
                },
            )
        });
        (result, rx.drain())
    }

    #[test]
    fn test_white_uses_legacy_scale() {
        let lamp = SimulatedDevice::builder("aa").product(27).build();
        let (result, _) = invoke(&lamp, 2, &["100", "3500"]);
        assert_eq!(result.unwrap(), Outcome::Completed);
        assert_eq!(lamp.color().as_array(), [58275, 0, 65365, 3500]);
    }

    #[test]
    fn test_white_rejects_kelvin_out_of_range() {
        let lamp = SimulatedDevice::builder("aa").product(27).build();
        let (result, _) = invoke(&lamp, 2, &["50", "2000"]);
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(lamp.call_log().is_empty());
    }

    #[test]
    fn test_colour_bad_second_argument_sends_nothing() {
        let lamp = SimulatedDevice::builder("aa").product(27).build();
        let (result, _) = invoke(&lamp, 3, &["120", "lots", "50"]);
        assert!(result.is_err());
        assert!(lamp.call_log().is_empty());
    }

    #[test]
    fn test_pulse_announces_color() {
        let lamp = SimulatedDevice::builder("aa").product(27).build();
        let (result, text) = invoke(&lamp, 8, &["360", "100", "50"]);
        assert!(result.is_ok());
        assert_eq!(text, "Sending [65535, 65535, 32768, 3500]\n");
        let waveform = lamp.call_log().last_params("set_waveform").cloned().unwrap();
        assert_eq!(waveform["period_ms"], json!(100));
        assert_eq!(waveform["cycles"], json!(30.0));
        assert_eq!(waveform["transient"], json!(true));
    }

    #[test]
    fn test_power_rejects_unknown_word() {
        let lamp = SimulatedDevice::builder("aa").build();
        let (result, _) = invoke(&lamp, 1, &["maybe"]);
        assert!(result.is_err());
        assert!(lamp.call_log().is_empty());

        let (result, _) = invoke(&lamp, 1, &["TRUE"]);
        assert!(result.is_ok());
        assert_eq!(lamp.power(), PowerState::On);
    }

    #[test]
    fn test_extra_arguments_are_rejected() {
        let lamp = SimulatedDevice::builder("aa").product(27).build();
        let (result, _) = invoke(&lamp, 1, &["on", "now"]);
        assert!(matches!(result, Err(Error::Arity { .. })));
        assert!(lamp.call_log().is_empty());
    }

    #[test]
    fn test_reboot_is_deferred_to_session() {
        let lamp = SimulatedDevice::builder("aa").build();
        let (result, _) = invoke(&lamp, 99, &[]);
        assert_eq!(result.unwrap(), Outcome::Reboot);
        assert!(lamp.call_log().is_empty());
    }

    #[test]
    fn test_info_prints_cached_details() {
        let lamp = SimulatedDevice::builder("aa").label("Porch").product(27).build();
        let (_, text) = invoke(&lamp, 4, &[]);
        assert!(text.contains("    Label: Porch"));
        assert!(text.contains("    Product: LIFX A19"));
        assert!(lamp.call_log().is_empty());
    }

    #[tokio::test]
    async fn test_hev_abort() {
        let clean = SimulatedDevice::builder("aa").product(90).build();
        let (result, text) = invoke(&clean, 9, &["-1"]);
        assert!(result.is_ok());
        assert_eq!(text, "Aborting HEV cycle\n");
        assert_eq!(
            clean.call_log().last_params("set_hev_cycle"),
            Some(&json!({"enable": false, "duration_s": 0}))
        );
    }

    #[tokio::test]
    async fn test_hev_status_queries_cycle_and_result() {
        let clean = SimulatedDevice::builder("aa").product(90).build();
        let (_, text) = invoke(&clean, 9, &[]);
        assert_eq!(text, "Getting current HEV state\n");
        assert_eq!(
            clean.call_log().calls(),
            vec!["get_hev_cycle", "get_last_hev_cycle_result"]
        );
    }

    #[tokio::test]
    async fn test_hev_configuration_message() {
        let clean = SimulatedDevice::builder("aa").product(90).build();
        let (_, text) = invoke(&clean, 10, &["0", "3600"]);
        assert_eq!(
            text,
            "Configuring default HEV cycle with no indication for 3600 second(s)\n"
        );
    }

    #[test]
    fn test_multizone_single_argument_stops() {
        let strip = SimulatedDevice::builder("aa").product(31).build();
        let (result, _) = invoke(&strip, 10, &["off"]);
        assert!(result.is_ok());
        let params = strip.call_log().last_params("set_multizone_effect").cloned();
        assert_eq!(params.unwrap()["kind"], json!("Off"));

        let (result, _) = invoke(&strip, 10, &["sparkle"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_multizone_move_left() {
        let strip = SimulatedDevice::builder("aa").product(31).build();
        let (result, _) = invoke(&strip, 10, &["move", "LEFT"]);
        assert!(result.is_ok());
        let params = strip.call_log().last_params("set_multizone_effect").cloned().unwrap();
        assert_eq!(params["kind"], json!("Move"));
        assert_eq!(params["direction"], json!("Left"));
        assert_eq!(params["speed_ms"], json!(3000));
    }

    #[tokio::test]
    async fn test_relays_without_argument_query_all() {
        let switch = SimulatedDevice::builder("aa").product(70).build();
        let (result, _) = invoke(&switch, 11, &[]);
        assert!(result.is_ok());
        assert_eq!(switch.call_log().calls(), vec!["get_relay_power"; 4]);
    }

    #[tokio::test]
    async fn test_relay_index_is_validated_before_call() {
        let switch = SimulatedDevice::builder("aa").product(70).build();
        let (result, _) = invoke(&switch, 11, &["5", "on"]);
        assert_eq!(result.unwrap_err(), Error::range("relay", 5, 1, 4));

        let (result, _) = invoke(&switch, 11, &["2", "dim"]);
        assert!(result.is_err());
        assert!(switch.call_log().is_empty());

        let (result, _) = invoke(&switch, 11, &["2", "on"]);
        assert!(result.is_ok());
        assert_eq!(
            switch.call_log().last_params("set_relay_power"),
            Some(&json!([1, true]))
        );
    }

    #[tokio::test]
    async fn test_button_config_clamps_backlight_kelvin() {
        let switch = SimulatedDevice::builder("aa").product(70).build();
        let args = ["20", "120", "100", "50", "1000", "0", "0", "0", "3500"];
        let (result, text) = invoke(&switch, 13, &args);
        assert!(result.is_ok());
        assert!(text.starts_with("Warning: backlight kelvin must be between 1500 and 9000"));
        assert!(text.contains("using 1500"));

        let params = switch.call_log().last_params("set_button_config").cloned().unwrap();
        assert_eq!(params["haptic_duration_ms"], json!(20));
        assert_eq!(
            params["backlight_on_color"],
            json!({"hue": 21845, "saturation": 65535, "brightness": 32768, "kelvin": 1500})
        );
    }

    #[tokio::test]
    async fn test_button_config_clamps_hot_backlight_to_upper_bound() {
        let switch = SimulatedDevice::builder("aa").product(70).build();
        let args = ["20", "0", "0", "100", "3500", "0", "0", "0", "12000"];
        let (result, text) = invoke(&switch, 13, &args);
        assert!(result.is_ok());
        assert!(text.contains("using 9000"));

        let params = switch.call_log().last_params("set_button_config").cloned().unwrap();
        assert_eq!(params["backlight_off_color"]["kelvin"], json!(9000));
        assert_eq!(params["backlight_on_color"]["kelvin"], json!(3500));
    }

    #[test]
    fn test_button_config_partial_arguments() {
        let switch = SimulatedDevice::builder("aa").product(70).build();
        let (result, _) = invoke(&switch, 13, &["20", "120"]);
        assert!(matches!(result, Err(Error::Arity { .. })));
        assert!(switch.call_log().is_empty());
    }
}
