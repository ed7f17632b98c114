//! The console's command table.
//!
//! Commands are looked up by `(code, capability)`: codes 9 and 10 mean one
//! thing on an HEV device and another on a multizone strip.

use log::warn;
use strum_macros::{Display, EnumIter};

use crate::errors::Error;
use crate::products::{Capability, Features};

type Result<T> = std::result::Result<T, Error>;

/// Code that leaves the device menu.
pub const BACK: u32 = 0;

/// Every operation the console can run against a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Command {
    Power,
    White,
    Colour,
    Info,
    Firmware,
    Wifi,
    Uptime,
    Pulse,
    HevCycle,
    HevConfiguration,
    MultizoneEffectStatus,
    MultizoneEffect,
    Relays,
    Button,
    ButtonConfig,
    Reboot,
}

/// One row of the command table.
#[derive(Debug, Clone, Copy)]
pub struct CommandDefinition {
    pub code: u32,
    pub command: Command,
    /// `None` when every device supports the command
    pub capability: Option<Capability>,
    /// Accepted argument counts
    pub arity: &'static [usize],
    pub usage: &'static str,
    pub menu: &'static str,
}

impl CommandDefinition {
    pub fn is_available(&self, features: &Features) -> bool {
        self.capability.is_none_or(|c| features.supports(c))
    }

    pub fn check_arity(&self, args: &[&str]) -> Result<()> {
        if self.arity.contains(&args.len()) {
            Ok(())
        } else {
            Err(Error::Arity { usage: self.usage })
        }
    }
}

const fn always(
    code: u32,
    command: Command,
    arity: &'static [usize],
    usage: &'static str,
    menu: &'static str,
) -> CommandDefinition {
    CommandDefinition {
        code,
        command,
        capability: None,
        arity,
        usage,
        menu,
    }
}

const fn gated(
    code: u32,
    command: Command,
    capability: Capability,
    arity: &'static [usize],
    usage: &'static str,
    menu: &'static str,
) -> CommandDefinition {
    CommandDefinition {
        code,
        command,
        capability: Some(capability),
        arity,
        usage,
        menu,
    }
}

// Order matters for shared codes: the first available entry wins.
static COMMANDS: &[CommandDefinition] = &[
    always(1, Command::Power, &[1], "1 <on|off>", "Power (0 or 1)"),
    gated(
        2,
        Command::White,
        Capability::ColorTemperature,
        &[2],
        "2 <brightness 0-100> <kelvin 2500-9000>",
        "White (Brightness Temperature)",
    ),
    gated(
        3,
        Command::Colour,
        Capability::Color,
        &[3],
        "3 <hue 0-360> <saturation 0-100> <brightness 0-100>",
        "Colour (Hue Saturation Brightness)",
    ),
    always(4, Command::Info, &[0], "4", "Info"),
    always(5, Command::Firmware, &[0], "5", "Firmware"),
    always(6, Command::Wifi, &[0], "6", "Wifi"),
    always(7, Command::Uptime, &[0], "7", "Uptime"),
    gated(
        8,
        Command::Pulse,
        Capability::Color,
        &[3],
        "8 <hue 0-360> <saturation 0-100> <brightness 0-100>",
        "Pulse",
    ),
    gated(
        9,
        Command::HevCycle,
        Capability::Hev,
        &[0, 1],
        "9 [seconds, or -1 to stop]",
        "HEV cycle (duration, or -1 to stop)",
    ),
    gated(
        10,
        Command::HevConfiguration,
        Capability::Hev,
        &[0, 2],
        "10 [<indication 0|1> <seconds>]",
        "HEV configuration (indication, duration)",
    ),
    gated(
        9,
        Command::MultizoneEffectStatus,
        Capability::Multizone,
        &[0],
        "9",
        "Get firmware effect status",
    ),
    gated(
        10,
        Command::MultizoneEffect,
        Capability::Multizone,
        &[1, 2],
        "10 <off|move> [left|right]",
        "Start or stop firmware effect ([off/move] [right|left])",
    ),
    gated(
        11,
        Command::Relays,
        Capability::Relays,
        &[0, 1, 2],
        "11 [relay [on|off]]",
        "Relays; optionally followed by relay number (beginning at 1); \
         optionally followed by `on` or `off` to set the value",
    ),
    gated(12, Command::Button, Capability::Relays, &[0], "12", "Button"),
    gated(
        13,
        Command::ButtonConfig,
        Capability::Relays,
        &[0, 9],
        "13 [<haptic_ms> <on hue 0-360> <on saturation 0-100> <on brightness 0-100> \
         <on kelvin 1500-9000> <off hue 0-360> <off saturation 0-100> \
         <off brightness 0-100> <off kelvin 1500-9000>]",
        "Button Config. Optionally followed by <haptic_duration_ms>, then hue (0-360), \
         saturation (0-100), brightness (0-100) and kelvin (1500-9000) for the backlight \
         on color and again for the backlight off color",
    ),
    always(
        99,
        Command::Reboot,
        &[0],
        "99",
        "Reboot the bulb (indicated by a reboot blink)",
    ),
];

/// The whole table, in menu order.
pub fn table() -> &'static [CommandDefinition] {
    COMMANDS
}

/// Commands a device with `features` can run, one per code.
pub fn menu(features: &Features) -> Vec<&'static CommandDefinition> {
    let mut entries: Vec<&'static CommandDefinition> = Vec::new();
    for definition in table().iter().filter(|d| d.is_available(features)) {
        if !entries.iter().any(|e| e.code == definition.code) {
            entries.push(definition);
        }
    }
    entries
}

/// Find the command `code` means for a device with `features`.
///
/// # Examples
///
/// ```
/// use lifx_console::{Command, Features, command};
///
/// let clean = Features::for_product(Some(90));
/// let strip = Features::for_product(Some(31));
/// assert_eq!(command::resolve(9, &clean, "Bathroom").unwrap().command, Command::HevCycle);
/// assert_eq!(
///     command::resolve(9, &strip, "Hallway").unwrap().command,
///     Command::MultizoneEffectStatus
/// );
/// assert!(command::resolve(9, &Features::default(), "Desk").is_err());
/// assert!(command::resolve(42, &clean, "Bathroom").is_err());
/// ```
pub fn resolve(
    code: u32,
    features: &Features,
    device: &str,
) -> Result<&'static CommandDefinition> {
    let mut candidates = table().iter().filter(|d| d.code == code).peekable();
    let Some(first) = candidates.peek().copied() else {
        return Err(Error::UnknownCommand(code));
    };

    let mut available = candidates.filter(|d| d.is_available(features));
    let Some(chosen) = available.next() else {
        let capability = first.capability.map_or("this command", Capability::describe);
        return Err(Error::capability(device, capability));
    };
    if let Some(shadowed) = available.next() {
        warn!(
            "{device} supports both {} and {} on code {code}; using {}",
            chosen.command, shadowed.command, chosen.command
        );
    }
    Ok(chosen)
}
