//! The operator's session: which device is selected and what each input line
//! does to it.

use std::fmt::Write;

use log::{debug, info};
use tokio::task::JoinHandle;

use crate::command::{self, BACK};
use crate::config::ConsoleConfig;
use crate::device::DeviceHandle;
use crate::discovery::DiscoveryEvent;
use crate::dispatch::{self, Invocation, Outcome};
use crate::errors::Error;
use crate::registry::Registry;
use crate::render::Output;

type Result<T> = std::result::Result<T, Error>;

/// Input that aborts a pending reboot.
pub const CANCEL: &str = "cancel";

/// Where the session is.
#[derive(Clone)]
pub enum State<'a> {
    /// No device selected; input picks one by index.
    SelectingDevice,
    /// A device is selected; input is a command for it.
    DeviceMenu(&'a DeviceHandle),
}

struct PendingReboot {
    device: String,
    task: JoinHandle<()>,
}

/// Console session state.
///
/// The selection is stored as a hardware address and resolved through the
/// registry on every access, so it can never refer to a device that is no
/// longer registered.
pub struct Session {
    registry: Registry,
    selection: Option<String>,
    out: Output,
    config: ConsoleConfig,
    pending_reboot: Option<PendingReboot>,
}

impl Session {
    pub fn new(out: Output, config: ConsoleConfig) -> Self {
        Session {
            registry: Registry::new(),
            selection: None,
            out,
            config,
            pending_reboot: None,
        }
    }

    pub fn register(&mut self, device: DeviceHandle) {
        info!("{} is available", device.display_name());
        self.registry.add(device);
    }

    /// Forget a device; if it was selected the session goes back to device
    /// selection.
    pub fn unregister(&mut self, mac: &str) {
        let Some(device) = self.registry.remove(mac) else {
            debug!("{mac} was not registered");
            return;
        };
        info!("{} is gone", device.display_name());
        if self.selection.as_deref() == Some(mac) {
            self.selection = None;
        }
    }

    pub fn apply(&mut self, event: DiscoveryEvent) {
        match event {
            DiscoveryEvent::Registered(device) => self.register(device),
            DiscoveryEvent::Unregistered(mac) => self.unregister(&mac),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn selected(&self) -> Option<&DeviceHandle> {
        self.selection
            .as_deref()
            .and_then(|mac| self.registry.find(mac))
    }

    pub fn state(&self) -> State<'_> {
        match self.selected() {
            Some(device) => State::DeviceMenu(device),
            None => State::SelectingDevice,
        }
    }

    pub fn reboot_pending(&self) -> bool {
        self.pending_reboot
            .as_ref()
            .is_some_and(|pending| !pending.task.is_finished())
    }

    /// Process one line of operator input and redraw the menu.
    ///
    /// Errors are printed; they never change the session state.
    pub fn handle_line(&mut self, line: &str) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        self.registry.refresh();

        let result = match tokens.split_first() {
            None => Ok(()),
            Some((&CANCEL, [])) if self.reboot_pending() => {
                self.cancel_reboot();
                Ok(())
            }
            Some((first, args)) => match self.selected().cloned() {
                None => self.select(first),
                Some(device) => self.execute(&device, first, args),
            },
        };

        if let Err(err) = result {
            self.out.line(format!("\nError: {err}\n"));
        }
        self.show_menu();
    }

    /// Print the menu for the current state.
    pub fn show_menu(&mut self) {
        self.registry.refresh();
        self.out.print(self.render_menu());
    }

    /// The menu for the current state, ending with the input prompt.
    pub fn render_menu(&self) -> String {
        let mut menu = String::new();
        match self.state() {
            State::SelectingDevice => {
                menu.push_str("Select Bulb:\n");
                for (i, device) in self.registry.list().iter().enumerate() {
                    let _ = writeln!(menu, "\t[{}]\t{}", i + 1, device.display_name());
                }
            }
            State::DeviceMenu(device) => {
                let _ = writeln!(menu, "Select Function for {}:", device.display_name());
                let features = self.registry.features(device.hardware_address());
                for definition in command::menu(&features) {
                    let _ = writeln!(menu, "\t[{}]\t{}", definition.code, definition.menu);
                }
                let _ = write!(menu, "\n\t[{BACK}]\tBack to bulb selection\n");
            }
        }
        menu.push_str("\nYour choice: ");
        menu
    }

    fn select(&mut self, token: &str) -> Result<()> {
        let index: i64 = token
            .parse()
            .map_err(|_| Error::parse("selection", token))?;
        let count = self.registry.len();
        let device = usize::try_from(index)
            .ok()
            .and_then(|i| self.registry.get(i))
            .ok_or_else(|| Error::range("selection", index, 1, count as i64))?;

        debug!("selected {}", device.display_name());
        self.selection = Some(device.hardware_address().to_string());
        Ok(())
    }

    fn execute(&mut self, device: &DeviceHandle, code: &str, args: &[&str]) -> Result<()> {
        let code: u32 = code.parse().map_err(|_| Error::parse("command", code))?;
        if code == BACK {
            self.selection = None;
            return Ok(());
        }

        let name = device.display_name();
        let features = self.registry.features(device.hardware_address());
        let definition = command::resolve(code, &features, &name)?;
        let invocation = Invocation {
            device,
            features: &features,
            args,
            out: &self.out,
        };

        match dispatch::run(definition, &invocation)? {
            Outcome::Completed => self.selection = None,
            Outcome::Reboot => self.schedule_reboot(device),
        }
        Ok(())
    }

    fn schedule_reboot(&mut self, device: &DeviceHandle) {
        self.cancel_reboot();

        let delay = self.config.reboot_delay;
        let name = device.display_name();
        self.out.line(format!(
            "Rebooting bulb in {} seconds. If the bulb is on, it will flicker off and back on as it reboots.",
            delay.as_secs_f64()
        ));
        self.out.line(format!(
            "Type `{CANCEL}` within {} seconds to keep the bulb running.",
            delay.as_secs_f64()
        ));

        let device = device.clone();
        let out = self.out.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            device.reboot();
            info!("rebooted {}", device.display_name());
            out.line("\nBulb rebooted.");
        });
        self.pending_reboot = Some(PendingReboot { device: name, task });
    }

    fn cancel_reboot(&mut self) {
        if let Some(device) = self.cancel_pending() {
            self.out.line(format!("Reboot of {device} cancelled."));
        }
    }

    /// Abort the pending reboot, returning the device name if it had not run.
    fn cancel_pending(&mut self) -> Option<String> {
        let pending = self.pending_reboot.take()?;
        if pending.task.is_finished() {
            return None;
        }
        pending.task.abort();
        debug!("reboot of {} aborted", pending.device);
        Some(pending.device)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::render::OutputReceiver;
    use crate::simulator::SimulatedDevice;

    fn session() -> (Session, OutputReceiver) {
        let (out, rx) = Output::channel();
        (Session::new(out, ConsoleConfig::default()), rx)
    }

    fn lamp(mac: &str, label: &str, product: u32) -> Arc<SimulatedDevice> {
        SimulatedDevice::builder(mac)
            .label(label)
            .product(product)
            .build()
    }

    fn selected_name(session: &Session) -> Option<String> {
        session.selected().map(|d| d.display_name())
    }

    #[test]
    fn test_index_selects_device_and_menu_lists_its_commands() {
        let (mut session, mut rx) = session();
        session.register(lamp("aa", "Lamp A", 27));
        session.register(lamp("bb", "Lamp B", 70));

        session.handle_line("2");
        assert_eq!(selected_name(&session).as_deref(), Some("Lamp B"));

        let menu = rx.drain();
        assert!(menu.starts_with("Select Function for Lamp B:\n"));
        assert!(menu.contains("\t[11]\tRelays"));
        assert!(!menu.contains("\t[3]\tColour"));
        assert!(menu.ends_with("\n\t[0]\tBack to bulb selection\n\nYour choice: "));
    }

    #[test]
    fn test_selection_menu_is_sorted_and_one_based() {
        let (mut session, _rx) = session();
        session.register(lamp("bb", "Porch", 27));
        session.register(SimulatedDevice::builder("aa").build());
        session.register(lamp("cc", "Attic", 27));

        assert_eq!(
            session.render_menu(),
            "Select Bulb:\n\t[1]\tAttic\n\t[2]\tPorch\n\t[3]\taa\n\nYour choice: "
        );
    }

    #[test]
    fn test_bad_selection_input() {
        let (mut session, mut rx) = session();
        session.register(lamp("aa", "Lamp A", 27));

        session.handle_line("lamp");
        assert!(rx.drain().contains("Error: selection must be a number"));
        session.handle_line("0");
        assert!(rx.drain().contains("Error: selection 0 is not valid; choose between 1 and 1"));
        session.handle_line("2");
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_white_sends_legacy_tuple_and_clears_selection() {
        let (mut session, _rx) = session();
        let lamp = lamp("aa", "Lamp", 27);
        session.register(lamp.clone());

        session.handle_line("1");
        session.handle_line("2 100 3500");
        assert_eq!(
            lamp.call_log().last_params("set_color"),
            Some(&json!([58275, 0, 65365, 3500]))
        );
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_gated_code_on_plain_bulb_calls_nothing() {
        let (mut session, mut rx) = session();
        let lamp = lamp("aa", "Desk", 10);
        session.register(lamp.clone());

        session.handle_line("1");
        rx.drain();
        session.handle_line("9");

        let text = rx.drain();
        assert!(text.contains("Error: Desk does not support HEV cleaning cycles"));
        assert!(text.contains("Select Function for Desk:"));
        assert!(lamp.call_log().is_empty());
        assert_eq!(selected_name(&session).as_deref(), Some("Desk"));
    }

    #[test]
    fn test_relay_on_non_switch_is_an_error() {
        let (mut session, mut rx) = session();
        let lamp = lamp("aa", "Kitchen", 27);
        session.register(lamp.clone());

        session.handle_line("1");
        session.handle_line("11 1 on");
        assert!(rx.drain().contains("Error: Kitchen does not support relays"));
        assert!(lamp.call_log().is_empty());
    }

    #[test]
    fn test_unknown_code_and_bad_arity_keep_selection() {
        let (mut session, mut rx) = session();
        let lamp = lamp("aa", "Kitchen", 27);
        session.register(lamp.clone());
        session.handle_line("1");

        session.handle_line("42");
        assert!(rx.drain().contains("Error: 42 is not a known command"));
        session.handle_line("3 120 100");
        assert!(rx.drain().contains("Error: usage: 3 <hue 0-360>"));
        session.handle_line("power on");
        assert!(rx.drain().contains("Error: command must be a number"));

        assert!(lamp.call_log().is_empty());
        assert!(session.selected().is_some());
    }

    #[test]
    fn test_back_returns_to_selection() {
        let (mut session, _rx) = session();
        session.register(lamp("aa", "Kitchen", 27));
        session.handle_line("1");
        session.handle_line("0");
        assert!(matches!(session.state(), State::SelectingDevice));
    }

    #[test]
    fn test_blank_line_redraws_menu() {
        let (mut session, mut rx) = session();
        session.register(lamp("aa", "Kitchen", 27));
        session.handle_line("");
        assert_eq!(rx.drain(), session.render_menu());
    }

    #[test]
    fn test_unregistering_selected_device_clears_selection() {
        let (mut session, _rx) = session();
        session.register(lamp("aa", "Kitchen", 27));
        session.register(lamp("bb", "Hallway", 31));
        session.handle_line("2");
        assert_eq!(selected_name(&session).as_deref(), Some("Kitchen"));

        session.apply(DiscoveryEvent::Unregistered("bb".to_string()));
        assert!(session.selected().is_some());
        session.apply(DiscoveryEvent::Unregistered("aa".to_string()));
        assert!(matches!(session.state(), State::SelectingDevice));
        assert!(session.registry().is_empty());
    }

    #[test]
    fn test_late_label_changes_indices() {
        let (mut session, _rx) = session();
        let late = SimulatedDevice::builder("ff").product(27).build();
        session.register(late.clone());
        session.register(lamp("00", "Kitchen", 27));

        late.set_label("Bathroom");
        session.handle_line("1");
        assert_eq!(selected_name(&session).as_deref(), Some("Bathroom"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_result_prints_later() {
        let (mut session, mut rx) = session();
        let clean = SimulatedDevice::builder("aa")
            .label("Bathroom")
            .product(90)
            .latency(Duration::from_millis(100))
            .build();
        session.register(clean.clone());
        session.handle_line("1");
        rx.drain();

        session.handle_line("10");
        let text = rx.drain();
        assert!(text.starts_with("Getting current HEV configuration\n"));
        assert!(!text.contains("HEV: indication"));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(rx.drain(), "\nHEV: indication=true, duration=7200\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_device_prints_nothing() {
        let (mut session, mut rx) = session();
        let lamp = SimulatedDevice::builder("aa")
            .label("Attic")
            .product(27)
            .unreachable()
            .build();
        session.register(lamp.clone());
        session.handle_line("1");
        session.handle_line("6");
        rx.drain();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(rx.drain(), "");
        assert_eq!(lamp.call_log().calls(), vec!["get_wifi_info"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reboot_runs_after_delay_and_keeps_selection() {
        let (mut session, mut rx) = session();
        let lamp = lamp("aa", "Kitchen", 27);
        session.register(lamp.clone());
        session.handle_line("1");

        session.handle_line("99");
        assert!(rx.drain().contains("Rebooting bulb in 3 seconds"));
        assert!(session.reboot_pending());
        assert!(session.selected().is_some());

        // Input is still serviced while the reboot is pending.
        session.handle_line("4");
        assert!(lamp.call_log().is_empty());

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(lamp.call_log().calls(), vec!["reboot"]);
        assert!(rx.drain().contains("Bulb rebooted."));
        assert!(!session.reboot_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_reboot_never_reaches_device() {
        let (mut session, mut rx) = session();
        let lamp = lamp("aa", "Kitchen", 27);
        session.register(lamp.clone());
        session.handle_line("1");
        session.handle_line("99");

        tokio::time::sleep(Duration::from_secs(1)).await;
        session.handle_line("cancel");
        assert!(rx.drain().contains("Reboot of Kitchen cancelled."));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(lamp.call_log().is_empty());
        assert!(!session.reboot_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_reboot_replaces_first_and_says_so() {
        let (mut session, mut rx) = session();
        let alpha = lamp("aa", "Alpha", 27);
        let beta = lamp("bb", "Beta", 27);
        session.register(alpha.clone());
        session.register(beta.clone());

        session.handle_line("1");
        session.handle_line("99");
        session.handle_line("0");
        session.handle_line("2");
        rx.drain();
        session.handle_line("99");
        assert!(rx.drain().starts_with("Reboot of Alpha cancelled.\n"));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(alpha.call_log().is_empty());
        assert_eq!(beta.call_log().calls(), vec!["reboot"]);
    }

    #[test]
    fn test_cancel_without_pending_reboot_is_a_command_token() {
        let (mut session, mut rx) = session();
        session.register(lamp("aa", "Kitchen", 27));
        session.handle_line("cancel");
        assert!(rx.drain().contains("Error: selection must be a number"));
    }
}
