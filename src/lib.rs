//! # lifx_console
//!
//! An interactive console for discovering and controlling LIFX smart lights.
//!
//! The operator picks a device from a sorted list, then issues short numeric
//! commands against it. Each command is checked against the device's
//! product features, its arguments are converted from human units into the
//! protocol's fixed-point ranges, and query results are printed whenever the
//! device answers.
//!
//! ## Quick Start
//!
//! ```
//! use lifx_console::{ConsoleConfig, Output, Session, SimulatedDevice};
//!
//! let (out, mut screen) = Output::channel();
//! let mut session = Session::new(out, ConsoleConfig::default());
//!
//! let lamp = SimulatedDevice::builder("d0:73:d5:00:00:01")
//!     .label("Kitchen")
//!     .product(27)
//!     .build();
//! session.register(lamp.clone());
//!
//! // Select the first bulb, then set it to warm white at full brightness.
//! session.handle_line("1");
//! session.handle_line("2 100 2700");
//! assert_eq!(lamp.color().as_array(), [58275, 0, 65365, 2700]);
//! assert!(screen.drain().ends_with("Your choice: "));
//! ```
//!
//! ## Features
//!
//! - **Feature gating**: menus and commands follow the product's
//!   capabilities ([`Features`], [`Capability`])
//! - **Unit conversion**: [`Hue`], [`Level`], [`Kelvin`] and friends reject
//!   out-of-range input before anything is sent
//! - **Asynchronous replies**: queries return a [`Reply`] that is rendered
//!   when it resolves, without blocking input
//! - **HEV, multizone and switches**: cleaning cycles, firmware effects,
//!   relays and button configuration
//! - **Simulation**: [`SimulatedDevice`] and [`SimulatedFleet`] stand in for
//!   real devices
//!
//! ## Runtime
//!
//! Everything runs on a current-thread tokio runtime. Query rendering and
//! delayed reboots are spawned tasks, so [`Session::handle_line`] must be
//! called from inside a runtime whenever a command may query a device.

pub mod command;
mod config;
pub mod console;
mod device;
mod discovery;
mod dispatch;
mod errors;
mod history;
mod products;
pub mod render;
mod registry;
mod response;
mod session;
mod simulator;
mod types;

// Re-export public API
pub use command::{Command, CommandDefinition};
pub use config::ConsoleConfig;
pub use device::{ButtonConfigRequest, Device, DeviceHandle, Reply, Responder};
pub use discovery::{BulbSpec, DiscoveryEvent, SimulatedFleet};
pub use dispatch::Outcome;
pub use errors::{Error, ValidationError};
pub use history::{CallLog, HistoryEntry, HistorySummary, MessageType};
pub use products::{Capability, Features, KelvinRange, ProductDescriptor};
pub use registry::Registry;
pub use render::{Output, OutputReceiver};
pub use response::{
    Button, ButtonAction, ButtonConfig, ButtonGesture, ButtonState, ButtonTarget, DeviceInfo,
    FirmwareInfo, HevConfig, HevCycle, HevCycleResult, HostInfo, MultizoneEffect, RelayPower,
    WifiInfo,
};
pub use session::{CANCEL, Session, State};
pub use simulator::{SimulatedDevice, SimulatedDeviceBuilder};
pub use types::{
    EffectDirection, EffectKind, HapticDuration, HevConfigRequest, HevCycleRequest, Hsbk, Hue,
    Kelvin, Level, MultizoneEffectRequest, PowerState, RelayIndex, Waveform, WaveformKind,
};
