//! Android device fleet helper.
//!
//! Detects devices stuck in the "unauthorized" USB-debugging state, maps each
//! one to the hub port it hangs off by reading `uhubctl`'s report, and
//! power-cycles exactly those ports so the device re-prompts for trust.

pub mod adb;
pub mod config;
pub mod exec;
pub mod hub;
pub mod logging;
pub mod model;
pub mod recover;

pub use config::Config;
pub use model::{DeviceRecord, DeviceSerial, DeviceState, HubId, HubTopology, PortBinding};
pub use recover::{RecoveryController, RecoveryError, RecoveryReport};
