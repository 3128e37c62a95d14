//! Device and hub data model types.

pub mod device;
pub mod topology;

pub use device::{DeviceRecord, DeviceSerial, DeviceState};
pub use topology::{HubId, HubTopology, PortBinding};
