//! Android Debug Bridge integration.

mod status;

pub use status::{DeviceStatusReader, StatusError, parse_device_list};
