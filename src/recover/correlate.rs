//! Joins unauthorized serials against the hub topology.

use crate::model::{DeviceSerial, HubTopology, PortBinding};

/// Ports to cycle and serials that could not be placed on any port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correlation {
    /// Unique ports, in first-discovery order.
    pub targets: Vec<PortBinding>,
    pub unmapped: Vec<DeviceSerial>,
}

/// Select every port carrying an unauthorized serial.
///
/// Targets are ordered by the order of `unauthorized`, then by each serial's
/// bindings as reported. A port shared by several serials is listed once.
pub fn correlate(unauthorized: &[DeviceSerial], topology: &HubTopology) -> Correlation {
    let mut result = Correlation::default();

    for serial in unauthorized {
        let ports = topology.ports_for(serial);
        if ports.is_empty() {
            if !result.unmapped.contains(serial) {
                result.unmapped.push(serial.clone());
            }
            continue;
        }
        for binding in ports {
            if !result.targets.contains(binding) {
                result.targets.push(binding.clone());
            }
        }
    }

    result
}
