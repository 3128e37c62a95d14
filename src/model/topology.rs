//! Hub topology data structures.

use super::device::DeviceSerial;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Hub identifier as printed by `uhubctl` (e.g., "1-2", "3-1.4").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct HubId(pub String);

impl HubId {
    /// Create a new hub identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One individually power-switchable port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PortBinding {
    pub hub: HubId,
    /// 1-based port number.
    pub port: u32,
}

impl PortBinding {
    pub fn new(hub: impl Into<String>, port: u32) -> Self {
        Self {
            hub: HubId::new(hub),
            port,
        }
    }
}

impl fmt::Display for PortBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hub {} port {}", self.hub, self.port)
    }
}

/// Serial-to-port map built from one hub report.
///
/// A serial may be bound to several ports (composite devices, companion
/// USB 2/3 hubs); bindings keep the order they were reported in and never
/// repeat a (hub, port) pair for the same serial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubTopology {
    /// Hubs that had a status header, in report order.
    hubs: Vec<HubId>,
    /// Serials in first-seen order.
    serials: Vec<DeviceSerial>,
    bindings: HashMap<DeviceSerial, Vec<PortBinding>>,
}

impl HubTopology {
    /// Create a new empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hub header. Repeated headers are kept once.
    pub fn add_hub(&mut self, hub: HubId) {
        if !self.hubs.contains(&hub) {
            self.hubs.push(hub);
        }
    }

    /// Bind a serial to a port. Returns false if the binding was already known.
    pub fn bind(&mut self, serial: DeviceSerial, binding: PortBinding) -> bool {
        if !self.bindings.contains_key(&serial) {
            self.serials.push(serial.clone());
        }
        let ports = self.bindings.entry(serial).or_default();
        if ports.contains(&binding) {
            return false;
        }
        ports.push(binding);
        true
    }

    /// Ports the given serial is attached to, in report order.
    pub fn ports_for(&self, serial: &DeviceSerial) -> &[PortBinding] {
        self.bindings
            .get(serial)
            .map(|ports| ports.as_slice())
            .unwrap_or(&[])
    }

    pub fn hubs(&self) -> &[HubId] {
        &self.hubs
    }

    /// Iterate (serial, ports) in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&DeviceSerial, &[PortBinding])> + '_ {
        self.serials
            .iter()
            .map(|serial| (serial, self.ports_for(serial)))
    }

    /// Number of distinct serials with at least one binding.
    pub fn serial_count(&self) -> usize {
        self.serials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serials.is_empty()
    }
}
