//! Parser for the `uhubctl` status report.
//!
//! The report is a sequence of blocks:
//!
//! ```text
//! Current status for hub 1-2 [2109:2817 VIA Labs, Inc. USB2.0 Hub, USB 2.10, 4 ports, ppps]
//!   Port 1: 0100 power
//!   Port 3: 0103 power enable connect [18d1:4ee7 Google Pixel 7 28011FDH2000ZH]
//! ```

use crate::exec::{CommandRunner, ExecError};
use crate::model::{DeviceSerial, HubId, HubTopology, PortBinding};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};

static HUB_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Current status for hub ([\w\-.]+)").expect("valid regex"));

static PORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Port (\d+): .*connect.*\[(.+?)\]$").expect("valid regex")
});

/// The report had nothing recognizable in it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyParseError {
    #[error("hub report is empty")]
    Empty,
    #[error("hub report contains no 'Current status for hub' header")]
    NoHubHeaders,
}

/// Errors obtaining a topology from the hub-control utility.
#[derive(Debug, Error)]
pub enum TopologyReadError {
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error(transparent)]
    Parse(#[from] TopologyParseError),
}

/// Parse a full `uhubctl` report into a serial-to-port map.
///
/// Port lines seen before the first hub header, and lines without a closing
/// bracketed annotation, are skipped. A report with hub headers but no
/// attached devices yields an empty topology.
pub fn parse_topology(raw: &str) -> Result<HubTopology, TopologyParseError> {
    if raw.trim().is_empty() {
        return Err(TopologyParseError::Empty);
    }

    let mut topology = HubTopology::new();
    let mut current_hub: Option<HubId> = None;
    let mut saw_header = false;

    for line in raw.lines() {
        let line = line.trim_end();

        if let Some(caps) = HUB_HEADER.captures(line) {
            let hub = HubId::new(&caps[1]);
            topology.add_hub(hub.clone());
            current_hub = Some(hub);
            saw_header = true;
            continue;
        }

        let Some(hub) = &current_hub else {
            continue;
        };
        if !line.contains("connect") || !line.contains('[') {
            continue;
        }
        let Some((port, annotation)) = port_annotation(line) else {
            debug!(line, "skipping unrecognized port line");
            continue;
        };
        let Some(serial) = serial_from_annotation(annotation) else {
            continue;
        };

        let binding = PortBinding {
            hub: hub.clone(),
            port,
        };
        if !topology.bind(serial.clone(), binding.clone()) {
            debug!(%serial, %binding, "duplicate port line ignored");
        }
    }

    if !saw_header {
        return Err(TopologyParseError::NoHubHeaders);
    }
    Ok(topology)
}

/// Extract the port number and bracketed annotation from a port status line.
fn port_annotation(line: &str) -> Option<(u32, &str)> {
    let caps = PORT_LINE.captures(line)?;
    let port: u32 = caps[1].parse().ok().filter(|&p| p >= 1)?;
    let annotation = caps.get(2)?.as_str();
    Some((port, annotation))
}

/// Take the device serial out of a port annotation.
///
/// The annotation is `<vid:pid> <manufacturer/product words...> <serial>`;
/// the descriptor has no fixed word count, so the last whitespace-separated
/// token is the only stable anchor. This is the one place that relies on it.
fn serial_from_annotation(annotation: &str) -> Option<DeviceSerial> {
    annotation
        .split_whitespace()
        .next_back()
        .map(DeviceSerial::new)
}

/// Reads the live topology by running the hub-control utility.
pub struct TopologyReader<'a> {
    runner: &'a dyn CommandRunner,
    uhubctl_path: String,
}

impl<'a> TopologyReader<'a> {
    /// `runner` is expected to carry whatever privilege elevation the
    /// utility needs.
    pub fn new(runner: &'a dyn CommandRunner, uhubctl_path: impl Into<String>) -> Self {
        Self {
            runner,
            uhubctl_path: uhubctl_path.into(),
        }
    }

    /// Run the utility without arguments and parse its report.
    pub fn read(&self) -> Result<HubTopology, TopologyReadError> {
        let output = self.runner.run(&self.uhubctl_path, &[])?;
        if !output.success() {
            // Exit status is not trusted; whatever made it to stdout is parsed.
            warn!(
                status = %output.status_str(),
                stderr = output.stderr.trim(),
                "{} exited unsuccessfully",
                self.uhubctl_path
            );
        }

        let topology = parse_topology(&output.stdout)?;
        debug!(
            hubs = topology.hubs().len(),
            serials = topology.serial_count(),
            "parsed hub topology"
        );
        Ok(topology)
    }
}
