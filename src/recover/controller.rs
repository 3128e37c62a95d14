//! One recovery pass: read status, read topology, correlate, cycle.

use super::correlate::correlate;
use super::report::{RecoveryReport, SerialPorts, TargetFailure};
use crate::adb::{DeviceStatusReader, StatusError};
use crate::exec::ExecError;
use crate::hub::{PortPowerCycler, TopologyParseError, TopologyReadError, TopologyReader};
use thiserror::Error;
use tracing::{info, warn};

/// Failures that end a pass before any port is touched.
#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("device status read failed: {0}")]
    StatusTool(#[from] StatusError),
    #[error("hub report read failed: {0}")]
    TopologyTool(#[source] ExecError),
    #[error("hub report unusable: {0}")]
    TopologyParse(#[source] TopologyParseError),
}

impl From<TopologyReadError> for RecoveryError {
    fn from(err: TopologyReadError) -> Self {
        match err {
            TopologyReadError::Exec(e) => Self::TopologyTool(e),
            TopologyReadError::Parse(e) => Self::TopologyParse(e),
        }
    }
}

impl RecoveryError {
    /// Failure class: "external-tool" or "topology-parse".
    pub fn class(&self) -> &'static str {
        match self {
            Self::StatusTool(_) | Self::TopologyTool(_) => "external-tool",
            Self::TopologyParse(_) => "topology-parse",
        }
    }
}

/// Runs stateless recovery passes.
///
/// Status and topology are two separate snapshots; a device that changes
/// state or a hub that re-enumerates between them is not detected.
pub struct RecoveryController<'a> {
    status: DeviceStatusReader<'a>,
    topology: TopologyReader<'a>,
    cycler: PortPowerCycler<'a>,
    dry_run: bool,
}

impl<'a> RecoveryController<'a> {
    pub fn new(
        status: DeviceStatusReader<'a>,
        topology: TopologyReader<'a>,
        cycler: PortPowerCycler<'a>,
    ) -> Self {
        Self {
            status,
            topology,
            cycler,
            dry_run: false,
        }
    }

    /// Select targets but skip the power commands.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute one pass.
    ///
    /// Read failures abort before any power command. Cycle failures are
    /// recorded per target and the remaining targets are still cycled.
    pub fn run(&self) -> Result<RecoveryReport, RecoveryError> {
        let unauthorized = self.status.list_unauthorized()?;
        if unauthorized.is_empty() {
            info!("no unauthorized devices");
            return Ok(RecoveryReport {
                dry_run: self.dry_run,
                ..RecoveryReport::default()
            }
            .finish());
        }
        info!(count = unauthorized.len(), "unauthorized devices detected");

        let topology = self.topology.read()?;
        let correlation = correlate(&unauthorized, &topology);

        for serial in &correlation.unmapped {
            warn!(%serial, "no hub port found for unauthorized device");
        }

        let mapping = unauthorized
            .iter()
            .filter_map(|serial| {
                let ports = topology.ports_for(serial);
                (!ports.is_empty()).then(|| SerialPorts {
                    serial: serial.clone(),
                    ports: ports.to_vec(),
                })
            })
            .collect();

        let mut report = RecoveryReport {
            dry_run: self.dry_run,
            unauthorized,
            mapping,
            targets: correlation.targets,
            unmapped: correlation.unmapped,
            ..RecoveryReport::default()
        };

        if self.dry_run {
            info!(targets = report.targets.len(), "dry run, no ports cycled");
            return Ok(report.finish());
        }

        for target in &report.targets {
            match self.cycler.cycle(target) {
                Ok(()) => report.cycled.push(target.clone()),
                Err(err) => {
                    warn!(%target, error = %err, "port cycle failed");
                    report.failed.push(TargetFailure {
                        binding: target.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let report = report.finish();
        info!(
            unauthorized = report.counts.unauthorized,
            mapped = report.counts.mapped,
            cycled = report.counts.cycled,
            failed = report.counts.failed,
            unmapped = report.counts.unmapped,
            "recovery pass finished"
        );
        Ok(report)
    }
}
