//! Terminal report of one recovery pass.

use crate::model::{DeviceSerial, PortBinding};
use serde::Serialize;
use std::fmt;

/// Ports an unauthorized serial was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerialPorts {
    pub serial: DeviceSerial,
    pub ports: Vec<PortBinding>,
}

/// A target whose power cycle failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetFailure {
    pub binding: PortBinding,
    pub reason: String,
}

/// The five headline counts of a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportCounts {
    pub unauthorized: usize,
    pub mapped: usize,
    pub cycled: usize,
    pub failed: usize,
    pub unmapped: usize,
}

/// Outcome of a pass that got past its read phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecoveryReport {
    /// Targets were selected but not power-cycled.
    pub dry_run: bool,
    pub unauthorized: Vec<DeviceSerial>,
    pub mapping: Vec<SerialPorts>,
    /// Ports selected for cycling, in cycle order.
    pub targets: Vec<PortBinding>,
    /// Targets whose off/on sequence completed.
    pub cycled: Vec<PortBinding>,
    pub failed: Vec<TargetFailure>,
    pub unmapped: Vec<DeviceSerial>,
    pub counts: ReportCounts,
}

impl RecoveryReport {
    /// Fill in `counts` from the lists.
    pub(crate) fn finish(mut self) -> Self {
        self.counts = ReportCounts {
            unauthorized: self.unauthorized.len(),
            mapped: self.targets.len(),
            cycled: self.cycled.len(),
            failed: self.failed.len(),
            unmapped: self.unmapped.len(),
        };
        self
    }

    /// True when something was left unrecovered and another pass may help.
    pub fn needs_attention(&self) -> bool {
        !self.failed.is_empty() || !self.unmapped.is_empty()
    }
}

impl fmt::Display for RecoveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unauthorized.is_empty() {
            writeln!(f, "No unauthorized devices detected.")?;
        } else {
            writeln!(f, "Unauthorized devices:")?;
            for serial in &self.unauthorized {
                writeln!(f, "  - {}", serial)?;
            }
        }

        if !self.mapping.is_empty() {
            writeln!(f, "\nPort map:")?;
            for entry in &self.mapping {
                for port in &entry.ports {
                    writeln!(f, "  {} -> {}", entry.serial, port)?;
                }
            }
        }

        if self.dry_run && !self.targets.is_empty() {
            writeln!(f, "\nWould power-cycle (dry run):")?;
            for target in &self.targets {
                writeln!(f, "  {}", target)?;
            }
        }

        if !self.cycled.is_empty() {
            writeln!(f, "\nPower-cycled:")?;
            for target in &self.cycled {
                writeln!(f, "  {}", target)?;
            }
        }

        if !self.failed.is_empty() {
            writeln!(f, "\nFailed:")?;
            for failure in &self.failed {
                writeln!(f, "  {}: {}", failure.binding, failure.reason)?;
            }
        }

        for serial in &self.unmapped {
            writeln!(f, "\nWarning: no hub port found for {}", serial)?;
        }

        let c = &self.counts;
        writeln!(
            f,
            "\nunauthorized={} mapped={} cycled={} failed={} unmapped={}",
            c.unauthorized, c.mapped, c.cycled, c.failed, c.unmapped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecoveryReport {
        RecoveryReport {
            unauthorized: vec![DeviceSerial::new("ABC123"), DeviceSerial::new("GHOST")],
            mapping: vec![SerialPorts {
                serial: DeviceSerial::new("ABC123"),
                ports: vec![PortBinding::new("1-2", 3)],
            }],
            targets: vec![PortBinding::new("1-2", 3)],
            failed: vec![TargetFailure {
                binding: PortBinding::new("1-2", 3),
                reason: "power-off failed".to_string(),
            }],
            unmapped: vec![DeviceSerial::new("GHOST")],
            ..RecoveryReport::default()
        }
        .finish()
    }

    #[test]
    fn test_finish_counts() {
        let report = sample();
        assert_eq!(
            report.counts,
            ReportCounts {
                unauthorized: 2,
                mapped: 1,
                cycled: 0,
                failed: 1,
                unmapped: 1,
            }
        );
        assert!(report.needs_attention());
    }

    #[test]
    fn test_text_rendering() {
        let text = sample().to_string();
        assert!(text.contains("  ABC123 -> hub 1-2 port 3"));
        assert!(text.contains("  hub 1-2 port 3: power-off failed"));
        assert!(text.contains("no hub port found for GHOST"));
        assert!(text.ends_with("unauthorized=2 mapped=1 cycled=0 failed=1 unmapped=1\n"));
    }

    #[test]
    fn test_empty_report() {
        let report = RecoveryReport::default().finish();
        assert!(!report.needs_attention());
        assert!(report.to_string().starts_with("No unauthorized devices detected."));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["counts"]["failed"], 1);
        assert_eq!(json["targets"][0]["hub"], "1-2");
        assert_eq!(json["targets"][0]["port"], 3);
        assert_eq!(json["unmapped"][0], "GHOST");
    }
}
