//! Recovery of unauthorized devices by port power cycling.

mod controller;
mod correlate;
mod report;

pub use controller::{RecoveryController, RecoveryError};
pub use correlate::{Correlation, correlate};
pub use report::{RecoveryReport, ReportCounts, SerialPorts, TargetFailure};
