//! Per-port power cycling through `uhubctl`.
//!
//! Cutting power to a port re-enumerates everything downstream of it, not just
//! the unauthorized device: a hub daisy-chained off that port, or a second
//! phone on a shared port, goes down with it.

use crate::exec::{CommandRunner, ExecError};
use crate::model::PortBinding;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Wait after cutting power before restoring it.
pub const POWER_OFF_SETTLE: Duration = Duration::from_secs(2);

/// Wait after restoring power, for re-enumeration and the device's
/// authorization prompt to re-arm.
pub const POWER_ON_SETTLE: Duration = Duration::from_secs(5);

/// Port power action (`uhubctl -a`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Off,
    On,
}

impl PowerAction {
    /// Value passed to `uhubctl -a`.
    pub fn arg(&self) -> &'static str {
        match self {
            Self::Off => "0",
            Self::On => "1",
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::On => write!(f, "on"),
        }
    }
}

/// A power command for one port failed.
#[derive(Debug, Error)]
pub enum PortCycleError {
    #[error("power-{action} for {binding} could not be run: {source}")]
    Exec {
        binding: PortBinding,
        action: PowerAction,
        #[source]
        source: ExecError,
    },
    #[error("power-{action} for {binding} failed with {status}")]
    Exit {
        binding: PortBinding,
        action: PowerAction,
        status: String,
    },
}

impl PortCycleError {
    pub fn binding(&self) -> &PortBinding {
        match self {
            Self::Exec { binding, .. } | Self::Exit { binding, .. } => binding,
        }
    }
}

/// Power-cycles individual hub ports.
pub struct PortPowerCycler<'a> {
    runner: &'a dyn CommandRunner,
    uhubctl_path: String,
    pause: Box<dyn Fn(Duration) + 'a>,
}

impl<'a> PortPowerCycler<'a> {
    /// `runner` is expected to carry whatever privilege elevation the
    /// utility needs.
    pub fn new(runner: &'a dyn CommandRunner, uhubctl_path: impl Into<String>) -> Self {
        Self {
            runner,
            uhubctl_path: uhubctl_path.into(),
            pause: Box::new(std::thread::sleep),
        }
    }

    /// Replace the blocking settle wait (for tests).
    pub fn with_pause(mut self, pause: impl Fn(Duration) + 'a) -> Self {
        self.pause = Box::new(pause);
        self
    }

    /// Turn the port off, settle, turn it back on, settle.
    ///
    /// Power-on is issued even when power-off failed so the port is never
    /// knowingly left unpowered; the first failure is returned.
    pub fn cycle(&self, target: &PortBinding) -> Result<(), PortCycleError> {
        info!(%target, "power-cycling port");

        let off = self.power(target, PowerAction::Off);
        (self.pause)(POWER_OFF_SETTLE);
        let on = self.power(target, PowerAction::On);
        (self.pause)(POWER_ON_SETTLE);

        match (off, on) {
            (Err(off_err), Err(on_err)) => {
                warn!(%target, error = %on_err, "power-on also failed");
                Err(off_err)
            }
            (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    fn power(&self, target: &PortBinding, action: PowerAction) -> Result<(), PortCycleError> {
        let args = vec![
            "-l".to_string(),
            target.hub.to_string(),
            "-p".to_string(),
            target.port.to_string(),
            "-a".to_string(),
            action.arg().to_string(),
        ];

        let output = self
            .runner
            .run(&self.uhubctl_path, &args)
            .map_err(|source| PortCycleError::Exec {
                binding: target.clone(),
                action,
                source,
            })?;

        if !output.success() {
            warn!(%target, %action, status = %output.status_str(), "power command failed");
            return Err(PortCycleError::Exit {
                binding: target.clone(),
                action,
                status: output.status_str(),
            });
        }
        Ok(())
    }
}
