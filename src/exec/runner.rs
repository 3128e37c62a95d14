//! External command execution.

use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// Errors starting an external command.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Exit status for log and error messages.
    pub fn status_str(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "termination by signal".to_string(),
        }
    }
}

/// Runs an external program to completion and captures its output.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ExecError>;
}

/// Runs commands on the host with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ExecError> {
        debug!(program, ?args, "running command");
        // stdin stays attached so `sudo` can prompt for a password.
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ExecError::Spawn {
                program: program.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
        })
    }
}

/// Prefixes every command with an elevation argv (e.g., `sudo`).
///
/// The hub-control utility needs root to read and switch port power; wrapping
/// the runner keeps that concern out of the hub code.
pub struct ElevatedRunner<'a> {
    inner: &'a dyn CommandRunner,
    prefix: Vec<String>,
}

impl<'a> ElevatedRunner<'a> {
    /// An empty prefix runs commands unchanged.
    pub fn new(inner: &'a dyn CommandRunner, prefix: Vec<String>) -> Self {
        Self { inner, prefix }
    }
}

impl CommandRunner for ElevatedRunner<'_> {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ExecError> {
        let Some((elevator, rest)) = self.prefix.split_first() else {
            return self.inner.run(program, args);
        };

        let mut full_args = rest.to_vec();
        full_args.push(program.to_string());
        full_args.extend_from_slice(args);
        self.inner.run(elevator, &full_args)
    }
}
