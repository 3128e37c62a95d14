//! Scripted command runner for tests.

use super::runner::{CommandOutput, CommandRunner, ExecError};
use std::cell::RefCell;

struct Rule {
    /// Full command line prefix to match (program and args joined by spaces).
    prefix: String,
    response: Response,
}

enum Response {
    Output(CommandOutput),
    Missing,
}

/// Matches commands against scripted rules and records every call.
///
/// Unmatched commands succeed with empty output.
#[derive(Default)]
pub struct FakeRunner {
    rules: Vec<Rule>,
    calls: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to commands starting with `prefix` with `stdout` and exit code 0.
    pub fn stdout(self, prefix: &str, stdout: &str) -> Self {
        self.output(prefix, stdout, Some(0))
    }

    /// Respond to commands starting with `prefix` with the given exit code.
    pub fn exit(self, prefix: &str, code: i32) -> Self {
        self.output(prefix, "", Some(code))
    }

    pub fn output(mut self, prefix: &str, stdout: &str, exit_code: Option<i32>) -> Self {
        self.rules.push(Rule {
            prefix: prefix.to_string(),
            response: Response::Output(CommandOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                exit_code,
            }),
        });
        self
    }

    /// Commands starting with `prefix` fail to spawn.
    pub fn missing(mut self, prefix: &str) -> Self {
        self.rules.push(Rule {
            prefix: prefix.to_string(),
            response: Response::Missing,
        });
        self
    }

    /// Every command line run so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Command lines containing `needle`.
    pub fn calls_matching(&self, needle: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.contains(needle))
            .cloned()
            .collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ExecError> {
        let line = std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.borrow_mut().push(line.clone());

        let Some(rule) = self.rules.iter().find(|r| line.starts_with(&r.prefix)) else {
            return Ok(CommandOutput {
                exit_code: Some(0),
                ..CommandOutput::default()
            });
        };

        match &rule.response {
            Response::Output(output) => Ok(output.clone()),
            Response::Missing => Err(ExecError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            }),
        }
    }
}
