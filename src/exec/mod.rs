//! External command execution.

mod runner;

#[cfg(test)]
pub(crate) mod testing;

pub use runner::{CommandOutput, CommandRunner, ElevatedRunner, ExecError, SystemRunner};
