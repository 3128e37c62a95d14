//! Configuration loading and management.

mod loader;

pub use loader::{AdbConfig, Config, ConfigError, LoggingConfig, UhubctlConfig, example_config};
