//! Configuration loading and management.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Application configuration.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Device bridge settings.
    #[serde(default)]
    pub adb: AdbConfig,

    /// Hub-control utility settings.
    #[serde(default)]
    pub uhubctl: UhubctlConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Device bridge settings.
#[derive(Debug, Deserialize)]
pub struct AdbConfig {
    /// `adb` executable (name on PATH or absolute path).
    #[serde(default = "default_adb_path")]
    pub path: String,
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            path: default_adb_path(),
        }
    }
}

/// Hub-control utility settings.
#[derive(Debug, Deserialize)]
pub struct UhubctlConfig {
    /// `uhubctl` executable.
    #[serde(default = "default_uhubctl_path")]
    pub path: String,

    /// Command prefix used to gain root, e.g. `["sudo"]` or `["doas"]`.
    /// Empty runs `uhubctl` directly.
    #[serde(default = "default_elevate")]
    pub elevate: Vec<String>,
}

impl Default for UhubctlConfig {
    fn default() -> Self {
        Self {
            path: default_uhubctl_path(),
            elevate: default_elevate(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset ("error" .. "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_adb_path() -> String {
    "adb".to_string()
}

fn default_uhubctl_path() -> String {
    "/sbin/uhubctl".to_string()
}

fn default_elevate() -> Vec<String> {
    vec!["sudo".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from default locations.
    /// Search order:
    /// 1. ./droid-utils.toml
    /// 2. ~/.config/droid-utils/config.toml
    /// 3. /etc/droid-utils.toml
    pub fn load() -> Result<Self, ConfigError> {
        let paths = Self::config_paths();

        for path in paths.into_iter().flatten() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        // No config file found - use defaults
        Ok(Config::default())
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Get list of possible config paths.
    fn config_paths() -> Vec<Option<PathBuf>> {
        vec![
            std::env::current_dir()
                .ok()
                .map(|p| p.join("droid-utils.toml")),
            dirs::config_dir().map(|p| p.join("droid-utils").join("config.toml")),
            Some(PathBuf::from("/etc/droid-utils.toml")),
        ]
    }
}

/// Generate example configuration content.
pub fn example_config() -> &'static str {
    r#"# droid-utils configuration file
# Place in ./droid-utils.toml, ~/.config/droid-utils/config.toml, or /etc/droid-utils.toml

[adb]
# adb executable (name on PATH or absolute path)
path = "adb"

[uhubctl]
# uhubctl executable
path = "/sbin/uhubctl"
# Prefix used to run uhubctl as root; [] runs it directly
# (e.g. when a udev rule grants port power access)
elevate = ["sudo"]

[logging]
# Default log level when RUST_LOG is unset: error, warn, info, debug, trace
level = "info"
"#
}
