//! Device bridge records.

use serde::Serialize;
use std::fmt;

/// Serial number assigned by the device bridge (e.g., "28011FDH2000ZH").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DeviceSerial(pub String);

impl DeviceSerial {
    /// Create a new device serial.
    pub fn new(serial: impl Into<String>) -> Self {
        Self(serial.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authorization state reported in the second column of `adb devices`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceState {
    /// Trusted and usable.
    Device,
    /// Attached, but the device has not accepted the host's debugging key.
    Unauthorized,
    /// Attached but not responding.
    Offline,
    /// Any other token ("no", "recovery", "sideload", "bootloader", ...).
    Other(String),
}

impl DeviceState {
    /// Classify a raw state token.
    pub fn from_token(token: &str) -> Self {
        match token {
            "device" => Self::Device,
            "unauthorized" => Self::Unauthorized,
            "offline" => Self::Offline,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Device => "device",
            Self::Unauthorized => "unauthorized",
            Self::Offline => "offline",
            Self::Other(token) => token,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the device bridge listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub serial: DeviceSerial,
    pub state: DeviceState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_token() {
        assert_eq!(DeviceState::from_token("device"), DeviceState::Device);
        assert_eq!(
            DeviceState::from_token("unauthorized"),
            DeviceState::Unauthorized
        );
        assert_eq!(DeviceState::from_token("offline"), DeviceState::Offline);
        assert_eq!(
            DeviceState::from_token("recovery"),
            DeviceState::Other("recovery".to_string())
        );
    }

    #[test]
    fn test_state_is_case_sensitive() {
        assert!(!DeviceState::from_token("Unauthorized").is_unauthorized());
        assert!(DeviceState::from_token("unauthorized").is_unauthorized());
    }

    #[test]
    fn test_state_display_round_trips_other_tokens() {
        assert_eq!(DeviceState::from_token("sideload").to_string(), "sideload");
    }
}
