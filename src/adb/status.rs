//! Device status reading via `adb devices`.

use crate::exec::{CommandRunner, ExecError};
use crate::model::{DeviceRecord, DeviceSerial, DeviceState};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors reading device status.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error("'{program} devices' failed with {status}: {stderr}")]
    Exit {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Reads device authorization state from the device bridge.
pub struct DeviceStatusReader<'a> {
    runner: &'a dyn CommandRunner,
    adb_path: String,
}

impl<'a> DeviceStatusReader<'a> {
    /// Create a reader invoking the given `adb` binary.
    pub fn new(runner: &'a dyn CommandRunner, adb_path: impl Into<String>) -> Self {
        Self {
            runner,
            adb_path: adb_path.into(),
        }
    }

    /// List every attached device with its state.
    pub fn list_devices(&self) -> Result<Vec<DeviceRecord>, StatusError> {
        let output = self.runner.run(&self.adb_path, &["devices".to_string()])?;
        if !output.success() {
            return Err(StatusError::Exit {
                program: self.adb_path.clone(),
                status: output.status_str(),
                stderr: output.stderr.trim().to_string(),
            });
        }

        let records = parse_device_list(&output.stdout);
        debug!(count = records.len(), "read device list");
        Ok(records)
    }

    /// Serials currently in the unauthorized state, in listing order.
    ///
    /// An empty result is the normal case, not an error.
    pub fn list_unauthorized(&self) -> Result<Vec<DeviceSerial>, StatusError> {
        let serials: Vec<DeviceSerial> = self
            .list_devices()?
            .into_iter()
            .filter(|record| record.state.is_unauthorized())
            .map(|record| record.serial)
            .collect();

        for serial in &serials {
            warn!(%serial, "device is unauthorized");
        }
        Ok(serials)
    }
}

/// Parse `adb devices` output.
///
/// The first line is the "List of devices attached" header and is dropped.
/// Remaining rows are `<serial> <state> [extra...]`; rows with fewer than two
/// fields are skipped, and a repeated serial keeps its first row.
pub fn parse_device_list(output: &str) -> Vec<DeviceRecord> {
    let mut records: Vec<DeviceRecord> = Vec::new();

    for line in output.lines().skip(1) {
        let mut fields = line.split_whitespace();
        let (Some(serial), Some(state)) = (fields.next(), fields.next()) else {
            continue;
        };
        if records.iter().any(|r| r.serial.as_str() == serial) {
            continue;
        }
        records.push(DeviceRecord {
            serial: DeviceSerial::new(serial),
            state: DeviceState::from_token(state),
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::FakeRunner;

    const LISTING: &str = "List of devices attached\n\
        ABC123\tunauthorized\n\
        XYZ999\tdevice\n\
        \n\
        OFF1\toffline\n\
        PERM1\tno permissions (user in plugdev group); see [http://developer.android.com/tools/device.html]\n\
        DEF456\tunauthorized usb:1-2.3 transport_id:7\n";

    #[test]
    fn test_parse_device_list_classifies_states() {
        let records = parse_device_list(LISTING);
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].serial, DeviceSerial::new("ABC123"));
        assert_eq!(records[0].state, DeviceState::Unauthorized);
        assert_eq!(records[1].state, DeviceState::Device);
        assert_eq!(records[2].state, DeviceState::Offline);
        assert_eq!(records[3].state, DeviceState::Other("no".to_string()));
        assert_eq!(records[4].state, DeviceState::Unauthorized);
    }

    #[test]
    fn test_parse_device_list_drops_header_only() {
        assert!(parse_device_list("List of devices attached\n\n").is_empty());
        assert!(parse_device_list("").is_empty());
    }

    #[test]
    fn test_parse_device_list_skips_single_field_rows() {
        let records = parse_device_list("List of devices attached\nlonely\nA\tdevice\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].serial, DeviceSerial::new("A"));
    }

    #[test]
    fn test_parse_device_list_keeps_first_duplicate() {
        let records =
            parse_device_list("List of devices attached\nA\tunauthorized\nA\tdevice\n");
        assert_eq!(records.len(), 1);
        assert!(records[0].state.is_unauthorized());
    }

    #[test]
    fn test_list_unauthorized_filters_other_states() {
        let runner = FakeRunner::new().stdout("adb devices", LISTING);
        let reader = DeviceStatusReader::new(&runner, "adb");
        let serials = reader.list_unauthorized().unwrap();
        assert_eq!(
            serials,
            vec![DeviceSerial::new("ABC123"), DeviceSerial::new("DEF456")]
        );
        assert_eq!(runner.calls(), vec!["adb devices"]);
    }

    #[test]
    fn test_list_unauthorized_empty_when_all_trusted() {
        let runner =
            FakeRunner::new().stdout("adb devices", "List of devices attached\nX\tdevice\n");
        let reader = DeviceStatusReader::new(&runner, "adb");
        assert!(reader.list_unauthorized().unwrap().is_empty());
    }

    #[test]
    fn test_missing_adb_is_exec_error() {
        let runner = FakeRunner::new().missing("adb");
        let reader = DeviceStatusReader::new(&runner, "adb");
        assert!(matches!(
            reader.list_unauthorized(),
            Err(StatusError::Exec(_))
        ));
    }

    #[test]
    fn test_non_zero_exit_is_error() {
        let runner = FakeRunner::new().exit("adb devices", 1);
        let reader = DeviceStatusReader::new(&runner, "adb");
        assert!(matches!(
            reader.list_devices(),
            Err(StatusError::Exit { .. })
        ));
    }
}
