//! Attached device listing

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::executor::CommandExecutor;

/// How a device is attached to the adb server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    Usb,
    Remote,
}

/// One row of `adb devices -l`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedDevice {
    pub serial: String,
    /// `device`, `offline`, `unauthorized`, ...
    pub state: String,
    pub connection_type: ConnectionType,
    pub model: Option<String>,
}

impl AttachedDevice {
    /// Whether adb can talk to the device
    pub fn is_online(&self) -> bool {
        self.state == "device"
    }
}

/// Parse the output of `adb devices -l`
pub fn parse_device_list(stdout: &str) -> Vec<AttachedDevice> {
    let mut devices = Vec::new();

    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("List of devices") || line.starts_with('*') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }

        let serial = parts[0].to_string();
        let connection_type = if serial.contains(':') {
            ConnectionType::Remote
        } else {
            ConnectionType::Usb
        };

        let model = parts[2..]
            .iter()
            .find_map(|part| part.strip_prefix("model:"))
            .map(|m| m.to_string());

        devices.push(AttachedDevice {
            serial,
            state: parts[1].to_string(),
            connection_type,
            model,
        });
    }

    devices
}

/// List all devices known to the adb server
///
/// Runs without the serial prefix so every device is reported.
pub async fn list_devices(adb: &CommandExecutor) -> Result<Vec<AttachedDevice>> {
    let stdout = adb.without_prefix().run(&["devices", "-l"]).await?;
    Ok(parse_device_list(&stdout))
}
