//! External tool configuration

use std::path::{Path, PathBuf};

/// Paths of the device-bridge and mirroring executables
///
/// Both paths are supplied by the caller; nothing here looks them up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub adb_path: PathBuf,
    pub scrcpy_path: Option<PathBuf>,
    /// Passed as `-s <serial>` to adb and `--serial=<serial>` to scrcpy when set
    pub serial: Option<String>,
}

impl ControllerConfig {
    /// Create a configuration for the given adb executable
    pub fn new(adb_path: impl Into<PathBuf>) -> Self {
        Self {
            adb_path: adb_path.into(),
            scrcpy_path: None,
            serial: None,
        }
    }

    /// Set the scrcpy executable
    pub fn with_scrcpy_path(mut self, scrcpy_path: impl Into<PathBuf>) -> Self {
        self.scrcpy_path = Some(scrcpy_path.into());
        self
    }

    /// Target a specific device
    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    pub fn adb_path(&self) -> &Path {
        &self.adb_path
    }

    pub fn scrcpy_path(&self) -> Option<&Path> {
        self.scrcpy_path.as_deref()
    }

    /// Arguments prepended to every device-bound adb invocation
    pub(crate) fn adb_prefix(&self) -> Vec<String> {
        match &self.serial {
            Some(serial) => vec!["-s".to_string(), serial.clone()],
            None => Vec::new(),
        }
    }
}
