//! Device descriptor and per-field query outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Properties of an attached device, read once per probe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub android_version: String,
    pub sdk_version: String,
    pub model: String,
    pub manufacturer: String,
    pub build_id: String,
    pub cpu_abi: String,
    pub screen_density: u32,
    pub serial_number: String,
    /// Raw `service call iphonesubinfo 1` output
    pub imei: String,
    pub network_operator: String,
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Android {} (SN: {})",
            self.name, self.android_version, self.serial_number
        )
    }
}

/// One of the queries issued while probing a device, in probe order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceField {
    Name,
    ScreenInfo,
    AndroidVersion,
    SdkVersion,
    Model,
    Manufacturer,
    BuildId,
    CpuAbi,
    Density,
    SerialNumber,
    Imei,
    NetworkOperator,
}

impl DeviceField {
    pub const ALL: [DeviceField; 12] = [
        DeviceField::Name,
        DeviceField::ScreenInfo,
        DeviceField::AndroidVersion,
        DeviceField::SdkVersion,
        DeviceField::Model,
        DeviceField::Manufacturer,
        DeviceField::BuildId,
        DeviceField::CpuAbi,
        DeviceField::Density,
        DeviceField::SerialNumber,
        DeviceField::Imei,
        DeviceField::NetworkOperator,
    ];

    /// Arguments following `shell` for this query
    pub fn shell_args(self) -> &'static [&'static str] {
        match self {
            DeviceField::Name => &["getprop", "ro.boot.em.model"],
            DeviceField::ScreenInfo => &["getprop", "service.secureui.screeninfo"],
            DeviceField::AndroidVersion => &["getprop", "ro.build.version.release"],
            DeviceField::SdkVersion => &["getprop", "ro.build.version.sdk"],
            DeviceField::Model => &["getprop", "ro.product.model"],
            DeviceField::Manufacturer => &["getprop", "ro.product.manufacturer"],
            DeviceField::BuildId => &["getprop", "ro.build.id"],
            DeviceField::CpuAbi => &["getprop", "ro.product.cpu.abi"],
            DeviceField::Density => &["wm", "density"],
            DeviceField::SerialNumber => &["getprop", "ro.boot.serialno"],
            DeviceField::Imei => &["service", "call", "iphonesubinfo", "1"],
            DeviceField::NetworkOperator => &["getprop", "gsm.operator.alpha"],
        }
    }
}

impl fmt::Display for DeviceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeviceField::Name => "name",
            DeviceField::ScreenInfo => "screen info",
            DeviceField::AndroidVersion => "android version",
            DeviceField::SdkVersion => "sdk version",
            DeviceField::Model => "model",
            DeviceField::Manufacturer => "manufacturer",
            DeviceField::BuildId => "build id",
            DeviceField::CpuAbi => "cpu abi",
            DeviceField::Density => "screen density",
            DeviceField::SerialNumber => "serial number",
            DeviceField::Imei => "imei",
            DeviceField::NetworkOperator => "network operator",
        };
        f.write_str(label)
    }
}

/// Outcome of a single property query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryStatus {
    /// A non-empty value was read
    Ok,
    /// The command succeeded but printed nothing
    Empty,
    /// The command could not run or exited non-zero
    Failed { cause: String },
    /// A value was read but could not be parsed
    Malformed { raw: String },
}

impl QueryStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, QueryStatus::Ok)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, QueryStatus::Failed { .. })
    }
}

/// A descriptor together with the outcome of every query behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProbe {
    pub descriptor: DeviceDescriptor,
    pub statuses: Vec<(DeviceField, QueryStatus)>,
}

impl DeviceProbe {
    /// Status of one field, `None` if it was never queried
    pub fn status(&self, field: DeviceField) -> Option<&QueryStatus> {
        self.statuses
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, status)| status)
    }

    /// Fields whose query failed or whose value could not be parsed
    pub fn degraded(&self) -> impl Iterator<Item = (DeviceField, &QueryStatus)> {
        self.statuses
            .iter()
            .filter(|(_, status)| {
                matches!(status, QueryStatus::Failed { .. } | QueryStatus::Malformed { .. })
            })
            .map(|(field, status)| (*field, status))
    }

    /// True when no query failed or produced unparseable output
    pub fn is_complete(&self) -> bool {
        self.degraded().next().is_none()
    }

    pub fn into_descriptor(self) -> DeviceDescriptor {
        self.descriptor
    }
}
