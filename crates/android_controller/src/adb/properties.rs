//! Device property queries and descriptor assembly

use tracing::{debug, warn};

use crate::descriptor::{DeviceDescriptor, DeviceField, DeviceProbe, QueryStatus};
use crate::error::{ControllerError, Result};
use crate::executor::CommandExecutor;

const DENSITY_TOKEN: &str = "Physical density:";

/// Parse a `<width>x<height>` screen-info value
pub fn parse_screen_info(raw: &str) -> Result<(u32, u32)> {
    let mut parts = raw.split('x');
    let (Some(width), Some(height), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ControllerError::Parse(format!(
            "screen info is not <width>x<height>: {:?}",
            raw
        )));
    };

    let parse = |value: &str| {
        value.trim().parse::<u32>().map_err(|e| {
            ControllerError::Parse(format!("invalid screen dimension {:?}: {}", value, e))
        })
    };

    Ok((parse(width)?, parse(height)?))
}

/// Screen dimensions from a screen-info value, `(0, 0)` when unparseable
pub fn screen_dimensions(raw: &str) -> (u32, u32) {
    parse_screen_info(raw).unwrap_or((0, 0))
}

/// Physical density from `wm density` output
///
/// Only the first line carrying the `Physical density:` token is considered.
pub fn parse_density(raw: &str) -> Result<u32> {
    let line = raw
        .lines()
        .find(|line| line.contains(DENSITY_TOKEN))
        .ok_or_else(|| ControllerError::Parse(format!("no physical density in {:?}", raw)))?;

    let value = line.split(':').nth(1).unwrap_or("").trim();
    value
        .parse::<u32>()
        .map_err(|e| ControllerError::Parse(format!("invalid density {:?}: {}", line, e)))
}

/// Physical density from `wm density` output, `0` when absent or unparseable
pub fn density_or_default(raw: &str) -> u32 {
    parse_density(raw).unwrap_or(0)
}

/// Run every property query and assemble a descriptor
///
/// Never fails: a query that cannot run leaves its field at the empty or zero
/// default and is recorded in the returned statuses.
pub async fn probe_device(adb: &CommandExecutor) -> DeviceProbe {
    let mut descriptor = DeviceDescriptor::default();
    let mut statuses = Vec::with_capacity(DeviceField::ALL.len());

    for field in DeviceField::ALL {
        let mut args = vec!["shell"];
        args.extend_from_slice(field.shell_args());

        let status = match adb.run(args.as_slice()).await {
            Ok(value) => apply(&mut descriptor, field, value),
            Err(e) => {
                warn!("Error querying {}: {}", field, e);
                QueryStatus::Failed {
                    cause: failure_cause(e),
                }
            }
        };

        statuses.push((field, status));
    }

    debug!("Probed device: {}", descriptor);

    DeviceProbe {
        descriptor,
        statuses,
    }
}

/// Store a query result in its field and classify it
fn apply(descriptor: &mut DeviceDescriptor, field: DeviceField, value: String) -> QueryStatus {
    if value.is_empty() {
        return QueryStatus::Empty;
    }

    let slot = match field {
        DeviceField::ScreenInfo => {
            return match parse_screen_info(&value) {
                Ok((width, height)) => {
                    descriptor.width = width;
                    descriptor.height = height;
                    QueryStatus::Ok
                }
                Err(e) => {
                    warn!("Error parsing screen info: {}", e);
                    QueryStatus::Malformed { raw: value }
                }
            };
        }
        DeviceField::Density => {
            return match parse_density(&value) {
                Ok(density) => {
                    descriptor.screen_density = density;
                    QueryStatus::Ok
                }
                Err(e) => {
                    warn!("Error parsing screen density: {}", e);
                    QueryStatus::Malformed { raw: value }
                }
            };
        }
        DeviceField::Name => &mut descriptor.name,
        DeviceField::AndroidVersion => &mut descriptor.android_version,
        DeviceField::SdkVersion => &mut descriptor.sdk_version,
        DeviceField::Model => &mut descriptor.model,
        DeviceField::Manufacturer => &mut descriptor.manufacturer,
        DeviceField::BuildId => &mut descriptor.build_id,
        DeviceField::CpuAbi => &mut descriptor.cpu_abi,
        DeviceField::SerialNumber => &mut descriptor.serial_number,
        DeviceField::Imei => &mut descriptor.imei,
        DeviceField::NetworkOperator => &mut descriptor.network_operator,
    };

    *slot = value;
    QueryStatus::Ok
}

fn failure_cause(err: ControllerError) -> String {
    match err {
        ControllerError::CommandFailed { stderr, .. } if !stderr.is_empty() => stderr,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::testing::ScriptedRunner;
    use std::sync::Arc;

    const WM_DENSITY: &str = "Physical density: 420\nOverride density: 480\n";

    fn full_device() -> ScriptedRunner {
        ScriptedRunner::new()
            .respond("shell getprop ro.boot.em.model", "SM-S918B\n")
            .respond("shell getprop service.secureui.screeninfo", "1080x2400\n")
            .respond("shell getprop ro.build.version.release", "14\n")
            .respond("shell getprop ro.build.version.sdk", "34\n")
            .respond("shell getprop ro.product.model", "SM-S918B\n")
            .respond("shell getprop ro.product.manufacturer", "samsung\n")
            .respond("shell getprop ro.build.id", "UP1A.231005.007\n")
            .respond("shell getprop ro.product.cpu.abi", "arm64-v8a\n")
            .respond("shell wm density", WM_DENSITY)
            .respond("shell getprop ro.boot.serialno", "R5CW1234ABC\n")
            .respond(
                "shell service call iphonesubinfo 1",
                "Result: Parcel(00000000 00000000 '........')\n",
            )
            .respond("shell getprop gsm.operator.alpha", "T-Mobile\n")
    }

    #[test]
    fn test_parse_screen_info() {
        assert_eq!(parse_screen_info("1080x2400").unwrap(), (1080, 2400));
        assert_eq!(parse_screen_info(" 720 x 1600 ").unwrap(), (720, 1600));
        assert_eq!(parse_screen_info("1x1").unwrap(), (1, 1));
    }

    #[test]
    fn test_malformed_screen_info_defaults() {
        for raw in ["", "1080", "1080x", "x2400", "1080x2400x3", "widexhigh", "1080X2400", "-1x5"] {
            assert!(parse_screen_info(raw).is_err(), "{:?} should not parse", raw);
            assert_eq!(screen_dimensions(raw), (0, 0), "{:?}", raw);
        }
    }

    #[test]
    fn test_parse_density() {
        assert_eq!(parse_density("Physical density: 420").unwrap(), 420);
        assert_eq!(parse_density("...\nPhysical density: 420\n...").unwrap(), 420);
        assert_eq!(density_or_default(WM_DENSITY), 420);
    }

    #[test]
    fn test_density_first_match_wins() {
        let raw = "Physical density: 560\nPhysical density: 320";
        assert_eq!(parse_density(raw).unwrap(), 560);

        let raw = "Physical density: abc\nPhysical density: 320";
        assert!(parse_density(raw).is_err());
        assert_eq!(density_or_default(raw), 0);
    }

    #[test]
    fn test_density_absent() {
        assert_eq!(density_or_default(""), 0);
        assert_eq!(density_or_default("Override density: 480"), 0);
        assert!(parse_density("density unknown").is_err());
    }

    #[tokio::test]
    async fn test_probe_full_device() {
        let runner = Arc::new(full_device());
        let adb = CommandExecutor::with_runner("adb", runner.clone());

        let probe = probe_device(&adb).await;
        let d = &probe.descriptor;

        assert_eq!(d.name, "SM-S918B");
        assert_eq!((d.width, d.height), (1080, 2400));
        assert_eq!(d.android_version, "14");
        assert_eq!(d.sdk_version, "34");
        assert_eq!(d.manufacturer, "samsung");
        assert_eq!(d.build_id, "UP1A.231005.007");
        assert_eq!(d.cpu_abi, "arm64-v8a");
        assert_eq!(d.screen_density, 420);
        assert_eq!(d.serial_number, "R5CW1234ABC");
        assert!(d.imei.starts_with("Result: Parcel("));
        assert_eq!(d.network_operator, "T-Mobile");
        assert!(probe.is_complete());

        let calls = runner.calls();
        assert_eq!(calls.len(), 12);
        assert_eq!(calls[0], ["shell", "getprop", "ro.boot.em.model"]);
        assert_eq!(calls[8], ["shell", "wm", "density"]);
        assert_eq!(calls[10], ["shell", "service", "call", "iphonesubinfo", "1"]);
    }

    #[tokio::test]
    async fn test_probe_tolerates_failed_query() {
        let runner = full_device().fail(
            "shell getprop ro.product.model",
            1,
            "error: device offline",
        );
        let adb = CommandExecutor::with_runner("adb", Arc::new(runner));

        let probe = probe_device(&adb).await;

        assert_eq!(probe.descriptor.model, "");
        assert_eq!(probe.descriptor.manufacturer, "samsung");
        assert_eq!(
            probe.status(DeviceField::Model),
            Some(&QueryStatus::Failed {
                cause: "error: device offline".to_string()
            })
        );
        assert_eq!(probe.degraded().count(), 1);
    }

    #[tokio::test]
    async fn test_probe_with_nothing_scripted() {
        let adb = CommandExecutor::with_runner("adb", Arc::new(ScriptedRunner::new()));

        let probe = probe_device(&adb).await;

        assert_eq!(probe.descriptor, DeviceDescriptor::default());
        assert_eq!(probe.statuses.len(), 12);
        assert!(probe.statuses.iter().all(|(_, s)| s.is_failed()));
    }

    #[tokio::test]
    async fn test_probe_empty_and_malformed() {
        let runner = full_device()
            .respond("shell getprop service.secureui.screeninfo", "")
            .respond("shell wm density", "Physical density: high\n")
            .respond("shell getprop gsm.operator.alpha", "\n");
        let adb = CommandExecutor::with_runner("adb", Arc::new(runner));

        let probe = probe_device(&adb).await;

        assert_eq!((probe.descriptor.width, probe.descriptor.height), (0, 0));
        assert_eq!(probe.descriptor.screen_density, 0);
        assert_eq!(probe.status(DeviceField::ScreenInfo), Some(&QueryStatus::Empty));
        assert_eq!(
            probe.status(DeviceField::Density),
            Some(&QueryStatus::Malformed {
                raw: "Physical density: high".to_string()
            })
        );
        assert_eq!(probe.status(DeviceField::NetworkOperator), Some(&QueryStatus::Empty));
    }
}
