//! Controller tying the device-bridge and mirroring tools together

use std::path::Path;
use std::sync::Arc;

use crate::adb::{self, AttachedDevice, Point, Screenshot};
use crate::config::{ControllerConfig, StreamOptions};
use crate::descriptor::{DeviceDescriptor, DeviceProbe};
use crate::error::{ControllerError, Result};
use crate::executor::{CommandExecutor, CommandRunner};
use crate::scrcpy::{stream_args, StreamSession};

/// Drives one Android device through adb and scrcpy
///
/// Every operation is a single external invocation (twelve for a probe), run
/// one after another. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct Controller {
    config: ControllerConfig,
    adb: CommandExecutor,
}

impl Controller {
    /// Create a controller that spawns real processes
    pub fn new(config: ControllerConfig) -> Self {
        let adb = CommandExecutor::new(config.adb_path.clone()).with_prefix(config.adb_prefix());
        Self { config, adb }
    }

    /// Create a controller whose adb invocations go through `runner`
    pub fn with_runner(config: ControllerConfig, runner: Arc<dyn CommandRunner>) -> Self {
        let adb = CommandExecutor::with_runner(config.adb_path.clone(), runner)
            .with_prefix(config.adb_prefix());
        Self { config, adb }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The executor used for adb invocations
    pub fn adb(&self) -> &CommandExecutor {
        &self.adb
    }

    /// Set or replace the scrcpy executable
    pub fn set_scrcpy_path(&mut self, scrcpy_path: impl Into<std::path::PathBuf>) {
        self.config.scrcpy_path = Some(scrcpy_path.into());
    }

    /// Run `adb shell <args...>` and return its trimmed stdout
    pub async fn shell<S: AsRef<str>>(&self, args: &[S]) -> Result<String> {
        let mut argv: Vec<&str> = Vec::with_capacity(args.len() + 1);
        argv.push("shell");
        argv.extend(args.iter().map(|a| a.as_ref()));
        self.adb.run(argv.as_slice()).await
    }

    /// Capture the screen into `path`
    pub async fn screenshot(&self, path: impl AsRef<Path>) -> Result<Screenshot> {
        adb::screenshot(&self.adb, path).await
    }

    /// Tap at the given coordinates
    pub async fn tap(&self, at: impl Into<Point>) -> Result<()> {
        adb::tap(&self.adb, at.into()).await
    }

    /// Swipe between two points, 300 ms unless `duration_ms` is given
    pub async fn swipe(
        &self,
        start: impl Into<Point>,
        end: impl Into<Point>,
        duration_ms: Option<u32>,
    ) -> Result<()> {
        adb::swipe(&self.adb, start.into(), end.into(), duration_ms).await
    }

    /// Type text into the focused field
    pub async fn type_text(&self, text: &str) -> Result<()> {
        adb::type_text(&self.adb, text).await
    }

    /// Query every device property, recording the outcome of each query
    pub async fn probe_device(&self) -> DeviceProbe {
        adb::probe_device(&self.adb).await
    }

    /// Query every device property; failed fields hold their defaults
    pub async fn device_descriptor(&self) -> DeviceDescriptor {
        self.probe_device().await.into_descriptor()
    }

    /// List devices attached to the adb server
    pub async fn list_devices(&self) -> Result<Vec<AttachedDevice>> {
        adb::list_devices(&self.adb).await
    }

    /// Start a mirroring session and return its handle
    pub fn spawn_stream(&self, options: &StreamOptions) -> Result<StreamSession> {
        let scrcpy = self
            .config
            .scrcpy_path()
            .ok_or(ControllerError::MirroringToolNotConfigured)?;
        let args = stream_args(options, self.config.serial.as_deref());
        StreamSession::spawn(scrcpy, args.as_slice())
    }

    /// Mirror the screen until the scrcpy window is closed
    pub async fn stream(&self, options: &StreamOptions) -> Result<()> {
        self.spawn_stream(options)?.wait().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::testing::ScriptedRunner;

    fn controller(runner: Arc<ScriptedRunner>) -> Controller {
        Controller::with_runner(ControllerConfig::new("/opt/platform-tools/adb"), runner)
    }

    #[tokio::test]
    async fn test_shell() {
        let runner = Arc::new(ScriptedRunner::new().respond("shell getprop ro.product.model", "Pixel 8\n"));
        let controller = controller(runner);

        assert_eq!(
            controller
                .shell(&["getprop", "ro.product.model"])
                .await
                .unwrap(),
            "Pixel 8"
        );
    }

    #[tokio::test]
    async fn test_serial_prefix_applies_to_gestures() {
        let runner = Arc::new(ScriptedRunner::new().respond("-s emulator-5554 shell input tap 540 1200", ""));
        let controller = Controller::with_runner(
            ControllerConfig::new("adb").with_serial("emulator-5554"),
            runner.clone(),
        );

        controller.tap((540.0, 1200.9)).await.unwrap();
        assert_eq!(runner.calls()[0][..2], ["-s", "emulator-5554"]);
    }

    #[tokio::test]
    async fn test_device_descriptor_after_failures() {
        let runner = Arc::new(
            ScriptedRunner::new()
                .respond("shell getprop service.secureui.screeninfo", "1080x2400")
                .respond("shell wm density", "Physical density: 420\nOverride density: 480"),
        );
        let controller = controller(runner);

        let descriptor = controller.device_descriptor().await;

        assert_eq!((descriptor.width, descriptor.height), (1080, 2400));
        assert_eq!(descriptor.screen_density, 420);
        assert_eq!(descriptor.model, "");
        assert_eq!(descriptor.imei, "");
    }

    #[tokio::test]
    async fn test_swipe_integer_points() {
        let runner = Arc::new(ScriptedRunner::new().respond("shell input swipe 0 0 100 100 50", ""));
        let controller = controller(runner);

        controller.swipe((0u32, 0u32), (100u32, 100u32), Some(50)).await.unwrap();
    }

    #[test]
    fn test_stream_requires_scrcpy() {
        let controller = controller(Arc::new(ScriptedRunner::new()));
        let err = controller.spawn_stream(&StreamOptions::default()).unwrap_err();
        assert!(matches!(err, ControllerError::MirroringToolNotConfigured));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stream_blocks_until_exit() {
        let mut controller = controller(Arc::new(ScriptedRunner::new()));
        // `true` ignores the scrcpy flags and exits cleanly
        controller.set_scrcpy_path("true");

        controller.stream(&StreamOptions::default()).await.unwrap();
    }
}
