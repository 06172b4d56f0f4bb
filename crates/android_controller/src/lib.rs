//! android_controller: Android device automation over adb and scrcpy
//!
//! This library drives an attached Android device through two external
//! executables:
//! - adb for gestures, text input, screenshots and property queries
//! - scrcpy for mirroring the screen on the host
//!
//! # Example
//!
//! ```no_run
//! use android_controller::{Controller, ControllerConfig, StreamOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> android_controller::Result<()> {
//!     let config = ControllerConfig::new("/opt/platform-tools/adb")
//!         .with_scrcpy_path("/opt/scrcpy/scrcpy");
//!     let controller = Controller::new(config);
//!
//!     let device = controller.device_descriptor().await;
//!     println!("{}", device);
//!
//!     controller.tap((device.width / 2, device.height / 14)).await?;
//!     controller.type_text("Hello, World!").await?;
//!     controller.screenshot("scr.png").await?;
//!     controller.stream(&StreamOptions::default()).await
//! }
//! ```

// Core modules
pub mod error;
pub mod executor;

// Configuration module
pub mod config;

// Tool backends
pub mod adb;
pub mod scrcpy;

// Core functionality
pub mod controller;
pub mod descriptor;
pub mod screenshot_saver;

// Re-export commonly used types and functions
pub use error::{ControllerError, Result};

pub use executor::{CommandExecutor, CommandOutput, CommandRunner, ProcessRunner};

pub use config::{ControllerConfig, StreamOptions};

pub use adb::{
    density_or_default, parse_density, parse_device_list, parse_screen_info, screen_dimensions,
    shell_quote, AttachedDevice, ConnectionType, Point, Screenshot, DEFAULT_SWIPE_DURATION_MS,
};

pub use scrcpy::{stream_args, StreamSession};

pub use controller::Controller;
pub use descriptor::{DeviceDescriptor, DeviceField, DeviceProbe, QueryStatus};
pub use screenshot_saver::ScreenshotSaver;
