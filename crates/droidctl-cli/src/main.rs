//! droidctl - Command-line interface for Android device automation
//!
//! Usage:
//!     droidctl [OPTIONS] <COMMAND>
//!
//! Environment Variables:
//!     DROIDCTL_ADB_PATH: adb executable (default: adb)
//!     DROIDCTL_SCRCPY_PATH: scrcpy executable, required for `stream`
//!     ANDROID_SERIAL: Serial of the device to target when several are attached
//!     RUST_LOG: Log filter, overrides --verbose/--quiet

use android_controller::{
    Controller, ControllerConfig, DeviceProbe, QueryStatus, ScreenshotSaver, StreamOptions,
};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// droidctl - control an Android device through adb and scrcpy
#[derive(Parser, Debug)]
#[command(name = "droidctl")]
#[command(about = "Control an Android device through adb and scrcpy")]
#[command(after_help = r#"Examples:
    # Show device properties
    droidctl info

    # Tap the middle of a 1080x2400 screen
    droidctl tap 540 1200

    # Swipe up over 100ms
    droidctl swipe 540 1440 540 960 --duration 100

    # Type into the focused field
    droidctl text "Hello, World!"

    # Save a screenshot
    droidctl screenshot scr.png

    # Mirror the screen at 30 fps
    droidctl --scrcpy /opt/scrcpy/scrcpy stream --max-fps 30
"#)]
struct Cli {
    /// adb executable
    #[arg(long, env = "DROIDCTL_ADB_PATH", default_value = "adb")]
    adb: PathBuf,

    /// scrcpy executable
    #[arg(long, env = "DROIDCTL_SCRCPY_PATH")]
    scrcpy: Option<PathBuf>,

    /// Target device serial
    #[arg(short = 's', long, env = "ANDROID_SERIAL")]
    serial: Option<String>,

    /// Enable debug logging
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short = 'q', long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List attached devices
    Devices,

    /// Probe the device and print its properties
    Info {
        /// Print the probe as JSON
        #[arg(long)]
        json: bool,
    },

    /// Tap at coordinates
    Tap { x: f64, y: f64 },

    /// Swipe between two points
    Swipe {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        /// Duration in milliseconds
        #[arg(long, default_value_t = android_controller::DEFAULT_SWIPE_DURATION_MS)]
        duration: u32,
    },

    /// Type text into the focused field
    Text { text: String },

    /// Run a command in the device shell and print its output
    Shell {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Capture a screenshot
    Screenshot {
        /// Output file
        #[arg(default_value = "screenshot.png", conflicts_with = "dir")]
        path: PathBuf,

        /// Save into a timestamped session directory under DIR instead
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Mirror the device screen until the window is closed
    Stream(StreamArgs),

    /// Verify that the configured tools can be executed
    Check,

    /// Walk through probe, gestures, text input, screenshot and mirroring
    Demo {
        /// Pause between steps in milliseconds
        #[arg(long, default_value_t = 250)]
        step_delay_ms: u64,

        /// Text typed into the search bar
        #[arg(long, default_value = "Hello, World!")]
        text: String,

        /// Screenshot output file
        #[arg(long, default_value = "scr.png")]
        screenshot: PathBuf,

        /// Skip the mirroring step
        #[arg(long)]
        no_stream: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct StreamArgs {
    /// Frame rate limit
    #[arg(long)]
    max_fps: Option<u32>,

    /// Video bit rate (e.g. 8M)
    #[arg(long)]
    video_bit_rate: Option<String>,

    /// Audio bit rate (e.g. 128K)
    #[arg(long)]
    audio_bit_rate: Option<String>,

    /// Rotate the mirrored display
    #[arg(long)]
    rotate: bool,

    /// Do not keep the window above others
    #[arg(long)]
    no_always_on_top: bool,

    /// Let the device screensaver run
    #[arg(long)]
    no_disable_screensaver: bool,

    /// Forward device audio
    #[arg(long)]
    audio: bool,
}

impl StreamArgs {
    fn to_options(&self) -> StreamOptions {
        let mut options = StreamOptions::new()
            .with_rotate(self.rotate)
            .with_always_on_top(!self.no_always_on_top)
            .with_disable_screensaver(!self.no_disable_screensaver)
            .with_no_audio(!self.audio);

        if let Some(fps) = self.max_fps {
            options = options.with_max_fps(fps);
        }
        if let Some(rate) = &self.video_bit_rate {
            options = options.with_video_bit_rate(rate);
        }
        if let Some(rate) = &self.audio_bit_rate {
            options = options.with_audio_bit_rate(rate);
        }

        options
    }
}

/// Install the tracing subscriber
fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "droidctl=debug,android_controller=debug"
    } else if quiet {
        "droidctl=warn,android_controller=warn"
    } else {
        "droidctl=info,android_controller=info"
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Check that a tool resolves to an executable and answers its version flag
async fn check_tool(name: &str, path: &Path, version_arg: &str) -> bool {
    print!("Checking {} ({})... ", name, path.display());
    io::stdout().flush().ok();

    let resolved = match which::which(path) {
        Ok(resolved) => resolved,
        Err(_) => {
            println!("\u{274C} FAILED");
            println!("   Error: {} is not installed or not executable.", path.display());
            return false;
        }
    };

    match Command::new(&resolved).arg(version_arg).output().await {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let version_line = stdout.lines().next().unwrap_or("").trim();
            println!(
                "\u{2705} OK ({})",
                if version_line.is_empty() {
                    "installed"
                } else {
                    version_line
                }
            );
            true
        }
        Ok(output) => {
            println!("\u{274C} FAILED");
            println!(
                "   Error: {} {} exited with {}",
                resolved.display(),
                version_arg,
                output.status
            );
            false
        }
        Err(e) => {
            println!("\u{274C} FAILED");
            println!("   Error: {}", e);
            false
        }
    }
}

async fn run_check(args: &Cli) -> Result<()> {
    println!("{}", "-".repeat(50));
    let mut all_passed = check_tool("adb", &args.adb, "version").await;

    match &args.scrcpy {
        Some(scrcpy) => all_passed &= check_tool("scrcpy", scrcpy, "--version").await,
        None => println!("Skipping scrcpy: no path configured (--scrcpy or DROIDCTL_SCRCPY_PATH)"),
    }
    println!("{}", "-".repeat(50));

    if !all_passed {
        bail!("tool check failed");
    }
    println!("\u{2705} All checks passed!");
    Ok(())
}

/// Print a probe as a property table
fn print_probe(probe: &DeviceProbe) {
    let d = &probe.descriptor;
    println!("{}", d);
    println!("{}", "-".repeat(50));
    println!("  {:<18} {}", "Name:", d.name);
    println!("  {:<18} {}x{}", "Screen:", d.width, d.height);
    println!("  {:<18} {}", "Density:", d.screen_density);
    println!("  {:<18} {}", "Android:", d.android_version);
    println!("  {:<18} {}", "SDK:", d.sdk_version);
    println!("  {:<18} {}", "Model:", d.model);
    println!("  {:<18} {}", "Manufacturer:", d.manufacturer);
    println!("  {:<18} {}", "Build ID:", d.build_id);
    println!("  {:<18} {}", "CPU ABI:", d.cpu_abi);
    println!("  {:<18} {}", "Serial:", d.serial_number);
    println!("  {:<18} {}", "IMEI:", d.imei);
    println!("  {:<18} {}", "Operator:", d.network_operator);

    let degraded: Vec<_> = probe.degraded().collect();
    if !degraded.is_empty() {
        println!("{}", "-".repeat(50));
        for (field, status) in degraded {
            match status {
                QueryStatus::Failed { cause } => println!("  \u{2717} {}: query failed: {}", field, cause),
                QueryStatus::Malformed { raw } => println!("  \u{2717} {}: unparseable {:?}", field, raw),
                _ => {}
            }
        }
    }
}

async fn run_devices(controller: &Controller) -> Result<()> {
    let devices = controller
        .list_devices()
        .await
        .context("failed to list devices")?;

    if devices.is_empty() {
        println!("No devices connected.");
        return Ok(());
    }

    println!("Connected devices:");
    println!("{}", "-".repeat(60));
    for device in devices {
        let status_icon = if device.is_online() { "\u{2713}" } else { "\u{2717}" };
        let model_info = device
            .model
            .map(|m| format!(" ({})", m))
            .unwrap_or_default();
        println!(
            "  {} {:<30} [{:?}] {}{}",
            status_icon, device.serial, device.connection_type, device.state, model_info
        );
    }
    Ok(())
}

async fn run_screenshot(controller: &Controller, path: &Path, dir: Option<&Path>) -> Result<()> {
    let shot = match dir {
        Some(dir) => {
            let mut saver = ScreenshotSaver::new(dir)
                .await
                .with_context(|| format!("failed to create session under {}", dir.display()))?;
            saver.capture(controller).await
        }
        None => controller.screenshot(path).await,
    }
    .context("screenshot failed")?;

    match shot.dimensions {
        Some((width, height)) => println!(
            "{} ({}x{}, {} bytes)",
            shot.path.display(),
            width,
            height,
            shot.size_bytes
        ),
        None => println!("{} ({} bytes)", shot.path.display(), shot.size_bytes),
    }
    Ok(())
}

/// Probe, go to the home screen, open search, type, capture and mirror
async fn run_demo(
    controller: &Controller,
    step_delay: Duration,
    text: &str,
    screenshot: &Path,
    stream: bool,
) -> Result<()> {
    let device = controller.device_descriptor().await;
    println!("{}", device);

    if device.width == 0 || device.height == 0 {
        bail!("screen size unknown, cannot place gestures");
    }
    let (w, h) = (f64::from(device.width), f64::from(device.height));

    // Close to home menu
    controller
        .swipe((w / 2.0, h - 1.0), (w / 2.0, h / 16.0 * 15.0), Some(50))
        .await?;
    tokio::time::sleep(step_delay).await;
    controller
        .swipe((w / 2.0, h / 5.0 * 3.0), (w / 2.0, h / 5.0 * 2.0), Some(100))
        .await?;

    // Tap and type in search bar
    tokio::time::sleep(step_delay).await;
    controller.tap((w / 2.0, h / 14.0)).await?;
    tokio::time::sleep(step_delay).await;
    controller.type_text(text).await?;

    controller.screenshot(screenshot).await?;

    if stream {
        controller.stream(&StreamArgs::default().to_options()).await?;
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose, args.quiet);

    if matches!(args.command, Commands::Check) {
        return run_check(&args).await;
    }

    let mut config = ControllerConfig::new(&args.adb);
    if let Some(scrcpy) = &args.scrcpy {
        config = config.with_scrcpy_path(scrcpy);
    }
    if let Some(serial) = &args.serial {
        config = config.with_serial(serial);
    }
    let controller = Controller::new(config);

    match &args.command {
        Commands::Devices => run_devices(&controller).await?,
        Commands::Info { json } => {
            let probe = controller.probe_device().await;
            if *json {
                println!("{}", serde_json::to_string_pretty(&probe)?);
            } else {
                print_probe(&probe);
            }
        }
        Commands::Tap { x, y } => controller.tap((*x, *y)).await.context("tap failed")?,
        Commands::Swipe {
            x1,
            y1,
            x2,
            y2,
            duration,
        } => controller
            .swipe((*x1, *y1), (*x2, *y2), Some(*duration))
            .await
            .context("swipe failed")?,
        Commands::Text { text } => controller
            .type_text(text)
            .await
            .context("text input failed")?,
        Commands::Shell { args } => {
            let output = controller.shell(args.as_slice()).await?;
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Commands::Screenshot { path, dir } => {
            run_screenshot(&controller, path, dir.as_deref()).await?
        }
        Commands::Stream(stream_args) => {
            info!("Mirroring until the scrcpy window is closed");
            controller
                .stream(&stream_args.to_options())
                .await
                .context("mirroring failed")?
        }
        Commands::Demo {
            step_delay_ms,
            text,
            screenshot,
            no_stream,
        } => {
            run_demo(
                &controller,
                Duration::from_millis(*step_delay_ms),
                text,
                screenshot,
                !*no_stream,
            )
            .await?
        }
        Commands::Check => unreachable!("handled above"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_stream_args_match_library_defaults() {
        assert_eq!(StreamArgs::default().to_options(), StreamOptions::default());
    }

    #[test]
    fn test_stream_flags() {
        let cli = Cli::parse_from([
            "droidctl",
            "stream",
            "--max-fps",
            "30",
            "--video-bit-rate",
            "8M",
            "--audio",
            "--rotate",
        ]);
        let Commands::Stream(stream_args) = cli.command else {
            panic!("expected stream command");
        };
        assert_eq!(
            stream_args.to_options().to_args(),
            vec![
                "--max-fps=30",
                "--video-bit-rate=8M",
                "--rotate",
                "--always-on-top",
                "--disable-screensaver",
            ]
        );
    }

    #[test]
    fn test_fractional_tap() {
        let cli = Cli::parse_from(["droidctl", "-s", "emulator-5554", "tap", "10.7", "20.2"]);
        assert_eq!(cli.serial.as_deref(), Some("emulator-5554"));
        assert!(matches!(cli.command, Commands::Tap { x, y } if x == 10.7 && y == 20.2));
    }

    #[test]
    fn test_shell_passes_hyphen_args() {
        let cli = Cli::parse_from(["droidctl", "shell", "ls", "-la", "/sdcard"]);
        let Commands::Shell { args } = cli.command else {
            panic!("expected shell command");
        };
        assert_eq!(args, vec!["ls", "-la", "/sdcard"]);
    }
}
