//! Touch gestures for Android automation

use tracing::info;

use crate::error::Result;
use crate::executor::CommandExecutor;

/// Default swipe duration in milliseconds
pub const DEFAULT_SWIPE_DURATION_MS: u32 = 300;

/// Screen coordinates, truncated toward zero when sent to the device
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Integer arguments for `input tap`/`input swipe`
    pub fn to_args(self) -> [String; 2] {
        [truncate(self.x).to_string(), truncate(self.y).to_string()]
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self {
            x: f64::from(x),
            y: f64::from(y),
        }
    }
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Self {
        Self {
            x: f64::from(x),
            y: f64::from(y),
        }
    }
}

fn truncate(value: f64) -> i64 {
    // `as` truncates toward zero and maps NaN to 0
    value.trunc() as i64
}

/// Tap at the specified coordinates
pub async fn tap(adb: &CommandExecutor, at: Point) -> Result<()> {
    let [x, y] = at.to_args();
    adb.run(&["shell", "input", "tap", x.as_str(), y.as_str()])
        .await?;

    info!("Tap executed at ({}, {})", x, y);
    Ok(())
}

/// Swipe from start to end coordinates
pub async fn swipe(
    adb: &CommandExecutor,
    start: Point,
    end: Point,
    duration_ms: Option<u32>,
) -> Result<()> {
    let [start_x, start_y] = start.to_args();
    let [end_x, end_y] = end.to_args();
    let duration = duration_ms.unwrap_or(DEFAULT_SWIPE_DURATION_MS).to_string();

    adb.run(&[
        "shell",
        "input",
        "swipe",
        start_x.as_str(),
        start_y.as_str(),
        end_x.as_str(),
        end_y.as_str(),
        duration.as_str(),
    ])
    .await?;

    info!(
        "Swipe executed from ({}, {}) to ({}, {}) over {}ms",
        start_x, start_y, end_x, end_y, duration
    );
    Ok(())
}
