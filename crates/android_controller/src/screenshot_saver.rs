//! Numbered screenshot series in timestamped session directories

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::adb::Screenshot;
use crate::controller::Controller;
use crate::error::Result;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S-%3f";

/// Saves successive screenshots as `step_NNN_<timestamp>.png`
#[derive(Debug, Clone)]
pub struct ScreenshotSaver {
    /// Base directory for all sessions
    base_dir: PathBuf,
    /// Current session directory, named after its start time
    session_dir: PathBuf,
    step_count: usize,
}

impl ScreenshotSaver {
    /// Create a saver and its first session directory under `base_dir`
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let session_dir = create_session_dir(&base_dir).await?;

        Ok(Self {
            base_dir,
            session_dir,
            step_count: 0,
        })
    }

    /// Path the next capture will be written to
    fn next_path(&mut self) -> PathBuf {
        self.step_count += 1;
        let now: DateTime<Local> = Local::now();
        self.session_dir.join(format!(
            "step_{:03}_{}.png",
            self.step_count,
            now.format(TIMESTAMP_FORMAT)
        ))
    }

    /// Capture the device screen into the session directory
    pub async fn capture(&mut self, controller: &Controller) -> Result<Screenshot> {
        let path = self.next_path();
        match controller.screenshot(&path).await {
            Ok(shot) => Ok(shot),
            Err(e) => {
                self.step_count -= 1;
                Err(e)
            }
        }
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Start a new session directory and reset the step counter
    pub async fn new_session(&mut self) -> Result<()> {
        self.session_dir = create_session_dir(&self.base_dir).await?;
        self.step_count = 0;
        Ok(())
    }
}

async fn create_session_dir(base_dir: &Path) -> Result<PathBuf> {
    let session_start: DateTime<Local> = Local::now();
    let session_dir = base_dir.join(session_start.format(TIMESTAMP_FORMAT).to_string());

    fs::create_dir_all(&session_dir).await?;
    info!("Screenshot session directory: {}", session_dir.display());

    Ok(session_dir)
}
