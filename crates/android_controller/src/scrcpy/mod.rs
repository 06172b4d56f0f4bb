//! Screen mirroring through scrcpy
//!
//! A mirroring session lives as long as the scrcpy window. [`StreamSession`]
//! is the handle to a running session: await [`StreamSession::wait`] to block
//! until the window closes, or call [`StreamSession::stop`] to end it early.

use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::config::StreamOptions;
use crate::error::{ControllerError, Result};

/// Full scrcpy argument list for a session
pub fn stream_args(options: &StreamOptions, serial: Option<&str>) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(serial) = serial {
        args.push(format!("--serial={}", serial));
    }
    args.extend(options.to_args());
    args
}

/// A running mirroring process
///
/// Dropping the handle kills the process.
#[derive(Debug)]
pub struct StreamSession {
    program: String,
    child: Child,
}

impl StreamSession {
    /// Launch the mirroring tool with stdio inherited from the caller
    pub fn spawn<S: AsRef<str>>(program: &Path, args: &[S]) -> Result<Self> {
        let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
        debug!("Launching {} {}", program.display(), args.join(" "));

        let child = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ControllerError::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        info!("Mirroring session started (pid {:?})", child.id());

        Ok(Self {
            program: program.display().to_string(),
            child,
        })
    }

    /// OS process id, `None` once the process has been reaped
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait for the mirroring window to close
    pub async fn wait(mut self) -> Result<()> {
        let status = self.child.wait().await?;
        info!("Mirroring session ended ({})", status);

        if status.success() {
            Ok(())
        } else {
            Err(ControllerError::CommandFailed {
                program: self.program,
                status: status.code(),
                stderr: String::new(),
            })
        }
    }

    /// Kill the mirroring process and reap it
    pub async fn stop(mut self) -> Result<()> {
        self.child.kill().await?;
        info!("Mirroring session stopped");
        Ok(())
    }
}
