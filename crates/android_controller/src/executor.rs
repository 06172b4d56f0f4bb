//! Command execution for a single external executable

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;

use crate::error::{ControllerError, Result};

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            status: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

/// Launches a program and waits for it to exit
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn output(&self, program: &Path, args: &[String]) -> Result<CommandOutput>;
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn output(&self, program: &Path, args: &[String]) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ControllerError::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        Ok(output.into())
    }
}

/// Wraps one executable path and runs argument lists against it
///
/// A non-zero exit is reported as [`ControllerError::CommandFailed`] carrying
/// the captured stderr. There is no timeout: a process that never exits
/// blocks the caller.
#[derive(Clone)]
pub struct CommandExecutor {
    program: PathBuf,
    prefix: Vec<String>,
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("program", &self.program)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl CommandExecutor {
    /// Create an executor that spawns real processes
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self::with_runner(program, Arc::new(ProcessRunner))
    }

    /// Create an executor backed by a custom runner
    pub fn with_runner(program: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            program: program.into(),
            prefix: Vec::new(),
            runner,
        }
    }

    /// Arguments inserted before every argument list
    pub fn with_prefix(mut self, prefix: Vec<String>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Copy of this executor without the argument prefix
    pub fn without_prefix(&self) -> Self {
        Self {
            program: self.program.clone(),
            prefix: Vec::new(),
            runner: Arc::clone(&self.runner),
        }
    }

    /// Run and return stdout untouched
    pub async fn run_raw<S: AsRef<str>>(&self, args: &[S]) -> Result<Vec<u8>> {
        let argv: Vec<String> = self
            .prefix
            .iter()
            .cloned()
            .chain(args.iter().map(|a| a.as_ref().to_string()))
            .collect();

        debug!("Running {} {}", self.program.display(), argv.join(" "));

        let output = self.runner.output(&self.program, &argv).await?;

        if !output.success() {
            return Err(ControllerError::CommandFailed {
                program: self.program.display().to_string(),
                status: output.status,
                stderr: output.stderr_lossy().trim().to_string(),
            });
        }

        Ok(output.stdout)
    }

    /// Run and return stdout as text with trailing whitespace removed
    pub async fn run<S: AsRef<str>>(&self, args: &[S]) -> Result<String> {
        let stdout = self.run_raw(args).await?;
        Ok(String::from_utf8_lossy(&stdout).trim_end().to_string())
    }
}
