//! Error types for controller operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Command `{program}` failed ({}): {stderr}", exit_label(.status))]
    CommandFailed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Mirroring tool path is not configured")]
    MirroringToolNotConfigured,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_label(status: &Option<i32>) -> String {
    match *status {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ControllerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_message() {
        let err = ControllerError::CommandFailed {
            program: "adb".to_string(),
            status: Some(1),
            stderr: "error: no devices/emulators found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Command `adb` failed (exit code 1): error: no devices/emulators found"
        );
    }

    #[test]
    fn test_signal_exit_message() {
        let err = ControllerError::CommandFailed {
            program: "scrcpy".to_string(),
            status: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }
}
