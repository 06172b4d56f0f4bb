//! Text input for the focused field

use tracing::info;

use crate::error::Result;
use crate::executor::CommandExecutor;

/// Quote a string for the device shell
///
/// Strings made only of safe characters are returned as-is, anything else is
/// wrapped in single quotes with embedded quotes spliced as `'"'"'`.
pub fn shell_quote(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }

    let is_safe = |c: char| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c);
    if value.chars().all(is_safe) {
        return value.to_string();
    }

    format!("'{}'", value.replace('\'', "'\"'\"'"))
}

/// Type text into the currently focused input field
pub async fn type_text(adb: &CommandExecutor, text: &str) -> Result<()> {
    let escaped = shell_quote(text);
    adb.run(&["shell", "input", "text", escaped.as_str()]).await?;

    info!("Text {:?} typed on the device", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::testing::ScriptedRunner;
    use std::sync::Arc;

    #[test]
    fn test_safe_strings_unquoted() {
        assert_eq!(shell_quote("hello"), "hello");
        assert_eq!(shell_quote("user@example.com"), "user@example.com");
        assert_eq!(shell_quote("a-b_c/d:e,f=g+h%"), "a-b_c/d:e,f=g+h%");
    }

    #[test]
    fn test_unsafe_strings_quoted() {
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("Hello, World!"), "'Hello, World!'");
        assert_eq!(shell_quote("$(reboot)"), "'$(reboot)'");
        assert_eq!(shell_quote("it's"), "'it'\"'\"'s'");
        assert_eq!(shell_quote("café"), "'café'");
    }

    #[tokio::test]
    async fn test_type_text_single_argument() {
        let runner = Arc::new(ScriptedRunner::new().respond("shell input text 'Hello, World!'", ""));
        let adb = CommandExecutor::with_runner("adb", runner.clone());

        type_text(&adb, "Hello, World!").await.unwrap();

        let calls = runner.calls();
        assert_eq!(calls[0].len(), 4);
        assert_eq!(calls[0][3], "'Hello, World!'");
    }
}
