//! System clipboard through platform copy utilities
//!
//! Tries each known copy command in order and pipes the text to the first
//! one that runs successfully.

use crate::errors::{Result, SummaryError};
use crate::session::Clipboard;
use std::io::Write;
use std::process::{Command, Stdio};

/// Copy commands tried in order
#[cfg(target_os = "macos")]
const DEFAULT_COMMANDS: &[&[&str]] = &[&["pbcopy"]];

#[cfg(windows)]
const DEFAULT_COMMANDS: &[&[&str]] = &[&["clip"]];

#[cfg(not(any(target_os = "macos", windows)))]
const DEFAULT_COMMANDS: &[&[&str]] = &[
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
];

/// Clipboard backed by external copy utilities
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    commands: Vec<Vec<String>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::with_commands(
            DEFAULT_COMMANDS
                .iter()
                .map(|argv| argv.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    pub fn with_commands(commands: Vec<Vec<String>>) -> Self {
        Self { commands }
    }

    fn pipe_to(argv: &[String], text: &str) -> std::io::Result<bool> {
        let Some((program, args)) = argv.split_first() else {
            return Ok(false);
        };
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        // Dropping stdin closes the pipe before waiting
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };
        let status = child.wait()?;
        written?;
        Ok(status.success())
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        for argv in &self.commands {
            match Self::pipe_to(argv, text) {
                Ok(true) => {
                    tracing::debug!(command = %argv.join(" "), bytes = text.len(), "copied to clipboard");
                    return Ok(());
                }
                Ok(false) => tracing::debug!(command = %argv.join(" "), "copy command failed"),
                Err(e) => tracing::debug!(command = %argv.join(" "), error = %e, "copy command unavailable"),
            }
        }
        Err(SummaryError::Generic(
            "No clipboard utility available (tried pbcopy, wl-copy, xclip, xsel, clip)".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_commands_error() {
        let clipboard = SystemClipboard::with_commands(vec![vec![
            "crunchdigest-no-such-copy-tool".to_string(),
        ]]);
        assert!(clipboard.copy("text").is_err());
    }

    #[test]
    fn test_empty_command_list_errors() {
        let clipboard = SystemClipboard::with_commands(Vec::new());
        assert!(clipboard.copy("text").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_first_working_command_wins() {
        let clipboard = SystemClipboard::with_commands(vec![
            vec!["false".to_string()],
            vec!["cat".to_string()],
        ]);
        assert!(clipboard.copy("summary").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_closed_stdin_reports_write_error() {
        // `true` exits without reading, so a payload larger than the pipe
        // buffer fails with a broken pipe after the child is reaped
        let text = "a".repeat(4 * 1024 * 1024);
        let result = SystemClipboard::pipe_to(&["true".to_string()], &text);
        assert!(matches!(result, Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe));
    }
}
