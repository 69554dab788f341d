//! Command execution result type.

use crate::models::OutputLine;

/// Result of executing a command line.
///
/// Commands produce output and may ask the session to change directory,
/// clear the screen, or end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Output lines to display
    pub output: Vec<OutputLine>,
    /// New working directory (set by a successful `cd`)
    pub new_cwd: Option<String>,
    /// Reset the visible screen (set by `clear`)
    pub clear_screen: bool,
    /// End the session (set by `exit`)
    pub exit: bool,
}

impl ExecutionResult {
    /// Create a result with just output.
    pub fn output(lines: Vec<OutputLine>) -> Self {
        Self {
            output: lines,
            ..Self::default()
        }
    }

    /// Create a result that moves the session to `cwd`.
    pub fn navigate(cwd: impl Into<String>) -> Self {
        Self {
            new_cwd: Some(cwd.into()),
            ..Self::default()
        }
    }

    /// Create an empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Output as plain text, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.output
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
