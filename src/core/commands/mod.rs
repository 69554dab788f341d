//! Command parsing and execution.
//!
//! This module provides:
//! - `Command` enum for parsed built-ins
//! - `ExecutionResult` for command execution results
//! - `execute` for running one command line against session state
//!
//! # Architecture
//!
//! A line is split on whitespace (no quoting), the first word picks the
//! built-in via `Command::parse`, and `execute_command` runs it against the
//! borrowed [`ShellContext`]. The interpreter keeps no state of its own.

mod execute;
mod result;

pub use execute::execute_command;
pub use result::ExecutionResult;

use std::fmt;

use crate::config::BUILTIN_NAMES;
use crate::core::VirtualFs;
use crate::core::env::Environment;
use crate::core::error::ShellError;

// =============================================================================
// Path Argument Type
// =============================================================================

/// A path argument passed to a command (e.g., `cd foo`, `cat bar.md`).
///
/// Stored as typed; it is expanded and canonicalized against the current
/// directory only when the command runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathArg(String);

impl PathArg {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for PathArg {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PathArg {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// Command Enum
// =============================================================================

/// Parsed built-in command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Blank line
    Empty,
    Ls(Option<PathArg>),
    /// `None` means `$HOME`
    Cd(Option<PathArg>),
    Pwd,
    Cat(Vec<PathArg>),
    Echo(Vec<String>),
    Env,
    /// No assignments means "list like `env`"
    Export(Vec<String>),
    Unset(Vec<String>),
    History,
    Clear,
    Whoami,
    Date,
    Help,
    Exit,
    /// Known command used incorrectly
    Invalid(ShellError),
    Unknown(String),
}

impl Command {
    /// Built-in names offered by tab completion.
    ///
    /// Aliases (`cls`, `?`) are accepted by [`Command::parse`] but not listed.
    pub fn names() -> &'static [&'static str] {
        BUILTIN_NAMES
    }

    /// Parse a whitespace-split line.
    pub fn parse_line(line: &str) -> Self {
        let mut words = line.split_whitespace();
        match words.next() {
            Some(name) => Self::parse(name, &words.map(str::to_string).collect::<Vec<_>>()),
            None => Self::Empty,
        }
    }

    /// Parse command from name and arguments.
    pub fn parse(name: &str, args: &[String]) -> Self {
        match name {
            "ls" => Self::Ls(args.first().map(PathArg::new)),
            "cd" => Self::Cd(args.first().map(PathArg::new)),
            "pwd" => Self::Pwd,
            "cat" => {
                if args.is_empty() {
                    Self::Invalid(ShellError::MissingOperand {
                        command: "cat",
                        operand: "file",
                    })
                } else {
                    Self::Cat(args.iter().map(PathArg::new).collect())
                }
            }
            "echo" => Self::Echo(args.to_vec()),
            "env" => Self::Env,
            "export" => Self::Export(args.to_vec()),
            "unset" => {
                if args.is_empty() {
                    Self::Invalid(ShellError::MissingOperand {
                        command: "unset",
                        operand: "variable name",
                    })
                } else {
                    Self::Unset(args.to_vec())
                }
            }
            "history" => Self::History,
            "clear" | "cls" => Self::Clear,
            "whoami" => Self::Whoami,
            "date" => Self::Date,
            "help" | "?" => Self::Help,
            "exit" => Self::Exit,
            _ => Self::Unknown(name.to_string()),
        }
    }
}

// =============================================================================
// Interpreter Entry Point
// =============================================================================

/// Session state borrowed for the duration of one command.
pub struct ShellContext<'a> {
    /// Current working directory (canonical)
    pub cwd: &'a str,
    pub env: &'a mut Environment,
    pub fs: &'a VirtualFs,
    /// Past commands, oldest first
    pub history: &'a [String],
}

/// Execute one command line.
///
/// Never fails: every error becomes output. A returned `new_cwd` must be
/// applied by the caller, together with `$PWD`.
pub fn execute(line: &str, ctx: ShellContext<'_>) -> ExecutionResult {
    let cmd = Command::parse_line(line);
    log::debug!("dispatching {:?}", cmd);
    execute_command(cmd, ctx)
}

// =============================================================================
// Tests
// =============================================================================
