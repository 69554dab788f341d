//! Error types for the shell core.
//!
//! Every failure a command can hit is a value, rendered into output text by
//! the interpreter. Only [`ConfigError`] ever reaches a front end:
//!
//! - [`FsError`] - virtual filesystem lookups
//! - [`ShellError`] - command dispatch and operands
//! - [`EnvironmentError`] - environment variable updates
//! - [`InputError`] - keystroke decoding
//! - [`ConfigError`] - loading session configuration and seed trees

use std::path::PathBuf;

use thiserror::Error;

/// Virtual filesystem errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("No such file or directory")]
    NotFound,
    #[error("Not a directory")]
    NotADirectory,
    #[error("Is a directory")]
    IsADirectory,
}

/// Command-level errors surfaced as output text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// A required operand was not given, e.g. `cat` with no file.
    #[error("{command}: missing {operand} operand")]
    MissingOperand {
        command: &'static str,
        operand: &'static str,
    },
    #[error("{0}: command not found")]
    UnknownCommand(String),
}

/// Environment variable errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    #[error("variable name must not be empty")]
    EmptyName,
}

/// Keystroke decoding errors. Dropped after logging, never shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("malformed escape sequence: {0:?}")]
    MalformedEscapeSequence(String),
}

/// Errors loading configuration or seed data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid seed tree: {0}")]
    Json(#[from] serde_json::Error),
    #[error("seed tree root must be a directory")]
    RootNotDirectory,
}
