//! Core business logic for the shell emulator.
//!
//! This module provides:
//! - [`VirtualFs`] virtual filesystem management
//! - [`Environment`] variable scope and [`CommandHistory`]
//! - [`Command`] parsing and [`execute`] execution
//! - [`autocomplete`] for tab completion
//! - [`KeyDecoder`], [`LineBuffer`] and [`ShellSession`] for line editing

mod autocomplete;
mod commands;
pub mod env;
pub mod error;
mod filesystem;
mod history;
mod input;
mod line_buffer;
mod session;

pub use autocomplete::{AutocompleteResult, autocomplete};
pub use commands::{Command, ExecutionResult, PathArg, ShellContext, execute, execute_command};
pub use env::Environment;
pub use filesystem::{DirEntry, VirtualFs};
pub use history::CommandHistory;
pub use input::KeyDecoder;
pub use line_buffer::LineBuffer;
pub use session::{SessionOptions, ShellSession, load_seed};
