//! In-process shell emulator for embedded terminal panes.
//!
//! A [`ShellSession`] owns a read-only virtual filesystem, an environment,
//! command history and a line editor. Feed it keystrokes and write the
//! returned [`TerminalOutput`] chunks to a screen:
//!
//! ```
//! use shellpane::{ShellSession, TerminalOutput};
//!
//! let mut session = ShellSession::default();
//! let out = session.feed_bytes(b"pwd\r");
//! assert!(out.contains(&TerminalOutput::text("/project/workspace\r\n")));
//! ```

pub mod config;
pub mod core;
pub mod models;
pub mod utils;

pub use crate::core::{ExecutionResult, SessionOptions, ShellSession, VirtualFs};
pub use crate::models::{KeyEvent, OutputLine, TerminalOutput};
