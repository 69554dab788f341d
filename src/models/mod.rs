//! Data models shared by the shell core and front ends.
//!
//! Contains domain types for:
//! - [`FsEntry`] - Virtual filesystem nodes
//! - [`OutputLine`], [`TerminalOutput`] - Command output and the render stream
//! - [`KeyEvent`] - Decoded keystrokes

mod filesystem;
mod terminal;

pub use filesystem::FsEntry;
pub use terminal::{Color, KeyEvent, OutputLine, TerminalOutput, TextStyle};
