//! Terminal-related data types for input events and output rendering.

use std::fmt;

/// Foreground colors understood by the front end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    /// Dimmed text (hidden files)
    Gray,
}

/// Text styling for file listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    /// Directory entries (blue, trailing `/`)
    Directory,
    /// Regular file entries
    File,
    /// Hidden files (dimmed)
    Hidden,
}

// =============================================================================
// Command Output
// =============================================================================

/// A single line of command output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputLine {
    /// Plain text output
    Text(String),
    /// Error message (red)
    Error(String),
    /// Informational hint (yellow)
    Info(String),
    /// File listing entry (ls)
    ListEntry { name: String, style: TextStyle },
}

impl OutputLine {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self::Error(s.into())
    }

    pub fn info(s: impl Into<String>) -> Self {
        Self::Info(s.into())
    }

    /// Create a directory listing entry
    pub fn dir_entry(name: impl Into<String>) -> Self {
        Self::ListEntry {
            name: name.into(),
            style: TextStyle::Directory,
        }
    }

    /// Create a file listing entry, dimmed when the name starts with `.`
    pub fn file_entry(name: impl Into<String>) -> Self {
        let name = name.into();
        let style = if name.starts_with('.') {
            TextStyle::Hidden
        } else {
            TextStyle::File
        };
        Self::ListEntry { name, style }
    }

    /// Color the front end should use, if any.
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Error(_) => Some(Color::Red),
            Self::Info(_) => Some(Color::Yellow),
            Self::ListEntry { style, .. } => match style {
                TextStyle::Directory => Some(Color::Blue),
                TextStyle::Hidden => Some(Color::Gray),
                TextStyle::File => None,
            },
            Self::Text(_) => None,
        }
    }
}

/// Plain-text rendering; directories get a trailing `/`.
impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Error(s) | Self::Info(s) => f.write_str(s),
            Self::ListEntry {
                name,
                style: TextStyle::Directory,
            } => write!(f, "{}/", name),
            Self::ListEntry { name, .. } => f.write_str(name),
        }
    }
}

// =============================================================================
// Terminal Output Stream
// =============================================================================

/// One instruction for the terminal front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TerminalOutput {
    /// Text to write verbatim, optionally colored. May contain `\r`, `\n`
    /// and cursor-control escape sequences produced by line redraws.
    Text { text: String, color: Option<Color> },
    /// Wipe the visible screen and move the cursor home.
    ClearScreen,
    /// Audible/visual bell.
    Bell,
    /// The session has ended; the front end should close the pane.
    Exit,
}

impl TerminalOutput {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text {
            text: s.into(),
            color: None,
        }
    }

    pub fn colored(s: impl Into<String>, color: Color) -> Self {
        Self::Text {
            text: s.into(),
            color: Some(color),
        }
    }
}

// =============================================================================
// Input Events
// =============================================================================

/// A fully decoded keystroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    /// Printable character
    Char(char),
    Backspace,
    Delete,
    Enter,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    /// Ctrl+C
    Interrupt,
    /// Ctrl+L
    ClearScreen,
    /// Ctrl+U
    KillLine,
    /// Ctrl+D
    EndOfInput,
}
