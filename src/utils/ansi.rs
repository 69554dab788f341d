//! ANSI rendering for terminal output chunks.

use crate::models::{Color, TerminalOutput};

/// Reset all SGR attributes.
const RESET: &str = "\x1b[0m";

/// Clear the screen and home the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const BELL: &str = "\x07";

/// SGR foreground code for a color.
pub fn color_code(color: Color) -> &'static str {
    match color {
        Color::Red => "31",
        Color::Green => "32",
        Color::Yellow => "33",
        Color::Blue => "34",
        Color::Gray => "90",
    }
}

/// Render output chunks as a byte-ready ANSI string.
///
/// With `color` off, colored text is written plain. `Exit` renders nothing;
/// it is a signal for the front end.
pub fn render(chunks: &[TerminalOutput], color: bool) -> String {
    let mut out = String::new();
    for chunk in chunks {
        match chunk {
            TerminalOutput::Text {
                text,
                color: Some(c),
            } if color => {
                out.push_str("\x1b[");
                out.push_str(color_code(*c));
                out.push('m');
                out.push_str(text);
                out.push_str(RESET);
            }
            TerminalOutput::Text { text, .. } => out.push_str(text),
            TerminalOutput::ClearScreen => out.push_str(CLEAR_SCREEN),
            TerminalOutput::Bell => out.push_str(BELL),
            TerminalOutput::Exit => {}
        }
    }
    out
}
