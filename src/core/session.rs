//! Interactive shell session.
//!
//! [`ShellSession`] owns everything one terminal pane needs: the virtual
//! filesystem, environment, working directory, command history and the line
//! being edited. Front ends feed it raw bytes or decoded keys and write the
//! returned [`TerminalOutput`] chunks to the screen.
//!
//! Sessions hold no global state, so any number of them can coexist.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::{
    DEFAULT_CWD, DEFAULT_HOME, DEFAULT_HOST, DEFAULT_USER, ESCAPE_TIMEOUT, INTERRUPT_MARKER,
    MAX_COMMAND_HISTORY, SessionConfig,
};
use crate::core::autocomplete::{AutocompleteResult, autocomplete};
use crate::core::commands::{self, ExecutionResult, ShellContext};
use crate::core::env::Environment;
use crate::core::error::ConfigError;
use crate::core::history::CommandHistory;
use crate::core::input::KeyDecoder;
use crate::core::line_buffer::LineBuffer;
use crate::core::VirtualFs;
use crate::models::{Color, KeyEvent, OutputLine, TerminalOutput};

/// Erase the current line and return to column 0.
const ERASE_LINE: &str = "\r\x1b[2K";

const NEWLINE: &str = "\r\n";

// ============================================================================
// SessionOptions
// ============================================================================

/// Everything needed to start a session. Missing pieces use defaults.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub user: String,
    pub host: String,
    pub home: String,
    /// Starting directory; falls back to `/` if it is not a directory.
    pub cwd: String,
    /// Variables merged over the seeded environment.
    pub env_overlay: BTreeMap<String, String>,
    pub filesystem: VirtualFs,
    pub history_capacity: usize,
    pub escape_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            host: DEFAULT_HOST.to_string(),
            home: DEFAULT_HOME.to_string(),
            cwd: DEFAULT_CWD.to_string(),
            env_overlay: BTreeMap::new(),
            filesystem: VirtualFs::default(),
            history_capacity: MAX_COMMAND_HISTORY,
            escape_timeout: ESCAPE_TIMEOUT,
        }
    }
}

impl SessionOptions {
    /// Build options from a loaded config, reading the seed tree if one is set.
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let filesystem = match &config.seed {
            Some(path) => load_seed(path)?,
            None => defaults.filesystem,
        };

        Ok(Self {
            user: config.user.clone().unwrap_or(defaults.user),
            host: config.host.clone().unwrap_or(defaults.host),
            home: config.home.clone().unwrap_or(defaults.home),
            cwd: config.cwd.clone().unwrap_or(defaults.cwd),
            env_overlay: config.env.clone(),
            filesystem,
            history_capacity: config.history_capacity.unwrap_or(defaults.history_capacity),
            escape_timeout: config.escape_timeout().unwrap_or(defaults.escape_timeout),
        })
    }
}

/// Read a JSON seed tree from disk.
pub fn load_seed(path: &Path) -> Result<VirtualFs, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let fs = VirtualFs::from_json(&json)?;
    log::debug!("loaded seed tree from {}", path.display());
    Ok(fs)
}

// ============================================================================
// ShellSession
// ============================================================================

/// One interactive shell: interpreter state plus the line editor.
#[derive(Debug)]
pub struct ShellSession {
    fs: VirtualFs,
    env: Environment,
    /// Canonical working directory
    cwd: String,
    host: String,
    history: CommandHistory,
    buffer: LineBuffer,
    decoder: KeyDecoder,
    /// Set once `exit` runs; further input is ignored.
    closed: bool,
}

impl ShellSession {
    pub fn new(options: SessionOptions) -> Self {
        let SessionOptions {
            user,
            host,
            home,
            cwd,
            env_overlay,
            filesystem,
            history_capacity,
            escape_timeout,
        } = options;

        let mut cwd = VirtualFs::canonicalize("/", &cwd);
        if !filesystem.is_directory(&cwd) {
            log::warn!("starting directory {} does not exist, using /", cwd);
            cwd = "/".to_string();
        }

        let mut env = Environment::seeded(&user, &host, &home, &cwd);
        env.overlay(env_overlay);

        Self {
            fs: filesystem,
            env,
            cwd,
            host,
            history: CommandHistory::new(history_capacity),
            buffer: LineBuffer::new(),
            decoder: KeyDecoder::new(escape_timeout),
            closed: false,
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn fs(&self) -> &VirtualFs {
        &self.fs
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Prompt text, e.g. `user@shellpane:~/src$ `.
    pub fn prompt(&self) -> String {
        format!("{}@{}:{}$ ", self.user(), self.host, self.short_cwd())
    }

    fn user(&self) -> &str {
        self.env.get("USER").unwrap_or(DEFAULT_USER)
    }

    /// Working directory with a `$HOME` prefix shown as `~`.
    fn short_cwd(&self) -> String {
        let Some(home) = self.env.get("HOME").filter(|h| *h != "/" && !h.is_empty()) else {
            return self.cwd.clone();
        };
        match self.cwd.strip_prefix(home) {
            Some("") => "~".to_string(),
            Some(rest) if rest.starts_with('/') => format!("~{}", rest),
            _ => self.cwd.clone(),
        }
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Output to show when the pane opens.
    pub fn start(&self) -> Vec<TerminalOutput> {
        self.prompt_chunks()
    }

    /// Feed raw terminal bytes.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Vec<TerminalOutput> {
        self.feed_bytes_at(bytes, Instant::now())
    }

    /// Feed raw terminal bytes received at `now`.
    pub fn feed_bytes_at(&mut self, bytes: &[u8], now: Instant) -> Vec<TerminalOutput> {
        let keys = self.decoder.decode_bytes_at(bytes, now);
        keys.into_iter().flat_map(|key| self.feed_key(key)).collect()
    }

    /// Feed one input char through the escape decoder.
    pub fn feed_char(&mut self, ch: char) -> Vec<TerminalOutput> {
        match self.decoder.decode(ch) {
            Some(key) => self.feed_key(key),
            None => Vec::new(),
        }
    }

    /// Apply one decoded keystroke.
    pub fn feed_key(&mut self, key: KeyEvent) -> Vec<TerminalOutput> {
        if self.closed {
            return Vec::new();
        }

        match key {
            KeyEvent::Char(ch) => {
                self.buffer.insert(ch);
                self.redraw()
            }
            KeyEvent::Backspace => self.edit(LineBuffer::backspace),
            KeyEvent::Delete => self.edit(LineBuffer::delete),
            KeyEvent::Left => self.motion(LineBuffer::left),
            KeyEvent::Right => self.motion(LineBuffer::right),
            KeyEvent::Home => self.motion(LineBuffer::home),
            KeyEvent::End => self.motion(LineBuffer::end),
            KeyEvent::Up => {
                let entry = self.history.previous();
                self.recall(entry)
            }
            KeyEvent::Down => {
                let entry = self.history.next();
                self.recall(entry)
            }
            KeyEvent::Tab => self.complete(),
            KeyEvent::Enter => {
                let line = self.buffer.take();
                let mut out = vec![TerminalOutput::text(NEWLINE)];
                out.extend(self.submit(&line));
                out
            }
            KeyEvent::Interrupt => {
                self.buffer.clear();
                let mut out = vec![TerminalOutput::text(format!("{}{}", INTERRUPT_MARKER, NEWLINE))];
                out.extend(self.prompt_chunks());
                out
            }
            KeyEvent::ClearScreen => {
                let mut out = vec![TerminalOutput::ClearScreen];
                out.extend(self.redraw());
                out
            }
            KeyEvent::KillLine => {
                if self.buffer.is_empty() {
                    return Vec::new();
                }
                self.buffer.clear();
                self.redraw()
            }
            KeyEvent::EndOfInput if self.buffer.is_empty() => {
                let mut out = vec![TerminalOutput::text(NEWLINE)];
                let result = self.dispatch("exit");
                out.extend(self.finish(result));
                out
            }
            KeyEvent::EndOfInput => self.edit(LineBuffer::delete),
        }
    }

    // ------------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------------

    /// Run a full command line as if typed and submitted.
    ///
    /// Records the line and applies any directory change or exit to the
    /// session.
    pub fn run(&mut self, line: &str) -> ExecutionResult {
        self.history.add(line);
        self.dispatch(line)
    }

    /// Execute without touching history.
    fn dispatch(&mut self, line: &str) -> ExecutionResult {
        let entries = self.history.all();
        let result = commands::execute(
            line,
            ShellContext {
                cwd: &self.cwd,
                env: &mut self.env,
                fs: &self.fs,
                history: &entries,
            },
        );
        self.apply(&result);
        result
    }

    fn apply(&mut self, result: &ExecutionResult) {
        if let Some(dir) = &result.new_cwd {
            log::debug!("cwd {} -> {}", self.cwd, dir);
            self.cwd = dir.clone();
            if let Err(e) = self.env.set("PWD", dir.as_str()) {
                log::warn!("failed to update PWD: {}", e);
            }
        }
        if result.exit {
            self.closed = true;
        }
    }

    fn submit(&mut self, line: &str) -> Vec<TerminalOutput> {
        let result = self.run(line);
        self.finish(result)
    }

    /// Turn a finished command into output followed by the next prompt.
    fn finish(&self, result: ExecutionResult) -> Vec<TerminalOutput> {
        let mut out = render_lines(&result.output);
        if result.exit {
            out.push(TerminalOutput::Exit);
            return out;
        }
        if result.clear_screen {
            out.push(TerminalOutput::ClearScreen);
        }
        out.extend(self.prompt_chunks());
        out
    }

    // ------------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------------

    /// Buffer mutation that rings the bell when refused.
    fn edit(&mut self, op: fn(&mut LineBuffer) -> bool) -> Vec<TerminalOutput> {
        if op(&mut self.buffer) {
            self.redraw()
        } else {
            vec![TerminalOutput::Bell]
        }
    }

    /// Cursor motion; silent at the boundaries.
    fn motion(&mut self, op: fn(&mut LineBuffer) -> bool) -> Vec<TerminalOutput> {
        if op(&mut self.buffer) {
            self.redraw()
        } else {
            Vec::new()
        }
    }

    fn recall(&mut self, entry: Option<String>) -> Vec<TerminalOutput> {
        match entry {
            Some(text) => {
                self.buffer.set(text);
                self.redraw()
            }
            None => vec![TerminalOutput::Bell],
        }
    }

    fn complete(&mut self) -> Vec<TerminalOutput> {
        match autocomplete(self.buffer.as_str()) {
            AutocompleteResult::Single(completed) => {
                self.buffer.set(completed);
                self.redraw()
            }
            AutocompleteResult::Multiple(matches) => {
                let mut out = vec![TerminalOutput::text(format!(
                    "{}{}{}",
                    NEWLINE,
                    matches.join("  "),
                    NEWLINE
                ))];
                out.extend(self.redraw());
                out
            }
            AutocompleteResult::None => vec![TerminalOutput::Bell],
        }
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    fn prompt_chunks(&self) -> Vec<TerminalOutput> {
        vec![
            TerminalOutput::colored(format!("{}@{}", self.user(), self.host), Color::Green),
            TerminalOutput::text(":"),
            TerminalOutput::colored(self.short_cwd(), Color::Blue),
            TerminalOutput::text("$ "),
        ]
    }

    /// Repaint prompt and buffer, then park the cursor.
    fn redraw(&self) -> Vec<TerminalOutput> {
        let mut out = vec![TerminalOutput::text(ERASE_LINE)];
        out.extend(self.prompt_chunks());
        if !self.buffer.is_empty() {
            out.push(TerminalOutput::text(self.buffer.as_str()));
        }
        let back = self.buffer.columns_after_cursor();
        if back > 0 {
            out.push(TerminalOutput::text(format!("\x1b[{}D", back)));
        }
        out
    }
}

impl Default for ShellSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

/// Convert command output into terminal text, one `\r\n`-terminated line each.
fn render_lines(lines: &[OutputLine]) -> Vec<TerminalOutput> {
    lines
        .iter()
        .map(|line| {
            let text = line.to_string();
            let body = text.strip_suffix('\n').unwrap_or(&text);
            let text = format!("{}{}", body.replace('\n', NEWLINE), NEWLINE);
            match line.color() {
                Some(color) => TerminalOutput::colored(text, color),
                None => TerminalOutput::text(text),
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
