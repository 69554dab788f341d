//! Application configuration.
//!
//! Centralizes the compile-time defaults used throughout the crate and the
//! runtime [`SessionConfig`] loaded from TOML. Text assets are loaded at
//! compile time using `include_str!`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::core::error::ConfigError;

// =============================================================================
// Text Assets (loaded at compile time)
// =============================================================================

/// Help text for the `help` command.
pub const HELP_TEXT: &str = include_str!("../assets/text/help.txt");

/// Seeded content of `/project/workspace/README.md`.
pub const README_TEXT: &str = include_str!("../assets/text/readme.txt");

// =============================================================================
// Session Identity
// =============================================================================

/// Default user name (also seeds `$USER`).
pub const DEFAULT_USER: &str = "user";

/// Default host name shown in the prompt.
pub const DEFAULT_HOST: &str = "shellpane";

/// Default home directory (also seeds `$HOME`).
pub const DEFAULT_HOME: &str = "/home/user";

/// Working directory a fresh session starts in.
pub const DEFAULT_CWD: &str = "/project/workspace";

// =============================================================================
// Environment Variables
// =============================================================================

/// Seed values for variables that do not depend on the session identity.
///
/// `PWD`, `HOME`, `USER` and `HOSTNAME` are derived from the session options.
pub const DEFAULT_ENV_VARS: &[(&str, &str)] = &[
    ("PATH", "/usr/local/bin:/usr/bin:/bin"),
    ("SHELL", "/bin/sh"),
    ("TERM", "xterm-256color"),
    ("LANG", "en_US.UTF-8"),
];

// =============================================================================
// Terminal Configuration
// =============================================================================

/// Maximum number of command history entries to keep.
pub const MAX_COMMAND_HISTORY: usize = 1000;

/// How long a partial escape sequence may wait for its next byte.
pub const ESCAPE_TIMEOUT: Duration = Duration::from_millis(50);

/// Marker written when Ctrl+C discards the current line.
pub const INTERRUPT_MARKER: &str = "^C";

/// Built-in command names offered by tab completion, sorted.
pub const BUILTIN_NAMES: &[&str] = &[
    "cat", "cd", "clear", "date", "echo", "env", "exit", "export", "help", "history", "ls",
    "pwd", "unset", "whoami",
];

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Session settings read from a TOML file.
///
/// Every field is optional; missing values fall back to the constants above.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub user: Option<String>,
    pub host: Option<String>,
    pub home: Option<String>,
    pub cwd: Option<String>,
    pub history_capacity: Option<usize>,
    pub escape_timeout_ms: Option<u64>,
    pub color: Option<bool>,
    /// JSON seed tree, relative paths resolve against the config file.
    pub seed: Option<PathBuf>,
    /// Variables merged over the default environment.
    pub env: BTreeMap<String, String>,
}

impl SessionConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file, resolving `seed` relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text)?;

        if let Some(seed) = config.seed.take() {
            let resolved = match path.parent() {
                Some(dir) if seed.is_relative() => dir.join(seed),
                _ => seed,
            };
            config.seed = Some(resolved);
        }

        log::debug!("loaded session config from {}", path.display());
        Ok(config)
    }

    /// Escape timeout as a [`Duration`], if configured.
    pub fn escape_timeout(&self) -> Option<Duration> {
        self.escape_timeout_ms.map(Duration::from_millis)
    }
}
