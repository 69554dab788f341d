use crate::config::README_TEXT;
use crate::core::error::{ConfigError, FsError};
use crate::models::FsEntry;

/// Directory entry returned by [`VirtualFs::list`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Read-only in-memory filesystem.
///
/// # Path Convention
///
/// - Every path handed to a lookup is canonical: absolute, `/`-separated,
///   no `.`, `..` or empty segments
/// - Root is `"/"`
/// - Use [`VirtualFs::canonicalize`] to turn user input into a canonical path
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VirtualFs {
    /// Root directory entry containing all files
    root: FsEntry,
}

impl VirtualFs {
    /// Create a filesystem from a seed tree.
    ///
    /// Fails if the root is not a directory.
    pub fn from_root(root: FsEntry) -> Result<Self, ConfigError> {
        if !root.is_directory() {
            return Err(ConfigError::RootNotDirectory);
        }
        Ok(Self { root })
    }

    /// Create a filesystem from a JSON seed tree.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let root: FsEntry = serde_json::from_str(json)?;
        Self::from_root(root)
    }

    /// Serialize the tree back into its JSON seed form.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Create an empty filesystem containing only `/`.
    pub fn empty() -> Self {
        Self {
            root: FsEntry::dir(),
        }
    }

    // =========================================================================
    // Path Handling
    // =========================================================================

    /// Resolve `input` against `base` into a canonical path.
    ///
    /// - Input starting with `/` ignores `base`
    /// - Empty segments and `.` are dropped
    /// - `..` pops the last segment; popping past root is a no-op
    ///
    /// The result always starts with `/`. Existence is not checked.
    pub fn canonicalize(base: &str, input: &str) -> String {
        let combined = if input.starts_with('/') {
            input.to_string()
        } else {
            format!("{}/{}", base, input)
        };

        let mut parts: Vec<&str> = Vec::new();
        for part in combined.split('/').filter(|s| !s.is_empty()) {
            match part {
                ".." => {
                    parts.pop();
                }
                "." => {}
                _ => parts.push(part),
            }
        }

        format!("/{}", parts.join("/"))
    }

    /// Expand a leading `~` segment to `home`.
    ///
    /// Only `~` and `~/...` are expanded; `~name` is left untouched.
    pub fn expand_home(input: &str, home: &str) -> String {
        if input == "~" {
            return home.to_string();
        }
        match input.strip_prefix("~/") {
            Some(rest) => format!("{}/{}", home.trim_end_matches('/'), rest),
            None => input.to_string(),
        }
    }

    /// Last segment of a canonical path, `"/"` for root.
    pub fn basename(path: &str) -> &str {
        match path.trim_end_matches('/').rsplit('/').next() {
            Some("") | None => "/",
            Some(name) => name,
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Get an entry by canonical path.
    ///
    /// Returns `None` if a segment is missing or passes through a file.
    pub fn resolve(&self, path: &str) -> Option<&FsEntry> {
        let mut current = &self.root;

        for part in path.split('/').filter(|s| !s.is_empty()) {
            current = current.children()?.get(part)?;
        }

        Some(current)
    }

    /// List directory contents in name order.
    pub fn list(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let children = self
            .resolve(path)
            .ok_or(FsError::NotFound)?
            .children()
            .ok_or(FsError::NotADirectory)?;

        Ok(children
            .iter()
            .map(|(name, entry)| DirEntry {
                name: name.clone(),
                is_dir: entry.is_directory(),
            })
            .collect())
    }

    /// Read a file's content.
    pub fn read(&self, path: &str) -> Result<&str, FsError> {
        self.resolve(path)
            .ok_or(FsError::NotFound)?
            .content()
            .ok_or(FsError::IsADirectory)
    }

    /// Check if a path is a directory.
    pub fn is_directory(&self, path: &str) -> bool {
        matches!(self.resolve(path), Some(FsEntry::Directory { .. }))
    }
}

impl Default for VirtualFs {
    /// The seed tree a session starts with when none is supplied.
    fn default() -> Self {
        let root = FsEntry::dir_with([
            (
                "project",
                FsEntry::dir_with([(
                    "workspace",
                    FsEntry::dir_with([
                        ("README.md", FsEntry::file(README_TEXT)),
                        (
                            "Cargo.toml",
                            FsEntry::file(
                                "[package]\nname = \"workspace\"\nversion = \"0.1.0\"\nedition = \"2024\"\n",
                            ),
                        ),
                        (
                            "src",
                            FsEntry::dir_with([
                                (
                                    "main.rs",
                                    FsEntry::file("fn main() {\n    println!(\"Hello, world!\");\n}\n"),
                                ),
                                (
                                    "lib.rs",
                                    FsEntry::file("pub fn add(a: u32, b: u32) -> u32 {\n    a + b\n}\n"),
                                ),
                            ]),
                        ),
                    ]),
                )]),
            ),
            (
                "home",
                FsEntry::dir_with([(
                    "user",
                    FsEntry::dir_with([(
                        ".profile",
                        FsEntry::file("# ~/.profile\nexport EDITOR=vim\n"),
                    )]),
                )]),
            ),
            (
                "etc",
                FsEntry::dir_with([("hostname", FsEntry::file("shellpane\n"))]),
            ),
        ]);

        Self { root }
    }
}

// =============================================================================
// Tests
// =============================================================================
