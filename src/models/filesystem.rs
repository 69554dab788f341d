use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Filesystem Node
// =============================================================================

/// Represents an entry in the virtual filesystem.
///
/// A node's name is the key under which its parent stores it; the root has
/// no name. Children are kept in a [`BTreeMap`] so listings come out in name
/// order without an extra sort.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FsEntry {
    Directory {
        #[serde(default)]
        children: BTreeMap<String, FsEntry>,
    },
    File {
        #[serde(default)]
        content: String,
    },
}

impl FsEntry {
    /// Create a file with the given content.
    pub fn file(content: impl Into<String>) -> Self {
        FsEntry::File {
            content: content.into(),
        }
    }

    /// Create an empty directory.
    pub fn dir() -> Self {
        FsEntry::Directory {
            children: BTreeMap::new(),
        }
    }

    /// Create a directory from `(name, entry)` pairs.
    pub fn dir_with<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, FsEntry)>,
        S: Into<String>,
    {
        FsEntry::Directory {
            children: entries
                .into_iter()
                .map(|(name, entry)| (name.into(), entry))
                .collect(),
        }
    }

    /// Check if this entry is a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, FsEntry::Directory { .. })
    }

    /// Children of a directory, `None` for files.
    pub fn children(&self) -> Option<&BTreeMap<String, FsEntry>> {
        match self {
            FsEntry::Directory { children } => Some(children),
            FsEntry::File { .. } => None,
        }
    }

    /// Content of a file, `None` for directories.
    pub fn content(&self) -> Option<&str> {
        match self {
            FsEntry::File { content } => Some(content),
            FsEntry::Directory { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let file = FsEntry::file("hello");
        assert!(!file.is_directory());
        assert_eq!(file.content(), Some("hello"));
        assert!(file.children().is_none());

        let dir = FsEntry::dir_with([("a.txt", FsEntry::file("")), ("sub", FsEntry::dir())]);
        assert!(dir.is_directory());
        assert!(dir.content().is_none());
        let names: Vec<_> = dir.children().unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["a.txt", "sub"]);
    }

    #[test]
    fn test_json_shape() {
        let dir = FsEntry::dir_with([("notes.txt", FsEntry::file("hi"))]);
        let json = serde_json::to_value(&dir).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "directory",
                "children": {
                    "notes.txt": { "type": "file", "content": "hi" }
                }
            })
        );
    }

    #[test]
    fn test_json_defaults() {
        let entry: FsEntry = serde_json::from_str(r#"{"type":"directory"}"#).unwrap();
        assert_eq!(entry, FsEntry::dir());

        let entry: FsEntry = serde_json::from_str(r#"{"type":"file"}"#).unwrap();
        assert_eq!(entry, FsEntry::file(""));
    }
}
