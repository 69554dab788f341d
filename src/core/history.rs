//! Bounded command history with up/down navigation.

use crate::config::MAX_COMMAND_HISTORY;
use crate::utils::RingBuffer;

/// Ordered log of past commands with a navigation cursor.
///
/// The cursor ranges over `[0, len]`; `len` is the "fresh line" slot below the
/// newest entry. Appending always puts the cursor back there.
#[derive(Clone, Debug)]
pub struct CommandHistory {
    entries: RingBuffer<String>,
    cursor: usize,
}

impl CommandHistory {
    /// Create an empty history holding at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RingBuffer::new(capacity.max(1)),
            cursor: 0,
        }
    }

    /// Record a command.
    ///
    /// Blank commands and repeats of the newest entry are skipped. The cursor
    /// resets to the fresh line either way.
    pub fn add(&mut self, command: &str) {
        if !command.trim().is_empty() && self.entries.last().map(String::as_str) != Some(command)
        {
            if let Some(evicted) = self.entries.push(command.to_string()) {
                log::trace!("history full, evicted {:?}", evicted);
            }
        }
        self.cursor = self.entries.len();
    }

    /// Step back to an older entry. `None` once the oldest is reached.
    pub fn previous(&mut self) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).cloned()
    }

    /// Step forward to a newer entry.
    ///
    /// Stepping past the newest entry returns `""` exactly once (the fresh
    /// line); after that it returns `None`.
    pub fn next(&mut self) -> Option<String> {
        let len = self.entries.len();
        if self.cursor >= len {
            return None;
        }
        self.cursor += 1;
        if self.cursor == len {
            Some(String::new())
        } else {
            self.entries.get(self.cursor).cloned()
        }
    }

    /// Entry by 0-based index, oldest first.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// All entries, oldest first.
    pub fn all(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(MAX_COMMAND_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_history() {
        let mut history = CommandHistory::default();
        assert_eq!(history.capacity(), MAX_COMMAND_HISTORY);
        assert!(history.is_empty());
        assert_eq!(history.previous(), None);
        assert_eq!(history.next(), None);
    }

    #[test]
    fn test_boundary_navigation() {
        let mut history = CommandHistory::default();
        history.add("a");
        history.add("b");

        assert_eq!(history.previous().as_deref(), Some("b"));
        assert_eq!(history.previous().as_deref(), Some("a"));
        assert_eq!(history.previous(), None);

        assert_eq!(history.next().as_deref(), Some("b"));
        assert_eq!(history.next().as_deref(), Some(""));
        assert_eq!(history.next(), None);
        assert_eq!(history.next(), None);
    }

    #[test]
    fn test_stays_at_oldest() {
        let mut history = CommandHistory::default();
        history.add("a");
        history.add("b");

        history.previous();
        history.previous();
        assert_eq!(history.previous(), None);
        assert_eq!(history.next().as_deref(), Some("b"));
    }

    #[test]
    fn test_duplicate_suppression() {
        let mut history = CommandHistory::default();
        history.add("ls");
        history.add("ls");
        assert_eq!(history.len(), 1);

        // Only consecutive repeats are dropped
        history.add("pwd");
        history.add("ls");
        assert_eq!(history.all(), vec!["ls", "pwd", "ls"]);
    }

    #[test]
    fn test_blank_ignored() {
        let mut history = CommandHistory::default();
        history.add("");
        history.add("   \t");
        assert!(history.is_empty());
    }

    #[test]
    fn test_add_resets_cursor() {
        let mut history = CommandHistory::default();
        history.add("a");
        history.add("b");
        history.previous();
        history.previous();

        history.add("c");
        assert_eq!(history.previous().as_deref(), Some("c"));

        // A skipped add still resets the cursor
        history.previous();
        history.add("c");
        assert_eq!(history.next(), None);
    }

    #[test]
    fn test_eviction() {
        let mut history = CommandHistory::new(3);
        for cmd in ["one", "two", "three", "four"] {
            history.add(cmd);
        }
        assert_eq!(history.all(), vec!["two", "three", "four"]);
        assert_eq!(history.get(0), Some("two"));
        assert_eq!(history.get(3), None);
    }

    #[test]
    fn test_zero_capacity_raised() {
        let mut history = CommandHistory::new(0);
        history.add("a");
        history.add("b");
        assert_eq!(history.all(), vec!["b"]);
    }
}
