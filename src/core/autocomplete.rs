//! Tab completion for built-in command names.
//!
//! Completion only applies while the line is a single word. Paths are never
//! completed.

use crate::core::Command;

/// Result of an autocomplete attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum AutocompleteResult {
    /// Single match - replace the line with this value (trailing space included).
    Single(String),
    /// Multiple matches - listed for the user, line left unchanged.
    Multiple(Vec<String>),
    /// No matches, or the line is not completable.
    None,
}

/// Perform autocomplete on Tab press.
pub fn autocomplete(input: &str) -> AutocompleteResult {
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return AutocompleteResult::None;
    }
    complete_command(input)
}

/// Complete command name.
fn complete_command(partial: &str) -> AutocompleteResult {
    let matches: Vec<String> = Command::names()
        .iter()
        .filter(|cmd| cmd.starts_with(partial))
        .map(|s| s.to_string())
        .collect();

    match matches.len() {
        0 => AutocompleteResult::None,
        1 => AutocompleteResult::Single(format!("{} ", matches[0])),
        _ => AutocompleteResult::Multiple(matches),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_completion_single() {
        assert_eq!(autocomplete("pw"), AutocompleteResult::Single("pwd ".into()));
        assert_eq!(autocomplete("cle"), AutocompleteResult::Single("clear ".into()));
    }

    #[test]
    fn test_exact_name_still_completes() {
        assert_eq!(autocomplete("pwd"), AutocompleteResult::Single("pwd ".into()));
    }

    #[test]
    fn test_command_completion_multiple() {
        assert_eq!(
            autocomplete("c"),
            AutocompleteResult::Multiple(vec!["cat".into(), "cd".into(), "clear".into()])
        );
        assert_eq!(
            autocomplete("ex"),
            AutocompleteResult::Multiple(vec!["exit".into(), "export".into()])
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(autocomplete("xyz"), AutocompleteResult::None);
        assert_eq!(autocomplete(""), AutocompleteResult::None);
    }

    #[test]
    fn test_no_completion_after_whitespace() {
        assert_eq!(autocomplete("cat RE"), AutocompleteResult::None);
        assert_eq!(autocomplete("c "), AutocompleteResult::None);
        assert_eq!(autocomplete(" c"), AutocompleteResult::None);
    }
}
