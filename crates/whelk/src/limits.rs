//! Output limits for read and search tools

use serde::{Deserialize, Serialize};

/// Limits applied when rendering file contents and search diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadLimits {
    /// Maximum characters kept per line of a virtual file read
    pub max_line_chars: usize,
    /// Number of leading bytes inspected for NUL when sniffing binaries
    pub binary_sniff_bytes: usize,
    /// Maximum number of "did you mean" suggestions
    pub max_suggestions: usize,
    /// Length of the query prefix used to find suggestions
    pub suggestion_prefix_chars: usize,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_line_chars: 2000,
            binary_sniff_bytes: 512,
            max_suggestions: 5,
            suggestion_prefix_chars: 3,
        }
    }
}

/// Truncate `line` to at most `max_chars` characters.
///
/// Counts chars, so a multi-byte character is never split.
pub fn truncate_chars(line: &str, max_chars: usize) -> &str {
    match line.char_indices().nth(max_chars) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let limits = ReadLimits::default();
        assert_eq!(limits.max_line_chars, 2000);
        assert_eq!(limits.binary_sniff_bytes, 512);
        assert_eq!(limits.max_suggestions, 5);
        assert_eq!(limits.suggestion_prefix_chars, 3);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let limits: ReadLimits = serde_json::from_str(r#"{"max_line_chars": 80}"#).unwrap();
        assert_eq!(limits.max_line_chars, 80);
        assert_eq!(limits.binary_sniff_bytes, 512);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 5), "");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
