//! Virtual file store over the shared agent state.
//!
//! Paths are opaque string keys; there are no directories, and nothing is
//! ever deleted. Reads go through a borrowed [`FileMap`]; writes only
//! produce a [`StatePatch`].

use crate::error::{ToolError, ToolResult};
use crate::limits::{ReadLimits, truncate_chars};
use crate::state::{FileMap, StatePatch};
use crate::window::{LineWindow, split_lines};

/// Returned by [`VirtualFs::read`] for a file that exists but is empty.
pub const EMPTY_FILE_REMINDER: &str = "System reminder: File exists but has empty contents";

/// Read view of the virtual file store.
#[derive(Debug, Clone, Copy)]
pub struct VirtualFs<'s> {
    files: &'s FileMap,
    max_line_chars: usize,
}

impl<'s> VirtualFs<'s> {
    /// Create a view over `files` using the default line cap.
    pub fn new(files: &'s FileMap) -> Self {
        Self {
            files,
            max_line_chars: ReadLimits::default().max_line_chars,
        }
    }

    /// Override the per-line character cap used by [`read`](Self::read).
    pub fn with_max_line_chars(mut self, max_line_chars: usize) -> Self {
        self.max_line_chars = max_line_chars;
        self
    }

    /// All known paths, sorted.
    pub fn list(&self) -> Vec<String> {
        let paths: Vec<String> = self.files.keys().cloned().collect();
        tracing::debug!(tool = "ls", count = paths.len(), "listing virtual files");
        paths
    }

    /// Content of `path`, if present.
    pub fn get(&self, path: &str) -> ToolResult<&'s str> {
        self.files
            .get(path)
            .map(String::as_str)
            .ok_or_else(|| ToolError::NotFound(path.to_string()))
    }

    /// Render lines `[offset, offset + limit)` of `path`.
    ///
    /// Each line is cut to the configured character cap and prefixed with its
    /// 1-based number right-aligned to width 6 and a tab. Lines are joined
    /// with `\n`, with no trailing newline.
    pub fn read(&self, path: &str, offset: usize, limit: usize) -> ToolResult<String> {
        let content = self.get(path)?;
        tracing::debug!(tool = "read_file", path, offset, limit, "reading virtual file");

        if content.is_empty() {
            return Ok(EMPTY_FILE_REMINDER.to_string());
        }

        let lines = split_lines(content);
        let window = LineWindow::resolve(path, offset, limit, lines.len())?;

        let rendered: Vec<String> = lines[window.start..window.end]
            .iter()
            .enumerate()
            .map(|(i, line)| {
                format!(
                    "{:>6}\t{}",
                    window.start + i + 1,
                    truncate_chars(line, self.max_line_chars)
                )
            })
            .collect();
        Ok(rendered.join("\n"))
    }
}

/// Set `path` to `content`, creating or overwriting it.
///
/// Always succeeds. Returns the result message and the patch.
pub fn write_file(path: &str, content: &str) -> (String, StatePatch) {
    tracing::debug!(tool = "write_file", path, bytes = content.len(), "writing virtual file");
    (format!("Updated file {path}"), StatePatch::file(path, content))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::state::AgentState;

    fn state() -> AgentState {
        AgentState::with_files([
            ("a.txt", "one\ntwo\nthree"),
            ("empty.txt", ""),
            ("blank.txt", "\n\n"),
        ])
    }

    #[test]
    fn test_list() {
        let state = state();
        let fs = VirtualFs::new(&state.files);
        assert_eq!(fs.list(), vec!["a.txt", "blank.txt", "empty.txt"]);
    }

    #[test]
    fn test_read_whole_file() {
        let state = state();
        let fs = VirtualFs::new(&state.files);
        let out = fs.read("a.txt", 0, 2000).unwrap();
        assert_eq!(out, "     1\tone\n     2\ttwo\n     3\tthree");
    }

    #[test]
    fn test_read_window_keeps_absolute_numbers() {
        let state = state();
        let fs = VirtualFs::new(&state.files);
        let out = fs.read("a.txt", 1, 1).unwrap();
        assert_eq!(out, "     2\ttwo");
    }

    #[test]
    fn test_read_missing_file() {
        let state = state();
        let fs = VirtualFs::new(&state.files);
        let err = fs.read("nope.txt", 0, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "File 'nope.txt' not found");
    }

    #[test]
    fn test_read_empty_file_is_not_an_error() {
        let state = state();
        let fs = VirtualFs::new(&state.files);
        assert_eq!(fs.read("empty.txt", 0, 10).unwrap(), EMPTY_FILE_REMINDER);
        // The reminder wins even for a window that would otherwise be empty.
        assert_eq!(fs.read("empty.txt", 50, 10).unwrap(), EMPTY_FILE_REMINDER);
    }

    #[test]
    fn test_read_offset_past_end() {
        let state = state();
        let fs = VirtualFs::new(&state.files);
        for offset in [3, 4, 100] {
            let err = fs.read("a.txt", offset, 10).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidRange);
        }
    }

    #[test]
    fn test_read_newlines_only_has_no_lines() {
        let state = state();
        let fs = VirtualFs::new(&state.files);
        let err = fs.read("blank.txt", 0, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
    }

    #[test]
    fn test_read_truncates_long_lines() {
        let long = "x".repeat(2500);
        let state = AgentState::with_files([("long.txt", format!("{long}\nshort"))]);
        let fs = VirtualFs::new(&state.files);
        let out = fs.read("long.txt", 0, 10).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let first = lines[0].split_once('\t').unwrap().1;
        assert_eq!(first.chars().count(), 2000);
        assert_eq!(lines[1], "     2\tshort");
    }

    #[test]
    fn test_custom_line_cap() {
        let state = AgentState::with_files([("f", "abcdef")]);
        let fs = VirtualFs::new(&state.files).with_max_line_chars(3);
        assert_eq!(fs.read("f", 0, 1).unwrap(), "     1\tabc");
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let mut state = AgentState::new();
        let content = "alpha\nbeta\n\ngamma";
        let (msg, patch) = write_file("notes.md", content);
        assert_eq!(msg, "Updated file notes.md");
        state.apply(patch);

        let fs = VirtualFs::new(&state.files);
        let out = fs.read("notes.md", 0, usize::MAX).unwrap();
        let recovered: Vec<&str> = out
            .lines()
            .map(|l| l.split_once('\t').unwrap().1)
            .collect();
        assert_eq!(recovered, content.split('\n').collect::<Vec<_>>());
    }

    #[test]
    fn test_write_overwrites() {
        let mut state = state();
        state.apply(write_file("a.txt", "replaced").1);
        assert_eq!(state.files["a.txt"], "replaced");
        assert_eq!(state.files.len(), 3);
    }
}
