//! Offset/limit arithmetic shared by the virtual and on-disk readers.

use crate::error::{ToolError, ToolResult};

/// A resolved, non-empty `[start, end)` range of 0-based line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWindow {
    /// First line included (0-based)
    pub start: usize,
    /// First line excluded (0-based)
    pub end: usize,
}

impl LineWindow {
    /// Resolve `offset`/`limit` against a content of `line_count` lines.
    ///
    /// `end = min(offset + limit, line_count)`. An offset at or past the end
    /// and an empty window (`limit == 0`) both fail with an error of kind
    /// `InvalidRange`.
    pub fn resolve(path: &str, offset: usize, limit: usize, line_count: usize) -> ToolResult<Self> {
        let start = offset;
        let end = start.saturating_add(limit).min(line_count);

        if start >= line_count {
            return Err(ToolError::OffsetBeyondEnd {
                path: path.to_string(),
                offset,
                line_count,
            });
        }
        if start >= end {
            return Err(ToolError::InvalidRange {
                path: path.to_string(),
                start,
                end,
            });
        }
        Ok(Self { start, end })
    }

    /// Number of lines in the window.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false; a resolved window holds at least one line.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// 1-based number of the first line.
    pub fn first_line_number(&self) -> usize {
        self.start + 1
    }

    /// 1-based number of the last line.
    pub fn last_line_number(&self) -> usize {
        self.end
    }
}

/// Split virtual file content into lines.
///
/// Splits on `'\n'` and drops trailing empty segments, so `"a\nb\n"` has two
/// lines and `"\n\n"` has none.
pub fn split_lines(content: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = content.split('\n').collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}
