//! Line-range reads of real source files.

use std::fmt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{SourceTree, readable_entry, text};
use crate::error::{ToolError, ToolResult};
use crate::policy::{PolicyDecision, PolicyHandler, normalize_path};
use crate::window::LineWindow;

/// A contiguous block of lines read from a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceExcerpt {
    /// Path the lines were read from, as resolved
    pub path: String,
    /// 1-based number of the first line
    pub first_line: usize,
    /// 1-based number of the last line
    pub last_line: usize,
    /// Raw line text, without terminators
    pub lines: Vec<String>,
}

impl fmt::Display for SourceExcerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File: {}", self.path)?;
        writeln!(f, "Lines: {}-{}", self.first_line, self.last_line)?;
        writeln!(f)?;
        for (i, line) in self.lines.iter().enumerate() {
            writeln!(f, "{:>5}: {}", self.first_line + i, line)?;
        }
        Ok(())
    }
}

impl SourceTree {
    /// Read `num_lines` lines of `file_path` starting at 1-based `start_line`.
    ///
    /// A bare file name (no separators, not absolute) is first looked up
    /// under the source root. The resolved path must lie under the source or
    /// documentation root, exist, pass the binary sniff and decode as text.
    pub fn read_range(
        &self,
        file_path: &str,
        start_line: usize,
        num_lines: usize,
    ) -> ToolResult<SourceExcerpt> {
        tracing::debug!(tool = "read_source_file", path = file_path, start_line, num_lines, "reading source file");

        let resolved = self.resolve(file_path)?;
        let absolute = normalize_path(&resolved);

        if let PolicyDecision::Deny(reason) = self.policy.check_access(&absolute) {
            tracing::warn!(path = file_path, %reason, "source read denied");
            return Err(ToolError::AccessDenied(file_path.to_string()));
        }
        if !absolute.is_file() {
            return Err(ToolError::NotFound(file_path.to_string()));
        }

        let content = text::read_text(&absolute, self.limits.binary_sniff_bytes)?;
        let lines = text::split_source_lines(&content);
        let display = resolved.display().to_string();
        let window = LineWindow::resolve(
            &display,
            start_line.saturating_sub(1),
            num_lines,
            lines.len(),
        )?;

        Ok(SourceExcerpt {
            path: display,
            first_line: window.first_line_number(),
            last_line: window.last_line_number(),
            lines: lines[window.start..window.end]
                .iter()
                .map(|l| (*l).to_string())
                .collect(),
        })
    }

    fn resolve(&self, file_path: &str) -> ToolResult<PathBuf> {
        let path = Path::new(file_path);
        if path.is_absolute() || file_path.contains(['/', '\\']) {
            return Ok(path.to_path_buf());
        }
        self.find_by_name(file_path)
    }

    /// First file under the source root named `name` or `name.<ext>`.
    fn find_by_name(&self, name: &str) -> ToolResult<PathBuf> {
        let root = self.ensure_root()?;
        let wanted: Vec<String> = std::iter::once(name.to_string())
            .chain(
                self.config
                    .extensions
                    .iter()
                    .map(|ext| format!("{name}.{}", ext.trim_start_matches('.'))),
            )
            .collect();

        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(readable_entry)
            .filter(|entry| entry.file_type().is_file())
            .find(|entry| {
                let file_name = entry.file_name().to_string_lossy();
                wanted.iter().any(|w| *w == file_name)
            })
            .map(walkdir::DirEntry::into_path)
            .ok_or_else(|| ToolError::UnresolvedName(name.to_string()))
    }
}
