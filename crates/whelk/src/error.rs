//! Errors produced by tool operations.
//!
//! Every failure is recoverable: the dispatcher turns a [`ToolError`] into a
//! plain `Error: ...` result string so the caller can retry with adjusted
//! arguments.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while executing a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Path absent from the virtual file store or from disk
    #[error("File '{0}' not found")]
    NotFound(String),
    /// The configured source root does not exist
    #[error("Source directory not found: {0}")]
    SourceRootMissing(String),
    /// A bare file name matched nothing under the source root
    #[error(
        "No file named '{0}' under the source root. Use search_source_files first to find the full path."
    )]
    UnresolvedName(String),
    /// The offset/limit window selects no lines
    #[error("illegal range [{start},{end}] reading '{path}'")]
    InvalidRange {
        /// Path being read
        path: String,
        /// Requested 0-based start line
        start: usize,
        /// Computed exclusive end line
        end: usize,
    },
    /// The offset points past the last line
    #[error("Line offset {offset} exceeds file length ({line_count} lines) of '{path}'")]
    OffsetBeyondEnd {
        /// Path being read
        path: String,
        /// Requested 0-based offset
        offset: usize,
        /// Number of lines in the content
        line_count: usize,
    },
    /// A count argument that must be positive was zero
    #[error("{0} must be greater than zero")]
    ZeroCount(&'static str),
    /// Edit target not present in the file
    #[error("String not found in file: '{0}'")]
    StringNotFound(String),
    /// Edit target present more than once without `replaceAll`
    #[error(
        "String '{needle}' appears {count} times in file. Use replaceAll=true to replace all instances, or provide a more specific string with surrounding context."
    )]
    AmbiguousMatch {
        /// The literal that was searched for
        needle: String,
        /// Number of non-overlapping occurrences
        count: usize,
    },
    /// Resolved path lies outside every allowed root
    #[error("File path is outside allowed directories: {0}")]
    AccessDenied(String),
    /// Content failed the binary heuristic
    #[error("File '{0}' appears to be binary and cannot be read as text")]
    BinaryFile(String),
    /// Content failed every text decoding
    #[error("File '{0}' is neither valid UTF-8 nor Windows-1252 text")]
    UnsupportedEncoding(String),
    /// Search found nothing
    #[error("{}", no_results_message(.query, .root, .suggestions))]
    NoResults {
        /// The query as given
        query: String,
        /// Root directory that was searched
        root: String,
        /// Similar file names, possibly empty
        suggestions: Vec<String>,
    },
    /// No tool registered under this name
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    /// Arguments did not match the tool's schema
    #[error("invalid arguments for '{tool}': {reason}")]
    InvalidArguments {
        /// Tool name
        tool: String,
        /// Deserialization failure
        reason: String,
    },
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn no_results_message(query: &str, root: &str, suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        format!("No files found matching '{query}' in {root}")
    } else {
        format!(
            "No exact match for '{query}' in {root}. Did you mean: {}?",
            suggestions.join(", ")
        )
    }
}

/// Coarse classification of a [`ToolError`].
///
/// Several variants share a kind; callers branch on the kind and show the
/// variant's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Referenced path absent
    NotFound,
    /// Empty line window or offset past the end
    InvalidRange,
    /// Edit target missing
    StringNotFound,
    /// Edit target not unique
    AmbiguousMatch,
    /// Path escapes the allowed roots
    AccessDenied,
    /// Binary content
    BinaryFile,
    /// Undecodable content
    UnsupportedEncoding,
    /// Search produced nothing
    NoResults,
    /// Unknown tool or malformed arguments
    InvalidArguments,
    /// Underlying disk failure
    Io,
}

impl ToolError {
    /// The kind this error reports as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::NotFound(_)
            | ToolError::SourceRootMissing(_)
            | ToolError::UnresolvedName(_) => ErrorKind::NotFound,
            ToolError::InvalidRange { .. }
            | ToolError::OffsetBeyondEnd { .. }
            | ToolError::ZeroCount(_) => ErrorKind::InvalidRange,
            ToolError::StringNotFound(_) => ErrorKind::StringNotFound,
            ToolError::AmbiguousMatch { .. } => ErrorKind::AmbiguousMatch,
            ToolError::AccessDenied(_) => ErrorKind::AccessDenied,
            ToolError::BinaryFile(_) => ErrorKind::BinaryFile,
            ToolError::UnsupportedEncoding(_) => ErrorKind::UnsupportedEncoding,
            ToolError::NoResults { .. } => ErrorKind::NoResults,
            ToolError::UnknownTool(_) | ToolError::InvalidArguments { .. } => {
                ErrorKind::InvalidArguments
            }
            ToolError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Result alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
