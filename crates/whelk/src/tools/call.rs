//! Typed tool invocations.
//!
//! [`ToolCall`] is the closed set of operations the toolbox understands. It
//! is parsed from a tool name plus JSON arguments; argument names are
//! camelCase and optional arguments fall back to their documented defaults.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ToolError, ToolResult};
use crate::todo::ToDoItem;

/// Arguments for `read_file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadFileArgs {
    /// Virtual path
    pub file_path: String,
    /// 0-based first line
    #[serde(default)]
    pub offset: usize,
    /// Maximum number of lines
    #[serde(default = "default_read_limit")]
    pub limit: usize,
}

/// Arguments for `write_file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteFileArgs {
    /// Virtual path
    pub file_path: String,
    /// Full new content
    pub content: String,
}

/// Arguments for `edit_file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditFileArgs {
    /// Virtual path
    pub file_path: String,
    /// Literal text to replace
    pub old_string: String,
    /// Replacement text
    pub new_string: String,
    /// Replace every occurrence
    #[serde(default)]
    pub replace_all: bool,
}

/// Arguments for `write_todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteTodosArgs {
    /// The complete new plan, in order
    pub to_dos: Vec<ToDoItem>,
}

/// Arguments for `search_source_files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSourceArgs {
    /// File name, path fragment, or text to look for
    pub query: String,
    /// Maximum number of paths returned
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

/// Arguments for `read_source_file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadSourceArgs {
    /// Path, or bare file name under the source root
    pub file_path: String,
    /// 1-based first line
    #[serde(default = "default_start_line")]
    pub start_line: usize,
    /// Number of lines
    #[serde(default = "default_num_lines")]
    pub num_lines: usize,
}

fn default_read_limit() -> usize {
    2000
}

fn default_max_results() -> usize {
    10
}

fn default_start_line() -> usize {
    1
}

fn default_num_lines() -> usize {
    100
}

/// Name and kind of every built-in tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// `ls`
    Ls,
    /// `read_file`
    ReadFile,
    /// `write_file`
    WriteFile,
    /// `edit_file`
    EditFile,
    /// `write_todos`
    WriteTodos,
    /// `search_source_files`
    SearchSourceFiles,
    /// `read_source_file`
    ReadSourceFile,
}

impl ToolKind {
    /// Every built-in tool, in registration order.
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Ls,
        ToolKind::ReadFile,
        ToolKind::WriteFile,
        ToolKind::EditFile,
        ToolKind::WriteTodos,
        ToolKind::SearchSourceFiles,
        ToolKind::ReadSourceFile,
    ];

    /// The tool's registered name.
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Ls => "ls",
            ToolKind::ReadFile => "read_file",
            ToolKind::WriteFile => "write_file",
            ToolKind::EditFile => "edit_file",
            ToolKind::WriteTodos => "write_todos",
            ToolKind::SearchSourceFiles => "search_source_files",
            ToolKind::ReadSourceFile => "read_source_file",
        }
    }

    /// Look a tool up by its registered name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// A fully parsed tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    /// List virtual files
    Ls,
    /// Read a virtual file
    ReadFile(ReadFileArgs),
    /// Write a virtual file
    WriteFile(WriteFileArgs),
    /// Edit a virtual file
    EditFile(EditFileArgs),
    /// Replace the todo ledger
    WriteTodos(WriteTodosArgs),
    /// Search the source tree
    SearchSourceFiles(SearchSourceArgs),
    /// Read lines of a source file
    ReadSourceFile(ReadSourceArgs),
}

impl ToolCall {
    /// Parse `args` for the tool called `name`.
    ///
    /// `null` arguments are treated as an empty object.
    pub fn parse(name: &str, args: Value) -> ToolResult<Self> {
        let kind = ToolKind::from_name(name).ok_or_else(|| ToolError::UnknownTool(name.into()))?;
        let args = if args.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            args
        };

        Ok(match kind {
            ToolKind::Ls => ToolCall::Ls,
            ToolKind::ReadFile => ToolCall::ReadFile(parse_args(kind, args)?),
            ToolKind::WriteFile => ToolCall::WriteFile(parse_args(kind, args)?),
            ToolKind::EditFile => ToolCall::EditFile(parse_args(kind, args)?),
            ToolKind::WriteTodos => ToolCall::WriteTodos(parse_args(kind, args)?),
            ToolKind::SearchSourceFiles => ToolCall::SearchSourceFiles(parse_args(kind, args)?),
            ToolKind::ReadSourceFile => ToolCall::ReadSourceFile(parse_args(kind, args)?),
        })
    }

    /// The kind of this call.
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolCall::Ls => ToolKind::Ls,
            ToolCall::ReadFile(_) => ToolKind::ReadFile,
            ToolCall::WriteFile(_) => ToolKind::WriteFile,
            ToolCall::EditFile(_) => ToolKind::EditFile,
            ToolCall::WriteTodos(_) => ToolKind::WriteTodos,
            ToolCall::SearchSourceFiles(_) => ToolKind::SearchSourceFiles,
            ToolCall::ReadSourceFile(_) => ToolKind::ReadSourceFile,
        }
    }
}

fn parse_args<T: DeserializeOwned>(kind: ToolKind, args: Value) -> ToolResult<T> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool: kind.name().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("embed_documents"), None);
    }

    #[test]
    fn test_read_file_defaults() {
        let call = ToolCall::parse("read_file", json!({"filePath": "a.txt"})).unwrap();
        assert_eq!(
            call,
            ToolCall::ReadFile(ReadFileArgs {
                file_path: "a.txt".into(),
                offset: 0,
                limit: 2000,
            })
        );
    }

    #[test]
    fn test_edit_defaults_to_unique_replace() {
        let call = ToolCall::parse(
            "edit_file",
            json!({"filePath": "a", "oldString": "x", "newString": "y"}),
        )
        .unwrap();
        match call {
            ToolCall::EditFile(args) => assert!(!args.replace_all),
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[test]
    fn test_source_defaults() {
        let call = ToolCall::parse("search_source_files", json!({"query": "main"})).unwrap();
        assert_eq!(
            call,
            ToolCall::SearchSourceFiles(SearchSourceArgs {
                query: "main".into(),
                max_results: 10,
            })
        );

        let call = ToolCall::parse("read_source_file", json!({"filePath": "main.c"})).unwrap();
        assert_eq!(
            call,
            ToolCall::ReadSourceFile(ReadSourceArgs {
                file_path: "main.c".into(),
                start_line: 1,
                num_lines: 100,
            })
        );
    }

    #[test]
    fn test_write_todos_shape() {
        let call = ToolCall::parse(
            "write_todos",
            json!({"toDos": [{"content": "plan", "status": "pending"}]}),
        )
        .unwrap();
        assert_eq!(
            call,
            ToolCall::WriteTodos(WriteTodosArgs {
                to_dos: vec![ToDoItem::new("plan", "pending")],
            })
        );
        assert_eq!(call.kind(), ToolKind::WriteTodos);
    }

    #[test]
    fn test_ls_accepts_null_and_empty() {
        assert_eq!(ToolCall::parse("ls", Value::Null).unwrap(), ToolCall::Ls);
        assert_eq!(ToolCall::parse("ls", json!({})).unwrap(), ToolCall::Ls);
    }

    #[test]
    fn test_unknown_tool() {
        let err = ToolCall::parse("rm", json!({})).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(_)));
    }

    #[test]
    fn test_missing_required_argument() {
        let err = ToolCall::parse("write_file", json!({"filePath": "a"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArguments);
        assert!(err.to_string().contains("write_file"));
    }

    #[test]
    fn test_negative_offset_rejected() {
        let err = ToolCall::parse("read_file", json!({"filePath": "a", "offset": -1})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArguments);
    }
}
