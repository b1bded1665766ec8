//! Argument schemas for the built-in tools.

use serde_json::json;

use super::call::ToolKind;
use super::registry::ToolDefinition;

impl ToolKind {
    /// The registered definition of this tool.
    pub fn definition(&self) -> ToolDefinition {
        let name = self.name();
        match self {
            ToolKind::Ls => {
                ToolDefinition::no_params(name, "List all files in the virtual filesystem")
            }
            ToolKind::ReadFile => ToolDefinition::new(
                name,
                "Read lines of a virtual file. Output lines are numbered from 1 and long lines are truncated.",
                json!({
                    "type": "object",
                    "properties": {
                        "filePath": { "type": "string", "description": "Path of the virtual file" },
                        "offset": {
                            "type": "integer",
                            "minimum": 0,
                            "default": 0,
                            "description": "0-based line to start reading from"
                        },
                        "limit": {
                            "type": "integer",
                            "minimum": 0,
                            "default": 2000,
                            "description": "Maximum number of lines to read"
                        }
                    },
                    "required": ["filePath"]
                }),
            ),
            ToolKind::WriteFile => ToolDefinition::new(
                name,
                "Create or overwrite a virtual file",
                json!({
                    "type": "object",
                    "properties": {
                        "filePath": { "type": "string", "description": "Path of the virtual file" },
                        "content": { "type": "string", "description": "Full new content" }
                    },
                    "required": ["filePath", "content"]
                }),
            ),
            ToolKind::EditFile => ToolDefinition::new(
                name,
                "Replace a literal string in a virtual file. The string must be unique unless replaceAll is set.",
                json!({
                    "type": "object",
                    "properties": {
                        "filePath": { "type": "string", "description": "Path of the virtual file" },
                        "oldString": { "type": "string", "description": "Exact text to replace" },
                        "newString": { "type": "string", "description": "Replacement text" },
                        "replaceAll": {
                            "type": "boolean",
                            "default": false,
                            "description": "Replace every occurrence"
                        }
                    },
                    "required": ["filePath", "oldString", "newString"]
                }),
            ),
            ToolKind::WriteTodos => ToolDefinition::new(
                name,
                "Replace the todo list with a new ordered plan",
                json!({
                    "type": "object",
                    "properties": {
                        "toDos": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "content": { "type": "string" },
                                    "status": { "type": "string" }
                                },
                                "required": ["content", "status"]
                            }
                        }
                    },
                    "required": ["toDos"]
                }),
            ),
            ToolKind::SearchSourceFiles => ToolDefinition::new(
                name,
                "Search the source tree by file name, path fragment, or file content",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "File name (with or without extension), path fragment, or text"
                        },
                        "maxResults": {
                            "type": "integer",
                            "minimum": 1,
                            "default": 10,
                            "description": "Maximum number of paths to return"
                        }
                    },
                    "required": ["query"]
                }),
            ),
            ToolKind::ReadSourceFile => ToolDefinition::new(
                name,
                "Read a range of lines from a source or documentation file on disk",
                json!({
                    "type": "object",
                    "properties": {
                        "filePath": {
                            "type": "string",
                            "description": "Full path, or a bare file name under the source root"
                        },
                        "startLine": {
                            "type": "integer",
                            "minimum": 1,
                            "default": 1,
                            "description": "1-based first line"
                        },
                        "numLines": {
                            "type": "integer",
                            "minimum": 1,
                            "default": 100,
                            "description": "Number of lines to read"
                        }
                    },
                    "required": ["filePath"]
                }),
            ),
        }
    }
}

/// Definitions of every built-in tool, in registration order.
pub fn builtin_definitions() -> Vec<ToolDefinition> {
    ToolKind::ALL.iter().map(ToolKind::definition).collect()
}
