//! Tool definitions and the registry that validates them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Summary of a tool for index listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSummary {
    /// Tool name (unique identifier).
    pub name: String,
    /// One-line description.
    pub description: String,
}

/// Full definition of a tool including its parameter schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (unique identifier).
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for the tool's parameters.
    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Create a tool definition with no parameters.
    pub fn no_params(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    /// Get a summary of this tool.
    pub fn summary(&self) -> ToolSummary {
        ToolSummary {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    /// Check the schema is an object schema whose required fields exist.
    fn validate(&self) -> Result<(), RegistryError> {
        if self.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let invalid = |reason: &str| RegistryError::InvalidSchema {
            tool: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.parameters.get("type").and_then(|t| t.as_str()) != Some("object") {
            return Err(invalid("parameters must be an object schema"));
        }
        let properties = match self.parameters.get("properties") {
            None => None,
            Some(p) => Some(
                p.as_object()
                    .ok_or_else(|| invalid("properties must be an object"))?,
            ),
        };
        if let Some(required) = self.parameters.get("required") {
            let required = required
                .as_array()
                .ok_or_else(|| invalid("required must be an array"))?;
            for field in required {
                let field = field
                    .as_str()
                    .ok_or_else(|| invalid("required entries must be strings"))?;
                if !properties.is_some_and(|p| p.contains_key(field)) {
                    return Err(RegistryError::UndeclaredRequired {
                        tool: self.name.clone(),
                        field: field.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Errors raised while registering tools.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Tool name is empty
    #[error("tool name must not be empty")]
    EmptyName,
    /// A tool with this name is already registered
    #[error("tool '{0}' is already registered")]
    Duplicate(String),
    /// Parameter schema is malformed
    #[error("invalid schema for '{tool}': {reason}")]
    InvalidSchema {
        /// Tool name
        tool: String,
        /// What is wrong
        reason: String,
    },
    /// A required field is missing from `properties`
    #[error("tool '{tool}' requires undeclared field '{field}'")]
    UndeclaredRequired {
        /// Tool name
        tool: String,
        /// The undeclared field
        field: String,
    },
}

/// In-memory registry of tool definitions, in registration order.
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool, rejecting duplicates and malformed schemas.
    pub fn register(&mut self, tool: ToolDefinition) -> Result<(), RegistryError> {
        tool.validate()?;
        if self.has_tool(&tool.name) {
            return Err(RegistryError::Duplicate(tool.name));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Add multiple tools, stopping at the first failure.
    pub fn extend(
        &mut self,
        tools: impl IntoIterator<Item = ToolDefinition>,
    ) -> Result<(), RegistryError> {
        tools.into_iter().try_for_each(|t| self.register(t))
    }

    /// List all available tools (name and description only).
    pub fn list_tools(&self) -> Vec<ToolSummary> {
        self.tools.iter().map(ToolDefinition::summary).collect()
    }

    /// All full definitions.
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Get the full definition of a specific tool.
    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Check if a tool exists.
    pub fn has_tool(&self, name: &str) -> bool {
        self.get_tool(name).is_some()
    }
}

/// Render a one-tool-per-line index with aligned descriptions.
///
/// ```text
/// ls                     List all files in the virtual filesystem
/// search_source_files    Search the source tree for files
/// ```
pub fn generate_index_txt(tools: &[ToolSummary]) -> String {
    if tools.is_empty() {
        return String::new();
    }

    let max_name_len = tools.iter().map(|t| t.name.len()).max().unwrap_or(0);
    let padding = max_name_len + 4;

    let mut output = String::new();
    for tool in tools {
        let spaces = " ".repeat(padding - tool.name.len());
        output.push_str(&tool.name);
        output.push_str(&spaces);
        output.push_str(&tool.description);
        output.push('\n');
    }
    output
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path_tool(name: &str) -> ToolDefinition {
        ToolDefinition::new(
            name,
            "Takes a path",
            json!({
                "type": "object",
                "properties": { "filePath": { "type": "string" } },
                "required": ["filePath"]
            }),
        )
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(path_tool("read_file")).expect("register");
        registry
            .register(ToolDefinition::no_params("ls", "List files"))
            .expect("register");

        assert_eq!(registry.list_tools().len(), 2);
        assert!(registry.has_tool("ls"));
        assert!(!registry.has_tool("rm"));
        assert_eq!(
            registry.get_tool("read_file").map(|t| t.description.as_str()),
            Some("Takes a path")
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(path_tool("read_file")).expect("register");
        assert_eq!(
            registry.register(path_tool("read_file")),
            Err(RegistryError::Duplicate("read_file".into()))
        );
        assert_eq!(registry.list_tools().len(), 1);
    }

    #[test]
    fn test_non_object_schema_rejected() {
        let mut registry = ToolRegistry::new();
        let err = registry
            .register(ToolDefinition::new("bad", "Bad", json!({"type": "string"})))
            .expect_err("should reject");
        assert!(matches!(err, RegistryError::InvalidSchema { .. }));
    }

    #[test]
    fn test_undeclared_required_rejected() {
        let mut registry = ToolRegistry::new();
        let tool = ToolDefinition::new(
            "bad",
            "Bad",
            json!({"type": "object", "properties": {}, "required": ["ghost"]}),
        );
        assert_eq!(
            registry.register(tool),
            Err(RegistryError::UndeclaredRequired {
                tool: "bad".into(),
                field: "ghost".into()
            })
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = ToolRegistry::new();
        assert_eq!(
            registry.register(ToolDefinition::no_params("", "Nameless")),
            Err(RegistryError::EmptyName)
        );
    }

    #[test]
    fn test_extend_stops_at_first_error() {
        let mut registry = ToolRegistry::new();
        let result = registry.extend([path_tool("a"), path_tool("a"), path_tool("b")]);
        assert!(result.is_err());
        assert_eq!(registry.list_tools().len(), 1);
    }

    #[test]
    fn test_generate_index_txt_alignment() {
        let tools = vec![
            ToolSummary {
                name: "ls".into(),
                description: "Short".into(),
            },
            ToolSummary {
                name: "read_source_file".into(),
                description: "Longer".into(),
            },
        ];

        let index = generate_index_txt(&tools);
        let lines: Vec<_> = index.lines().collect();
        let a = lines[0].find("Short").expect("should find Short");
        let b = lines[1].find("Longer").expect("should find Longer");
        assert_eq!(a, b);
        assert!(generate_index_txt(&[]).is_empty());
    }
}
