//! Dispatch of tool calls against the shared agent state.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::call::ToolCall;
use super::registry::{RegistryError, ToolRegistry};
use super::schema::builtin_definitions;
use crate::edit::{EditRequest, edit_file};
use crate::error::{ErrorKind, ToolError, ToolResult};
use crate::limits::ReadLimits;
use crate::source::{SourceConfig, SourceTree};
use crate::state::{AgentState, StatePatch};
use crate::todo::write_todos;
use crate::vfs::{VirtualFs, write_file};

/// The result payload of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ToolContent {
    /// A single message or rendered file
    Text(String),
    /// A list of paths (`ls`, `search_source_files`)
    Paths(Vec<String>),
}

impl fmt::Display for ToolContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolContent::Text(text) => f.write_str(text),
            ToolContent::Paths(paths) => match serde_json::to_string(paths) {
                Ok(json) => f.write_str(&json),
                Err(_) => f.write_str(&paths.join("\n")),
            },
        }
    }
}

/// What a tool invocation produced.
///
/// Failures are ordinary outputs: `error` names the kind and the content
/// reads `Error: <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Result payload
    pub content: ToolContent,
    /// Mutation for the caller to apply, if any
    pub patch: Option<StatePatch>,
    /// Set when the invocation failed
    pub error: Option<ErrorKind>,
}

impl ToolOutput {
    /// A successful text result.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: ToolContent::Text(text.into()),
            patch: None,
            error: None,
        }
    }

    /// A successful path list.
    pub fn paths(paths: Vec<String>) -> Self {
        Self {
            content: ToolContent::Paths(paths),
            patch: None,
            error: None,
        }
    }

    /// A failed invocation.
    pub fn failure(err: &ToolError) -> Self {
        Self {
            content: ToolContent::Text(format!("Error: {err}")),
            patch: None,
            error: Some(err.kind()),
        }
    }

    fn with_patch(mut self, patch: StatePatch) -> Self {
        self.patch = Some(patch);
        self
    }

    /// True if the invocation failed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The result as the single string handed back to the caller.
    pub fn render(&self) -> String {
        self.content.to_string()
    }
}

impl From<(String, StatePatch)> for ToolOutput {
    fn from((message, patch): (String, StatePatch)) -> Self {
        ToolOutput::text(message).with_patch(patch)
    }
}

/// Builder for [`Toolbox`].
#[derive(Debug, Clone, Default)]
pub struct ToolboxBuilder {
    source: SourceConfig,
    limits: ReadLimits,
}

impl ToolboxBuilder {
    /// Set the source tree configuration.
    pub fn source(mut self, source: SourceConfig) -> Self {
        self.source = source;
        self
    }

    /// Set the read limits.
    pub fn limits(mut self, limits: ReadLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Register the built-in tools and build the toolbox.
    pub fn build(self) -> Result<Toolbox, RegistryError> {
        let mut registry = ToolRegistry::new();
        registry.extend(builtin_definitions())?;
        tracing::debug!(
            tools = registry.list_tools().len(),
            src_root = %self.source.src_root.display(),
            "toolbox ready"
        );
        Ok(Toolbox {
            source: SourceTree::new(self.source, self.limits.clone()),
            limits: self.limits,
            registry,
        })
    }
}

/// All tools, bound to one source tree configuration.
///
/// A toolbox holds no agent state of its own. Each call borrows the state
/// immutably and hands mutations back in [`ToolOutput::patch`].
#[derive(Debug, Clone)]
pub struct Toolbox {
    source: SourceTree,
    limits: ReadLimits,
    registry: ToolRegistry,
}

impl Toolbox {
    /// Start building a toolbox.
    pub fn builder() -> ToolboxBuilder {
        ToolboxBuilder::default()
    }

    /// The registered tools.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// The source tree searched and read by the source tools.
    pub fn source(&self) -> &SourceTree {
        &self.source
    }

    /// The limits in effect.
    pub fn limits(&self) -> &ReadLimits {
        &self.limits
    }

    /// Invoke the tool registered as `name` with JSON `args`.
    pub fn invoke(&self, state: &AgentState, name: &str, args: Value) -> ToolOutput {
        if !self.registry.has_tool(name) {
            return self.fail(name, ToolError::UnknownTool(name.to_string()));
        }
        match ToolCall::parse(name, args) {
            Ok(call) => self.execute(state, call),
            Err(err) => self.fail(name, err),
        }
    }

    /// Execute an already parsed call.
    pub fn execute(&self, state: &AgentState, call: ToolCall) -> ToolOutput {
        let name = call.kind().name();
        match self.run(state, call) {
            Ok(output) => output,
            Err(err) => self.fail(name, err),
        }
    }

    fn run(&self, state: &AgentState, call: ToolCall) -> ToolResult<ToolOutput> {
        let fs = VirtualFs::new(&state.files).with_max_line_chars(self.limits.max_line_chars);

        Ok(match call {
            ToolCall::Ls => ToolOutput::paths(fs.list()),
            ToolCall::ReadFile(args) => {
                ToolOutput::text(fs.read(&args.file_path, args.offset, args.limit)?)
            }
            ToolCall::WriteFile(args) => write_file(&args.file_path, &args.content).into(),
            ToolCall::EditFile(args) => edit_file(
                &fs,
                EditRequest {
                    path: &args.file_path,
                    old_string: &args.old_string,
                    new_string: &args.new_string,
                    replace_all: args.replace_all,
                },
            )?
            .into(),
            ToolCall::WriteTodos(args) => write_todos(args.to_dos).into(),
            ToolCall::SearchSourceFiles(args) => {
                ToolOutput::paths(self.source.search(&args.query, args.max_results)?)
            }
            ToolCall::ReadSourceFile(args) => ToolOutput::text(
                self.source
                    .read_range(&args.file_path, args.start_line, args.num_lines)?
                    .to_string(),
            ),
        })
    }

    fn fail(&self, tool: &str, err: ToolError) -> ToolOutput {
        tracing::debug!(tool, kind = ?err.kind(), error = %err, "tool call failed");
        ToolOutput::failure(&err)
    }
}
