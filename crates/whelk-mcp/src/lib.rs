//! Whelk MCP Server
//!
//! An MCP server that exposes the Whelk agent tools. The server owns one
//! [`AgentState`] for the lifetime of the connection; each tool call runs
//! against a snapshot of it and the resulting patch is merged afterwards.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::*,
    service::{RequestContext, RoleServer},
};
use tokio::sync::RwLock;
use whelk::tools::{RegistryError, ToolDefinition, generate_index_txt};
use whelk::{AgentState, ReadLimits, SourceConfig, ToolOutput, Toolbox};

/// MCP Server that provides the Whelk tools over a shared agent state
#[derive(Clone)]
pub struct WhelkServer {
    toolbox: Arc<Toolbox>,
    state: Arc<RwLock<AgentState>>,
}

impl std::fmt::Debug for WhelkServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhelkServer").finish_non_exhaustive()
    }
}

impl WhelkServer {
    /// Create a server with an empty agent state.
    pub fn new(toolbox: Toolbox) -> Self {
        Self::with_state(toolbox, AgentState::new())
    }

    /// Create a server seeded with `state`.
    pub fn with_state(toolbox: Toolbox, state: AgentState) -> Self {
        Self {
            toolbox: Arc::new(toolbox),
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Build the toolbox from configuration and wrap it in a server.
    pub fn from_config(source: SourceConfig, limits: ReadLimits) -> Result<Self, RegistryError> {
        let toolbox = Toolbox::builder().source(source).limits(limits).build()?;
        Ok(Self::new(toolbox))
    }

    /// A copy of the current agent state.
    pub async fn snapshot(&self) -> AgentState {
        self.state.read().await.clone()
    }

    /// Every registered tool as an MCP tool description.
    pub fn tools(&self) -> Vec<Tool> {
        self.toolbox
            .registry()
            .definitions()
            .iter()
            .map(mcp_tool)
            .collect()
    }

    /// Run the tool `name` and merge its patch into the shared state.
    ///
    /// The tool sees a snapshot taken when the call starts. The state lock is
    /// not held while the tool runs, so patches from overlapping calls are
    /// merged in completion order and the last write to a path wins.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        if !self.toolbox.registry().has_tool(name) {
            return Err(McpError::invalid_params(
                format!("Unknown tool: {}", name),
                None,
            ));
        }

        let args = arguments.map_or(serde_json::Value::Null, serde_json::Value::Object);
        let view = self.snapshot().await;
        let toolbox = Arc::clone(&self.toolbox);
        let tool = name.to_string();

        // Source tools walk and read the disk.
        let output: ToolOutput =
            tokio::task::spawn_blocking(move || toolbox.invoke(&view, &tool, args))
                .await
                .map_err(|e| McpError::internal_error(format!("Tool task failed: {}", e), None))?;

        if let Some(patch) = output.patch.clone() {
            tracing::debug!(tool = name, "merging state patch");
            self.state.write().await.apply(patch);
        }

        let content = vec![Content::text(output.render())];
        Ok(match output.error {
            Some(kind) => {
                tracing::info!(tool = name, ?kind, "tool returned an error");
                CallToolResult::error(content)
            }
            None => CallToolResult::success(content),
        })
    }
}

fn mcp_tool(def: &ToolDefinition) -> Tool {
    let input_schema = match &def.parameters {
        serde_json::Value::Object(map) => Arc::new(map.clone()),
        _ => Arc::new(serde_json::Map::new()),
    };

    Tool {
        name: def.name.clone().into(),
        title: None,
        description: Some(def.description.clone().into()),
        input_schema,
        output_schema: None,
        annotations: None,
        icons: None,
        meta: None,
    }
}

impl ServerHandler for WhelkServer {
    fn get_info(&self) -> ServerInfo {
        let index = generate_index_txt(&self.toolbox.registry().list_tools());
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "Whelk keeps a virtual file store and a todo list for this session, and can \
                search and read the project's source tree ({}). Failed calls return a message \
                starting with 'Error:'; adjust the arguments and retry.\n\n{}",
                self.toolbox.source().root_display(),
                index
            )),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call(request.name.as_ref(), request.arguments).await
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server() -> WhelkServer {
        WhelkServer::from_config(
            SourceConfig::new("/no/such/whelk/src"),
            ReadLimits::default(),
        )
        .expect("builtin tools register")
    }

    fn args(value: serde_json::Value) -> Option<JsonObject> {
        match value {
            serde_json::Value::Object(map) => Some(map),
            _ => None,
        }
    }

    fn text(result: &CallToolResult) -> String {
        result
            .content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.clone())
            .expect("text content")
    }

    #[test]
    fn test_tools_listed_with_schemas() {
        let tools = server().tools();
        assert_eq!(tools.len(), 7);
        let edit = tools
            .iter()
            .find(|t| t.name == "edit_file")
            .expect("edit_file listed");
        assert_eq!(
            edit.input_schema.get("type").and_then(|v| v.as_str()),
            Some("object")
        );
        assert!(edit.description.is_some());
    }

    #[tokio::test]
    async fn test_write_patch_is_merged() {
        let server = server();
        let result = server
            .call(
                "write_file",
                args(json!({"filePath": "a.txt", "content": "hi"})),
            )
            .await
            .expect("call");
        assert_eq!(result.is_error, Some(false));
        assert_eq!(text(&result), "Updated file a.txt");
        assert_eq!(server.snapshot().await.files["a.txt"], "hi");
    }

    #[tokio::test]
    async fn test_tool_failure_is_error_result() {
        let server = server();
        let result = server
            .call("read_file", args(json!({"filePath": "missing"})))
            .await
            .expect("call");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text(&result), "Error: File 'missing' not found");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_protocol_error() {
        let server = server();
        assert!(server.call("embed_documents", None).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_call_leaves_state_alone() {
        let server = WhelkServer::with_state(
            Toolbox::builder().build().expect("toolbox"),
            AgentState::with_files([("a.txt", "x\nx")]),
        );
        let result = server
            .call(
                "edit_file",
                args(json!({"filePath": "a.txt", "oldString": "x", "newString": "y"})),
            )
            .await
            .expect("call");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(server.snapshot().await.files["a.txt"], "x\nx");
    }

    #[tokio::test]
    async fn test_overlapping_writes_last_merge_wins() {
        let server = WhelkServer::with_state(
            Toolbox::builder().build().expect("toolbox"),
            AgentState::with_files([("keep.txt", "untouched")]),
        );

        let (first, second) = tokio::join!(
            server.call(
                "write_file",
                args(json!({"filePath": "shared.txt", "content": "one"})),
            ),
            server.call(
                "write_file",
                args(json!({"filePath": "shared.txt", "content": "two"})),
            ),
        );
        assert_eq!(first.expect("first call").is_error, Some(false));
        assert_eq!(second.expect("second call").is_error, Some(false));

        let state = server.snapshot().await;
        assert!(
            ["one", "two"].contains(&state.files["shared.txt"].as_str()),
            "unexpected content: {}",
            state.files["shared.txt"]
        );
        assert_eq!(state.files["keep.txt"], "untouched");
        assert_eq!(state.files.len(), 2);
    }

    #[tokio::test]
    async fn test_call_sees_state_from_before_it_started() {
        let server = server();
        server
            .call("write_file", args(json!({"filePath": "a", "content": "x"})))
            .await
            .expect("write");

        let (listing, _) = tokio::join!(
            server.call("ls", None),
            server.call("write_file", args(json!({"filePath": "b", "content": "y"}))),
        );
        let listing = text(&listing.expect("ls"));
        assert!(listing == r#"["a"]"# || listing == r#"["a","b"]"#, "got {listing}");
        assert_eq!(server.snapshot().await.files.len(), 2);
    }
}
