//! The tool surface: definitions, typed calls, and dispatch.

mod call;
mod registry;
mod schema;
mod toolbox;

pub use call::{
    EditFileArgs, ReadFileArgs, ReadSourceArgs, SearchSourceArgs, ToolCall, ToolKind,
    WriteFileArgs, WriteTodosArgs,
};
pub use registry::{
    RegistryError, ToolDefinition, ToolRegistry, ToolSummary, generate_index_txt,
};
pub use schema::builtin_definitions;
pub use toolbox::{ToolContent, ToolOutput, Toolbox, ToolboxBuilder};
