//! Whelk: agent tools over a virtual file store and a real source tree
//!
//! Whelk gives a planning agent a small set of tools. `ls`, `read_file`,
//! `write_file` and `edit_file` work on an in-memory file store that lives in
//! the agent's state. `write_todos` replaces its plan. `search_source_files`
//! and `read_source_file` look at a read-only source tree on disk.
//!
//! Tools never mutate state themselves. Each invocation borrows an
//! [`AgentState`] and returns a [`ToolOutput`] whose optional [`StatePatch`]
//! the caller merges before the next step.
//!
//! ```
//! use serde_json::json;
//! use whelk::{AgentState, Toolbox};
//!
//! let toolbox = Toolbox::builder().build().expect("builtin tools register");
//! let mut state = AgentState::new();
//!
//! let out = toolbox.invoke(&state, "write_file", json!({"filePath": "plan.md", "content": "step one"}));
//! if let Some(patch) = out.patch {
//!     state.apply(patch);
//! }
//!
//! let out = toolbox.invoke(&state, "read_file", json!({"filePath": "plan.md"}));
//! assert_eq!(out.render(), "     1\tstep one");
//! ```

mod edit;
mod error;
mod limits;
mod policy;
mod state;
mod todo;
mod vfs;
mod window;

pub mod source;
pub mod tools;

pub use edit::{EditRequest, edit_file};
pub use error::{ErrorKind, ToolError, ToolResult};
pub use limits::{ReadLimits, truncate_chars};
pub use policy::{PolicyDecision, PolicyHandler, RootPolicy, normalize_path};
pub use source::{SourceConfig, SourceExcerpt, SourceTree};
pub use state::{AgentState, FileMap, StatePatch};
pub use todo::{ToDoItem, write_todos};
pub use tools::{ToolCall, ToolContent, ToolDefinition, ToolOutput, ToolRegistry, Toolbox};
pub use vfs::{EMPTY_FILE_REMINDER, VirtualFs, write_file};
pub use window::{LineWindow, split_lines};
