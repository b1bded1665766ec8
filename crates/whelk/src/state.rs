//! Shared agent state and the patch protocol tools use to mutate it.
//!
//! Tools never write [`AgentState`] directly. A mutating tool returns a
//! [`StatePatch`] and the caller applies it between invocations:
//!
//! - `files`: key-wise union, patch wins. Paths not named in the patch are
//!   left untouched.
//! - `todos`: the patch's list replaces the previous one wholesale.
//!
//! Within one invocation the tool only holds `&AgentState`, so its read view
//! cannot change under it. Two patches produced in the same step and applied
//! one after the other resolve overlapping file keys last-merge-wins; that is
//! a hazard of parallel tool calls, not something this layer prevents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::todo::ToDoItem;

/// Mapping of virtual path to full text content.
pub type FileMap = BTreeMap<String, String>;

/// State shared by every tool invocation within one agent run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentState {
    /// Virtual file store
    #[serde(default)]
    pub files: FileMap,
    /// Ordered todo ledger
    #[serde(default)]
    pub todos: Vec<ToDoItem>,
}

impl AgentState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state seeded with the given files.
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<String>,
        C: Into<String>,
    {
        Self {
            files: files
                .into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect(),
            todos: Vec::new(),
        }
    }

    /// Merge a patch into this state.
    pub fn apply(&mut self, patch: StatePatch) {
        if let Some(files) = patch.files {
            tracing::trace!(count = files.len(), "merging file updates");
            self.files.extend(files);
        }
        if let Some(todos) = patch.todos {
            tracing::trace!(count = todos.len(), "replacing todo ledger");
            self.todos = todos;
        }
    }
}

/// A declarative description of one tool invocation's mutations.
///
/// Serializes as the mapping of field name to sub-update, with absent fields
/// omitted: `{"files": {"a.txt": "..."}}` or `{"todos": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatePatch {
    /// Paths to set; other paths are untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<FileMap>,
    /// Replacement todo list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<ToDoItem>>,
}

impl StatePatch {
    /// A patch that sets a single file.
    pub fn file(path: impl Into<String>, content: impl Into<String>) -> Self {
        let mut files = FileMap::new();
        files.insert(path.into(), content.into());
        Self {
            files: Some(files),
            todos: None,
        }
    }

    /// A patch that replaces the todo ledger.
    pub fn todos(todos: Vec<ToDoItem>) -> Self {
        Self {
            files: None,
            todos: Some(todos),
        }
    }

    /// True if applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.files.is_none() && self.todos.is_none()
    }

    /// Compose this patch with one produced after it.
    ///
    /// Uses the same policy as [`AgentState::apply`]: `later` wins on
    /// overlapping file paths and its todo list, if any, replaces ours.
    pub fn merge(mut self, later: StatePatch) -> StatePatch {
        if let Some(later_files) = later.files {
            self.files.get_or_insert_with(FileMap::new).extend(later_files);
        }
        if later.todos.is_some() {
            self.todos = later.todos;
        }
        self
    }
}
