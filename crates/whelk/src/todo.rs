//! Todo ledger: an ordered plan replaced wholesale on every update.

use serde::{Deserialize, Serialize};

use crate::state::StatePatch;

/// One entry of the agent's plan.
///
/// `status` is an opaque tag (for example `pending`, `in_progress`,
/// `completed`); the caller's schema defines the allowed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToDoItem {
    /// What needs doing
    pub content: String,
    /// Caller-defined status tag
    pub status: String,
}

impl ToDoItem {
    /// Create a todo item.
    pub fn new(content: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            status: status.into(),
        }
    }
}

/// The arguments of a `write_todos` call, as echoed back in its message.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TodoUpdate<'a> {
    to_dos: &'a [ToDoItem],
}

/// Replace the ledger with `todos`, preserving their order.
///
/// Always succeeds. Returns the result message and the patch.
pub fn write_todos(todos: Vec<ToDoItem>) -> (String, StatePatch) {
    tracing::debug!(tool = "write_todos", count = todos.len(), "updating todo list");
    let rendered = serde_json::to_string(&TodoUpdate { to_dos: &todos })
        .unwrap_or_else(|_| r#"{"toDos":[]}"#.to_string());
    (
        format!("Updated todo list to {rendered}"),
        StatePatch::todos(todos),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_write_todos_preserves_order() {
        let todos = vec![
            ToDoItem::new("c", "pending"),
            ToDoItem::new("a", "completed"),
            ToDoItem::new("b", "in_progress"),
        ];
        let (_, patch) = write_todos(todos.clone());
        assert_eq!(patch.todos.unwrap(), todos);
        assert!(patch.files.is_none());
    }

    #[test]
    fn test_write_todos_accepts_any_status() {
        let (msg, patch) = write_todos(vec![ToDoItem::new("x", "whatever-you-like")]);
        assert!(msg.starts_with("Updated todo list to "));
        assert!(msg.contains("whatever-you-like"));
        assert_eq!(patch.todos.unwrap()[0].status, "whatever-you-like");
    }

    #[test]
    fn test_message_echoes_arguments() {
        let (msg, _) = write_todos(vec![ToDoItem::new("ship", "pending")]);
        assert_eq!(
            msg,
            r#"Updated todo list to {"toDos":[{"content":"ship","status":"pending"}]}"#
        );
    }

    #[test]
    fn test_write_empty_list() {
        let (msg, patch) = write_todos(Vec::new());
        assert_eq!(msg, r#"Updated todo list to {"toDos":[]}"#);
        assert_eq!(patch.todos, Some(Vec::new()));
    }
}
