//! Per-user to-do items.

use serde::{Deserialize, Serialize};

use crate::ids::TodoId;

/// Store field names of a todo document.
pub mod fields {
    pub const TEXT: &str = "text";
    pub const COMPLETED: &str = "completed";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Display order: open items first, completed last, otherwise the order the
/// store delivered them in.
pub fn sorted_for_display(todos: &[Todo]) -> Vec<Todo> {
    let mut sorted = todos.to_vec();
    sorted.sort_by_key(|todo| todo.completed);
    sorted
}

/// Input of the add-todo form, trimmed. `None` when nothing is left.
pub fn normalize_todo_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
