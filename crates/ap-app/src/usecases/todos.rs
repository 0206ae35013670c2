//! To-do write use cases
//! 待办事项写操作

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use ap_core::ids::{TodoId, UserId};
use ap_core::ports::{CollectionPath, DocumentStorePort, FieldUpdate, Fields};
use ap_core::todo::{fields, normalize_todo_text};

/// Adds, toggles and deletes todos in one user's partition.
pub struct TodoCommands {
    store: Arc<dyn DocumentStorePort>,
}

impl TodoCommands {
    pub fn new(store: Arc<dyn DocumentStorePort>) -> Self {
        Self { store }
    }

    /// Returns `None` when the trimmed text is empty (nothing written).
    #[tracing::instrument(name = "usecase.add_todo.execute", skip(self, text), fields(uid = %uid))]
    pub async fn add(&self, uid: &UserId, text: &str) -> Result<Option<TodoId>> {
        let Some(text) = normalize_todo_text(text) else {
            return Ok(None);
        };
        let mut doc = Fields::new();
        doc.insert(fields::TEXT.to_string(), Value::String(text));
        doc.insert(fields::COMPLETED.to_string(), Value::Bool(false));

        let id = self
            .store
            .add(&CollectionPath::todos(uid.as_str()), doc)
            .await
            .context("failed to add todo")?;
        info!(todo_id = %id, "todo added");
        Ok(Some(TodoId::from(id)))
    }

    #[tracing::instrument(
        name = "usecase.set_todo_completed.execute",
        skip(self),
        fields(uid = %uid, todo_id = %id)
    )]
    pub async fn set_completed(&self, uid: &UserId, id: &TodoId, completed: bool) -> Result<()> {
        self.store
            .update(
                &CollectionPath::todos(uid.as_str()),
                id.as_str(),
                vec![FieldUpdate::Set {
                    field: fields::COMPLETED.to_string(),
                    value: Value::Bool(completed),
                }],
            )
            .await
            .context("failed to update todo")
    }

    #[tracing::instrument(
        name = "usecase.delete_todo.execute",
        skip(self),
        fields(uid = %uid, todo_id = %id)
    )]
    pub async fn delete(&self, uid: &UserId, id: &TodoId) -> Result<()> {
        self.store
            .delete(&CollectionPath::todos(uid.as_str()), id.as_str())
            .await
            .context("failed to delete todo")
    }
}
