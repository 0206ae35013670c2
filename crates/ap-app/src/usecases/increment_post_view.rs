use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use ap_core::ids::PostId;
use ap_core::ports::{CollectionPath, DocumentStorePort, FieldUpdate};
use ap_core::post::fields;

/// Atomic `views += 1` on the store side. The local snapshot is not touched;
/// the new count arrives with the next post snapshot.
pub struct IncrementPostView {
    store: Arc<dyn DocumentStorePort>,
}

impl IncrementPostView {
    pub fn new(store: Arc<dyn DocumentStorePort>) -> Self {
        Self { store }
    }

    #[tracing::instrument(
        name = "usecase.increment_post_view.execute",
        skip(self),
        fields(post_id = %post_id)
    )]
    pub async fn execute(&self, post_id: &PostId) -> Result<()> {
        self.store
            .update(
                &CollectionPath::posts(),
                post_id.as_str(),
                vec![FieldUpdate::Increment {
                    field: fields::VIEWS.to_string(),
                    by: 1,
                }],
            )
            .await
            .with_context(|| format!("failed to increment views of {post_id}"))?;
        debug!("view count incremented");
        Ok(())
    }
}
