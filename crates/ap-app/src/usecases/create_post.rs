//! Use case for publishing a new post
//! 发布新文章的用例

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use ap_core::format::iso_timestamp;
use ap_core::ids::PostId;
use ap_core::ports::{ClockPort, CollectionPath, DocumentStorePort};
use ap_core::post::NewPost;

use crate::streams::post_to_fields;

/// Writes a post with the current time as `createdAt` and zero views.
pub struct CreatePost {
    store: Arc<dyn DocumentStorePort>,
    clock: Arc<dyn ClockPort>,
}

impl CreatePost {
    pub fn new(store: Arc<dyn DocumentStorePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    #[tracing::instrument(
        name = "usecase.create_post.execute",
        skip(self, post),
        fields(title = %post.title(), category = %post.category())
    )]
    pub async fn execute(&self, post: &NewPost) -> Result<PostId> {
        let created_at = iso_timestamp(self.clock.now());
        let id = self
            .store
            .add(&CollectionPath::posts(), post_to_fields(post, created_at))
            .await
            .context("failed to create post")?;

        info!(post_id = %id, "post created");
        Ok(PostId::from(id))
    }
}
