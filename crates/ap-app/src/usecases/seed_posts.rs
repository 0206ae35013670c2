//! One-time seeding of the post collection
//! 文章集合的一次性初始化

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info, info_span, Instrument};

use ap_core::ports::{ClockPort, CollectionPath, DocumentStorePort};
use ap_core::post::{NewPost, PostDraft, STARTER_POSTS};

use crate::streams::post_to_fields;

/// Process-scoped "seeding already attempted" flag.
///
/// Injected into [`SeedPosts`] so the at-most-once rule is owned by whoever
/// builds the process, not by module state.
#[derive(Debug, Default)]
pub struct SeedGuard {
    attempted: AtomicBool,
}

impl SeedGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` exactly once.
    pub fn claim(&self) -> bool {
        !self.attempted.swap(true, Ordering::AcqRel)
    }

    pub fn is_claimed(&self) -> bool {
        self.attempted.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(usize),
    AlreadyPopulated,
    AlreadyAttempted,
    Failed(String),
}

pub struct SeedPosts {
    store: Arc<dyn DocumentStorePort>,
    clock: Arc<dyn ClockPort>,
    guard: Arc<SeedGuard>,
}

impl SeedPosts {
    pub fn new(
        store: Arc<dyn DocumentStorePort>,
        clock: Arc<dyn ClockPort>,
        guard: Arc<SeedGuard>,
    ) -> Self {
        Self {
            store,
            clock,
            guard,
        }
    }

    /// Best effort: failures are logged and reported in the outcome, never
    /// returned as errors.
    pub async fn execute(&self) -> SeedOutcome {
        let span = info_span!("usecase.seed_posts.execute");
        async {
            if !self.guard.claim() {
                return SeedOutcome::AlreadyAttempted;
            }

            let outcome = self.seed().await;
            match &outcome {
                SeedOutcome::Failed(reason) => error!(%reason, "seeding failed"),
                other => info!(outcome = ?other, "seeding finished"),
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn seed(&self) -> SeedOutcome {
        let path = CollectionPath::posts();
        match self.store.is_empty(&path).await {
            Ok(true) => {}
            Ok(false) => return SeedOutcome::AlreadyPopulated,
            Err(err) => return SeedOutcome::Failed(err.to_string()),
        }

        let now = self.clock.now();
        let mut documents = Vec::with_capacity(STARTER_POSTS.len());
        for seed in &STARTER_POSTS {
            let draft = PostDraft {
                title: seed.title.to_string(),
                content: seed.content.trim().to_string(),
                image_url: seed.image_url.to_string(),
                category: seed.category.to_string(),
            };
            match NewPost::try_from(draft) {
                Ok(post) => documents.push(post_to_fields(&post, seed.created_at(now))),
                Err(err) => return SeedOutcome::Failed(err.to_string()),
            }
        }

        match self.store.batch_add(&path, documents).await {
            Ok(ids) => SeedOutcome::Seeded(ids.len()),
            Err(err) => SeedOutcome::Failed(err.to_string()),
        }
    }
}
