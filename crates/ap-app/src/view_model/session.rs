use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::AbortHandle;
use tracing::info;

use ap_core::stream::Subscription;

/// Live resources of a started view-model: both collection subscriptions,
/// the market refresh timer and the seeding task.
///
/// Everything is released together by [`ViewModelSession::shutdown`] or on
/// drop, whichever comes first.
///
/// 会话资源：订阅与定时器一起释放。
pub struct ViewModelSession {
    posts: Subscription,
    todos: Subscription,
    market_timer: AbortHandle,
    seeding: AbortHandle,
    closed: AtomicBool,
}

impl ViewModelSession {
    pub(crate) fn new(
        posts: Subscription,
        todos: Subscription,
        market_timer: AbortHandle,
        seeding: AbortHandle,
    ) -> Self {
        Self {
            posts,
            todos,
            market_timer,
            seeding,
            closed: AtomicBool::new(false),
        }
    }

    /// Idempotent.
    pub fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.posts.unsubscribe();
        self.todos.unsubscribe();
        self.market_timer.abort();
        self.seeding.abort();
        info!("view-model session shut down");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Drop for ViewModelSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
