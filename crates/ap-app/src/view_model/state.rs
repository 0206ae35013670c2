//! View-model state.
//!
//! Collections are held as immutable snapshots and replaced wholesale. The
//! dashboard digest is computed lazily once per posts snapshot.

use std::sync::{Arc, OnceLock};

use ap_core::ids::{CoinId, PostId};
use ap_core::market::{ChartDataPoint, CryptoData};
use ap_core::navigation::RouteState;
use ap_core::post::{CategoryFilter, Post, PostDigest};
use ap_core::research::ResearchHistory;
use ap_core::todo::Todo;

use super::panels::{CreatePostForm, ResearchPanel};

/// One delivered posts snapshot plus its memoized digest.
#[derive(Debug, Default)]
pub struct PostsSnapshot {
    posts: Arc<Vec<Post>>,
    digest: OnceLock<Arc<PostDigest>>,
}

impl PostsSnapshot {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts: Arc::new(posts),
            digest: OnceLock::new(),
        }
    }

    pub fn posts(&self) -> &Arc<Vec<Post>> {
        &self.posts
    }

    pub fn digest(&self) -> Arc<PostDigest> {
        Arc::clone(
            self.digest
                .get_or_init(|| Arc::new(PostDigest::from_posts(&self.posts))),
        )
    }

    pub fn find(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|post| &post.id == id)
    }
}

/// Series of the open price chart. `points` is `None` while loading.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub coin_id: CoinId,
    pub points: Option<Vec<ChartDataPoint>>,
}

#[derive(Debug, Default)]
pub struct ViewState {
    pub posts: PostsSnapshot,
    pub todos: Arc<Vec<Todo>>,
    pub market: Arc<Vec<CryptoData>>,
    pub route: RouteState,
    pub selected_crypto: Option<CoinId>,
    pub chart: Option<ChartSeries>,
    pub research_open: bool,
    pub history: ResearchHistory,
    pub post_filter: CategoryFilter,
    pub create_form: CreatePostForm,
    pub research: ResearchPanel,
}

impl ViewState {
    /// The selected post as of the current snapshot. `None` when nothing is
    /// selected or the snapshot no longer contains it.
    pub fn selected_post(&self) -> Option<&Post> {
        self.route
            .selected_post_id
            .as_ref()
            .and_then(|id| self.posts.find(id))
    }

    /// The selected coin resolved against the current market snapshot.
    pub fn selected_crypto(&self) -> Option<&CryptoData> {
        let id = self.selected_crypto.as_ref()?;
        self.market.iter().find(|coin| &coin.id == id)
    }

    pub fn chart_points(&self) -> Option<&[ChartDataPoint]> {
        let chart = self.chart.as_ref()?;
        if Some(&chart.coin_id) != self.selected_crypto.as_ref() {
            return None;
        }
        chart.points.as_deref()
    }
}
