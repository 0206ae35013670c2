//! Application view-model.
//!
//! Owns the in-memory snapshot of everything the UI shows and is the only
//! writer of it. Stream callbacks and the market timer replace collections
//! wholesale; user operations go through the route state machine and the use
//! cases. Every change bumps a revision published on a `watch` channel.
//!
//! 应用视图模型：持有全部界面状态，快照整体替换。

mod panels;
mod screen;
mod session;
mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use ap_core::ids::{CoinId, PostId, TodoId};
use ap_core::market::CryptoData;
use ap_core::navigation::{RouteAction, RouteEvent, RouteState, View, ViewRouter};
use ap_core::ports::DocumentStorePort;
use ap_core::post::{CategoryFilter, Post, PostDigest};
use ap_core::research::{ResearchHistory, SearchResult};
use ap_core::todo::Todo;
use ap_core::user::User;

use crate::deps::{AppDeps, AppSettings};
use crate::streams::{subscribe_posts, subscribe_todos};
use crate::usecases::{
    ComposePost, CreatePost, IncrementPostView, LoadChart, RefreshMarket, ResearchTopic,
    SeedPosts, TodoCommands,
};

pub use panels::{ComposeStep, CreatePostForm, ResearchPanel, ResearchTab};
pub use screen::{
    compose_frame, CategoryBar, ChartView, CreatePostScreen, DashboardScreen, FilterChip, Frame,
    Header, HistoryRow, LatestPostCard, NavEntry, PostCard, PostDetailScreen, PostListScreen,
    RecentPostRow, ResearchView, Screen, StatCard, TodoListScreen, TodoRow, NO_POSTS_IN_CATEGORY,
};
pub use session::ViewModelSession;
pub use state::{ChartSeries, PostsSnapshot, ViewState};

const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

struct Shared {
    state: Mutex<ViewState>,
    revision: watch::Sender<u64>,
    settings: AppSettings,
    store: Arc<dyn DocumentStorePort>,
    create_post: CreatePost,
    increment_view: IncrementPostView,
    seed_posts: SeedPosts,
    todos: TodoCommands,
    refresh_market: RefreshMarket,
    load_chart: LoadChart,
    compose: ComposePost,
    research: ResearchTopic,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate state, then publish a new revision. The lock is released
    /// before subscribers are notified.
    fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        let out = {
            let mut state = self.lock();
            f(&mut state)
        };
        self.revision.send_modify(|rev| *rev += 1);
        out
    }

    fn apply_posts(&self, posts: Vec<Post>) {
        debug!(count = posts.len(), "posts snapshot applied");
        self.update(|state| state.posts = state::PostsSnapshot::new(posts));
    }

    fn apply_todos(&self, todos: Vec<Todo>) {
        debug!(count = todos.len(), "todos snapshot applied");
        self.update(|state| state.todos = Arc::new(todos));
    }

    fn apply_market(&self, market: Vec<CryptoData>) {
        self.update(|state| state.market = Arc::new(market));
    }
}

/// Handle to the view-model. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct AppViewModel {
    shared: Arc<Shared>,
}

impl AppViewModel {
    pub fn new(deps: AppDeps, settings: AppSettings) -> Self {
        let (revision, _) = watch::channel(0);
        let shared = Shared {
            state: Mutex::new(ViewState::default()),
            revision,
            create_post: CreatePost::new(deps.store.clone(), deps.clock.clone()),
            increment_view: IncrementPostView::new(deps.store.clone()),
            seed_posts: SeedPosts::new(
                deps.store.clone(),
                deps.clock.clone(),
                settings.seed_guard.clone(),
            ),
            todos: TodoCommands::new(deps.store.clone()),
            refresh_market: RefreshMarket::new(deps.market.clone()),
            load_chart: LoadChart::new(deps.market.clone()),
            compose: ComposePost::new(deps.generative.clone()),
            research: ResearchTopic::new(deps.generative),
            store: deps.store,
            settings,
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Seed (in the background), subscribe both collections and start the
    /// market refresh loop. Must be called inside a tokio runtime.
    pub fn start(&self) -> ViewModelSession {
        let seeding = {
            let shared = Arc::clone(&self.shared);
            tokio::spawn(async move {
                shared.seed_posts.execute().await;
            })
            .abort_handle()
        };

        let weak = Arc::downgrade(&self.shared);
        let posts = subscribe_posts(self.shared.store.as_ref(), move |posts| {
            if let Some(shared) = weak.upgrade() {
                shared.apply_posts(posts);
            }
        });

        let weak = Arc::downgrade(&self.shared);
        let todos = subscribe_todos(
            self.shared.store.as_ref(),
            &self.shared.settings.user.uid,
            move |todos| {
                if let Some(shared) = weak.upgrade() {
                    shared.apply_todos(todos);
                }
            },
        );

        let weak = Arc::downgrade(&self.shared);
        let period = self
            .shared
            .settings
            .market_refresh_interval
            .max(MIN_REFRESH_INTERVAL);
        let market_timer = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(shared) = weak.upgrade() else {
                    break;
                };
                let snapshot = shared.refresh_market.execute().await;
                shared.apply_market(snapshot);
            }
        })
        .abort_handle();

        info!(
            uid = %self.shared.settings.user.uid,
            refresh_secs = period.as_secs(),
            "view-model session started"
        );
        ViewModelSession::new(posts, todos, market_timer, seeding)
    }

    // ----- read side -----

    pub fn user(&self) -> &User {
        &self.shared.settings.user
    }

    /// Receiver of the revision counter; changes after every state update.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.shared.revision.borrow()
    }

    pub fn frame(&self) -> Frame {
        let state = self.shared.lock();
        compose_frame(&state, &self.shared.settings.user)
    }

    pub fn posts(&self) -> Arc<Vec<Post>> {
        Arc::clone(self.shared.lock().posts.posts())
    }

    pub fn digest(&self) -> Arc<PostDigest> {
        self.shared.lock().posts.digest()
    }

    pub fn todos(&self) -> Arc<Vec<Todo>> {
        Arc::clone(&self.shared.lock().todos)
    }

    pub fn market(&self) -> Arc<Vec<CryptoData>> {
        Arc::clone(&self.shared.lock().market)
    }

    pub fn route(&self) -> RouteState {
        self.shared.lock().route.clone()
    }

    pub fn selected_post(&self) -> Option<Post> {
        self.shared.lock().selected_post().cloned()
    }

    pub fn selected_crypto(&self) -> Option<CryptoData> {
        self.shared.lock().selected_crypto().cloned()
    }

    pub fn history(&self) -> ResearchHistory {
        self.shared.lock().history.clone()
    }

    pub fn create_form(&self) -> CreatePostForm {
        self.shared.lock().create_form.clone()
    }

    pub fn research_panel(&self) -> Option<ResearchPanel> {
        let state = self.shared.lock();
        state.research_open.then(|| state.research.clone())
    }

    // ----- routing -----

    fn route_event(&self, event: RouteEvent) -> Vec<RouteAction> {
        self.shared.update(|state| {
            let left = state.route.view;
            let (next, actions) = ViewRouter::transition(state.route.clone(), event);
            state.route = next;
            if left != state.route.view {
                // Local UI state belongs to the view that owned it.
                match left {
                    View::CreatePost => state.create_form = CreatePostForm::default(),
                    View::Posts => state.post_filter = CategoryFilter::All,
                    View::Dashboard | View::PostDetail | View::TodoList => {}
                }
            }
            actions
        })
    }

    fn spawn_increment(&self, post_id: PostId) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            if let Err(err) = shared.increment_view.execute(&post_id).await {
                warn!(error = %err, "view increment failed");
            }
        })
    }

    pub fn navigate(&self, view: View) {
        self.route_event(RouteEvent::Navigate(view));
    }

    /// Open a post and fire one view increment. The increment is not awaited
    /// and not applied locally; the returned handle is for callers that want
    /// to wait for it.
    pub fn select_post(&self, post_id: PostId) -> Option<JoinHandle<()>> {
        let mut handle = None;
        for action in self.route_event(RouteEvent::SelectPost(post_id)) {
            match action {
                RouteAction::IncrementViews(id) => handle = Some(self.spawn_increment(id)),
                RouteAction::CreatePost(_) => {}
            }
        }
        handle
    }

    pub fn back(&self) {
        self.route_event(RouteEvent::Back);
    }

    pub fn cancel_create(&self) {
        self.route_event(RouteEvent::CancelCreate);
    }

    /// Submit the create form. The view switches to the dashboard before the
    /// write completes; the write result is returned.
    pub async fn save_post(&self) -> Result<PostId> {
        let new_post = self.shared.lock().create_form.draft.to_new_post()?;
        let actions = self.route_event(RouteEvent::SavePost(new_post));

        let mut created = None;
        for action in actions {
            match action {
                RouteAction::CreatePost(post) => {
                    let result = self.shared.create_post.execute(&post).await;
                    if let Err(err) = &result {
                        warn!(error = %err, "post was not saved");
                    }
                    created = Some(result);
                }
                RouteAction::IncrementViews(id) => {
                    self.spawn_increment(id);
                }
            }
        }
        created.unwrap_or_else(|| Err(anyhow!("save is only available from the create-post view")))
    }

    // ----- post list -----

    pub fn set_post_filter(&self, filter: CategoryFilter) {
        self.shared.update(|state| state.post_filter = filter);
    }

    // ----- create-post form -----

    pub fn edit_form(&self, edit: impl FnOnce(&mut CreatePostForm)) {
        self.shared.update(|state| edit(&mut state.create_form));
    }

    pub fn choose_idea(&self, index: usize) -> bool {
        self.shared
            .update(|state| state.create_form.choose_idea(index))
    }

    /// Run one generation step of the form. Returns `false` when the step
    /// could not start (missing input or already running).
    pub async fn run_compose_step(&self, step: ComposeStep) -> bool {
        let Some(input) = self.shared.update(|state| {
            if state.route.view != View::CreatePost {
                return None;
            }
            state.create_form.begin(step)
        }) else {
            return false;
        };

        let compose = &self.shared.compose;
        match step {
            ComposeStep::Ideas => {
                let result = compose.ideas(&input).await;
                self.finish_compose(step, |form| form.finish_ideas(result));
            }
            ComposeStep::Content => {
                let result = compose.content(&input).await;
                self.finish_compose(step, |form| form.finish_content(result));
            }
            ComposeStep::Image => {
                let result = compose.image(&input).await;
                self.finish_compose(step, |form| form.finish_image(result));
            }
        }
        true
    }

    fn finish_compose(&self, step: ComposeStep, finish: impl FnOnce(&mut CreatePostForm)) {
        self.shared.update(|state| {
            // The form was reset if the user left the view meanwhile.
            if state.route.view == View::CreatePost && state.create_form.is_busy(step) {
                finish(&mut state.create_form);
            } else {
                debug!(?step, "discarding generation result for a closed form");
            }
        });
    }

    // ----- todos -----

    pub async fn add_todo(&self, text: &str) -> Result<Option<TodoId>> {
        self.shared
            .todos
            .add(&self.shared.settings.user.uid, text)
            .await
    }

    /// Flip `completed` based on the latest snapshot. `Ok(false)` when the id
    /// is not in the snapshot.
    pub async fn toggle_todo(&self, id: &TodoId) -> Result<bool> {
        let current = self
            .shared
            .lock()
            .todos
            .iter()
            .find(|todo| &todo.id == id)
            .map(|todo| todo.completed);
        let Some(completed) = current else {
            warn!(todo_id = %id, "toggle of unknown todo ignored");
            return Ok(false);
        };
        self.shared
            .todos
            .set_completed(&self.shared.settings.user.uid, id, !completed)
            .await?;
        Ok(true)
    }

    pub async fn delete_todo(&self, id: &TodoId) -> Result<()> {
        self.shared
            .todos
            .delete(&self.shared.settings.user.uid, id)
            .await
    }

    // ----- market -----

    /// One refresh outside the timer.
    pub async fn refresh_market(&self) {
        let snapshot = self.shared.refresh_market.execute().await;
        self.shared.apply_market(snapshot);
    }

    /// Open the chart for `coin_id` and load its series.
    pub async fn select_crypto(&self, coin_id: CoinId) {
        self.shared.update(|state| {
            state.selected_crypto = Some(coin_id.clone());
            state.chart = Some(ChartSeries {
                coin_id: coin_id.clone(),
                points: None,
            });
        });

        let points = self.shared.load_chart.execute(&coin_id).await;
        self.shared.update(|state| match state.chart.as_mut() {
            Some(chart) if chart.coin_id == coin_id => chart.points = Some(points),
            _ => debug!(coin = %coin_id, "chart closed before series arrived"),
        });
    }

    pub fn close_chart(&self) {
        self.shared.update(|state| {
            state.selected_crypto = None;
            state.chart = None;
        });
    }

    // ----- research panel -----

    pub fn open_research(&self) {
        self.shared.update(|state| state.research_open = true);
    }

    /// Closing discards the panel's local state; history is kept.
    pub fn close_research(&self) {
        self.shared.update(|state| {
            state.research_open = false;
            state.research = ResearchPanel::default();
        });
    }

    pub fn set_research_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.shared.update(|state| state.research.query = query);
    }

    pub fn set_research_tab(&self, tab: ResearchTab) {
        self.shared.update(|state| state.research.tab = tab);
    }

    /// Show history entry `index` as the current result.
    pub fn show_history_entry(&self, index: usize) -> bool {
        self.shared.update(|state| match state.history.get(index).cloned() {
            Some(entry) if state.research_open => {
                state.research.show(entry);
                true
            }
            _ => false,
        })
    }

    /// Record a result in the history (newest first, one entry per query).
    pub fn record_search(&self, result: SearchResult) {
        self.shared.update(|state| state.history.record(result));
    }

    /// Run the panel's query. Returns `false` when nothing was started.
    pub async fn search(&self) -> bool {
        let Some(query) = self.shared.update(|state| {
            if !state.research_open {
                return None;
            }
            state.research.begin_search()
        }) else {
            return false;
        };

        let result = self.shared.research.execute(&query).await;
        self.shared.update(|state| {
            if let Ok(found) = &result {
                state.history.record(found.clone());
            }
            if state.research_open && state.research.loading {
                state.research.finish_search(result);
            }
        });
        true
    }
}
