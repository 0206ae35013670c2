use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use ap_app::usecases::{SeedGuard, SeedOutcome, SeedPosts};
use ap_app::view_model::Screen;
use ap_app::{AppDeps, AppSettings, AppViewModel};
use ap_core::ids::CoinId;
use ap_core::market::{ChartDataPoint, CryptoData};
use ap_core::navigation::{RouteState, View};
use ap_core::ports::{
    ClockPort, CollectionPath, Document, DocumentStorePort, GenerationError, GenerationTask,
    GenerativePort, MarketDataPort, StoreError,
};
use ap_core::post::{CategoryFilter, PostDraft};
use ap_core::research::SearchResult;
use ap_core::user::User;
use ap_infra::InMemoryDocumentStore;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 2024-05-10T12:00:00.000Z
const NOW_MS: i64 = 1_715_342_400_000;

struct FixedClock;

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        NOW_MS
    }
}

struct NoMarket;

#[async_trait]
impl MarketDataPort for NoMarket {
    async fn fetch_market_snapshot(&self) -> Vec<CryptoData> {
        Vec::new()
    }

    async fn fetch_chart_series(&self, _coin_id: &CoinId) -> Vec<ChartDataPoint> {
        Vec::new()
    }
}

struct NoGenerative;

#[async_trait]
impl GenerativePort for NoGenerative {
    async fn generate_ideas(&self, _topic: &str) -> Result<Vec<String>, GenerationError> {
        Err(GenerationError::new(GenerationTask::Ideas, "offline"))
    }

    async fn generate_content(&self, _title: &str) -> Result<String, GenerationError> {
        Err(GenerationError::new(GenerationTask::Content, "offline"))
    }

    async fn generate_image(&self, _title: &str) -> Result<String, GenerationError> {
        Err(GenerationError::new(GenerationTask::Image, "offline"))
    }

    async fn research(&self, _query: &str) -> Result<SearchResult, GenerationError> {
        Err(GenerationError::new(GenerationTask::Research, "offline"))
    }
}

fn view_model(store: &InMemoryDocumentStore, guard: Arc<SeedGuard>) -> AppViewModel {
    AppViewModel::new(
        AppDeps {
            store: Arc::new(store.clone()),
            market: Arc::new(NoMarket),
            generative: Arc::new(NoGenerative),
            clock: Arc::new(FixedClock),
        },
        AppSettings {
            user: User::development_admin(),
            market_refresh_interval: Duration::from_secs(60),
            seed_guard: guard,
        },
    )
}

fn post_doc(id: &str, category: &str, created_at: &str) -> Document {
    let fields = json!({
        "title": format!("Post {id}"),
        "content": "alpha beta",
        "imageUrl": "https://img",
        "createdAt": created_at,
        "category": category,
        "views": 0
    });
    match fields {
        serde_json::Value::Object(map) => Document::new(id, map),
        _ => unreachable!(),
    }
}

async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

fn filled_draft() -> PostDraft {
    PostDraft {
        title: "Rust in 2024".into(),
        content: "Ownership **rocks**".into(),
        image_url: "https://img/rust".into(),
        category: "Rust".into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_seeds_empty_store_once() {
    let store = InMemoryDocumentStore::new();
    let guard = Arc::new(SeedGuard::new());
    let vm = view_model(&store, guard.clone());

    let session = vm.start();
    settle().await;

    let posts = vm.posts();
    assert_eq!(posts.len(), 4);
    assert_eq!(posts[0].title, "The Future of AI in Web Development");
    assert!(posts.iter().all(|post| post.views == 0));

    // A second view-model in the same process does not seed again.
    let seed = SeedPosts::new(Arc::new(store.clone()), Arc::new(FixedClock), guard);
    assert_eq!(seed.execute().await, SeedOutcome::AlreadyAttempted);
    session.shutdown();
}

#[tokio::test]
async fn seeding_skips_populated_store_and_reports_failures() {
    let store = InMemoryDocumentStore::new();
    store.put_raw(
        &CollectionPath::posts(),
        post_doc("p1", "AI", "2024-01-01T00:00:00.000Z"),
    );
    let seed = SeedPosts::new(
        Arc::new(store.clone()),
        Arc::new(FixedClock),
        Arc::new(SeedGuard::new()),
    );
    assert_eq!(seed.execute().await, SeedOutcome::AlreadyPopulated);

    let empty = InMemoryDocumentStore::new();
    empty.fail_writes(Some(StoreError::Unavailable("offline".into())));
    let seed = SeedPosts::new(
        Arc::new(empty.clone()),
        Arc::new(FixedClock),
        Arc::new(SeedGuard::new()),
    );
    assert!(matches!(seed.execute().await, SeedOutcome::Failed(_)));
}

#[tokio::test]
async fn posts_state_is_always_the_latest_snapshot() {
    let store = InMemoryDocumentStore::new();
    let path = CollectionPath::posts();
    store.put_raw(&path, post_doc("old", "AI", "2024-01-01T00:00:00.000Z"));
    let vm = view_model(&store, Arc::new(SeedGuard::new()));
    let _session = vm.start();

    store.put_raw(&path, post_doc("new", "Web", "2024-02-01T00:00:00.000Z"));
    let ids: Vec<_> = vm.posts().iter().map(|p| p.id.to_string()).collect();
    assert_eq!(ids, vec!["new", "old"]);

    store.delete(&path, "old").await.unwrap();
    let ids: Vec<_> = vm.posts().iter().map(|p| p.id.to_string()).collect();
    assert_eq!(ids, vec!["new"]);
    assert_eq!(vm.digest().stats.total_posts, 1);
}

#[tokio::test]
async fn select_post_increments_once_and_back_returns_home() {
    let store = InMemoryDocumentStore::new();
    let path = CollectionPath::posts();
    store.put_raw(&path, post_doc("p1", "AI", "2024-01-01T00:00:00.000Z"));
    let vm = view_model(&store, Arc::new(SeedGuard::new()));
    let _session = vm.start();

    vm.navigate(View::Posts);
    let handle = vm.select_post("p1".into()).expect("increment spawned");
    assert_eq!(vm.route().view, View::PostDetail);
    handle.await.unwrap();

    assert_eq!(vm.selected_post().unwrap().views, 1);
    assert_eq!(store.documents(&path)[0].fields["views"], json!(1));

    vm.back();
    assert_eq!(vm.route(), RouteState::default());
    assert!(vm.selected_post().is_none());
}

#[tokio::test]
async fn detail_of_unknown_post_renders_empty() {
    let store = InMemoryDocumentStore::new();
    let vm = view_model(&store, Arc::new(SeedGuard::new()));
    let handle = vm.select_post("missing".into()).unwrap();
    let _ = handle.await;

    assert_eq!(vm.frame().screen, Screen::PostDetail(None));
}

#[tokio::test]
async fn save_writes_post_and_goes_to_dashboard() {
    let store = InMemoryDocumentStore::new();
    let vm = view_model(&store, Arc::new(SeedGuard::new()));

    vm.navigate(View::CreatePost);
    vm.edit_form(|form| form.draft = filled_draft());
    assert!(vm.create_form().can_save());

    let id = vm.save_post().await.unwrap();
    assert_eq!(vm.route().view, View::Dashboard);
    assert_eq!(vm.create_form(), Default::default());

    let docs = store.documents(&CollectionPath::posts());
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, id.as_str());
    assert_eq!(docs[0].fields["createdAt"], json!("2024-05-10T12:00:00.000Z"));
    assert_eq!(docs[0].fields["views"], json!(0));
    assert_eq!(docs[0].fields["imageUrl"], json!("https://img/rust"));
}

#[tokio::test]
async fn failed_save_still_returns_to_dashboard() {
    let store = InMemoryDocumentStore::new();
    store.fail_writes(Some(StoreError::Rejected("permission denied".into())));
    let vm = view_model(&store, Arc::new(SeedGuard::new()));

    vm.navigate(View::CreatePost);
    vm.edit_form(|form| form.draft = filled_draft());

    assert!(vm.save_post().await.is_err());
    assert_eq!(vm.route().view, View::Dashboard);
}

#[tokio::test]
async fn incomplete_draft_cannot_be_saved() {
    let store = InMemoryDocumentStore::new();
    let vm = view_model(&store, Arc::new(SeedGuard::new()));

    vm.navigate(View::CreatePost);
    vm.edit_form(|form| form.draft.title = "Only a title".into());

    let err = vm.save_post().await.unwrap_err();
    assert!(err.to_string().contains("content"));
    assert_eq!(vm.route().view, View::CreatePost);
    assert!(store.documents(&CollectionPath::posts()).is_empty());
}

#[tokio::test]
async fn leaving_a_view_resets_its_local_state() {
    let store = InMemoryDocumentStore::new();
    let vm = view_model(&store, Arc::new(SeedGuard::new()));

    vm.navigate(View::Posts);
    vm.set_post_filter(CategoryFilter::Category("AI".into()));
    vm.navigate(View::CreatePost);
    vm.edit_form(|form| form.topic = "rust".into());
    vm.cancel_create();

    assert_eq!(vm.route().view, View::Dashboard);
    assert_eq!(vm.create_form().topic, "");
    vm.navigate(View::Posts);
    let Screen::Posts(list) = vm.frame().screen else {
        panic!("expected posts screen");
    };
    assert!(list.filters[0].active);
}

#[tokio::test]
async fn todos_are_added_toggled_and_deleted() {
    let store = InMemoryDocumentStore::new();
    let vm = view_model(&store, Arc::new(SeedGuard::new()));
    let _session = vm.start();

    assert_eq!(vm.add_todo("   ").await.unwrap(), None);
    let id = vm.add_todo("  write tests ").await.unwrap().unwrap();
    assert_eq!(vm.todos()[0].text, "write tests");
    assert!(!vm.todos()[0].completed);

    assert!(vm.toggle_todo(&id).await.unwrap());
    assert!(vm.todos()[0].completed);
    assert!(vm.toggle_todo(&id).await.unwrap());
    assert!(!vm.todos()[0].completed);
    assert!(!vm.toggle_todo(&"nope".into()).await.unwrap());

    vm.delete_todo(&id).await.unwrap();
    assert!(vm.todos().is_empty());

    let uid = User::DEVELOPMENT_UID;
    assert!(store.is_empty(&CollectionPath::todos(uid)).await.unwrap());
}

#[tokio::test]
async fn todos_of_other_users_are_invisible() {
    let store = InMemoryDocumentStore::new();
    let vm = view_model(&store, Arc::new(SeedGuard::new()));
    let _session = vm.start();

    let mut fields = serde_json::Map::new();
    fields.insert("text".into(), json!("someone else's"));
    store
        .add(&CollectionPath::todos("other-user"), fields)
        .await
        .unwrap();

    assert!(vm.todos().is_empty());
}

#[tokio::test]
async fn every_change_publishes_a_revision() {
    let store = InMemoryDocumentStore::new();
    let vm = view_model(&store, Arc::new(SeedGuard::new()));
    let mut changes = vm.subscribe();
    let before = vm.revision();

    vm.navigate(View::TodoList);
    changes.changed().await.unwrap();
    assert!(*changes.borrow_and_update() > before);
}

#[tokio::test]
async fn shutdown_releases_listeners() {
    let store = InMemoryDocumentStore::new();
    let vm = view_model(&store, Arc::new(SeedGuard::new()));
    let session = vm.start();
    assert_eq!(store.listener_count(), 2);

    session.shutdown();
    session.shutdown();
    assert!(session.is_closed());
    assert_eq!(store.listener_count(), 0);

    store.put_raw(
        &CollectionPath::posts(),
        post_doc("late", "AI", "2024-01-01T00:00:00.000Z"),
    );
    assert!(vm.posts().iter().all(|p| p.id.as_str() != "late"));
}
