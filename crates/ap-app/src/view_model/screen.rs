//! Screen composition.
//!
//! Turns a [`ViewState`] into a presentation-ready [`Frame`]. Pure: the same
//! state always yields the same frame.

use serde::Serialize;

use ap_core::format::{first_name, group_thousands, long_date, short_date, snippet};
use ap_core::ids::{PostId, TodoId};
use ap_core::markdown::{self, Block};
use ap_core::market::{ChartFrame, ChartGeometry, TickerItem};
use ap_core::navigation::View;
use ap_core::post::{CategoryFilter, Post};
use ap_core::research::SearchResult;
use ap_core::todo::sorted_for_display;
use ap_core::user::User;

use super::panels::{ComposeStep, ResearchTab};
use super::state::ViewState;

const DASHBOARD_SNIPPET_CHARS: usize = 150;
const CARD_SNIPPET_CHARS: usize = 100;
pub const NO_POSTS_IN_CATEGORY: &str = "No posts found in this category.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub header: Header,
    /// `None` hides the ticker (empty market snapshot).
    pub ticker: Option<Vec<TickerItem>>,
    pub screen: Screen,
    pub research: Option<ResearchView>,
    pub chart: Option<ChartView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub label: &'static str,
    pub view: View,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub title: &'static str,
    pub user_name: String,
    pub avatar_url: String,
    pub nav: Vec<NavEntry>,
}

/// One variant per [`View`]; adding a view without a screen does not compile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "kebab-case")]
pub enum Screen {
    Dashboard(DashboardScreen),
    Posts(PostListScreen),
    /// `None` when the selected post is not in the current snapshot.
    PostDetail(Option<PostDetailScreen>),
    CreatePost(CreatePostScreen),
    TodoList(TodoListScreen),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestPostCard {
    pub id: PostId,
    pub title: String,
    pub category: String,
    pub views: u64,
    pub date: String,
    pub image_url: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentPostRow {
    pub id: PostId,
    pub title: String,
    pub category: String,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBar {
    pub name: String,
    pub count: usize,
    /// Relative to the largest category, `0.0..=1.0`.
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardScreen {
    pub greeting: String,
    pub stats: Vec<StatCard>,
    pub latest: Option<LatestPostCard>,
    pub recent: Vec<RecentPostRow>,
    pub categories: Vec<CategoryBar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChip {
    pub filter: CategoryFilter,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCard {
    pub id: PostId,
    pub title: String,
    pub category: String,
    pub views: u64,
    pub date: String,
    pub image_url: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostListScreen {
    pub filters: Vec<FilterChip>,
    pub cards: Vec<PostCard>,
    pub empty_message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDetailScreen {
    pub id: PostId,
    pub title: String,
    pub category: String,
    pub views: u64,
    pub date: String,
    pub image_url: String,
    pub body: Vec<Block>,
    /// Escaped HTML rendering of `body`.
    pub body_html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePostScreen {
    pub topic: String,
    pub ideas: Vec<String>,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub category: String,
    pub can_generate_ideas: bool,
    pub can_write_content: bool,
    pub can_generate_image: bool,
    pub generating_ideas: bool,
    pub generating_content: bool,
    pub generating_image: bool,
    pub can_save: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoRow {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoListScreen {
    pub items: Vec<TodoRow>,
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub query: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchView {
    pub tab: ResearchTab,
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub current: Option<SearchResult>,
    pub history: Vec<HistoryRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub ticker: TickerItem,
    pub loading: bool,
    /// `None` while loading or when the series came back empty.
    pub geometry: Option<ChartGeometry>,
}

const NAV: [(&str, View); 3] = [
    ("Dashboard", View::Dashboard),
    ("Posts", View::Posts),
    ("To-Do List", View::TodoList),
];

pub fn compose_frame(state: &ViewState, user: &User) -> Frame {
    Frame {
        header: header(state.route.view, user),
        ticker: (!state.market.is_empty())
            .then(|| state.market.iter().map(TickerItem::from).collect()),
        screen: screen(state, user),
        research: state.research_open.then(|| research_view(state)),
        chart: chart_view(state),
    }
}

fn header(view: View, user: &User) -> Header {
    Header {
        title: "Astra Phoenix",
        user_name: user.name.clone(),
        avatar_url: user.avatar_url.clone(),
        nav: NAV
            .iter()
            .map(|&(label, target)| NavEntry {
                label,
                view: target,
                active: target == view,
            })
            .collect(),
    }
}

fn screen(state: &ViewState, user: &User) -> Screen {
    match state.route.view {
        View::Dashboard => Screen::Dashboard(dashboard(state, user)),
        View::Posts => Screen::Posts(post_list(state)),
        View::PostDetail => Screen::PostDetail(state.selected_post().map(post_detail)),
        View::CreatePost => Screen::CreatePost(create_post(state)),
        View::TodoList => Screen::TodoList(todo_list(state)),
    }
}

fn dashboard(state: &ViewState, user: &User) -> DashboardScreen {
    let digest = state.posts.digest();
    DashboardScreen {
        greeting: format!("Welcome back, {}!", first_name(&user.name)),
        stats: vec![
            StatCard {
                label: "Total Posts",
                value: group_thousands(digest.stats.total_posts as u64),
            },
            StatCard {
                label: "Unique Categories",
                value: group_thousands(digest.stats.unique_categories as u64),
            },
            StatCard {
                label: "Words Written",
                value: group_thousands(digest.stats.total_words as u64),
            },
        ],
        latest: digest.latest.as_ref().map(|post| LatestPostCard {
            id: post.id.clone(),
            title: post.title.clone(),
            category: post.category.clone(),
            views: post.views,
            date: long_date(&post.created_at),
            image_url: post.image_url.clone(),
            snippet: snippet(&post.content, DASHBOARD_SNIPPET_CHARS),
        }),
        recent: digest
            .recent
            .iter()
            .map(|post| RecentPostRow {
                id: post.id.clone(),
                title: post.title.clone(),
                category: post.category.clone(),
                views: post.views,
            })
            .collect(),
        categories: digest
            .categories
            .iter()
            .map(|c| CategoryBar {
                name: c.name.clone(),
                count: c.count,
                ratio: digest.bar_ratio(c.count),
            })
            .collect(),
    }
}

fn post_card(post: &Post) -> PostCard {
    PostCard {
        id: post.id.clone(),
        title: post.title.clone(),
        category: post.category.clone(),
        views: post.views,
        date: short_date(&post.created_at),
        image_url: post.image_url.clone(),
        snippet: snippet(&post.content, CARD_SNIPPET_CHARS),
    }
}

fn post_list(state: &ViewState) -> PostListScreen {
    let posts = state.posts.posts();
    let cards: Vec<PostCard> = state
        .post_filter
        .apply(posts)
        .into_iter()
        .map(post_card)
        .collect();
    PostListScreen {
        filters: CategoryFilter::available(posts)
            .into_iter()
            .map(|filter| FilterChip {
                active: filter == state.post_filter,
                filter,
            })
            .collect(),
        empty_message: cards.is_empty().then_some(NO_POSTS_IN_CATEGORY),
        cards,
    }
}

fn post_detail(post: &Post) -> PostDetailScreen {
    let body = markdown::parse(&post.content);
    PostDetailScreen {
        id: post.id.clone(),
        title: post.title.clone(),
        category: post.category.clone(),
        views: post.views,
        date: long_date(&post.created_at),
        image_url: post.image_url.clone(),
        body_html: markdown::to_html(&body),
        body,
    }
}

fn create_post(state: &ViewState) -> CreatePostScreen {
    let form = &state.create_form;
    CreatePostScreen {
        topic: form.topic.clone(),
        ideas: form.ideas.clone(),
        title: form.draft.title.clone(),
        content: form.draft.content.clone(),
        image_url: form.draft.image_url.clone(),
        category: form.draft.category.clone(),
        can_generate_ideas: form.can_run(ComposeStep::Ideas),
        can_write_content: form.can_run(ComposeStep::Content),
        can_generate_image: form.can_run(ComposeStep::Image),
        generating_ideas: form.generating_ideas,
        generating_content: form.generating_content,
        generating_image: form.generating_image,
        can_save: form.can_save(),
        error: form.error.clone(),
    }
}

fn todo_list(state: &ViewState) -> TodoListScreen {
    let items: Vec<TodoRow> = sorted_for_display(&state.todos)
        .into_iter()
        .map(|todo| TodoRow {
            id: todo.id,
            text: todo.text,
            completed: todo.completed,
        })
        .collect();
    TodoListScreen {
        remaining: items.iter().filter(|item| !item.completed).count(),
        items,
    }
}

fn research_view(state: &ViewState) -> ResearchView {
    let panel = &state.research;
    ResearchView {
        tab: panel.tab,
        query: panel.query.clone(),
        loading: panel.loading,
        error: panel.error.clone(),
        current: panel.current.clone(),
        history: state
            .history
            .entries()
            .iter()
            .map(|entry| HistoryRow {
                query: entry.query.clone(),
                summary: snippet(&entry.summary, CARD_SNIPPET_CHARS),
            })
            .collect(),
    }
}

fn chart_view(state: &ViewState) -> Option<ChartView> {
    let coin = state.selected_crypto()?;
    let points = state.chart_points();
    Some(ChartView {
        ticker: TickerItem::from(coin),
        loading: points.is_none(),
        geometry: points.and_then(|points| ChartGeometry::project(points, ChartFrame::default())),
    })
}
