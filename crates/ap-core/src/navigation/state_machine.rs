//! Route state machine.
//!
//! Pure transition function over the active view; side effects are
//! returned as actions for the caller to execute.

use crate::ids::PostId;
use crate::post::NewPost;

/// Active view.
///
/// 当前视图。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Dashboard,
    Posts,
    PostDetail,
    CreatePost,
    TodoList,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Posts,
        View::PostDetail,
        View::CreatePost,
        View::TodoList,
    ];

    pub fn name(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Posts => "posts",
            View::PostDetail => "post-detail",
            View::CreatePost => "create-post",
            View::TodoList => "todo-list",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Routing state: the active view plus the selected post, if any.
///
/// 路由状态。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteState {
    pub view: View,
    pub selected_post_id: Option<PostId>,
}

/// Events that drive routing.
///
/// 驱动路由的事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteEvent {
    /// Switch to a view. Always clears the selected post.
    Navigate(View),
    /// Open a post's detail view.
    SelectPost(PostId),
    /// Leave the detail view.
    Back,
    /// Leave the create form without saving.
    CancelCreate,
    /// Submit the create form.
    SavePost(NewPost),
}

/// Side effects produced by transitions.
///
/// 状态迁移产生的副作用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    IncrementViews(PostId),
    CreatePost(NewPost),
}

/// Pure route state machine.
///
/// 纯状态机：不包含副作用。
pub struct ViewRouter;

impl ViewRouter {
    pub fn transition(state: RouteState, event: RouteEvent) -> (RouteState, Vec<RouteAction>) {
        match (state.view, event) {
            (_, RouteEvent::Navigate(view)) => (
                RouteState {
                    view,
                    selected_post_id: None,
                },
                Vec::new(),
            ),
            (_, RouteEvent::SelectPost(id)) => (
                RouteState {
                    view: View::PostDetail,
                    selected_post_id: Some(id.clone()),
                },
                vec![RouteAction::IncrementViews(id)],
            ),
            (View::PostDetail, RouteEvent::Back) => (RouteState::default(), Vec::new()),
            (View::CreatePost, RouteEvent::CancelCreate) => (RouteState::default(), Vec::new()),
            (View::CreatePost, RouteEvent::SavePost(post)) => {
                (RouteState::default(), vec![RouteAction::CreatePost(post)])
            }
            (_, _) => (state, Vec::new()),
        }
    }
}
