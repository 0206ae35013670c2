//! Use cases
//!
//! Writes go to the document store; reads arrive through the stream
//! adapters. Generation and market calls are single-shot.

pub mod backend_config;
pub mod compose;
pub mod create_post;
pub mod increment_post_view;
pub mod market;
pub mod research;
pub mod seed_posts;
pub mod todos;

pub use backend_config::{check_backend_config, BackendConfigError, PLACEHOLDER_API_KEY};
pub use compose::ComposePost;
pub use create_post::CreatePost;
pub use increment_post_view::IncrementPostView;
pub use market::{LoadChart, RefreshMarket};
pub use research::ResearchTopic;
pub use seed_posts::{SeedGuard, SeedOutcome, SeedPosts};
pub use todos::TodoCommands;
