//! Blog post domain: the record, the create-post draft, and everything
//! derived from a posts snapshot.

mod filter;
mod model;
pub mod seed;
pub mod stats;

pub use filter::CategoryFilter;
pub use model::{fields, DraftError, DraftField, NewPost, Post, PostDraft};
pub use seed::{SeedPost, STARTER_POSTS};
pub use stats::{CategoryCount, DashboardStats, PostDigest};
