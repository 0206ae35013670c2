//! # ap-core
//!
//! Domain models, pure derivations and port traits for the Astra Phoenix
//! content dashboard.
//!
//! This crate performs no I/O.

pub mod config;
pub mod format;
pub mod ids;
pub mod markdown;
pub mod market;
pub mod navigation;
pub mod ports;
pub mod post;
pub mod research;
pub mod stream;
pub mod todo;
pub mod user;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use ids::{CoinId, PostId, TodoId, UserId};
pub use market::{ChartDataPoint, CryptoData};
pub use navigation::{RouteAction, RouteEvent, RouteState, View, ViewRouter};
pub use post::{NewPost, Post, PostDraft};
pub use research::{ResearchHistory, SearchResult, Source};
pub use stream::{DeliveryGate, Subscription};
pub use todo::Todo;
pub use user::{Role, User};
