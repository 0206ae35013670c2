//! # ap-infra
//!
//! Adapters for the ports declared in `ap-core`.

pub mod ai;
pub mod market;
pub mod store;
pub mod time;

pub use ai::{GeminiClient, GeminiSettings};
pub use market::CoinGeckoClient;
pub use store::InMemoryDocumentStore;
pub use time::SystemClock;
