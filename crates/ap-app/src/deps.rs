//! # Application Dependencies / 应用依赖
//!
//! Parameter grouping for [`crate::AppViewModel`] construction. Not a
//! builder: no defaults and no hidden logic. Defaults are resolved by the
//! host before these structs are filled in.

use std::sync::Arc;
use std::time::Duration;

use ap_core::ports::{ClockPort, DocumentStorePort, GenerativePort, MarketDataPort};
use ap_core::user::User;

use crate::usecases::SeedGuard;

/// Port implementations.
/// 端口实现。
pub struct AppDeps {
    pub store: Arc<dyn DocumentStorePort>,
    pub market: Arc<dyn MarketDataPort>,
    pub generative: Arc<dyn GenerativePort>,
    pub clock: Arc<dyn ClockPort>,
}

/// Resolved runtime settings.
/// 运行时设置。
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub user: User,
    pub market_refresh_interval: Duration,
    /// Shared by every view-model built in this process.
    pub seed_guard: Arc<SeedGuard>,
}
