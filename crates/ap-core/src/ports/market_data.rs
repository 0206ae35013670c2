use async_trait::async_trait;

use crate::ids::CoinId;
use crate::market::{ChartDataPoint, CryptoData};

/// Market-data gateway.
///
/// Both calls are one-shot and never fail: any transport, status or decode
/// problem yields an empty sequence. Callers treat empty as "nothing to show".
///
/// 行情数据端口：失败时返回空序列，不返回错误。
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    async fn fetch_market_snapshot(&self) -> Vec<CryptoData>;

    /// Daily series for the last 30 days, in chronological order.
    async fn fetch_chart_series(&self, coin_id: &CoinId) -> Vec<ChartDataPoint>;
}
