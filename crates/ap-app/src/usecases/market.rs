//! Market data use cases
//! 行情数据用例

use std::sync::Arc;

use tracing::{debug, info_span, Instrument};

use ap_core::ids::CoinId;
use ap_core::market::{ChartDataPoint, CryptoData};
use ap_core::ports::MarketDataPort;

/// Fetches the ticker snapshot. Empty means "nothing to show".
pub struct RefreshMarket {
    market: Arc<dyn MarketDataPort>,
}

impl RefreshMarket {
    pub fn new(market: Arc<dyn MarketDataPort>) -> Self {
        Self { market }
    }

    pub async fn execute(&self) -> Vec<CryptoData> {
        async {
            let snapshot = self.market.fetch_market_snapshot().await;
            debug!(count = snapshot.len(), "market snapshot refreshed");
            snapshot
        }
        .instrument(info_span!("usecase.refresh_market.execute"))
        .await
    }
}

/// Fetches the 30-day series of one coin.
pub struct LoadChart {
    market: Arc<dyn MarketDataPort>,
}

impl LoadChart {
    pub fn new(market: Arc<dyn MarketDataPort>) -> Self {
        Self { market }
    }

    pub async fn execute(&self, coin_id: &CoinId) -> Vec<ChartDataPoint> {
        self.market
            .fetch_chart_series(coin_id)
            .instrument(info_span!("usecase.load_chart.execute", coin = %coin_id))
            .await
    }
}
