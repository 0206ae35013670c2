//! Market data records and their derived views (ticker, price chart).

pub mod chart;
pub mod ticker;

use serde::{Deserialize, Serialize};

use crate::ids::CoinId;

/// One coin of the market snapshot. The whole snapshot is replaced on
/// every refresh, never merged field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoData {
    pub id: CoinId,
    pub name: String,
    pub symbol: String,
    /// USD.
    pub price: f64,
    /// Signed percentage over the last 24 hours.
    pub change24h: f64,
    pub image: String,
}

/// `(timestamp ms, price)`, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint(pub i64, pub f64);

impl ChartDataPoint {
    pub fn timestamp_ms(&self) -> i64 {
        self.0
    }

    pub fn price(&self) -> f64 {
        self.1
    }
}

pub use chart::{ChartFrame, ChartGeometry, PlotPoint};
pub use ticker::{format_change, format_usd, Direction, TickerItem};
