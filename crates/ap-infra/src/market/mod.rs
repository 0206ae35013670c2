mod coingecko;

pub use coingecko::{CoinGeckoClient, DEFAULT_COINGECKO_BASE_URL};
