//! CoinGecko market-data gateway.
//!
//! Every failure (transport, non-2xx, body that does not decode) is logged
//! and turned into an empty sequence.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use ap_core::ids::CoinId;
use ap_core::market::{ChartDataPoint, CryptoData};
use ap_core::ports::MarketDataPort;

pub const DEFAULT_COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

const MARKET_PAGE_SIZE: &str = "15";
const CHART_DAYS: &str = "30";

#[derive(Debug, Deserialize)]
struct MarketCoin {
    id: String,
    name: String,
    symbol: String,
    current_price: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    image: Option<String>,
}

impl From<MarketCoin> for CryptoData {
    fn from(coin: MarketCoin) -> Self {
        Self {
            id: CoinId::from(coin.id),
            name: coin.name,
            symbol: coin.symbol.to_uppercase(),
            price: coin.current_price.unwrap_or(0.0),
            change24h: coin.price_change_percentage_24h.unwrap_or(0.0),
            image: coin.image.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<(f64, f64)>,
}

pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("unexpected status {status}"));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| format!("invalid body: {e}"))
    }
}

#[async_trait]
impl MarketDataPort for CoinGeckoClient {
    async fn fetch_market_snapshot(&self) -> Vec<CryptoData> {
        let query = [
            ("vs_currency", "usd"),
            ("order", "market_cap_desc"),
            ("per_page", MARKET_PAGE_SIZE),
            ("page", "1"),
            ("sparkline", "false"),
        ];
        match self.get_json::<Vec<MarketCoin>>("/coins/markets", &query).await {
            Ok(coins) => {
                debug!(count = coins.len(), "market snapshot fetched");
                coins.into_iter().map(CryptoData::from).collect()
            }
            Err(reason) => {
                warn!(%reason, "market snapshot unavailable");
                Vec::new()
            }
        }
    }

    async fn fetch_chart_series(&self, coin_id: &CoinId) -> Vec<ChartDataPoint> {
        let path = format!("/coins/{}/market_chart", coin_id.as_str());
        let query = [
            ("vs_currency", "usd"),
            ("days", CHART_DAYS),
            ("interval", "daily"),
        ];
        match self.get_json::<MarketChart>(&path, &query).await {
            Ok(chart) => chart
                .prices
                .into_iter()
                .map(|(ts, price)| ChartDataPoint(ts as i64, price))
                .collect(),
            Err(reason) => {
                warn!(coin = %coin_id, %reason, "chart series unavailable");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn markets_query() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("vs_currency".into(), "usd".into()),
            Matcher::UrlEncoded("order".into(), "market_cap_desc".into()),
            Matcher::UrlEncoded("per_page".into(), "15".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ])
    }

    #[tokio::test]
    async fn market_snapshot_maps_coins() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/markets")
            .match_query(markets_query())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id":"bitcoin","name":"Bitcoin","symbol":"btc","current_price":67000.5,
                     "price_change_percentage_24h":-1.25,"image":"https://img/btc.png"},
                    {"id":"dust","name":"Dust","symbol":"dst","current_price":null,
                     "price_change_percentage_24h":null,"image":"https://img/dst.png"}
                ]"#,
            )
            .create_async()
            .await;

        let client = CoinGeckoClient::new(server.url()).unwrap();
        let coins = client.fetch_market_snapshot().await;

        mock.assert_async().await;
        assert_eq!(coins.len(), 2);
        assert_eq!(coins[0].id.as_str(), "bitcoin");
        assert_eq!(coins[0].symbol, "BTC");
        assert_eq!(coins[0].price, 67000.5);
        assert_eq!(coins[0].change24h, -1.25);
        assert_eq!(coins[1].price, 0.0);
        assert_eq!(coins[1].change24h, 0.0);
    }

    #[tokio::test]
    async fn market_snapshot_is_empty_on_server_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/coins/markets")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = CoinGeckoClient::new(server.url()).unwrap();
        assert!(client.fetch_market_snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn market_snapshot_is_empty_on_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/coins/markets")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{\"not\":\"a list\"}")
            .create_async()
            .await;

        let client = CoinGeckoClient::new(server.url()).unwrap();
        assert!(client.fetch_market_snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn market_snapshot_is_empty_when_unreachable() {
        let client = CoinGeckoClient::new("http://127.0.0.1:9").unwrap();
        assert!(client.fetch_market_snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn chart_series_keeps_chronological_points() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/bitcoin/market_chart")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("vs_currency".into(), "usd".into()),
                Matcher::UrlEncoded("days".into(), "30".into()),
                Matcher::UrlEncoded("interval".into(), "daily".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"prices":[[1700000000000,100.0],[1700086400000,101.5]]}"#)
            .create_async()
            .await;

        let client = CoinGeckoClient::new(server.url()).unwrap();
        let series = client.fetch_chart_series(&CoinId::from("bitcoin")).await;

        mock.assert_async().await;
        assert_eq!(
            series,
            vec![
                ChartDataPoint(1_700_000_000_000, 100.0),
                ChartDataPoint(1_700_086_400_000, 101.5)
            ]
        );
    }

    #[tokio::test]
    async fn chart_series_is_empty_on_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/coins/nope/market_chart")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let client = CoinGeckoClient::new(server.url()).unwrap();
        assert!(client
            .fetch_chart_series(&CoinId::from("nope"))
            .await
            .is_empty());
    }
}
