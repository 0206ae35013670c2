use serde::Serialize;

use super::CryptoData;
use crate::format::group_digits;
use crate::ids::CoinId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn of(change: f64) -> Self {
        if change >= 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Display form of one ticker entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerItem {
    pub coin_id: CoinId,
    pub name: String,
    pub symbol: String,
    pub price: String,
    pub change: String,
    pub direction: Direction,
}

impl From<&CryptoData> for TickerItem {
    fn from(coin: &CryptoData) -> Self {
        Self {
            coin_id: coin.id.clone(),
            name: coin.name.clone(),
            symbol: coin.symbol.clone(),
            price: format_usd(coin.price),
            change: format_change(coin.change24h),
            direction: Direction::of(coin.change24h),
        }
    }
}

/// USD with digit grouping: two decimals above one dollar, up to six below.
pub fn format_usd(price: f64) -> String {
    let sign = if price < 0.0 { "-" } else { "" };
    let abs = price.abs();
    let fixed = if abs > 1.0 {
        format!("{abs:.2}")
    } else {
        trim_fraction(format!("{abs:.6}"), 2)
    };
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    if frac_part.is_empty() {
        format!("{sign}${}", group_digits(int_part))
    } else {
        format!("{sign}${}.{frac_part}", group_digits(int_part))
    }
}

fn trim_fraction(mut fixed: String, min_decimals: usize) -> String {
    if let Some(dot) = fixed.find('.') {
        while fixed.len() > dot + 1 + min_decimals && fixed.ends_with('0') {
            fixed.pop();
        }
    }
    fixed
}

/// `-1.23%`.
pub fn format_change(change: f64) -> String {
    format!("{change:.2}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd_above_one_dollar() {
        assert_eq!(format_usd(67234.5), "$67,234.50");
        assert_eq!(format_usd(1.005), "$1.00");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
    }

    #[test]
    fn test_format_usd_below_one_dollar_keeps_precision() {
        assert_eq!(format_usd(0.5), "$0.50");
        assert_eq!(format_usd(0.123456789), "$0.123457");
        assert_eq!(format_usd(0.00001234), "$0.000012");
        assert_eq!(format_usd(1.0), "$1.00");
    }

    #[test]
    fn test_ticker_item_from_coin() {
        let coin = CryptoData {
            id: "bitcoin".into(),
            name: "Bitcoin".into(),
            symbol: "BTC".into(),
            price: 65000.0,
            change24h: -2.346,
            image: "https://img/btc.png".into(),
        };
        let item = TickerItem::from(&coin);
        assert_eq!(item.price, "$65,000.00");
        assert_eq!(item.change, "-2.35%");
        assert_eq!(item.direction, Direction::Down);
    }

    #[test]
    fn test_zero_change_counts_as_up() {
        assert_eq!(Direction::of(0.0), Direction::Up);
    }
}
