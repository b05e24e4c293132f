use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use super::{OrderBookSnapshot, TradeEvent};
use crate::values::Timestamp;

/// One poll of the market: book plus trades seen since the previous poll.
///
/// Wire form is flat: `{ "bids": [...], "asks": [...], "trades": [...] }`.
/// Missing arrays are empty; malformed trade entries are dropped one by one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(flatten)]
    pub book: OrderBookSnapshot,
    #[serde(default, deserialize_with = "lenient_trades")]
    pub trades: Vec<TradeEvent>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTrade {
    Trade(TradeEvent),
    Malformed(IgnoredAny),
}

fn lenient_trades<'de, D>(deserializer: D) -> Result<Vec<TradeEvent>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<RawTrade>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|trade| match trade {
            RawTrade::Trade(trade) => Some(trade),
            RawTrade::Malformed(_) => None,
        })
        .collect())
}

impl MarketSnapshot {
    pub fn new(book: OrderBookSnapshot, trades: Vec<TradeEvent>) -> Self {
        Self { book, trades }
    }

    /// Book-only snapshot
    pub fn from_book(book: OrderBookSnapshot) -> Self {
        Self::new(book, Vec::new())
    }

    pub fn timestamp(&self) -> Option<Timestamp> {
        self.book.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TradeSide;
    use rust_decimal_macros::dec;

    #[test]
    fn test_missing_arrays_are_empty() {
        let snapshot: MarketSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.book.bids.is_empty());
        assert!(snapshot.book.asks.is_empty());
        assert!(snapshot.trades.is_empty());
    }

    #[test]
    fn test_malformed_trades_are_skipped() {
        let json = r#"{
            "bids": [["100", "1"]],
            "asks": [["101", "2"]],
            "trades": [
                {"side": "buy", "size": "5"},
                {"side": "sideways", "size": "1"},
                {"size": "1"},
                42,
                {"side": "sell", "sz": "3"}
            ]
        }"#;
        let snapshot: MarketSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.trades.len(), 2);
        assert_eq!(snapshot.trades[0].side, TradeSide::Buy);
        assert_eq!(snapshot.trades[1].signed_size(), dec!(-3));
        assert_eq!(snapshot.book.best_ask().unwrap().size, dec!(2));
    }
}
