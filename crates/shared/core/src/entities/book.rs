use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::values::{Price, Quantity, Timestamp};

/// A single aggregated price level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookLevel {
    pub price: Price,
    pub size: Quantity,
}

impl BookLevel {
    pub fn new(price: Price, size: Quantity) -> Self {
        Self { price, size }
    }
}

impl Serialize for BookLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.price)?;
        tuple.serialize_element(&self.size)?;
        tuple.end()
    }
}

/// Wire shapes accepted for a level: `[price, size, ...]` or `{price, size}`.
/// Anything else is skipped rather than failing the whole snapshot.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLevel {
    Array(Vec<Decimal>),
    Object { price: Decimal, size: Decimal },
    Malformed(IgnoredAny),
}

impl RawLevel {
    fn into_level(self) -> Option<BookLevel> {
        match self {
            RawLevel::Array(values) if values.len() >= 2 => {
                Some(BookLevel::new(values[0], values[1]))
            }
            RawLevel::Object { price, size } => Some(BookLevel::new(price, size)),
            _ => None,
        }
    }
}

fn lenient_levels<'de, D>(deserializer: D) -> Result<Vec<BookLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<RawLevel>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(RawLevel::into_level)
        .collect())
}

impl<'de> Deserialize<'de> for BookLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawLevel::deserialize(deserializer)?
            .into_level()
            .ok_or_else(|| serde::de::Error::custom("expected [price, size] or {price, size}"))
    }
}

/// Best bid and best ask of a non-degenerate book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopOfBook {
    pub best_bid: Price,
    pub best_ask: Price,
}

impl TopOfBook {
    /// Mid price between best bid and best ask
    pub fn mid(&self) -> Price {
        (self.best_bid + self.best_ask) / Decimal::TWO
    }

    /// Absolute spread
    pub fn spread(&self) -> Price {
        self.best_ask - self.best_bid
    }
}

/// Top-of-book snapshot: bids descending, asks ascending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    #[serde(default, deserialize_with = "lenient_levels")]
    pub bids: Vec<BookLevel>,
    #[serde(default, deserialize_with = "lenient_levels")]
    pub asks: Vec<BookLevel>,
    /// Exchange-reported snapshot time, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

impl OrderBookSnapshot {
    pub fn new(bids: Vec<BookLevel>, asks: Vec<BookLevel>) -> Self {
        Self {
            bids,
            asks,
            timestamp: None,
        }
    }

    /// Build from `(price, size)` pairs
    pub fn from_pairs(bids: &[(Price, Quantity)], asks: &[(Price, Quantity)]) -> Self {
        let to_levels = |pairs: &[(Price, Quantity)]| {
            pairs
                .iter()
                .map(|&(price, size)| BookLevel::new(price, size))
                .collect()
        };
        Self::new(to_levels(bids), to_levels(asks))
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn best_bid(&self) -> Option<&BookLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&BookLevel> {
        self.asks.first()
    }

    /// Best bid/ask when the book is usable: both sides present, positive
    /// prices and `best_bid < best_ask`. `None` means the book is degenerate.
    pub fn top_of_book(&self) -> Option<TopOfBook> {
        let best_bid = self.best_bid()?.price;
        let best_ask = self.best_ask()?.price;
        if best_bid <= Decimal::ZERO || best_bid >= best_ask {
            return None;
        }
        Some(TopOfBook { best_bid, best_ask })
    }

    /// Returns true if the snapshot must not update derived price state
    pub fn is_degenerate(&self) -> bool {
        self.top_of_book().is_none()
    }

    /// Total bid size over the top `levels` levels (non-positive sizes ignored)
    pub fn bid_depth(&self, levels: usize) -> Quantity {
        depth(&self.bids, levels)
    }

    /// Total ask size over the top `levels` levels (non-positive sizes ignored)
    pub fn ask_depth(&self, levels: usize) -> Quantity {
        depth(&self.asks, levels)
    }
}

fn depth(side: &[BookLevel], levels: usize) -> Quantity {
    side.iter()
        .take(levels)
        .map(|level| level.size)
        .filter(|size| *size > Decimal::ZERO)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_top_of_book_valid() {
        let book = OrderBookSnapshot::from_pairs(
            &[(dec!(100), dec!(1)), (dec!(99), dec!(2))],
            &[(dec!(101), dec!(1))],
        );
        let top = book.top_of_book().unwrap();
        assert_eq!(top.mid(), dec!(100.5));
        assert_eq!(top.spread(), dec!(1));
        assert!(!book.is_degenerate());
    }

    #[test]
    fn test_degenerate_books() {
        let crossed = OrderBookSnapshot::from_pairs(&[(dec!(101), dec!(1))], &[(dec!(100), dec!(1))]);
        let locked = OrderBookSnapshot::from_pairs(&[(dec!(100), dec!(1))], &[(dec!(100), dec!(1))]);
        let one_sided = OrderBookSnapshot::from_pairs(&[(dec!(100), dec!(1))], &[]);
        assert!(crossed.is_degenerate());
        assert!(locked.is_degenerate());
        assert!(one_sided.is_degenerate());
        assert!(OrderBookSnapshot::default().is_degenerate());
    }

    #[test]
    fn test_depth_takes_top_levels_only() {
        let book = OrderBookSnapshot::from_pairs(
            &[
                (dec!(100), dec!(1)),
                (dec!(99), dec!(2)),
                (dec!(98), dec!(3)),
                (dec!(97), dec!(100)),
            ],
            &[(dec!(101), dec!(-5)), (dec!(102), dec!(4))],
        );
        assert_eq!(book.bid_depth(3), dec!(6));
        assert_eq!(book.ask_depth(3), dec!(4));
    }

    #[test]
    fn test_lenient_level_parsing() {
        let json = r#"{
            "bids": [["100.5", "1.2", "0", "3"], ["100.4"], {"price": 100.3, "size": 2}],
            "asks": null
        }"#;
        let book: OrderBookSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.bids[0], BookLevel::new(dec!(100.5), dec!(1.2)));
        assert!(book.asks.is_empty());
    }
}
