//! Pure book calculations
//!
//! Stateless functions over a single snapshot. Each input struct knows how to
//! compute its own signal; `None` marks an undefined result.

use microflow_core::{OrderBookSnapshot, Price, Quantity, TopOfBook};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Imbalance reported when it is undefined
pub const NEUTRAL_IMBALANCE: f64 = 0.5;

/// Collection of pure order-book calculations
pub struct Calculations;

impl Calculations {
    /// Top-N imbalance of `book`, clamped to `[floor, ceiling]`.
    /// Neutral for an empty or one-sided book.
    pub fn imbalance(book: &OrderBookSnapshot, levels: usize, floor: f64, ceiling: f64) -> f64 {
        if book.bids.is_empty() || book.asks.is_empty() {
            return NEUTRAL_IMBALANCE;
        }
        Imbalance::from_book(book, levels)
            .ratio()
            .map(|ratio| ratio.clamp(floor, ceiling))
            .unwrap_or(NEUTRAL_IMBALANCE)
    }

    /// Spread as a percent of mid, `None` for a degenerate book
    pub fn spread_pct(book: &OrderBookSnapshot) -> Option<f64> {
        book.top_of_book().and_then(|top| Spread::from(top).pct())
    }
}

/// Input for imbalance calculation
#[derive(Debug, Clone)]
pub struct Imbalance {
    pub bid_volume: Quantity,
    pub ask_volume: Quantity,
}

impl Imbalance {
    pub fn new(bid_volume: Quantity, ask_volume: Quantity) -> Self {
        Self {
            bid_volume,
            ask_volume,
        }
    }

    /// Sum the top `levels` on each side of `book`
    pub fn from_book(book: &OrderBookSnapshot, levels: usize) -> Self {
        Self::new(book.bid_depth(levels), book.ask_depth(levels))
    }

    /// Bid share of total volume in `[0, 1]`, `None` when there is no volume
    pub fn ratio(&self) -> Option<f64> {
        let bid = self.bid_volume.max(Decimal::ZERO);
        let ask = self.ask_volume.max(Decimal::ZERO);
        let total = bid + ask;
        if total <= Decimal::ZERO {
            return None;
        }
        (bid / total).to_f64()
    }

    /// Returns true if bids outweigh asks
    pub fn is_buying_pressure(&self) -> bool {
        self.bid_volume > self.ask_volume
    }
}

/// Input for spread calculation
#[derive(Debug, Clone)]
pub struct Spread {
    pub best_bid: Price,
    pub best_ask: Price,
}

impl Spread {
    pub fn new(best_bid: Price, best_ask: Price) -> Self {
        Self { best_bid, best_ask }
    }

    /// Absolute spread
    pub fn absolute(&self) -> Price {
        self.best_ask - self.best_bid
    }

    pub fn mid(&self) -> Price {
        (self.best_bid + self.best_ask) / Decimal::TWO
    }

    /// `(ask - bid) / mid * 100`, defined only for an uncrossed book with a positive mid
    pub fn pct(&self) -> Option<f64> {
        if self.best_bid >= self.best_ask {
            return None;
        }
        let mid = self.mid();
        if mid <= Decimal::ZERO {
            return None;
        }
        (self.absolute() / mid * Decimal::ONE_HUNDRED).to_f64()
    }
}

impl From<TopOfBook> for Spread {
    fn from(top: TopOfBook) -> Self {
        Self::new(top.best_bid, top.best_ask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn book(bids: &[(Decimal, Decimal)], asks: &[(Decimal, Decimal)]) -> OrderBookSnapshot {
        OrderBookSnapshot::from_pairs(bids, asks)
    }

    #[test]
    fn test_imbalance_top_three_levels() {
        let book = book(
            &[(dec!(99), dec!(3)), (dec!(98), dec!(2)), (dec!(97), dec!(1)), (dec!(96), dec!(100))],
            &[(dec!(101), dec!(1)), (dec!(102), dec!(1)), (dec!(103), dec!(2))],
        );

        // level four on the bid side is ignored: 6 / (6 + 4)
        let imbalance = Calculations::imbalance(&book, 3, 0.01, 0.99);
        assert!((imbalance - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_imbalance_is_clamped() {
        let book = book(&[(dec!(99), dec!(1000))], &[(dec!(101), dec!(0.001))]);
        assert_eq!(Calculations::imbalance(&book, 3, 0.01, 0.99), 0.99);

        let book = self::book(&[(dec!(99), dec!(0.001))], &[(dec!(101), dec!(1000))]);
        assert_eq!(Calculations::imbalance(&book, 3, 0.01, 0.99), 0.01);
    }

    #[test]
    fn test_imbalance_neutral_for_empty_or_one_sided_book() {
        assert_eq!(Calculations::imbalance(&OrderBookSnapshot::default(), 3, 0.01, 0.99), 0.5);

        let bids_only = book(&[(dec!(99), dec!(5))], &[]);
        assert_eq!(Calculations::imbalance(&bids_only, 3, 0.01, 0.99), 0.5);

        let no_volume = book(&[(dec!(99), dec!(0))], &[(dec!(101), dec!(0))]);
        assert_eq!(Calculations::imbalance(&no_volume, 3, 0.01, 0.99), 0.5);
    }

    #[test]
    fn test_zero_volume_side_clamps_to_bound() {
        let zero_asks = book(&[(dec!(99), dec!(5))], &[(dec!(101), dec!(0))]);
        assert_eq!(Calculations::imbalance(&zero_asks, 3, 0.01, 0.99), 0.99);

        let zero_bids = book(&[(dec!(99), dec!(0))], &[(dec!(101), dec!(5))]);
        assert_eq!(Calculations::imbalance(&zero_bids, 3, 0.01, 0.99), 0.01);

        assert_eq!(Imbalance::new(dec!(0), dec!(0)).ratio(), None);
        assert_eq!(Imbalance::new(dec!(2), dec!(0)).ratio(), Some(1.0));
    }

    #[test]
    fn test_spread_pct() {
        let book = book(&[(dec!(99.99), dec!(1))], &[(dec!(100.01), dec!(1))]);
        let spread = Calculations::spread_pct(&book).unwrap();
        assert!((spread - 0.02).abs() < 1e-12);
        assert!(spread >= 0.0);
    }

    #[test]
    fn test_spread_undefined_for_crossed_or_locked_book() {
        let crossed = book(&[(dec!(101), dec!(1))], &[(dec!(100), dec!(1))]);
        assert_eq!(Calculations::spread_pct(&crossed), None);

        let locked = book(&[(dec!(100), dec!(1))], &[(dec!(100), dec!(1))]);
        assert_eq!(Calculations::spread_pct(&locked), None);

        assert_eq!(Spread::new(dec!(100), dec!(100)).pct(), None);
    }
}
