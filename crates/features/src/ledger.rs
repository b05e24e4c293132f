use chrono::Duration;
use microflow_core::{Quantity, Timestamp, TradeEvent, TradeSide};
use rust_decimal::Decimal;

use crate::window::RollingWindow;

/// Signed trade sizes inside a trailing time window, with a running sum
#[derive(Debug, Clone)]
pub struct TradeLedger {
    window: RollingWindow<Quantity>,
    /// Sum of every signed size currently in `window`
    sum: Decimal,
    buy_count: u64,
    sell_count: u64,
}

impl TradeLedger {
    pub fn new(delta_window: Duration) -> Self {
        Self {
            window: RollingWindow::with_max_age(delta_window),
            sum: Decimal::ZERO,
            buy_count: 0,
            sell_count: 0,
        }
    }

    /// Record a trade at `now`. Returns false, leaving the ledger untouched,
    /// if the trade has a non-positive size.
    pub fn record(&mut self, trade: &TradeEvent, now: Timestamp) -> bool {
        if !trade.is_valid() {
            return false;
        }
        let signed = trade.signed_size();
        self.window.push(now, signed);
        self.sum += signed;
        match trade.side {
            TradeSide::Buy => self.buy_count += 1,
            TradeSide::Sell => self.sell_count += 1,
        }
        true
    }

    /// Drop entries older than the window
    pub fn evict(&mut self, now: Timestamp) -> usize {
        let mut evicted = 0;
        while let Some(entry) = self.window.pop_expired(now) {
            self.sum -= entry.value;
            evicted += 1;
        }
        evicted
    }

    /// Net signed volume currently in the window
    #[inline]
    pub fn cumulative_delta(&self) -> Quantity {
        self.sum
    }

    /// Accepted buy trades since creation
    #[inline]
    pub fn buy_count(&self) -> u64 {
        self.buy_count
    }

    /// Accepted sell trades since creation
    #[inline]
    pub fn sell_count(&self) -> u64 {
        self.sell_count
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cumulative_delta_and_expiry() {
        let t0 = Utc::now();
        let mut ledger = TradeLedger::new(Duration::seconds(20));

        ledger.record(&TradeEvent::buy(dec!(5)), t0);
        ledger.record(&TradeEvent::sell(dec!(3)), t0 + Duration::seconds(1));
        ledger.record(&TradeEvent::buy(dec!(2)), t0 + Duration::seconds(2));
        ledger.evict(t0 + Duration::seconds(2));
        assert_eq!(ledger.cumulative_delta(), dec!(4));

        // first trade ages out, the other two stay
        ledger.evict(t0 + Duration::milliseconds(20_500));
        assert_eq!(ledger.cumulative_delta(), dec!(-1));

        ledger.evict(t0 + Duration::seconds(30));
        assert_eq!(ledger.cumulative_delta(), Decimal::ZERO);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_rejects_non_positive_sizes() {
        let now = Utc::now();
        let mut ledger = TradeLedger::new(Duration::seconds(20));

        assert!(!ledger.record(&TradeEvent::buy(dec!(0)), now));
        assert!(!ledger.record(&TradeEvent::sell(dec!(-1)), now));
        assert!(ledger.record(&TradeEvent::sell(dec!(1.5)), now));

        assert_eq!(ledger.cumulative_delta(), dec!(-1.5));
        assert_eq!(ledger.buy_count(), 0);
        assert_eq!(ledger.sell_count(), 1);
    }
}
