//! Synthetic snapshot source - random-walk demo market
//!
//! Generates a five-level book around a random-walk mid with random sizes,
//! plus a few random prints per snapshot. Lets the whole pipeline run
//! without an exchange connection.

use std::sync::Arc;

use microflow_core::{BookLevel, MarketSnapshot, OrderBookSnapshot, Price, TradeEvent, TradeSide};
use microflow_ports::SnapshotSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

/// Configuration for the random-walk book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Starting mid price
    pub initial_mid: Price,
    /// Largest mid move per snapshot, in price units
    pub step: f64,
    /// Distance from mid to the best bid and best ask
    pub half_spread: Price,
    /// Price distance between consecutive levels
    pub level_step: Price,
    /// Levels per side
    pub levels: usize,
    /// Most prints generated per snapshot
    pub max_trades: usize,
    /// Seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            initial_mid: Decimal::from(50_000),
            step: 2.0,
            half_spread: Decimal::new(5, 1),
            level_step: Decimal::new(1, 1),
            levels: 5,
            max_trades: 3,
            seed: None,
        }
    }
}

/// Random-walk snapshot generator
pub struct SyntheticSource {
    config: SyntheticConfig,
    mid: Price,
    rng: StdRng,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            mid: config.initial_mid,
            config,
            rng,
        }
    }

    /// Create with a specific seed for reproducible runs
    pub fn with_seed(config: SyntheticConfig, seed: u64) -> Self {
        Self::new(SyntheticConfig {
            seed: Some(seed),
            ..config
        })
    }

    pub fn mid(&self) -> Price {
        self.mid
    }

    fn decimal(value: f64, dp: u32) -> Decimal {
        Decimal::from_f64(value).unwrap_or_default().round_dp(dp)
    }

    fn walk(&mut self) {
        let step = self.rng.gen_range(-1.0..=1.0) * self.config.step;
        let next = self.mid + Self::decimal(step, 2);
        // keep the walk strictly positive
        if next > self.config.half_spread + self.config.level_step * Decimal::from(self.config.levels) {
            self.mid = next;
        }
    }

    fn level(&mut self, distance: Price, side: TradeSide) -> BookLevel {
        let jitter = Self::decimal(self.rng.gen_range(-0.02..=0.02), 2);
        let price = match side {
            TradeSide::Buy => self.mid - distance + jitter,
            TradeSide::Sell => self.mid + distance + jitter,
        };
        let size = Self::decimal(self.rng.gen_range(0.1..=5.0), 4);
        BookLevel::new(price.round_dp(2), size)
    }

    fn book(&mut self) -> OrderBookSnapshot {
        let mut bids = Vec::with_capacity(self.config.levels);
        let mut asks = Vec::with_capacity(self.config.levels);
        for i in 0..self.config.levels {
            let distance = self.config.half_spread + self.config.level_step * Decimal::from(i);
            bids.push(self.level(distance, TradeSide::Buy));
            asks.push(self.level(distance, TradeSide::Sell));
        }
        OrderBookSnapshot::new(bids, asks)
    }

    fn trades(&mut self) -> Vec<TradeEvent> {
        let count = self.rng.gen_range(0..=self.config.max_trades);
        (0..count)
            .map(|_| {
                let side = if self.rng.gen_bool(0.5) {
                    TradeSide::Buy
                } else {
                    TradeSide::Sell
                };
                // exponential with mean 1
                let uniform: f64 = self.rng.gen_range(f64::EPSILON..1.0);
                let size = Self::decimal(-uniform.ln(), 4).max(Decimal::new(1, 4));
                TradeEvent::new(side, size)
            })
            .collect()
    }

    /// Advance the walk and build the next snapshot
    pub fn next_snapshot(&mut self) -> MarketSnapshot {
        self.walk();
        let book = self.book();
        let trades = self.trades();
        MarketSnapshot::new(book, trades)
    }
}

impl SnapshotSource for SyntheticSource {
    fn latest(&mut self) -> Option<Arc<MarketSnapshot>> {
        Some(Arc::new(self.next_snapshot()))
    }

    fn name(&self) -> &str {
        "SyntheticSource"
    }
}

impl std::fmt::Debug for SyntheticSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntheticSource")
            .field("mid", &self.mid.to_f64())
            .field("levels", &self.config.levels)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_books_are_well_formed() {
        let mut source = SyntheticSource::with_seed(SyntheticConfig::default(), 42);

        for _ in 0..200 {
            let snapshot = source.next_snapshot();
            assert_eq!(snapshot.book.bids.len(), 5);
            assert_eq!(snapshot.book.asks.len(), 5);
            assert!(!snapshot.book.is_degenerate());
            assert!(snapshot.trades.len() <= 3);
            assert!(snapshot.trades.iter().all(TradeEvent::is_valid));
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mut a = SyntheticSource::with_seed(SyntheticConfig::default(), 7);
        let mut b = SyntheticSource::with_seed(SyntheticConfig::default(), 7);

        for _ in 0..20 {
            assert_eq!(a.next_snapshot(), b.next_snapshot());
        }
    }

    #[test]
    fn test_random_walk_stays_near_start() {
        let config = SyntheticConfig {
            initial_mid: dec!(100),
            step: 0.05,
            ..Default::default()
        };
        let mut source = SyntheticSource::with_seed(config, 42);
        for _ in 0..100 {
            source.next_snapshot();
        }

        // at most 100 steps of 0.05
        assert!(source.mid() > dec!(95) && source.mid() < dec!(105));
    }
}
