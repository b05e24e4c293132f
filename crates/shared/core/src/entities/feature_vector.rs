use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::TrendLabel;
use crate::values::{Price, Quantity, Timestamp};

/// Microstructure signals computed once per update cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// When the vector was computed
    pub timestamp: Timestamp,
    /// Top-N bid volume share of total top-N volume, in [0, 1]
    pub imbalance: f64,
    /// Spread as percent of mid; `None` when the book was degenerate
    pub spread_pct: Option<f64>,
    /// Net signed trade volume inside the delta window
    pub cumulative_delta: Quantity,
    /// `cumulative_delta` rescaled from the delta window to one minute
    pub delta_per_minute: f64,
    /// Std dev of recent mid-price returns, in percent
    pub volatility: f64,
    /// Last valid mid price
    pub mid_price: Price,
    /// Accepted buy prints since the engine started
    pub buy_trades: u64,
    /// Accepted sell prints since the engine started
    pub sell_trades: u64,
    /// Resolved label, set only on vectors handed back by delayed labeling
    pub label: Option<TrendLabel>,
}

impl FeatureVector {
    pub fn total_trades(&self) -> u64 {
        self.buy_trades + self.sell_trades
    }

    /// Numeric training target; unresolved labels count as 0
    pub fn target(&self) -> i8 {
        self.label.map(|label| label.as_int()).unwrap_or(0)
    }

    pub fn is_labeled(&self) -> bool {
        self.label.is_some()
    }

    pub fn with_label(mut self, label: TrendLabel) -> Self {
        self.label = Some(label);
        self
    }

    pub fn mid_price_f64(&self) -> f64 {
        self.mid_price.to_f64().unwrap_or(f64::NAN)
    }

    pub fn cumulative_delta_f64(&self) -> f64 {
        self.cumulative_delta.to_f64().unwrap_or(f64::NAN)
    }

    /// Every numeric field is finite and the mid price is positive.
    /// A vector failing this check carries no tradable signal.
    pub fn is_well_formed(&self) -> bool {
        self.mid_price > Decimal::ZERO
            && self.imbalance.is_finite()
            && self.delta_per_minute.is_finite()
            && self.volatility.is_finite()
            && self.spread_pct.is_none_or(f64::is_finite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn vector() -> FeatureVector {
        FeatureVector {
            timestamp: Utc::now(),
            imbalance: 0.6,
            spread_pct: Some(0.01),
            cumulative_delta: dec!(4),
            delta_per_minute: 12.0,
            volatility: 0.02,
            mid_price: dec!(50000),
            buy_trades: 3,
            sell_trades: 1,
            label: None,
        }
    }

    #[test]
    fn test_target_defaults_to_zero() {
        let v = vector();
        assert_eq!(v.target(), 0);
        assert_eq!(v.clone().with_label(TrendLabel::Down).target(), -1);
        assert_eq!(v.total_trades(), 4);
    }

    #[test]
    fn test_well_formed() {
        assert!(vector().is_well_formed());

        let mut nan = vector();
        nan.imbalance = f64::NAN;
        assert!(!nan.is_well_formed());

        let mut zero_price = vector();
        zero_price.mid_price = Decimal::ZERO;
        assert!(!zero_price.is_well_formed());

        let mut no_spread = vector();
        no_spread.spread_pct = None;
        assert!(no_spread.is_well_formed());
    }
}
