use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parameters of the feature engine. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Book levels per side summed for imbalance
    pub depth_levels: usize,
    /// Lower clamp applied to a defined imbalance
    pub imbalance_floor: f64,
    /// Upper clamp applied to a defined imbalance
    pub imbalance_ceiling: f64,
    /// Trailing window for cumulative delta
    pub delta_window_ms: u64,
    /// Mid-price observations used for volatility
    pub volatility_samples: usize,
    /// Minimum spacing between two recomputations
    pub update_interval_ms: u64,
    /// Delay between observing a vector and labeling it
    pub horizon_ms: u64,
    /// Symmetric move, in percent, separating Up/Down from Stable
    pub label_threshold_pct: f64,
    /// Hard cap on the label history
    pub history_capacity: usize,
    /// Labeled history entries older than this are evicted
    pub retention_ms: u64,
    /// Lowest mid price accepted as real
    pub min_valid_price: Decimal,
    /// Highest mid price accepted as real
    pub max_valid_price: Decimal,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            depth_levels: 3,
            imbalance_floor: 0.01,
            imbalance_ceiling: 0.99,
            delta_window_ms: 20_000,
            volatility_samples: 20,
            update_interval_ms: 1_000,
            horizon_ms: 15_000,
            label_threshold_pct: 0.05,
            history_capacity: 600,
            retention_ms: 60_000,
            min_valid_price: Decimal::new(1, 8),
            max_valid_price: Decimal::from(10_000_000u32),
        }
    }
}

impl FeatureConfig {
    pub fn delta_window(&self) -> Duration {
        millis(self.delta_window_ms)
    }

    pub fn update_interval(&self) -> Duration {
        millis(self.update_interval_ms)
    }

    pub fn horizon(&self) -> Duration {
        millis(self.horizon_ms)
    }

    pub fn retention(&self) -> Duration {
        millis(self.retention_ms)
    }

    /// Whether `price` lies inside the configured plausible range
    pub fn is_plausible_price(&self, price: Decimal) -> bool {
        price > Decimal::ZERO && price >= self.min_valid_price && price <= self.max_valid_price
    }
}

pub(crate) fn millis(ms: u64) -> Duration {
    Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FeatureConfig =
            serde_json::from_str(r#"{"horizon_ms": 30000, "label_threshold_pct": 0.1}"#).unwrap();

        assert_eq!(config.horizon(), Duration::seconds(30));
        assert_eq!(config.depth_levels, 3);
        assert_eq!(config.history_capacity, 600);
    }

    #[test]
    fn test_price_plausibility() {
        let config = FeatureConfig {
            min_valid_price: dec!(1),
            max_valid_price: dec!(1000000),
            ..Default::default()
        };
        assert!(config.is_plausible_price(dec!(50000)));
        assert!(!config.is_plausible_price(dec!(0)));
        assert!(!config.is_plausible_price(dec!(0.5)));
        assert!(!config.is_plausible_price(dec!(2000000)));
    }
}
