use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Thresholds and timers of the decision engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Long entry needs imbalance above this; short needs it below `1 - threshold`
    pub imbalance_threshold: f64,
    /// Long entry needs cumulative delta above this; short needs it below the negation
    pub delta_threshold: Decimal,
    /// Consecutive imbalance readings compared for the trend
    pub trend_periods: usize,
    /// Widest spread (percent) at which entries and reversal exits are evaluated
    pub spread_max_pct: f64,
    /// Entries are suppressed while volatility (percent) exceeds this
    pub max_volatility_pct: Option<f64>,
    /// Quiet period after an entry (milliseconds)
    pub min_signal_interval_ms: u64,
    /// Same-side signals required in a row before entering; 0 and 1 both act at once
    pub confirmation_periods: u32,
    /// No exit of any kind before this (milliseconds)
    pub min_hold_ms: u64,
    /// Forced flatten after this (milliseconds)
    pub max_hold_ms: u64,
    /// Long reversal needs imbalance below this; short needs it above `1 - threshold`
    pub exit_imbalance_threshold: f64,
    /// Long reversal needs delta per minute below this; short needs it above the negation
    pub exit_delta_rate: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            imbalance_threshold: 0.65,
            delta_threshold: Decimal::from(5),
            trend_periods: 3,
            spread_max_pct: 0.03,
            max_volatility_pct: None,
            min_signal_interval_ms: 60_000, // one entry per minute at most
            confirmation_periods: 1,
            min_hold_ms: 30_000,
            max_hold_ms: 300_000,
            exit_imbalance_threshold: 0.3, // stricter than the entry side
            exit_delta_rate: -15.0,
        }
    }
}

impl DecisionConfig {
    pub fn min_signal_interval(&self) -> Duration {
        millis(self.min_signal_interval_ms)
    }

    pub fn min_hold(&self) -> Duration {
        millis(self.min_hold_ms)
    }

    pub fn max_hold(&self) -> Duration {
        millis(self.max_hold_ms)
    }
}

fn millis(ms: u64) -> Duration {
    Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_overrides() {
        let config: DecisionConfig = serde_json::from_str(
            r#"{"delta_threshold": 8, "max_volatility_pct": 0.5, "min_hold_ms": 1000}"#,
        )
        .unwrap();

        assert_eq!(config.delta_threshold, Decimal::from(8));
        assert_eq!(config.max_volatility_pct, Some(0.5));
        assert_eq!(config.min_hold(), Duration::seconds(1));
        assert_eq!(config.trend_periods, 3);
    }
}
