use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, SourceConfig, is_positive, is_probability};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Load configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(json)?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<AppConfig, ConfigError> {
    let default_config = include_str!("default_config.json");
    load_config_from_str(default_config)
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

fn check(condition: bool, field: &'static str, reason: &str) -> Result<(), ConfigError> {
    if condition { Ok(()) } else { Err(invalid(field, reason)) }
}

impl AppConfig {
    /// Reject values that cannot describe a working pipeline.
    ///
    /// Only structure is checked. Thresholds that merely make entries rare or
    /// unreachable are accepted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(!self.symbol.trim().is_empty(), "symbol", "must not be empty")?;
        check(self.poll_interval_ms > 0, "poll_interval_ms", "must be positive")?;
        check(is_positive(self.order_size), "order_size", "must be positive")?;

        let features = &self.features;
        check(features.depth_levels > 0, "features.depth_levels", "must be positive")?;
        check(
            is_probability(features.imbalance_floor)
                && is_probability(features.imbalance_ceiling)
                && features.imbalance_floor < features.imbalance_ceiling,
            "features.imbalance_floor",
            "floor and ceiling must satisfy 0 <= floor < ceiling <= 1",
        )?;
        check(features.delta_window_ms > 0, "features.delta_window_ms", "must be positive")?;
        check(
            features.volatility_samples >= 2,
            "features.volatility_samples",
            "needs at least two samples",
        )?;
        check(features.history_capacity > 0, "features.history_capacity", "must be positive")?;
        check(
            features.label_threshold_pct.is_finite() && features.label_threshold_pct >= 0.0,
            "features.label_threshold_pct",
            "must be a non-negative number",
        )?;
        check(
            features.min_valid_price < features.max_valid_price,
            "features.min_valid_price",
            "must be below max_valid_price",
        )?;

        let decision = &self.decision;
        check(
            decision.imbalance_threshold > 0.5 && decision.imbalance_threshold < 1.0,
            "decision.imbalance_threshold",
            "must lie in (0.5, 1)",
        )?;
        check(
            decision.delta_threshold >= rust_decimal::Decimal::ZERO,
            "decision.delta_threshold",
            "must not be negative",
        )?;
        check(decision.trend_periods >= 2, "decision.trend_periods", "needs at least two readings")?;
        check(
            decision.spread_max_pct.is_finite() && decision.spread_max_pct > 0.0,
            "decision.spread_max_pct",
            "must be positive",
        )?;
        if let Some(max_volatility) = decision.max_volatility_pct {
            check(
                max_volatility.is_finite() && max_volatility > 0.0,
                "decision.max_volatility_pct",
                "must be positive when set",
            )?;
        }
        check(
            decision.min_hold_ms <= decision.max_hold_ms,
            "decision.min_hold_ms",
            "must not exceed max_hold_ms",
        )?;
        check(
            decision.exit_imbalance_threshold > 0.0 && decision.exit_imbalance_threshold < 0.5,
            "decision.exit_imbalance_threshold",
            "must lie in (0, 0.5)",
        )?;
        check(
            decision.exit_delta_rate.is_finite(),
            "decision.exit_delta_rate",
            "must be a number",
        )?;

        match &self.source {
            SourceConfig::Synthetic(synthetic) => {
                check(is_positive(synthetic.initial_mid), "source.initial_mid", "must be positive")?;
                check(synthetic.levels > 0, "source.levels", "must be positive")?;
            }
            SourceConfig::Replay(replay) => {
                check(
                    !replay.path.as_os_str().is_empty(),
                    "source.path",
                    "must not be empty",
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_default_config() {
        let config = load_default_config().unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.features.depth_levels, 3);
        assert!(matches!(config.source, SourceConfig::Synthetic(_)));
    }

    #[test]
    fn test_minimal_config_fills_engine_defaults() {
        let config = load_config_from_str(
            r#"{
                "symbol": "ETH-USDT-SWAP",
                "poll_interval_ms": 500,
                "order_size": "0.1",
                "source": {"kind": "replay", "path": "data/snapshots.jsonl"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.order_size, dec!(0.1));
        assert_eq!(config.features.history_capacity, 600);
        assert_eq!(config.decision.trend_periods, 3);
        assert!(config.persistence.path.is_none());
        match config.source {
            SourceConfig::Replay(replay) => assert_eq!(replay.step_ms, 1_000),
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_inverted_hold_times() {
        let mut config = load_default_config().unwrap();
        config.decision.min_hold_ms = 10_000;
        config.decision.max_hold_ms = 5_000;

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "decision.min_hold_ms", .. }
        ));
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let mut config = load_default_config().unwrap();
        config.features.depth_levels = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_weak_entry_threshold() {
        let mut config = load_default_config().unwrap();
        config.decision.imbalance_threshold = 0.4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
