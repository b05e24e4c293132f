use std::path::PathBuf;

use chrono::Duration;
use microflow_core::{Quantity, Symbol};
use microflow_decision::DecisionConfig;
use microflow_features::FeatureConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::sources::SyntheticConfig;

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Instrument the pipeline runs on, used in logs and alerts
    pub symbol: Symbol,
    /// Driver bucket length
    pub poll_interval_ms: u64,
    /// Size sent with every entry
    pub order_size: Quantity,
    /// Log a dataset progress report every this many cycles; 0 disables it
    #[serde(default)]
    pub progress_report_every: u64,
    pub source: SourceConfig,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub decision: DecisionConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl AppConfig {
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms)
    }
}

/// Where snapshots come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Random-walk demo book
    Synthetic(SyntheticConfig),
    /// Recorded snapshots, one JSON object per line
    Replay(ReplayConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    pub path: PathBuf,
    /// Simulated time between snapshots that carry no timestamp
    #[serde(default = "default_replay_step_ms")]
    pub step_ms: u64,
}

impl ReplayConfig {
    pub fn step(&self) -> Duration {
        Duration::milliseconds(i64::try_from(self.step_ms).unwrap_or(i64::MAX))
    }
}

fn default_replay_step_ms() -> u64 {
    1_000
}

/// Feature row storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// JSON-lines output file; nothing is stored when absent
    pub path: Option<PathBuf>,
    /// Store only rows whose label has been resolved
    pub labeled_only: bool,
}

pub(crate) fn is_probability(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

pub(crate) fn is_positive(value: Decimal) -> bool {
    value > Decimal::ZERO
}
