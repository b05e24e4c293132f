//! Microflow Features
//!
//! Stateful microstructure feature computation: order-book imbalance,
//! spread, rolling trade delta and short-horizon volatility, plus delayed
//! labeling of each vector against the realized mid-price move.
//!
//! The engine is a plain value owned by a single driver. It performs no I/O
//! and never fails on bad data; problems surface as [`FeatureEvent`]s.

pub mod calculations;
pub mod config;
pub mod engine;
pub mod events;
pub mod labeling;
pub mod ledger;
pub mod price_series;
pub mod progress;
pub mod window;

pub use calculations::{Calculations, Imbalance, NEUTRAL_IMBALANCE, Spread};
pub use config::FeatureConfig;
pub use engine::FeatureEngine;
pub use events::{FeatureEvent, QualityIssue};
pub use labeling::{HistoryEntry, LabelHistory};
pub use ledger::TradeLedger;
pub use price_series::PriceSeries;
pub use progress::{DataQuality, DatasetProgress};
pub use window::{RollingWindow, Stamped};
