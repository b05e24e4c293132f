//! Microflow Decision Engine
//!
//! A two-state machine (flat / in position) that turns feature vectors into
//! `ENTER`, `EXIT` or `HOLD` decisions under imbalance, delta and trend
//! thresholds, a confirmation count, a post-entry cooldown and minimum and
//! maximum hold times.
//!
//! Timers are plain timestamp comparisons against the `now` passed to each
//! call, so results only depend on the inputs and not on polling jitter.

pub mod config;
pub mod confirmation;
pub mod engine;
pub mod events;
pub mod trend;

pub use config::DecisionConfig;
pub use confirmation::ConfirmationCounter;
pub use engine::DecisionEngine;
pub use events::DecisionEvent;
pub use trend::{ImbalanceTrend, TrendDirection};
