//! Microflow Runner
//!
//! Runs the feature and decision engines against a snapshot source:
//!
//! - **Config**: JSON configuration with an embedded default
//! - **Sources**: synthetic, replayed, or pushed by a market-data task
//! - **Driver**: one bucket per tick, engines in sequence, events to logs
//! - **Sinks**: JSON-lines dataset, dry-run execution, log notifications
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────┐
//!   │  SnapshotSource  │  synthetic / replay / shared (ArcSwap)
//!   └────────┬─────────┘
//!            │ Arc<MarketSnapshot>
//!            ▼
//!   ┌──────────────────┐      ┌──────────────────┐
//!   │  FeatureEngine   │─────►│ PersistenceSink  │  emitted vectors
//!   └────────┬─────────┘      └──────────────────┘
//!            │ current vector
//!            ▼
//!   ┌──────────────────┐      ┌──────────────────┐
//!   │  DecisionEngine  │─────►│  ExecutionSink   │  ENTER / EXIT
//!   └──────────────────┘      └────────┬─────────┘
//!            ▲   record_entry/exit     │
//!            └─────────────────────────┘
//! ```

pub mod bootstrap;
pub mod config;
pub mod driver;
pub mod error;
pub mod sinks;
pub mod sources;

pub use bootstrap::{BoxedSource, build_driver};
pub use config::{AppConfig, load_config, load_default_config};
pub use driver::{Driver, RunSummary, StepOutcome};
pub use error::RunnerError;
