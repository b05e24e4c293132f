//! Sink implementations
//!
//! - [`JsonlPersistence`]: append-only training dataset on disk
//! - [`DryRunExecution`] and [`LogNotifier`]: log-only stand-ins for live runs
//! - [`MemoryPersistence`], [`MemoryExecution`], [`MemoryNotifier`]:
//!   in-memory recorders for tests and embedding

pub mod dry_run;
pub mod jsonl;
pub mod log_notifier;
pub mod memory;

pub use dry_run::DryRunExecution;
pub use jsonl::{FeatureRow, JsonlPersistence};
pub use log_notifier::LogNotifier;
pub use memory::{MemoryExecution, MemoryNotifier, MemoryPersistence};
