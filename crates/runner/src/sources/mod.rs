//! Snapshot sources
//!
//! - [`SharedSnapshotSource`]: push-style, fed by a network task through a
//!   [`SnapshotPublisher`]
//! - [`SyntheticSource`]: random-walk demo book
//! - [`ReplaySource`]: recorded snapshots, in memory or from a JSON-lines file

pub mod replay;
pub mod shared;
pub mod synthetic;

pub use replay::ReplaySource;
pub use shared::{SharedSnapshotSource, SnapshotPublisher};
pub use synthetic::{SyntheticConfig, SyntheticSource};
