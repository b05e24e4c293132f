//! Microflow Ports
//!
//! Port definitions (traits) for the microflow pipeline.
//! These define the boundaries between the engines and infrastructure:
//! where snapshots come from, where decisions and features go, and what
//! time it is.

mod clock;
mod error;
mod sink;
mod source;

pub use clock::Clock;
pub use error::{SinkError, SinkResult};
pub use sink::{ExecutionReport, ExecutionSink, NotificationSink, PersistenceSink};
pub use source::SnapshotSource;
