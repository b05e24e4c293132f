//! Microflow Clock Infrastructure
//!
//! Two time sources behind the [`Clock`] port:
//!
//! - [`SystemClock`] reads wall-clock time for live runs.
//! - [`ManualClock`] only moves when told to, for replaying recorded
//!   snapshots and for deterministic tests of the time-based rules
//!   (cooldown, minimum and maximum hold, labeling horizon).
//!
//! ## Usage
//!
//! ```ignore
//! use microflow_clock::{Clock, ManualClock};
//! use chrono::Duration;
//!
//! let clock = ManualClock::starting_at(start);
//! clock.advance(Duration::seconds(1));
//! assert_eq!(clock.now(), start + Duration::seconds(1));
//! ```

mod manual;
mod system;

pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use microflow_ports::Clock;
