use std::sync::{Arc, RwLock};

use chrono::{Duration, Utc};
use microflow_core::Timestamp;
use microflow_ports::Clock;

/// Clock that only advances when explicitly moved
///
/// Shared between the driver and a replay source: the source sets the time
/// to each recorded snapshot's timestamp, the engines read it back.
#[derive(Debug)]
pub struct ManualClock {
    current_time: RwLock<Timestamp>,
}

impl ManualClock {
    /// Create a clock frozen at the current wall time
    pub fn new() -> Arc<Self> {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(time: Timestamp) -> Arc<Self> {
        Arc::new(Self {
            current_time: RwLock::new(time),
        })
    }

    /// Move time forward by `duration`
    pub fn advance(&self, duration: Duration) {
        let mut current = self
            .current_time
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current += duration;
    }

    /// Explicitly set the time
    ///
    /// Moving backwards is allowed; callers replaying out-of-order data are
    /// responsible for the consequences.
    pub fn set_time(&self, time: Timestamp) {
        let mut current = self
            .current_time
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = time;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self
            .current_time
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn name(&self) -> &str {
        "ManualClock"
    }
}
