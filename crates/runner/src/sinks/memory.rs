//! In-memory sinks
//!
//! Each one is a cheap clonable handle over shared state, so a test can keep
//! a copy while the driver owns another.

use std::sync::{Arc, Mutex, MutexGuard};

use microflow_core::{Decision, FeatureVector, Quantity};
use microflow_ports::{
    ExecutionReport, ExecutionSink, NotificationSink, PersistenceSink, SinkError, SinkResult,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Keeps every persisted vector
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    rows: Arc<Mutex<Vec<FeatureVector>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<FeatureVector> {
        lock(&self.rows).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersistenceSink for MemoryPersistence {
    fn persist(&mut self, vector: &FeatureVector) -> SinkResult<()> {
        lock(&self.rows).push(vector.clone());
        Ok(())
    }
}

/// Fills every decision at its reference price, or rejects everything when
/// built with [`MemoryExecution::rejecting`]
#[derive(Debug, Clone, Default)]
pub struct MemoryExecution {
    reports: Arc<Mutex<Vec<ExecutionReport>>>,
    attempts: Arc<Mutex<usize>>,
    reject: bool,
}

impl MemoryExecution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn reports(&self) -> Vec<ExecutionReport> {
        lock(&self.reports).clone()
    }

    /// Calls to `execute`, successful or not
    pub fn attempts(&self) -> usize {
        *lock(&self.attempts)
    }
}

impl ExecutionSink for MemoryExecution {
    fn execute(&mut self, decision: &Decision, size: Quantity) -> SinkResult<ExecutionReport> {
        *lock(&self.attempts) += 1;
        if self.reject {
            return Err(SinkError::Rejected(format!("{} refused", decision.action)));
        }
        let side = decision
            .side
            .ok_or_else(|| SinkError::Rejected(format!("{} without a side", decision.action)))?;

        let report = ExecutionReport {
            action: decision.action,
            side,
            fill_price: decision.price,
            size,
            timestamp: decision.timestamp,
        };
        lock(&self.reports).push(report.clone());
        Ok(report)
    }

    fn name(&self) -> &str {
        "MemoryExecution"
    }
}

/// Keeps every notification
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    decisions: Arc<Mutex<Vec<Decision>>>,
    statuses: Arc<Mutex<Vec<String>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decisions(&self) -> Vec<Decision> {
        lock(&self.decisions).clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        lock(&self.statuses).clone()
    }
}

impl NotificationSink for MemoryNotifier {
    fn notify_decision(&mut self, decision: &Decision) -> SinkResult<()> {
        lock(&self.decisions).push(decision.clone());
        Ok(())
    }

    fn notify_status(&mut self, message: &str) -> SinkResult<()> {
        lock(&self.statuses).push(message.to_string());
        Ok(())
    }
}
