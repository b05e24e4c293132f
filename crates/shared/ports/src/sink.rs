use microflow_core::{Action, Decision, FeatureVector, PositionSide, Price, Quantity, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::SinkResult;

/// Acknowledgement returned by an execution sink for an actionable decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub action: Action,
    pub side: PositionSide,
    /// Price the sink reports as filled
    pub fill_price: Price,
    pub size: Quantity,
    pub timestamp: Timestamp,
}

/// Port for order execution
///
/// Receives only `Enter` and `Exit` decisions. Retries, idempotency and
/// request signing are the implementation's business.
pub trait ExecutionSink: Send {
    fn execute(&mut self, decision: &Decision, size: Quantity) -> SinkResult<ExecutionReport>;

    fn name(&self) -> &str {
        "ExecutionSink"
    }
}

/// Port for feature storage
pub trait PersistenceSink: Send {
    /// Store one emitted feature vector (labeled or not)
    fn persist(&mut self, vector: &FeatureVector) -> SinkResult<()>;

    fn flush(&mut self) -> SinkResult<()> {
        Ok(())
    }
}

/// Port for human-facing alerts
pub trait NotificationSink: Send {
    fn notify_decision(&mut self, decision: &Decision) -> SinkResult<()>;

    fn notify_status(&mut self, message: &str) -> SinkResult<()>;
}
