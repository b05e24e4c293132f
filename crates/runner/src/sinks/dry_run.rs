use microflow_core::{Decision, Quantity};
use microflow_ports::{ExecutionReport, ExecutionSink, SinkError, SinkResult};

/// Execution sink that places no orders. Every decision is logged and
/// reported filled at its reference price.
#[derive(Debug, Clone, Default)]
pub struct DryRunExecution {
    symbol: String,
}

impl DryRunExecution {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

impl ExecutionSink for DryRunExecution {
    fn execute(&mut self, decision: &Decision, size: Quantity) -> SinkResult<ExecutionReport> {
        let side = decision
            .side
            .ok_or_else(|| SinkError::Rejected(format!("{} without a side", decision.action)))?;

        log::info!(
            "[dry-run] {} {} {} {} @ {} ({})",
            decision.action,
            side.as_str(),
            size,
            self.symbol,
            decision.price,
            decision.reason
        );

        Ok(ExecutionReport {
            action: decision.action,
            side,
            fill_price: decision.price,
            size,
            timestamp: decision.timestamp,
        })
    }

    fn name(&self) -> &str {
        "DryRunExecution"
    }
}
