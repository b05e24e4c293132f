use microflow_core::Decision;
use microflow_ports::{NotificationSink, SinkResult};

/// Notification sink that writes to the log
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify_decision(&mut self, decision: &Decision) -> SinkResult<()> {
        let side = decision.side.map(|side| side.as_str()).unwrap_or("-");
        log::info!(
            "🔔 {} {} @ {} ({})",
            decision.action,
            side,
            decision.price,
            decision.reason
        );
        Ok(())
    }

    fn notify_status(&mut self, message: &str) -> SinkResult<()> {
        log::info!("🔔 {}", message);
        Ok(())
    }
}
