//! Driver loop
//!
//! Glue between a [`SnapshotSource`], the two engines and the sinks. One
//! [`Driver::step`] is one bucket:
//!
//! ```text
//! source.latest() ──► FeatureEngine::update ──► persistence (emitted vector)
//!                              │
//!                              ▼ current vector
//!                     DecisionEngine::analyze ──► execution ──► record_entry / record_exit
//!                                                     └──────► notifier
//! ```
//!
//! Engine events are drained after every step and turned into log records.

use std::sync::Arc;

use microflow_core::{Action, Decision, FeatureVector, Quantity, Timestamp};
use microflow_decision::{DecisionConfig, DecisionEngine, DecisionEvent};
use microflow_features::{DatasetProgress, FeatureConfig, FeatureEngine, FeatureEvent, QualityIssue};
use microflow_ports::{
    Clock, ExecutionReport, ExecutionSink, NotificationSink, PersistenceSink, SnapshotSource,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::sinks::DryRunExecution;

/// What a single bucket produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    /// Vector handed downstream by the feature engine, if any
    pub emitted: Option<FeatureVector>,
    /// Decision for the current vector, when one was evaluated
    pub decision: Option<Decision>,
    /// Acknowledgement for an executed `Enter` or `Exit`
    pub execution: Option<ExecutionReport>,
}

/// Counters accumulated over a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub cycles: u64,
    /// Buckets where the source had nothing
    pub missed_buckets: u64,
    /// Vectors handed to the persistence sink
    pub emitted: u64,
    /// Samples whose label resolved
    pub labeled: u64,
    pub entries: u64,
    pub exits: u64,
    pub execution_failures: u64,
    pub sink_failures: u64,
    pub progress: DatasetProgress,
}

pub struct Driver<S: SnapshotSource> {
    source: S,
    clock: Arc<dyn Clock>,
    features: FeatureEngine,
    decisions: DecisionEngine,
    execution: Box<dyn ExecutionSink>,
    persistence: Option<Box<dyn PersistenceSink>>,
    notifier: Option<Box<dyn NotificationSink>>,
    order_size: Quantity,
    /// Log a progress line every this many cycles; 0 disables
    progress_report_every: u64,
    summary: RunSummary,
    last_persisted: Option<FeatureVector>,
    last_analyzed: Option<Timestamp>,
}

impl<S: SnapshotSource> Driver<S> {
    pub fn new(
        source: S,
        clock: Arc<dyn Clock>,
        features: FeatureConfig,
        decisions: DecisionConfig,
    ) -> Self {
        Self {
            source,
            clock,
            features: FeatureEngine::new(features),
            decisions: DecisionEngine::new(decisions),
            execution: Box::new(DryRunExecution::default()),
            persistence: None,
            notifier: None,
            order_size: Decimal::ONE,
            progress_report_every: 0,
            summary: RunSummary::default(),
            last_persisted: None,
            last_analyzed: None,
        }
    }

    pub fn with_execution(mut self, execution: impl ExecutionSink + 'static) -> Self {
        self.execution = Box::new(execution);
        self
    }

    pub fn with_persistence(mut self, persistence: impl PersistenceSink + 'static) -> Self {
        self.persistence = Some(Box::new(persistence));
        self
    }

    pub fn with_notifier(mut self, notifier: impl NotificationSink + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn with_order_size(mut self, size: Quantity) -> Self {
        self.order_size = size;
        self
    }

    pub fn with_progress_report_every(mut self, cycles: u64) -> Self {
        self.progress_report_every = cycles;
        self
    }

    /// Start from an existing dataset tally, e.g. rows already on disk
    pub fn with_progress(mut self, progress: DatasetProgress) -> Self {
        self.summary.progress = progress;
        self
    }

    pub fn features(&self) -> &FeatureEngine {
        &self.features
    }

    pub fn decisions(&self) -> &DecisionEngine {
        &self.decisions
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Run one bucket
    pub fn step(&mut self) -> StepOutcome {
        self.summary.cycles += 1;

        // pull before reading the clock: a replay source moves it
        let Some(snapshot) = self.source.latest() else {
            self.summary.missed_buckets += 1;
            log::trace!("No snapshot from {}", self.source.name());
            return StepOutcome::default();
        };
        let now = self.clock.now();

        let emitted = self.features.update(&snapshot, now);
        if let Some(vector) = &emitted {
            self.persist(vector);
        }

        let decision = self.evaluate(now);
        let execution = match &decision {
            Some(decision) if decision.is_actionable() => self.act(decision, now),
            _ => None,
        };

        self.log_events();
        self.report_progress();

        StepOutcome {
            emitted,
            decision,
            execution,
        }
    }

    /// Analyze the current vector when it is new, or when a position is
    /// open so the hold timers keep running against `now`.
    fn evaluate(&mut self, now: Timestamp) -> Option<Decision> {
        let vector = self.features.current()?;
        let fresh = self.last_analyzed != Some(vector.timestamp);
        if !fresh && self.decisions.is_flat() {
            return None;
        }
        self.last_analyzed = Some(vector.timestamp);
        Some(self.decisions.analyze(vector, now))
    }

    fn persist(&mut self, vector: &FeatureVector) {
        if self.last_persisted.as_ref() == Some(vector) {
            return;
        }
        self.last_persisted = Some(vector.clone());
        self.summary.progress.record(vector);

        let Some(persistence) = self.persistence.as_mut() else {
            return;
        };
        match persistence.persist(vector) {
            Ok(()) => self.summary.emitted += 1,
            Err(e) => {
                self.summary.sink_failures += 1;
                log::warn!("Failed to persist feature vector: {}", e);
            }
        }
    }

    fn act(&mut self, decision: &Decision, now: Timestamp) -> Option<ExecutionReport> {
        let report = match self.execution.execute(decision, self.order_size) {
            Ok(report) => report,
            Err(e) => {
                self.summary.execution_failures += 1;
                log::warn!(
                    "{} {} not executed by {}: {}",
                    decision.action,
                    decision.reason,
                    self.execution.name(),
                    e
                );
                self.notify_status(&format!("{} failed: {}", decision.action, e));
                return None;
            }
        };

        if report.action != decision.action {
            log::warn!(
                "{} reported {} for a {} decision",
                self.execution.name(),
                report.action,
                decision.action
            );
        }

        // position state follows the engine's decision, not the sink's report
        match decision.action {
            Action::Enter => {
                let side = decision.side.unwrap_or(report.side);
                self.decisions
                    .record_entry(side, report.fill_price, report.size, now);
                self.summary.entries += 1;
            }
            Action::Exit => {
                let closed = self.decisions.record_exit();
                self.summary.exits += 1;
                log::info!(
                    "Closed {} after {}s, pnl {}",
                    closed.side,
                    closed.held_for(now).num_seconds(),
                    closed.unrealized_pnl(report.fill_price)
                );
            }
            Action::Hold => {}
        }

        if let Some(notifier) = self.notifier.as_mut()
            && let Err(e) = notifier.notify_decision(decision)
        {
            self.summary.sink_failures += 1;
            log::warn!("Failed to send notification: {}", e);
        }
        Some(report)
    }

    fn notify_status(&mut self, message: &str) {
        if let Some(notifier) = self.notifier.as_mut()
            && let Err(e) = notifier.notify_status(message)
        {
            self.summary.sink_failures += 1;
            log::warn!("Failed to send notification: {}", e);
        }
    }

    fn log_events(&mut self) {
        for event in self.features.drain_events() {
            match event {
                FeatureEvent::RateLimited { at, dropped_trades } => {
                    log::debug!("Update at {} rate limited, {} trades dropped", at, dropped_trades);
                }
                FeatureEvent::QualityIssue { at, issue } => match issue {
                    QualityIssue::NoValidPrice => {
                        log::warn!("No valid price at {}, holding previous features", at)
                    }
                    QualityIssue::PriceOutOfRange { mid } => {
                        log::warn!("Mid {} at {} outside plausible range, ignored", mid, at)
                    }
                    QualityIssue::DegenerateBook => {
                        log::debug!("Degenerate book at {}, using last mid", at)
                    }
                    QualityIssue::RejectedTrades { count } => {
                        log::debug!("Skipped {} trades with non-positive size", count)
                    }
                },
                FeatureEvent::LabelResolved {
                    observed_at,
                    pct_change,
                    label,
                    ..
                } => {
                    self.summary.labeled += 1;
                    log::debug!(
                        "Labeled sample from {}: {:+.4}% -> {:?}",
                        observed_at,
                        pct_change,
                        label
                    );
                }
                FeatureEvent::PendingDropped { observed_at } => {
                    log::warn!("History full, dropped unlabeled sample from {}", observed_at);
                }
            }
        }

        for event in self.decisions.drain_events() {
            match event {
                DecisionEvent::InvalidFeatures { at } => {
                    log::warn!("Ignoring malformed feature vector at {}", at);
                }
                DecisionEvent::SignalSuppressed { side, reason, .. } => {
                    log::debug!("{} signal held back: {}", side, reason);
                }
                DecisionEvent::EntrySignal { side, price, .. } => {
                    log::info!("📈 {} entry signal @ {}", side, price);
                }
                DecisionEvent::ExitSignal {
                    side,
                    reason,
                    price,
                    ..
                } => {
                    log::info!("📉 {} exit signal @ {} ({})", side, price, reason);
                }
                DecisionEvent::PositionOpened {
                    side, price, size, ..
                } => {
                    log::info!("Opened {} {} @ {}", side, size, price);
                }
                DecisionEvent::PositionClosed {
                    side,
                    entry_price,
                    size,
                } => {
                    log::info!("Closed {} {} entered @ {}", side, size, entry_price);
                }
            }
        }
    }

    fn report_progress(&mut self) {
        if self.progress_report_every == 0 || self.summary.cycles % self.progress_report_every != 0 {
            return;
        }
        let message = format!("Dataset: {}", self.summary.progress);
        log::info!("{}", message);
        self.notify_status(&message);
    }

    /// Repeat [`step`](Self::step) every `period` until `shutdown` turns
    /// true (or its sender is dropped) or the source is exhausted.
    pub async fn run(
        &mut self,
        period: std::time::Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> RunSummary {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        log::info!("Driver started on {} ({:?} buckets)", self.source.name(), period);

        if !*shutdown.borrow() {
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        self.step();
                        if self.source.is_exhausted() {
                            log::info!("{} exhausted", self.source.name());
                            break;
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            log::info!("Shutdown requested");
                            break;
                        }
                    }
                }
            }
        }

        self.finish()
    }

    /// Step back to back until the source is exhausted. Never returns for a
    /// source that is not finite.
    pub fn run_until_exhausted(&mut self) -> RunSummary {
        while !self.source.is_exhausted() {
            self.step();
        }
        self.finish()
    }

    fn finish(&mut self) -> RunSummary {
        if let Some(persistence) = self.persistence.as_mut()
            && let Err(e) = persistence.flush()
        {
            self.summary.sink_failures += 1;
            log::warn!("Failed to flush persistence: {}", e);
        }
        if let Some(position) = self.decisions.position() {
            log::warn!(
                "Stopping with an open {} position entered @ {}",
                position.side,
                position.entry_price
            );
        }
        self.notify_status(&format!("Stopped after {} cycles", self.summary.cycles));
        self.summary.clone()
    }
}
