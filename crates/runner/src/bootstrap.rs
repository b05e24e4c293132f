//! Bootstrap - wire a [`Driver`] from an [`AppConfig`]
//!
//! - Synthetic source: wall clock, for demo runs
//! - Replay source: a [`ManualClock`] moved by the recording itself
//! - Persistence: JSON-lines file when a path is configured, resuming the
//!   dataset tally from the rows already stored there
//! - Execution and notification: dry-run and log sinks

use std::sync::Arc;

use microflow_clock::{ManualClock, SystemClock};
use microflow_ports::{Clock, SnapshotSource};

use crate::config::{AppConfig, SourceConfig};
use crate::driver::Driver;
use crate::error::RunnerError;
use crate::sinks::{DryRunExecution, JsonlPersistence, LogNotifier};
use crate::sources::{ReplaySource, SyntheticSource};

pub type BoxedSource = Box<dyn SnapshotSource>;

fn build_source(config: &AppConfig) -> Result<(BoxedSource, Arc<dyn Clock>), RunnerError> {
    match &config.source {
        SourceConfig::Synthetic(synthetic) => {
            log::info!("Using synthetic source around {}", synthetic.initial_mid);
            let source: BoxedSource = Box::new(SyntheticSource::new(synthetic.clone()));
            let clock: Arc<dyn Clock> = Arc::new(SystemClock);
            Ok((source, clock))
        }
        SourceConfig::Replay(replay) => {
            let clock = ManualClock::new();
            let source = ReplaySource::from_jsonl(&replay.path)
                .map_err(|source| RunnerError::Replay {
                    path: replay.path.clone(),
                    source,
                })?
                .with_clock(Arc::clone(&clock), replay.step());
            log::info!("Replaying {} snapshots from {}", source.len(), replay.path.display());
            let source: BoxedSource = Box::new(source);
            let clock: Arc<dyn Clock> = clock;
            Ok((source, clock))
        }
    }
}

/// Build a ready-to-run driver. The configuration is validated first.
pub fn build_driver(config: &AppConfig) -> Result<Driver<BoxedSource>, RunnerError> {
    config.validate()?;
    let (source, clock) = build_source(config)?;

    let mut driver = Driver::new(
        source,
        clock,
        config.features.clone(),
        config.decision.clone(),
    )
    .with_execution(DryRunExecution::new(config.symbol.clone()))
    .with_notifier(LogNotifier)
    .with_order_size(config.order_size)
    .with_progress_report_every(config.progress_report_every);

    if let Some(path) = &config.persistence.path {
        let existing = JsonlPersistence::progress(path)?;
        if existing.total_rows() > 0 {
            log::info!("Resuming dataset at {}: {}", path.display(), existing);
        }
        let persistence = JsonlPersistence::create(path, config.persistence.labeled_only)?;
        driver = driver.with_persistence(persistence).with_progress(existing);
    }

    Ok(driver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_default_config;
    use crate::config::{PersistenceConfig, ReplayConfig};

    #[test]
    fn test_default_config_builds_synthetic_driver() {
        let mut config = load_default_config().unwrap();
        config.persistence = PersistenceConfig::default();

        let mut driver = build_driver(&config).unwrap();
        assert_eq!(driver.source().name(), "SyntheticSource");

        let outcome = driver.step();
        assert!(outcome.emitted.is_some());
    }

    #[test]
    fn test_missing_replay_file_is_reported() {
        let mut config = load_default_config().unwrap();
        config.persistence = PersistenceConfig::default();
        config.source = SourceConfig::Replay(ReplayConfig {
            path: "does/not/exist.jsonl".into(),
            step_ms: 1000,
        });

        assert!(matches!(
            build_driver(&config),
            Err(RunnerError::Replay { .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = load_default_config().unwrap();
        config.poll_interval_ms = 0;

        assert!(matches!(build_driver(&config), Err(RunnerError::Config(_))));
    }
}
