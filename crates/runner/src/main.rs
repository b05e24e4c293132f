//! Microflow binary
//!
//! `microflow [config.json]` runs the pipeline until Ctrl-C (or until a
//! replayed recording ends). Without an argument the embedded default
//! configuration is used.

use microflow_runner::{RunnerError, build_driver, load_config, load_default_config};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), RunnerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading config from {}", path);
            load_config(&path)?
        }
        None => {
            log::info!("Using embedded default config");
            load_default_config()?
        }
    };

    let mut driver = build_driver(&config)?;
    log::info!(
        "Starting microflow on {} every {}ms",
        config.symbol,
        config.poll_interval_ms
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Received Ctrl-C, stopping...");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                log::warn!("Cannot listen for Ctrl-C: {}", e);
                // dropping the sender would stop the driver
                std::future::pending::<()>().await;
            }
        }
    });

    let summary = driver.run(config.poll_interval(), shutdown_rx).await;

    log::info!(
        "Finished: {} cycles ({} missed), {} rows stored, {} labeled, {} entries, {} exits, {} execution failures",
        summary.cycles,
        summary.missed_buckets,
        summary.emitted,
        summary.labeled,
        summary.entries,
        summary.exits,
        summary.execution_failures
    );
    log::info!("Dataset: {}", summary.progress);
    Ok(())
}
