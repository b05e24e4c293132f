//! JSON-lines training dataset
//!
//! One [`FeatureRow`] per line, appended. Re-opening an existing file keeps
//! its rows, so collection can resume across restarts.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use microflow_core::{FeatureVector, Timestamp};
use microflow_features::DatasetProgress;
use microflow_ports::{PersistenceSink, SinkResult};
use serde::{Deserialize, Serialize};

/// Flat on-disk form of an emitted feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub timestamp: Timestamp,
    pub imbalance: f64,
    pub spread_pct: Option<f64>,
    pub cumulative_delta: f64,
    pub delta_per_minute: f64,
    pub volatility: f64,
    pub buy_trades: u64,
    pub sell_trades: u64,
    pub total_trades: u64,
    pub mid_price: f64,
    /// -1, 0 or 1 once resolved
    pub label: Option<i8>,
    /// `label` with unresolved rows counted as 0
    pub target: i8,
}

impl From<&FeatureVector> for FeatureRow {
    fn from(vector: &FeatureVector) -> Self {
        Self {
            timestamp: vector.timestamp,
            imbalance: vector.imbalance,
            spread_pct: vector.spread_pct,
            cumulative_delta: vector.cumulative_delta_f64(),
            delta_per_minute: vector.delta_per_minute,
            volatility: vector.volatility,
            buy_trades: vector.buy_trades,
            sell_trades: vector.sell_trades,
            total_trades: vector.total_trades(),
            mid_price: vector.mid_price_f64(),
            label: vector.label.map(|label| label.as_int()),
            target: vector.target(),
        }
    }
}

/// Only the label is needed to tally a stored dataset
#[derive(Deserialize)]
struct StoredLabel {
    #[serde(default)]
    label: Option<i8>,
}

pub struct JsonlPersistence {
    path: PathBuf,
    writer: BufWriter<File>,
    labeled_only: bool,
    rows_written: u64,
}

impl JsonlPersistence {
    /// Open `path` for appending, creating parent directories as needed.
    /// With `labeled_only`, vectors without a resolved label are skipped.
    pub fn create<P: AsRef<Path>>(path: P, labeled_only: bool) -> SinkResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        log::info!("Writing feature rows to: {}", path.display());

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            labeled_only,
            rows_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows appended by this handle
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Tally the rows already stored at `path`. A missing file is an empty
    /// dataset; unreadable lines are not counted.
    pub fn progress<P: AsRef<Path>>(path: P) -> SinkResult<DatasetProgress> {
        let mut progress = DatasetProgress::new();
        let file = match File::open(path.as_ref()) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(progress),
            Err(e) => return Err(e.into()),
        };

        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(row) = serde_json::from_str::<StoredLabel>(&line) {
                progress.record_target(row.label);
            }
        }
        Ok(progress)
    }
}

impl PersistenceSink for JsonlPersistence {
    fn persist(&mut self, vector: &FeatureVector) -> SinkResult<()> {
        if self.labeled_only && !vector.is_labeled() {
            return Ok(());
        }
        let json = serde_json::to_string(&FeatureRow::from(vector))?;
        writeln!(self.writer, "{}", json)?;
        self.rows_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> SinkResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlPersistence {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
