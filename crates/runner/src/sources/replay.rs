//! Replay of recorded snapshots
//!
//! Each JSON line is one [`MarketSnapshot`] in wire form
//! (`{"bids": [...], "asks": [...], "trades": [...], "timestamp": ...}`).
//! When a [`ManualClock`] is attached the source drives it, so the engines
//! see recorded time instead of wall time.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use chrono::Duration;
use microflow_clock::ManualClock;
use microflow_core::MarketSnapshot;
use microflow_ports::SnapshotSource;

pub struct ReplaySource {
    snapshots: Vec<Arc<MarketSnapshot>>,
    cursor: usize,
    clock: Option<(Arc<ManualClock>, Duration)>,
}

impl ReplaySource {
    pub fn new(snapshots: Vec<MarketSnapshot>) -> Self {
        Self {
            snapshots: snapshots.into_iter().map(Arc::new).collect(),
            cursor: 0,
            clock: None,
        }
    }

    /// Read a JSON-lines recording. Blank lines are ignored and lines that
    /// do not parse are skipped with a warning.
    pub fn from_jsonl<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);

        let mut snapshots = Vec::new();
        let mut skipped = 0usize;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<MarketSnapshot>(&line) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    skipped += 1;
                    log::warn!("{}:{}: skipping malformed snapshot: {}", path.display(), index + 1, e);
                }
            }
        }

        log::info!(
            "Loaded {} snapshots from {} ({} skipped)",
            snapshots.len(),
            path.display(),
            skipped
        );
        Ok(Self::new(snapshots))
    }

    /// Drive `clock` while replaying: snapshots carrying a timestamp set it,
    /// the others advance it by `step`.
    pub fn with_clock(mut self, clock: Arc<ManualClock>, step: Duration) -> Self {
        self.clock = Some((clock, step));
        self
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.snapshots.len() - self.cursor
    }
}

impl SnapshotSource for ReplaySource {
    fn latest(&mut self) -> Option<Arc<MarketSnapshot>> {
        let snapshot = Arc::clone(self.snapshots.get(self.cursor)?);
        self.cursor += 1;

        if let Some((clock, step)) = &self.clock {
            match snapshot.timestamp() {
                Some(at) => clock.set_time(at),
                None => clock.advance(*step),
            }
        }
        Some(snapshot)
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.snapshots.len()
    }

    fn name(&self) -> &str {
        "ReplaySource"
    }
}
