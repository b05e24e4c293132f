use microflow_core::{FeatureVector, TrendLabel};
use serde::{Deserialize, Serialize};

/// Labeled rows needed before a dataset stops being `Minimal`
pub const MINIMAL_LABELED_ROWS: u64 = 50;
/// Labeled rows needed before a dataset is `Excellent`
pub const EXCELLENT_LABELED_ROWS: u64 = 200;

/// How ready a collected dataset is for training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataQuality {
    NoData,
    Collecting,
    Minimal,
    Good,
    Excellent,
}

impl DataQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataQuality::NoData => "NO_DATA",
            DataQuality::Collecting => "COLLECTING",
            DataQuality::Minimal => "MINIMAL",
            DataQuality::Good => "GOOD",
            DataQuality::Excellent => "EXCELLENT",
        }
    }

    /// Whether there is enough labeled data to start training
    pub fn is_trainable(&self) -> bool {
        matches!(self, DataQuality::Good | DataQuality::Excellent)
    }
}

impl std::fmt::Display for DataQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running tally of emitted rows and their labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetProgress {
    total_rows: u64,
    labeled_rows: u64,
    down: u64,
    stable: u64,
    up: u64,
}

impl DatasetProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one emitted row
    pub fn record(&mut self, vector: &FeatureVector) {
        self.total_rows += 1;
        if let Some(label) = vector.label {
            self.record_label(label);
        }
    }

    fn record_label(&mut self, label: TrendLabel) {
        self.labeled_rows += 1;
        match label {
            TrendLabel::Down => self.down += 1,
            TrendLabel::Stable => self.stable += 1,
            TrendLabel::Up => self.up += 1,
        }
    }

    /// Count one stored row given only its numeric target, as read back from disk
    pub fn record_target(&mut self, target: Option<i8>) {
        self.total_rows += 1;
        if let Some(label) = target.and_then(TrendLabel::from_int) {
            self.record_label(label);
        }
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn labeled_rows(&self) -> u64 {
        self.labeled_rows
    }

    pub fn count(&self, label: TrendLabel) -> u64 {
        match label {
            TrendLabel::Down => self.down,
            TrendLabel::Stable => self.stable,
            TrendLabel::Up => self.up,
        }
    }

    /// Label counts, omitting labels never seen
    pub fn distribution(&self) -> Vec<(TrendLabel, u64)> {
        [TrendLabel::Down, TrendLabel::Stable, TrendLabel::Up]
            .into_iter()
            .map(|label| (label, self.count(label)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    pub fn quality(&self) -> DataQuality {
        if self.total_rows == 0 {
            DataQuality::NoData
        } else if self.labeled_rows == 0 {
            DataQuality::Collecting
        } else if self.labeled_rows < MINIMAL_LABELED_ROWS {
            DataQuality::Minimal
        } else if self.labeled_rows < EXCELLENT_LABELED_ROWS {
            DataQuality::Good
        } else {
            DataQuality::Excellent
        }
    }

    /// Labeled rows still missing before training makes sense
    pub fn rows_until_trainable(&self) -> u64 {
        MINIMAL_LABELED_ROWS.saturating_sub(self.labeled_rows)
    }
}

impl std::fmt::Display for DatasetProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows, {} labeled (down={}, stable={}, up={}), quality {}",
            self.total_rows,
            self.labeled_rows,
            self.down,
            self.stable,
            self.up,
            self.quality()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_tiers() {
        let mut progress = DatasetProgress::new();
        assert_eq!(progress.quality(), DataQuality::NoData);

        progress.record_target(None);
        assert_eq!(progress.quality(), DataQuality::Collecting);

        progress.record_target(Some(1));
        assert_eq!(progress.quality(), DataQuality::Minimal);
        assert_eq!(progress.rows_until_trainable(), 49);

        for _ in 0..49 {
            progress.record_target(Some(0));
        }
        assert_eq!(progress.quality(), DataQuality::Good);
        assert!(progress.quality().is_trainable());

        for _ in 0..150 {
            progress.record_target(Some(-1));
        }
        assert_eq!(progress.labeled_rows(), 200);
        assert_eq!(progress.quality(), DataQuality::Excellent);
    }

    #[test]
    fn test_distribution_skips_empty_labels() {
        let mut progress = DatasetProgress::new();
        progress.record_target(Some(1));
        progress.record_target(Some(1));
        progress.record_target(Some(7));

        assert_eq!(progress.total_rows(), 3);
        assert_eq!(progress.labeled_rows(), 2);
        assert_eq!(progress.distribution(), vec![(TrendLabel::Up, 2)]);
    }
}
