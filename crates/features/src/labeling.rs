//! Delayed labeling
//!
//! Every computed vector enters the history as a [`PendingSample`]. Once its
//! horizon has elapsed it is resolved, exactly once, into a [`LabeledSample`]
//! against the mid price of that moment. Labeled entries stay around until
//! they age past the retention window.

use chrono::Duration;
use microflow_core::{FeatureVector, LabeledSample, PendingSample, Price, Timestamp};

use crate::events::FeatureEvent;
use crate::window::RollingWindow;

#[derive(Debug, Clone)]
pub enum HistoryEntry {
    Pending(PendingSample),
    Labeled(LabeledSample),
}

impl HistoryEntry {
    pub fn is_labeled(&self) -> bool {
        matches!(self, HistoryEntry::Labeled(_))
    }

    pub fn vector(&self) -> &FeatureVector {
        match self {
            HistoryEntry::Pending(sample) => sample.vector(),
            HistoryEntry::Labeled(sample) => sample.vector(),
        }
    }
}

/// Bounded buffer of vectors awaiting or holding their label
#[derive(Debug, Clone)]
pub struct LabelHistory {
    window: RollingWindow<HistoryEntry>,
    horizon: Duration,
    threshold_pct: f64,
}

impl LabelHistory {
    pub fn new(capacity: usize, retention: Duration, horizon: Duration, threshold_pct: f64) -> Self {
        Self {
            window: RollingWindow::new(Some(capacity), Some(retention)),
            horizon,
            threshold_pct,
        }
    }

    /// Add a freshly computed vector. Returns the event describing a pending
    /// sample lost to the count bound, if that happened.
    pub fn record(&mut self, vector: FeatureVector) -> Option<FeatureEvent> {
        let at = vector.timestamp;
        match self.window.push(at, HistoryEntry::Pending(PendingSample::new(vector))) {
            Some(dropped) if !dropped.value.is_labeled() => Some(FeatureEvent::PendingDropped {
                observed_at: dropped.at,
            }),
            _ => None,
        }
    }

    /// Label every pending entry at least `horizon` old against `mid_now`.
    ///
    /// Returns the newly labeled samples, oldest first.
    pub fn resolve(&mut self, now: Timestamp, mid_now: Price) -> Vec<LabeledSample> {
        let mut resolved = Vec::new();
        for entry in self.window.iter_mut() {
            if entry.age(now) < self.horizon {
                // history is time ordered, nothing further is due
                break;
            }
            if let HistoryEntry::Pending(pending) = &entry.value {
                let labeled = pending.clone().resolve(now, mid_now, self.threshold_pct);
                entry.value = HistoryEntry::Labeled(labeled.clone());
                resolved.push(labeled);
            }
        }
        resolved
    }

    /// Drop labeled entries past retention. Pending entries are never
    /// dropped by age.
    pub fn evict(&mut self, now: Timestamp) -> usize {
        self.window.evict_expired_where(now, HistoryEntry::is_labeled)
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.window.values().filter(|entry| !entry.is_labeled()).count()
    }

    /// Labeled samples still in the buffer, oldest first
    pub fn labeled(&self) -> impl Iterator<Item = &LabeledSample> {
        self.window.values().filter_map(|entry| match entry {
            HistoryEntry::Labeled(sample) => Some(sample),
            HistoryEntry::Pending(_) => None,
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.window.values()
    }
}

/// Pick the sample to hand downstream from one call's resolutions: the most
/// recent directional label if there is one, else the most recent label.
pub fn select_emitted(resolved: &[LabeledSample]) -> Option<&LabeledSample> {
    resolved
        .iter()
        .rev()
        .find(|sample| sample.label().is_directional())
        .or_else(|| resolved.last())
}
