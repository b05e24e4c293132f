use microflow_core::Timestamp;
use microflow_features::RollingWindow;

/// Direction of the short-term imbalance trend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Rising,
    Falling,
    Flat,
}

/// Last `periods` imbalance readings, one per distinct feature timestamp
#[derive(Debug, Clone)]
pub struct ImbalanceTrend {
    window: RollingWindow<f64>,
    periods: usize,
}

impl ImbalanceTrend {
    pub fn new(periods: usize) -> Self {
        let periods = periods.max(2);
        Self {
            window: RollingWindow::with_capacity(periods),
            periods,
        }
    }

    /// Record the reading of the vector computed at `at`. A vector that is
    /// not newer than the last recorded one is ignored; returns whether the
    /// reading was taken.
    pub fn push(&mut self, at: Timestamp, imbalance: f64) -> bool {
        if self.window.back().is_some_and(|last| at <= last.at) {
            return false;
        }
        self.window.push(at, imbalance);
        true
    }

    /// Compares newest to oldest reading. `None` until the window is full.
    pub fn direction(&self) -> Option<TrendDirection> {
        if self.window.len() < self.periods {
            return None;
        }
        let first = self.window.front()?.value;
        let last = self.window.back()?.value;
        Some(if last > first {
            TrendDirection::Rising
        } else if last < first {
            TrendDirection::Falling
        } else {
            TrendDirection::Flat
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}
