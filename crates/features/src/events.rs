use microflow_core::{Price, Timestamp, TrendLabel};

/// Data-quality problems the engine recovered from locally
#[derive(Debug, Clone, PartialEq)]
pub enum QualityIssue {
    /// Crossed, locked, one-sided or empty book
    DegenerateBook,
    /// Degenerate book and no previous mid to fall back to
    NoValidPrice,
    /// Mid outside the configured plausible range
    PriceOutOfRange { mid: Price },
    /// Trades with a non-positive size were skipped
    RejectedTrades { count: usize },
}

/// Something observable happened inside the feature engine.
///
/// The engine never logs; the driver drains these and decides what to do.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureEvent {
    /// Call arrived inside the update interval and was ignored
    RateLimited { at: Timestamp, dropped_trades: usize },
    QualityIssue { at: Timestamp, issue: QualityIssue },
    /// A pending sample reached its horizon
    LabelResolved {
        observed_at: Timestamp,
        resolved_at: Timestamp,
        pct_change: f64,
        label: TrendLabel,
    },
    /// The history cap pushed out an entry that was still waiting for its label
    PendingDropped { observed_at: Timestamp },
}
