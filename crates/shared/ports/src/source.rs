use std::sync::Arc;

use microflow_core::MarketSnapshot;

/// Port for market data input
///
/// The core only needs the most recent known state of the book and the
/// trades printed since the previous pull. Transport (WebSocket, REST,
/// recorded files) lives behind this trait.
pub trait SnapshotSource: Send {
    /// Most recent consistent snapshot, or `None` when nothing is available yet
    fn latest(&mut self) -> Option<Arc<MarketSnapshot>>;

    /// True once a finite source has nothing more to give
    fn is_exhausted(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "SnapshotSource"
    }
}

impl<S: SnapshotSource + ?Sized> SnapshotSource for Box<S> {
    fn latest(&mut self) -> Option<Arc<MarketSnapshot>> {
        (**self).latest()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
