//! Latest-snapshot handoff between a producer task and the driver
//!
//! ```text
//! Producer ──► publish() ──► rcu: newest book + pending trades ──┐
//!                                                                ▼ atomic swap
//! Driver   ──► latest()  ──► swap(None) ──► Arc<MarketSnapshot> (never torn)
//! ```
//!
//! The slot only ever holds what the driver has not pulled yet. Publishing
//! twice between two pulls keeps the newer book and both batches of trades.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use microflow_core::{MarketSnapshot, OrderBookSnapshot};
use microflow_ports::SnapshotSource;

/// Write half, owned by whatever receives market data
#[derive(Clone, Default)]
pub struct SnapshotPublisher {
    slot: Arc<ArcSwapOption<MarketSnapshot>>,
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new book together with the trades printed since the
    /// previous publication. Trades the driver has not pulled yet are kept
    /// in front of the new ones.
    pub fn publish(&self, snapshot: MarketSnapshot) {
        self.slot.rcu(|pending| {
            let mut next = snapshot.clone();
            if let Some(pending) = pending
                && !pending.trades.is_empty()
            {
                let mut trades = Vec::with_capacity(pending.trades.len() + next.trades.len());
                trades.extend(pending.trades.iter().cloned());
                trades.append(&mut next.trades);
                next.trades = trades;
            }
            Some(Arc::new(next))
        });
    }

    /// Read half for the driver. Pulls drain the slot, so there must be a
    /// single reader.
    pub fn source(&self) -> SharedSnapshotSource {
        SharedSnapshotSource {
            slot: Arc::clone(&self.slot),
            last_book: None,
        }
    }
}

/// Read half. Each pull takes everything published since the previous one;
/// when nothing new arrived it returns the last book without trades.
pub struct SharedSnapshotSource {
    slot: Arc<ArcSwapOption<MarketSnapshot>>,
    last_book: Option<OrderBookSnapshot>,
}

impl SnapshotSource for SharedSnapshotSource {
    fn latest(&mut self) -> Option<Arc<MarketSnapshot>> {
        match self.slot.swap(None) {
            Some(fresh) => {
                self.last_book = Some(fresh.book.clone());
                Some(fresh)
            }
            None => self
                .last_book
                .as_ref()
                .map(|book| Arc::new(MarketSnapshot::from_book(book.clone()))),
        }
    }

    fn name(&self) -> &str {
        "SharedSnapshotSource"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use microflow_core::TradeEvent;
    use rust_decimal_macros::dec;

    fn snapshot(bid: rust_decimal::Decimal) -> MarketSnapshot {
        MarketSnapshot::new(
            OrderBookSnapshot::from_pairs(&[(bid, dec!(1))], &[(bid + dec!(1), dec!(1))]),
            vec![TradeEvent::buy(dec!(2))],
        )
    }

    #[test]
    fn test_empty_until_published() {
        let publisher = SnapshotPublisher::new();
        let mut source = publisher.source();
        assert!(source.latest().is_none());

        publisher.publish(snapshot(dec!(100)));
        assert_eq!(source.latest().unwrap().book.bids[0].price, dec!(100));
    }

    #[test]
    fn test_trades_are_handed_out_once() {
        let publisher = SnapshotPublisher::new();
        let mut source = publisher.source();
        publisher.publish(snapshot(dec!(100)));

        assert_eq!(source.latest().unwrap().trades.len(), 1);
        let again = source.latest().unwrap();
        assert!(again.trades.is_empty());
        assert_eq!(again.book.bids[0].price, dec!(100));

        publisher.publish(snapshot(dec!(101)));
        assert_eq!(source.latest().unwrap().trades.len(), 1);
    }

    #[test]
    fn test_publish_from_another_thread() {
        let publisher = SnapshotPublisher::new();
        let mut source = publisher.source();

        let writer = publisher.clone();
        std::thread::spawn(move || {
            for i in 0..100 {
                writer.publish(snapshot(rust_decimal::Decimal::from(i + 1)));
            }
        })
        .join()
        .unwrap();

        let pulled = source.latest().unwrap();
        assert_eq!(pulled.book.bids[0].price, dec!(100));
        assert_eq!(pulled.trades.len(), 100);
    }

    #[test]
    fn test_publishes_between_pulls_keep_every_trade() {
        let publisher = SnapshotPublisher::new();
        let mut source = publisher.source();

        publisher.publish(MarketSnapshot::new(
            OrderBookSnapshot::from_pairs(&[(dec!(100), dec!(1))], &[(dec!(101), dec!(1))]),
            vec![TradeEvent::buy(dec!(5))],
        ));
        publisher.publish(MarketSnapshot::new(
            OrderBookSnapshot::from_pairs(&[(dec!(102), dec!(1))], &[(dec!(103), dec!(1))]),
            vec![TradeEvent::buy(dec!(3))],
        ));

        let pulled = source.latest().unwrap();
        assert_eq!(pulled.book.bids[0].price, dec!(102));
        let sizes: Vec<_> = pulled.trades.iter().map(|trade| trade.size).collect();
        assert_eq!(sizes, vec![dec!(5), dec!(3)]);

        // drained: the next pull repeats the book only
        let again = source.latest().unwrap();
        assert!(again.trades.is_empty());
        assert_eq!(again.book.bids[0].price, dec!(102));
    }
}
