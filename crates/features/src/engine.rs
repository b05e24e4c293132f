//! Feature engine
//!
//! Turns a stream of market snapshots into [`FeatureVector`]s and, after the
//! labeling horizon, into labeled training samples.
//!
//! One `update` call:
//! 1. is ignored if it arrives inside the update interval,
//! 2. derives imbalance, spread and mid from the book (falling back to the
//!    last good mid for a degenerate book),
//! 3. books the trades into the delta ledger and evicts stale ones,
//! 4. computes volatility over the recent mids,
//! 5. records the new vector in the label history and resolves every
//!    pending sample whose horizon has elapsed. Both steps wait for a
//!    book with a valid top, so labels are never set against a stale mid.

use microflow_core::{FeatureVector, LabeledSample, MarketSnapshot, Price, Timestamp};
use rust_decimal::prelude::ToPrimitive;

use crate::calculations::{Calculations, NEUTRAL_IMBALANCE};
use crate::config::FeatureConfig;
use crate::events::{FeatureEvent, QualityIssue};
use crate::labeling::{LabelHistory, select_emitted};
use crate::ledger::TradeLedger;
use crate::price_series::PriceSeries;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Stateful microstructure feature calculator
#[derive(Debug, Clone)]
pub struct FeatureEngine {
    config: FeatureConfig,
    ledger: TradeLedger,
    prices: PriceSeries,
    history: LabelHistory,
    /// Vector produced by the last accepted cycle
    current: Option<FeatureVector>,
    last_update: Option<Timestamp>,
    events: Vec<FeatureEvent>,
}

impl FeatureEngine {
    pub fn new(config: FeatureConfig) -> Self {
        Self {
            ledger: TradeLedger::new(config.delta_window()),
            prices: PriceSeries::new(config.volatility_samples),
            history: LabelHistory::new(
                config.history_capacity,
                config.retention(),
                config.horizon(),
                config.label_threshold_pct,
            ),
            current: None,
            last_update: None,
            events: Vec::new(),
            config,
        }
    }

    /// Feed one snapshot observed at `now`.
    ///
    /// Returns the vector to hand downstream: a historical vector that got
    /// its label during this call if there is one, else the vector computed
    /// now. Calls inside the update interval, and calls without any usable
    /// price, return the previous vector unchanged. `None` only until the
    /// first valid price has been seen.
    pub fn update(&mut self, snapshot: &MarketSnapshot, now: Timestamp) -> Option<FeatureVector> {
        if let Some(last) = self.last_update
            && now - last < self.config.update_interval()
        {
            self.events.push(FeatureEvent::RateLimited {
                at: now,
                dropped_trades: snapshot.trades.len(),
            });
            return self.current.clone();
        }

        let book = &snapshot.book;
        let top = book.top_of_book();
        let mid = match top {
            Some(top) => top.mid(),
            None => {
                self.quality_issue(now, QualityIssue::DegenerateBook);
                match self.prices.last() {
                    Some(last_mid) => last_mid,
                    None => {
                        self.quality_issue(now, QualityIssue::NoValidPrice);
                        return self.current.clone();
                    }
                }
            }
        };
        if !self.config.is_plausible_price(mid) {
            self.quality_issue(now, QualityIssue::PriceOutOfRange { mid });
            return self.current.clone();
        }

        let (imbalance, spread_pct) = if top.is_some() {
            self.prices.push(now, mid);
            (
                Calculations::imbalance(
                    book,
                    self.config.depth_levels,
                    self.config.imbalance_floor,
                    self.config.imbalance_ceiling,
                ),
                Calculations::spread_pct(book),
            )
        } else {
            (NEUTRAL_IMBALANCE, None)
        };

        let rejected = snapshot
            .trades
            .iter()
            .filter(|trade| !self.ledger.record(trade, now))
            .count();
        if rejected > 0 {
            self.quality_issue(now, QualityIssue::RejectedTrades { count: rejected });
        }
        self.ledger.evict(now);

        let vector = FeatureVector {
            timestamp: now,
            imbalance,
            spread_pct,
            cumulative_delta: self.ledger.cumulative_delta(),
            delta_per_minute: self.delta_per_minute(),
            volatility: self.prices.volatility(),
            mid_price: mid,
            buy_trades: self.ledger.buy_count(),
            sell_trades: self.ledger.sell_count(),
            label: None,
        };
        self.current = Some(vector.clone());
        self.last_update = Some(now);

        // a degenerate book carries no fresh price: it neither starts a
        // sample nor resolves one
        let resolved = if top.is_some() {
            if let Some(event) = self.history.record(vector.clone()) {
                self.events.push(event);
            }
            self.history.resolve(now, mid)
        } else {
            Vec::new()
        };
        self.history.evict(now);

        for sample in &resolved {
            self.events.push(FeatureEvent::LabelResolved {
                observed_at: sample.observed_at(),
                resolved_at: sample.resolved_at(),
                pct_change: sample.pct_change(),
                label: sample.label(),
            });
        }

        Some(
            select_emitted(&resolved)
                .map(|sample| sample.vector().clone())
                .unwrap_or(vector),
        )
    }

    fn quality_issue(&mut self, at: Timestamp, issue: QualityIssue) {
        self.events.push(FeatureEvent::QualityIssue { at, issue });
    }

    /// Cumulative delta rescaled from the delta window to one minute
    fn delta_per_minute(&self) -> f64 {
        let window_ms = self.config.delta_window_ms as f64;
        if window_ms <= 0.0 {
            return 0.0;
        }
        let delta = self.ledger.cumulative_delta().to_f64().unwrap_or(0.0);
        delta * MILLIS_PER_MINUTE / window_ms
    }

    /// Vector from the last accepted cycle, never a relabeled historical one
    pub fn current(&self) -> Option<&FeatureVector> {
        self.current.as_ref()
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<FeatureEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    pub fn last_mid(&self) -> Option<Price> {
        self.prices.last()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn pending_samples(&self) -> usize {
        self.history.pending_count()
    }

    /// Labeled samples still retained, oldest first
    pub fn labeled_samples(&self) -> impl Iterator<Item = &LabeledSample> {
        self.history.labeled()
    }

    /// Trades currently inside the delta window
    pub fn ledger_len(&self) -> usize {
        self.ledger.len()
    }
}
