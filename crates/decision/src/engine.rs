//! Decision state machine
//!
//! Two states: flat and in position. `analyze` only ever proposes a
//! transition; the position itself changes exclusively through
//! [`DecisionEngine::record_entry`] and [`DecisionEngine::record_exit`], called
//! by the driver once the execution side has acted.
//!
//! Flat, in order: data quality, entry signal (imbalance, delta, trend),
//! spread guard, volatility guard, confirmation, cooldown.
//!
//! In position, in order: minimum hold, maximum hold, data quality, spread
//! guard, reversal.

use microflow_core::{
    Action, Decision, FeatureVector, Position, PositionSide, Price, Quantity, Reason, Timestamp,
};
use rust_decimal::Decimal;

use crate::config::DecisionConfig;
use crate::confirmation::ConfirmationCounter;
use crate::events::DecisionEvent;
use crate::trend::{ImbalanceTrend, TrendDirection};

#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: DecisionConfig,
    position: Option<Position>,
    trend: ImbalanceTrend,
    confirmation: ConfirmationCounter,
    last_entry_time: Option<Timestamp>,
    /// Mid of the last well-formed vector
    last_good_mid: Option<Price>,
    events: Vec<DecisionEvent>,
}

impl DecisionEngine {
    pub fn new(config: DecisionConfig) -> Self {
        Self {
            trend: ImbalanceTrend::new(config.trend_periods),
            confirmation: ConfirmationCounter::new(config.confirmation_periods),
            position: None,
            last_entry_time: None,
            last_good_mid: None,
            events: Vec::new(),
            config,
        }
    }

    /// Evaluate one feature vector at `now`.
    ///
    /// Never fails: anything unusable degrades to `Hold`.
    pub fn analyze(&mut self, vector: &FeatureVector, now: Timestamp) -> Decision {
        let well_formed = vector.is_well_formed();
        if well_formed {
            self.trend.push(vector.timestamp, vector.imbalance);
            self.last_good_mid = Some(vector.mid_price);
        } else {
            self.events.push(DecisionEvent::InvalidFeatures { at: now });
        }

        let decision = match self.position.clone() {
            Some(position) => self.evaluate_exit(&position, vector, well_formed, now),
            None => self.evaluate_entry(vector, well_formed, now),
        };

        match (decision.action, decision.side) {
            (Action::Enter, Some(side)) => {
                self.events.push(DecisionEvent::EntrySignal {
                    side,
                    price: decision.price,
                    at: now,
                });
            }
            (Action::Exit, Some(side)) => {
                self.events.push(DecisionEvent::ExitSignal {
                    side,
                    reason: decision.reason,
                    price: decision.price,
                    at: now,
                });
            }
            _ => {}
        }
        decision
    }

    fn evaluate_entry(&mut self, vector: &FeatureVector, well_formed: bool, now: Timestamp) -> Decision {
        let price = self.reference_price(vector, well_formed);
        if !well_formed {
            return Decision::hold(price, Reason::InvalidFeatures, now);
        }

        let Some(side) = self.entry_signal(vector) else {
            self.confirmation.reset();
            return Decision::hold(price, Reason::NoSignal, now);
        };

        if !self.spread_ok(vector) {
            return self.suppress(side, Reason::SpreadGuard, price, now);
        }
        if let Some(max_volatility) = self.config.max_volatility_pct
            && vector.volatility > max_volatility
        {
            return self.suppress(side, Reason::VolatilityGuard, price, now);
        }
        if !self.confirmation.observe(side) {
            return self.suppress(side, Reason::Confirming, price, now);
        }
        if self.in_cooldown(now) {
            return self.suppress(side, Reason::Cooldown, price, now);
        }

        Decision::enter(side, price, Reason::EntrySignal, now)
    }

    fn suppress(&mut self, side: PositionSide, reason: Reason, price: Price, now: Timestamp) -> Decision {
        if matches!(reason, Reason::SpreadGuard | Reason::VolatilityGuard) {
            self.confirmation.reset();
        }
        self.events.push(DecisionEvent::SignalSuppressed { side, reason, at: now });
        Decision::hold(price, reason, now)
    }

    fn evaluate_exit(
        &mut self,
        position: &Position,
        vector: &FeatureVector,
        well_formed: bool,
        now: Timestamp,
    ) -> Decision {
        let price = self.reference_price(vector, well_formed);
        let held = position.held_for(now);

        if held < self.config.min_hold() {
            return Decision::hold(price, Reason::MinHold, now);
        }
        if held >= self.config.max_hold() {
            let exit_price = if well_formed || self.last_good_mid.is_some() {
                price
            } else {
                position.entry_price
            };
            return Decision::exit(position.side, exit_price, Reason::TimeExit, now);
        }
        if !well_formed {
            return Decision::hold(price, Reason::InvalidFeatures, now);
        }
        if !self.spread_ok(vector) {
            return Decision::hold(price, Reason::SpreadGuard, now);
        }
        if self.is_reversal(position.side, vector) {
            return Decision::exit(position.side, price, Reason::ReversalExit, now);
        }

        Decision::hold(price, Reason::Holding, now)
    }

    /// Side whose entry conditions hold, ignoring guards
    fn entry_signal(&self, vector: &FeatureVector) -> Option<PositionSide> {
        let threshold = self.config.imbalance_threshold;
        let delta_threshold = self.config.delta_threshold;
        let delta = vector.cumulative_delta;

        match self.trend.direction()? {
            TrendDirection::Rising if vector.imbalance > threshold && delta > delta_threshold => {
                Some(PositionSide::Long)
            }
            TrendDirection::Falling
                if vector.imbalance < 1.0 - threshold && delta < -delta_threshold =>
            {
                Some(PositionSide::Short)
            }
            _ => None,
        }
    }

    fn is_reversal(&self, side: PositionSide, vector: &FeatureVector) -> bool {
        let threshold = self.config.exit_imbalance_threshold;
        let rate = self.config.exit_delta_rate;
        match side {
            PositionSide::Long => vector.imbalance < threshold && vector.delta_per_minute < rate,
            PositionSide::Short => {
                vector.imbalance > 1.0 - threshold && vector.delta_per_minute > -rate
            }
        }
    }

    fn spread_ok(&self, vector: &FeatureVector) -> bool {
        vector
            .spread_pct
            .is_some_and(|spread| spread <= self.config.spread_max_pct)
    }

    fn in_cooldown(&self, now: Timestamp) -> bool {
        self.last_entry_time
            .is_some_and(|last| now - last < self.config.min_signal_interval())
    }

    /// Vector mid when usable, else the last usable mid, else zero
    fn reference_price(&self, vector: &FeatureVector, well_formed: bool) -> Price {
        if well_formed {
            vector.mid_price
        } else {
            self.last_good_mid.unwrap_or(Decimal::ZERO)
        }
    }

    /// Open the position after an `Enter` was executed.
    ///
    /// # Panics
    /// If a position is already open.
    pub fn record_entry(&mut self, side: PositionSide, price: Price, size: Quantity, now: Timestamp) {
        if let Some(open) = &self.position {
            panic!(
                "record_entry({side}) while already in a {} position opened at {}",
                open.side, open.entry_time
            );
        }
        self.position = Some(Position::new(side, price, size, now));
        self.last_entry_time = Some(now);
        self.confirmation.reset();
        self.events.push(DecisionEvent::PositionOpened {
            side,
            price,
            size,
            at: now,
        });
    }

    /// Close the position after an `Exit` was executed, returning it.
    ///
    /// # Panics
    /// If no position is open.
    pub fn record_exit(&mut self) -> Position {
        let Some(position) = self.position.take() else {
            panic!("record_exit() while flat");
        };
        self.events.push(DecisionEvent::PositionClosed {
            side: position.side,
            entry_price: position.entry_price,
            size: position.size,
        });
        position
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    pub fn last_entry_time(&self) -> Option<Timestamp> {
        self.last_entry_time
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<DecisionEvent> {
        std::mem::take(&mut self.events)
    }
}
