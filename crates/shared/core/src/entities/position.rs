use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PositionSide;
use crate::values::{Price, Quantity, Timestamp};

/// The single open position held by the decision engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Unique position identifier
    pub id: Uuid,

    /// Position side (long/short)
    pub side: PositionSide,

    /// Fill price reported when the position was opened
    pub entry_price: Price,

    /// When the position was opened
    pub entry_time: Timestamp,

    /// Position quantity (always positive)
    pub size: Quantity,
}

impl Position {
    pub fn new(side: PositionSide, entry_price: Price, size: Quantity, entry_time: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            side,
            entry_price,
            entry_time,
            size,
        }
    }

    /// Time elapsed since entry. Never negative.
    pub fn held_for(&self, now: Timestamp) -> Duration {
        (now - self.entry_time).max(Duration::zero())
    }

    pub fn is_long(&self) -> bool {
        self.side == PositionSide::Long
    }

    /// Unrealized P&L at `mark_price`
    pub fn unrealized_pnl(&self, mark_price: Price) -> Decimal {
        let price_diff = mark_price - self.entry_price;
        match self.side {
            PositionSide::Long => price_diff * self.size,
            PositionSide::Short => -price_diff * self.size,
        }
    }

    /// Unrealized P&L as a percentage of the entry price
    pub fn unrealized_pnl_pct(&self, mark_price: Price) -> Decimal {
        if self.entry_price.is_zero() {
            return Decimal::ZERO;
        }
        let move_pct = (mark_price - self.entry_price) / self.entry_price * Decimal::ONE_HUNDRED;
        match self.side {
            PositionSide::Long => move_pct,
            PositionSide::Short => -move_pct,
        }
    }
}
