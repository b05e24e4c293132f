use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TradeSide;
use crate::values::{Quantity, Timestamp};

/// Public trade print from the venue's trade feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub side: TradeSide,
    #[serde(alias = "sz")]
    pub size: Quantity,
    /// Exchange-reported trade time, when known
    #[serde(default, alias = "ts", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

impl TradeEvent {
    pub fn new(side: TradeSide, size: Quantity) -> Self {
        Self {
            side,
            size,
            timestamp: None,
        }
    }

    pub fn buy(size: Quantity) -> Self {
        Self::new(TradeSide::Buy, size)
    }

    pub fn sell(size: Quantity) -> Self {
        Self::new(TradeSide::Sell, size)
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Only strictly positive sizes count toward delta and trade counters
    pub fn is_valid(&self) -> bool {
        self.size > Decimal::ZERO
    }

    /// Size signed by aggressor side: buys positive, sells negative
    pub fn signed_size(&self) -> Quantity {
        match self.side {
            TradeSide::Buy => self.size,
            TradeSide::Sell => -self.size,
        }
    }
}
