use serde::{Deserialize, Serialize};

use super::PositionSide;
use crate::values::{Price, Timestamp};

/// What the decision engine wants done this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Enter,
    Exit,
    Hold,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Enter => "ENTER",
            Action::Exit => "EXIT",
            Action::Hold => "HOLD",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a decision was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Entry conditions met and confirmed
    EntrySignal,
    /// Entry conditions met but not yet persisted long enough
    Confirming,
    /// Entry suppressed by the post-entry cooldown
    Cooldown,
    /// Spread unavailable or too wide
    SpreadGuard,
    /// Volatility above the configured ceiling
    VolatilityGuard,
    /// Nothing to do
    NoSignal,
    /// Feature vector failed the well-formedness check
    InvalidFeatures,
    /// Position younger than the minimum hold
    MinHold,
    /// Position older than the maximum hold
    TimeExit,
    /// Imbalance and delta flow reversed against the position
    ReversalExit,
    /// In position, no exit condition met
    Holding,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::EntrySignal => "entry_signal",
            Reason::Confirming => "confirming",
            Reason::Cooldown => "cooldown",
            Reason::SpreadGuard => "spread_guard",
            Reason::VolatilityGuard => "volatility_guard",
            Reason::NoSignal => "no_signal",
            Reason::InvalidFeatures => "invalid_features",
            Reason::MinHold => "min_hold",
            Reason::TimeExit => "time_exit",
            Reason::ReversalExit => "reversal_exit",
            Reason::Holding => "holding",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one `analyze` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    /// Side being entered or exited; `None` for `Hold`
    pub side: Option<PositionSide>,
    /// Reference price (mid) the decision was taken at
    pub price: Price,
    pub reason: Reason,
    pub timestamp: Timestamp,
}

impl Decision {
    pub fn enter(side: PositionSide, price: Price, reason: Reason, timestamp: Timestamp) -> Self {
        Self {
            action: Action::Enter,
            side: Some(side),
            price,
            reason,
            timestamp,
        }
    }

    pub fn exit(side: PositionSide, price: Price, reason: Reason, timestamp: Timestamp) -> Self {
        Self {
            action: Action::Exit,
            side: Some(side),
            price,
            reason,
            timestamp,
        }
    }

    pub fn hold(price: Price, reason: Reason, timestamp: Timestamp) -> Self {
        Self {
            action: Action::Hold,
            side: None,
            price,
            reason,
            timestamp,
        }
    }

    /// True for `Enter` and `Exit`
    pub fn is_actionable(&self) -> bool {
        self.action != Action::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_constructors() {
        let now = Utc::now();
        let enter = Decision::enter(PositionSide::Long, dec!(100), Reason::EntrySignal, now);
        assert!(enter.is_actionable());
        assert_eq!(enter.side, Some(PositionSide::Long));

        let hold = Decision::hold(dec!(100), Reason::Cooldown, now);
        assert!(!hold.is_actionable());
        assert_eq!(hold.side, None);
    }

    #[test]
    fn test_reason_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Reason::TimeExit).unwrap(), "\"time_exit\"");
        assert_eq!(Reason::ReversalExit.to_string(), "reversal_exit");
        assert_eq!(serde_json::to_string(&Action::Enter).unwrap(), "\"ENTER\"");
    }
}
