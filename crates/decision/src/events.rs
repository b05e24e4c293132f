use microflow_core::{PositionSide, Price, Quantity, Reason, Timestamp};

/// Something observable happened inside the decision engine
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionEvent {
    /// The vector failed the well-formedness check and was ignored
    InvalidFeatures { at: Timestamp },
    /// Entry conditions held for `side` but a guard or the confirmation count held it back
    SignalSuppressed {
        side: PositionSide,
        reason: Reason,
        at: Timestamp,
    },
    /// An `Enter` decision was produced
    EntrySignal {
        side: PositionSide,
        price: Price,
        at: Timestamp,
    },
    /// An `Exit` decision was produced
    ExitSignal {
        side: PositionSide,
        reason: Reason,
        price: Price,
        at: Timestamp,
    },
    PositionOpened {
        side: PositionSide,
        price: Price,
        size: Quantity,
        at: Timestamp,
    },
    PositionClosed {
        side: PositionSide,
        entry_price: Price,
        size: Quantity,
    },
}
