//! Microflow Core Domain
//!
//! Pure data model for the microstructure signal pipeline: order book
//! snapshots and trades in, feature vectors, delayed labels, positions and
//! decisions out. This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    Action,
    BookLevel,
    Decision,
    FeatureVector,
    LabeledSample,
    MarketSnapshot,
    OrderBookSnapshot,
    PendingSample,
    Position,
    PositionSide,
    Reason,
    TopOfBook,
    TradeEvent,
    TradeSide,
    TrendLabel,
};
pub use values::{Price, Quantity, Symbol, Timestamp};
