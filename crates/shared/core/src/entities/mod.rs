mod book;
mod decision;
mod feature_vector;
mod label;
mod position;
mod sample;
mod side;
mod snapshot;
mod trade;

pub use book::{BookLevel, OrderBookSnapshot, TopOfBook};
pub use decision::{Action, Decision, Reason};
pub use feature_vector::FeatureVector;
pub use label::TrendLabel;
pub use position::Position;
pub use sample::{LabeledSample, PendingSample};
pub use side::{PositionSide, TradeSide};
pub use snapshot::MarketSnapshot;
pub use trade::TradeEvent;
