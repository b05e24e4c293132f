use thiserror::Error;

/// Failures reported by external sinks
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Rejected by sink: {0}")]
    Rejected(String),

    #[error("Sink is closed")]
    Closed,
}

pub type SinkResult<T> = std::result::Result<T, SinkError>;
