use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClearingError>;

/// Precondition violations. Market outcomes (a swap that does not fill) are
/// never reported through this type; they surface as failed `SwapOutcome`s.
#[derive(Debug, Error)]
pub enum ClearingError {
    #[error("Pool reserves must both be positive to clear a batch (got {0}, {1})")]
    DepletedReserves(u128, u128),

    #[error("Price {0} has no tick (must be positive and finite)")]
    InvalidPrice(f64),

    #[error("Unknown token index {0} (expected 0 or 1)")]
    UnknownToken(u8),

    #[error("Amount overflow while {0}")]
    AmountOverflow(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("Parse float error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error("Parse int error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
