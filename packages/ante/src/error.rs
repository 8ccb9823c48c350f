use thiserror::Error;

use chain_core::{ChainError, ErrorKind};

/// Rejections produced by the ante chain. Every variant maps to a step in
/// the ordered sequence; a reader can match variant to step without
/// consulting anything outside this file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnteError {
    #[error("block time {declared} is more than {max_drift_secs}s ahead of wall clock {wall_clock}")]
    BlockTimeTooFarAhead {
        declared: i64,
        wall_clock: i64,
        max_drift_secs: i64,
    },

    #[error("message count {count} exceeds the per-tx cap of {max}")]
    TooManyMessages { count: usize, max: usize },

    #[error("gas limit {limit} exceeds the per-tx cap of {max}")]
    GasLimitTooHigh { limit: u64, max: u64 },

    #[error("message gas ceiling {ceiling} exceeds the global per-message cap of {max}")]
    PerMessageGasCeilingTooHigh { ceiling: u64, max: u64 },

    #[error("unknown extension option {0:?}")]
    UnknownExtensionOption(String),

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("timeout height {timeout} exceeded by current height {current}")]
    TimeoutExceeded { current: i64, timeout: i64 },

    #[error("memo length {len} exceeds the {max}-byte cap")]
    MemoTooLong { len: usize, max: usize },

    #[error("insufficient fee: have {have}, need {need} {denom}")]
    InsufficientFee { have: u128, need: u128, denom: String },

    #[error("account sequence mismatch: expected {expected}, got {got}")]
    SequenceMismatch { expected: u64, got: u64 },

    #[error("{0} module is disabled")]
    ModuleDisabled(&'static str),

    #[error("module check failed: {0}")]
    ModuleCheckFailed(String),

    #[error("out of gas")]
    OutOfGas(#[from] ChainError),
}

impl From<AnteError> for ChainError {
    fn from(err: AnteError) -> Self {
        match &err {
            AnteError::OutOfGas(inner) => inner.clone(),
            AnteError::ModuleDisabled(_) => ChainError::new(ErrorKind::ModuleDisabled, err.to_string()),
            AnteError::SequenceMismatch { .. } => ChainError::new(ErrorKind::Unauthorized, err.to_string()),
            _ => ChainError::new(ErrorKind::InvalidRequest, err.to_string()),
        }
    }
}
