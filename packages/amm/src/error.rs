use chain_core::{ChainError, ErrorKind};
use cosmwasm_std::{OverflowError, StdError};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Bank(ChainError),

    #[error("Module is disabled")]
    ModuleDisabled {},

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Doubling assets in a pool's token pair")]
    DoublingAssets {},

    #[error("A pool for this token pair already exists")]
    PoolAlreadyExists {},

    #[error("Pool not found")]
    PoolNotFound {},

    #[error("Initial liquidity must be at least {0}")]
    MinimumLiquidityAmountError(u128),

    #[error("Initial deposit ratio deviates from the pool's canonical order by more than the allowed skew")]
    RatioSkewExceeded {},

    #[error("Amount must be greater than zero")]
    InvalidZeroAmount {},

    #[error("Minted share amount must be greater than zero")]
    InsufficientShareAmount {},

    #[error("Liquidity is locked until block {0} (flash-loan protection)")]
    FlashLoanLocked(u64),

    #[error("Swap amount exceeds the MEV bound of 30% of the offer reserve")]
    MevBoundExceeded {},

    #[error("Swap output {actual} is below the requested minimum {min}")]
    SlippageExceeded { actual: u128, min: u128 },

    #[error("Swap would not leave a positive reserve for the ask asset")]
    ReserveExhausted {},

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl From<OverflowError> for ContractError {
    fn from(o: OverflowError) -> Self {
        StdError::from(o).into()
    }
}

impl From<ChainError> for ContractError {
    fn from(err: ChainError) -> Self {
        ContractError::Bank(err)
    }
}

impl From<ContractError> for ChainError {
    fn from(err: ContractError) -> Self {
        let kind = match &err {
            ContractError::Std(_) => ErrorKind::InvariantViolation,
            ContractError::Bank(inner) => inner.kind,
            ContractError::ModuleDisabled {} => ErrorKind::ModuleDisabled,
            ContractError::Unauthorized {} => ErrorKind::Unauthorized,
            ContractError::PoolNotFound {} => ErrorKind::NotFound,
            ContractError::DoublingAssets {}
            | ContractError::PoolAlreadyExists {}
            | ContractError::MinimumLiquidityAmountError(_)
            | ContractError::RatioSkewExceeded {}
            | ContractError::InvalidZeroAmount {}
            | ContractError::InsufficientShareAmount {}
            | ContractError::FlashLoanLocked(_)
            | ContractError::MevBoundExceeded {}
            | ContractError::SlippageExceeded { .. }
            | ContractError::ReserveExhausted {} => ErrorKind::InvalidRequest,
            ContractError::InvariantViolation(_) => ErrorKind::InvariantViolation,
        };
        ChainError::new(kind, err.to_string())
    }
}
