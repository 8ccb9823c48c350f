use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Ante(#[from] ante::AnteError),

    #[error(transparent)]
    Amm(#[from] amm::ContractError),

    #[error(transparent)]
    Compute(#[from] compute::ContractError),

    #[error(transparent)]
    Oracle(#[from] oracle::ContractError),

    #[error(transparent)]
    Ibc(#[from] ibc::ContractError),

    #[error(transparent)]
    Params(#[from] params::error::ContractError),

    #[error(transparent)]
    Gas(#[from] chain_core::ChainError),

    #[error(transparent)]
    Std(#[from] cosmwasm_std::StdError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unsupported message kind for this subcommand")]
    UnsupportedMessage,
}
