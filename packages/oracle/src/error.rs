use chain_core::{ChainError, ErrorKind};
use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Module is disabled")]
    ModuleDisabled {},

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Asset {0} is not registered")]
    AssetNotFound(String),

    #[error("Asset {0} is already registered")]
    AssetAlreadyExists(String),

    #[error("Validator {0} is not bonded")]
    ValidatorNotBonded(String),

    #[error("Validator {0} is jailed")]
    ValidatorJailed(String),

    #[error("Signer is neither the validator's operator nor its delegated feeder")]
    NotAuthorizedFeeder {},

    #[error("Submission timestamp {timestamp} is outside the freshness window [{min}, {max}]")]
    StaleTimestamp { timestamp: i64, min: i64, max: i64 },

    #[error("Validator {0} already submitted a price for this asset in this round")]
    DuplicateSubmission(String),

    #[error("Validator {0} exceeded the per-block submission limit")]
    SubmissionLimitExceeded(String),

    #[error("Price must be greater than zero")]
    InvalidPrice {},

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl From<ContractError> for ChainError {
    fn from(err: ContractError) -> Self {
        let kind = match &err {
            ContractError::Std(_) => ErrorKind::InvariantViolation,
            ContractError::ModuleDisabled {} => ErrorKind::ModuleDisabled,
            ContractError::Unauthorized {} | ContractError::NotAuthorizedFeeder {} => {
                ErrorKind::Unauthorized
            }
            ContractError::AssetNotFound(_) => ErrorKind::NotFound,
            ContractError::ValidatorJailed(_) => ErrorKind::Unauthorized,
            ContractError::StaleTimestamp { .. } => ErrorKind::StaleData,
            ContractError::AssetAlreadyExists(_)
            | ContractError::ValidatorNotBonded(_)
            | ContractError::DuplicateSubmission(_)
            | ContractError::SubmissionLimitExceeded(_)
            | ContractError::InvalidPrice {} => ErrorKind::InvalidRequest,
            ContractError::InvariantViolation(_) => ErrorKind::InvariantViolation,
        };
        ChainError::new(kind, err.to_string())
    }
}
