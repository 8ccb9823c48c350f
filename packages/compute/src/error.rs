use chain_core::{ChainError, ErrorKind};
use cosmwasm_std::StdError;
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

    #[error("Amount must be greater than zero")]
    InvalidZeroAmount {},

    #[error("Escrow request {0} already exists")]
    RequestAlreadyExists(u64),

    #[error("Escrow request {0} not found")]
    RequestNotFound(u64),

    #[error("Escrow {0} is not in the required state for this operation")]
    InvalidState(u64),

    #[error("Escrow {0} has already expired")]
    AlreadyExpired(u64),

    #[error("Escrow {0} has not yet expired")]
    NotYetExpired(u64),

    #[error("Escrow {0} is still within its challenge window")]
    ChallengeNotElapsed(u64),

    #[error("Escrow {0} already has a release or refund attempt recorded")]
    AttemptAlreadyRecorded(u64),

    #[error("Provider {0} not found")]
    ProviderNotFound(String),

    #[error("Provider {0} is already registered")]
    ProviderAlreadyExists(String),

    #[error("Provider {0} is not active")]
    ProviderInactive(String),

    #[error("Result proof failed verification for request {0}")]
    ProofVerificationFailed(u64),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
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
            ContractError::RequestNotFound(_) | ContractError::ProviderNotFound(_) => {
                ErrorKind::NotFound
            }
            ContractError::InvalidZeroAmount {}
            | ContractError::RequestAlreadyExists(_)
            | ContractError::InvalidState(_)
            | ContractError::AlreadyExpired(_)
            | ContractError::NotYetExpired(_)
            | ContractError::ChallengeNotElapsed(_)
            | ContractError::AttemptAlreadyRecorded(_)
            | ContractError::ProviderAlreadyExists(_)
            | ContractError::ProviderInactive(_)
            | ContractError::ProofVerificationFailed(_) => ErrorKind::InvalidRequest,
            ContractError::InvariantViolation(_) => ErrorKind::InvariantViolation,
        };
        ChainError::new(kind, err.to_string())
    }
}
