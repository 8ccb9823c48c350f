use thiserror::Error;

use chain_core::{ChainError, ErrorKind};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("{0}")]
    Std(String),

    #[error("{0}")]
    Bank(ChainError),

    #[error("malformed packet: {0}")]
    MalformedPacket(String),

    #[error("packet ({channel}, {sequence}) was already processed")]
    DuplicatePacket { channel: String, sequence: u64 },

    #[error("transfer {channel}/{sequence} not found")]
    TransferNotFound { channel: String, sequence: u64 },

    #[error("transfer {channel}/{sequence} already finalized")]
    TransferAlreadyFinalized { channel: String, sequence: u64 },
}

impl From<cosmwasm_std::StdError> for ContractError {
    fn from(err: cosmwasm_std::StdError) -> Self {
        ContractError::Std(err.to_string())
    }
}

impl From<ChainError> for ContractError {
    fn from(err: ChainError) -> Self {
        ContractError::Bank(err)
    }
}

impl From<ContractError> for ChainError {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::Bank(inner) => inner,
            ContractError::MalformedPacket(_) => ChainError::new(ErrorKind::InvalidRequest, err.to_string()),
            ContractError::DuplicatePacket { .. } => ChainError::new(ErrorKind::InvalidRequest, err.to_string()),
            ContractError::TransferNotFound { .. } => ChainError::new(ErrorKind::NotFound, err.to_string()),
            ContractError::TransferAlreadyFinalized { .. } => {
                ChainError::new(ErrorKind::InvariantViolation, err.to_string())
            }
            ContractError::Std(_) => ChainError::new(ErrorKind::InvariantViolation, err.to_string()),
        }
    }
}
