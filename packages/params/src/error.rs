use chain_core::{ChainError, ErrorKind};
use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized: only the governance authority may set module params")]
    Unauthorized {},

    #[error("Params not initialized for this module")]
    NotFound {},
}

impl From<ContractError> for ChainError {
    fn from(err: ContractError) -> Self {
        let kind = match &err {
            ContractError::Std(_) => ErrorKind::InvariantViolation,
            ContractError::Unauthorized {} => ErrorKind::Unauthorized,
            ContractError::NotFound {} => ErrorKind::NotFound,
        };
        ChainError::new(kind, err.to_string())
    }
}
