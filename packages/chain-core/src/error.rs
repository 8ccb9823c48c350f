use std::fmt;

use cosmwasm_std::StdError;
use thiserror::Error;

/// Abstract error taxonomy surfaced to the dispatch layer. Every
/// module-local `ContractError` converts into one of these kinds so a
/// wrapped error never loses its original classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidAddress,
    InvalidRequest,
    InsufficientFunds,
    NotFound,
    Unauthorized,
    ModuleDisabled,
    StaleData,
    Outlier,
    InvariantViolation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidAddress => "ErrInvalidAddress",
            ErrorKind::InvalidRequest => "ErrInvalidRequest",
            ErrorKind::InsufficientFunds => "ErrInsufficientFunds",
            ErrorKind::NotFound => "ErrNotFound",
            ErrorKind::Unauthorized => "ErrUnauthorized",
            ErrorKind::ModuleDisabled => "ErrModuleDisabled",
            ErrorKind::StaleData => "ErrStaleData",
            ErrorKind::Outlier => "ErrOutlier",
            ErrorKind::InvariantViolation => "ErrInvariantViolation",
        };
        f.write_str(name)
    }
}

/// A chain-wide error: a stable [`ErrorKind`] plus a human-readable message.
/// Wrapping with [`ChainError::context`] prepends detail without discarding
/// the kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ChainError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ChainError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn context(self, context: impl fmt::Display) -> Self {
        Self {
            kind: self.kind,
            message: format!("{context}: {}", self.message),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    pub fn module_disabled(module: &str) -> Self {
        Self::new(ErrorKind::ModuleDisabled, format!("{module} is disabled"))
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvariantViolation, message)
    }
}

impl From<StdError> for ChainError {
    fn from(err: StdError) -> Self {
        // StdError already indicates an internal arithmetic/serialization
        // failure; these are always invariant-level in our state machine.
        ChainError::new(ErrorKind::InvariantViolation, err.to_string())
    }
}

pub type ChainResult<T> = Result<T, ChainError>;
