//! Registry error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RegistryError {
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid state for legal transfer initiation: {status}")]
    InvalidStateForTransfer { status: String },

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Asset already active: {0}")]
    AlreadyActive(String),

    #[error("No responsible authority assigned to asset {0}")]
    AuthorityNotAssigned(String),

    #[error("Legal transfer record is {actual}, expected {expected}")]
    InvalidTransferStatus { expected: String, actual: String },

    #[error(transparent)]
    Auth(#[from] rwa_core::AuthError),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
