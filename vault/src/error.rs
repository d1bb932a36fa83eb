//! Vault error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum VaultError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Deployment not authorized for {actor}")]
    DeploymentNotAuthorized { actor: String },

    #[error("Insufficient capacity: requested {requested}, available {available}")]
    InsufficientCapacity { requested: u64, available: u64 },

    #[error("Excess repayment for pool {pool_id}: requested {requested}, deployed {deployed}")]
    ExcessRepayment {
        pool_id: String,
        requested: u64,
        deployed: u64,
    },

    #[error(transparent)]
    Auth(#[from] rwa_core::AuthError),
}

pub type Result<T> = std::result::Result<T, VaultError>;
