//! Pool error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PoolsError {
    #[error("Pool not found: {0}")]
    PoolNotFound(String),

    #[error("Asset not active: {0}")]
    AssetNotActive(String),

    #[error("Pool not active: {0}")]
    PoolNotActive(String),

    #[error("Pool already finalized: {0}")]
    PoolFinalized(String),

    #[error("Tranche not found: {0}")]
    TrancheNotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error(transparent)]
    Vault(#[from] rwa_vault::VaultError),

    #[error(transparent)]
    Auth(#[from] rwa_core::AuthError),
}

pub type Result<T> = std::result::Result<T, PoolsError>;
