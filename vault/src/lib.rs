//! RWA Capital Vault Module
//!
//! Holds pooled staked capital and enforces the deployment ceiling:
//! - `CapitalVault` tracks staked / deployed / available balances
//!   (`available = staked - deployed`, never negative)
//! - `VaultCapacityManager` caps how much may be deployed at once and
//!   queues the overflow on a waitlist instead of rejecting it
//! - `request_deployment` composes both as one validate-then-commit step

pub mod capacity;
pub mod deploy;
pub mod error;
pub mod vault;

pub use capacity::{CapacitySnapshot, VaultCapacityManager, WaitlistEntry};
pub use deploy::{process_waitlist, request_deployment, DeploymentGrant};
pub use error::{Result, VaultError};
pub use vault::{CapitalVault, VaultSnapshot};
