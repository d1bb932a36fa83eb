//! RWA Pool Manager Module
//!
//! Creates and manages investment pools of activated assets. Pool creation
//! gates on asset status (only `ActiveManaged`/`DigitalActive` members are
//! legal) and then attempts vault capital auto-deployment synchronously.
//! Pool creation and capital funding succeed or fail independently: a
//! missing vault grant downgrades the deployment to a warning outcome, it
//! never fails the pool.

pub mod error;
pub mod manager;
pub mod pool;

pub use error::{PoolsError, Result};
pub use manager::{CreatePoolResult, DeploymentOutcome, PoolManager, PortfolioEntry};
pub use pool::{Pool, Tranche, TrancheTerms, TrancheType};
