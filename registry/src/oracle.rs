//! Verification oracle seam
//!
//! The oracle call that produces a risk score lives outside this system;
//! the registry consumes it through this trait. Timeouts and transport
//! errors are mapped to a rejection with risk score 99 by convention.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Risk scores above this threshold reject the asset even when the oracle
/// reports it as valid.
pub const RISK_SCORE_THRESHOLD: u8 = 70;

/// Risk score recorded when the oracle call itself fails
pub const ORACLE_FAILURE_RISK_SCORE: u8 = 99;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub is_valid: bool,
    /// 0-100, lower is safer
    pub risk_score: u8,
    pub rating: String,
}

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Oracle timed out")]
    Timeout,

    #[error("Oracle unavailable: {0}")]
    Unavailable(String),
}

pub trait VerificationOracle {
    fn verify(&self, asset_id: &str, metadata: &str) -> Result<VerificationResult, OracleError>;
}
