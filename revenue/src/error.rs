//! Revenue error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RevenueError {
    #[error("Allocation ratios sum to {total_bps} bps, expected 10000")]
    AllocationImbalance { total_bps: u64 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient source balance for {source_name}: requested {requested}, available {available}")]
    InsufficientSourceBalance {
        source_name: String,
        requested: u64,
        available: u64,
    },

    #[error("Insufficient staking allocation: requested {requested}, available {available}")]
    InsufficientStakingAllocation { requested: u64, available: u64 },

    #[error("Already funded this interval: last funded at {last_funded}, interval {interval_secs}s")]
    AlreadyFundedThisInterval { last_funded: i64, interval_secs: i64 },

    #[error("Funding amount {requested} below minimum {minimum}")]
    BelowMinimumFunding { requested: u64, minimum: u64 },

    #[error("Exchange failed: {0}")]
    Exchange(String),

    #[error(transparent)]
    Auth(#[from] rwa_core::AuthError),
}

pub type Result<T> = std::result::Result<T, RevenueError>;
