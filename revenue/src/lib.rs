//! RWA Revenue Module
//!
//! Collects protocol fees and splits them into fixed-ratio buckets
//! (stakers / treasury / operations / burn), then periodically moves the
//! staking allocation into the reward reserve:
//! - `RevenueCollector` enforces that every fee event splits without
//!   losing a unit to rounding
//! - `RewardsPoolManager` watches reward-pool runway ("pool health") and
//!   executes funding when it is due, guarded against double-funding

pub mod collector;
pub mod error;
pub mod rewards;

pub use collector::{AllocationConfig, AllocationTotals, RevenueCollector};
pub use error::{Result, RevenueError};
pub use rewards::{Exchange, ExchangeError, FundingReceipt, RewardsPoolManager};
