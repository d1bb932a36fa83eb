//! Rewards Pool Manager
//!
//! Keeps the staking reward reserve solvent. "Pool health" is the runway in
//! days the reserve sustains payouts at the prevailing accrual rate; when
//! health drops below target and the funding interval has elapsed, the
//! manager pulls the staking allocation from the revenue collector,
//! converts it through the exchange collaborator and deposits the result.

use crate::collector::RevenueCollector;
use crate::error::{Result, RevenueError};
use rwa_core::constants::BPS_DENOMINATOR;
use rwa_core::roles::{CapabilityTable, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Exchange unavailable: {0}")]
    Unavailable(String),

    #[error("Conversion rejected: {0}")]
    Rejected(String),
}

/// External conversion service acquiring reward tokens for stable funds
pub trait Exchange {
    fn convert(&self, stable_amount: u64) -> std::result::Result<u64, ExchangeError>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FundingReceipt {
    pub stable_amount: u64,
    pub reward_amount: u64,
    pub funded_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardsPoolManager {
    /// Minimum seconds between funding events
    funding_interval_secs: i64,
    /// 0 = never funded
    last_funded: i64,
    min_funding_amount: u64,
    target_health_days: u64,
    /// Annualized staking accrual rate in basis points
    reward_rate_bps: u64,
    /// Reward-token reserve backing staking payouts
    reserve: u64,
}

impl RewardsPoolManager {
    pub fn new(
        funding_interval_secs: i64,
        min_funding_amount: u64,
        target_health_days: u64,
        reward_rate_bps: u64,
    ) -> Self {
        Self {
            funding_interval_secs,
            last_funded: 0,
            min_funding_amount,
            target_health_days,
            reward_rate_bps,
            reserve: 0,
        }
    }

    pub fn reserve(&self) -> u64 {
        self.reserve
    }

    pub fn last_funded(&self) -> i64 {
        self.last_funded
    }

    pub fn target_health_days(&self) -> u64 {
        self.target_health_days
    }

    /// Reward tokens paid out per day at the prevailing accrual rate
    fn daily_payout(&self, total_staked: u64) -> u64 {
        total_staked * self.reward_rate_bps / BPS_DENOMINATOR / 365
    }

    /// Runway in days the reserve sustains payouts. 0 when no stake
    /// exists yet; unbounded when stake is too small to accrue anything.
    pub fn check_pool_health(&self, total_staked: u64) -> u64 {
        if total_staked == 0 {
            return 0;
        }
        let daily = self.daily_payout(total_staked);
        if daily == 0 {
            return u64::MAX;
        }
        self.reserve / daily
    }

    /// Whether funding is due, and the shortfall needed to reach the
    /// target runway (never below the configured minimum).
    pub fn should_fund(&self, total_staked: u64, now: i64) -> (bool, u64) {
        let health = self.check_pool_health(total_staked);
        let interval_elapsed = now - self.last_funded >= self.funding_interval_secs;
        let due = health < self.target_health_days && interval_elapsed;

        let target_reserve = self.target_health_days * self.daily_payout(total_staked);
        let shortfall = target_reserve.saturating_sub(self.reserve);
        (due, shortfall.max(self.min_funding_amount))
    }

    /// Pull `stable_amount` from the collector's staking bucket, convert it
    /// and deposit the proceeds. Idempotent per interval: a second call in
    /// the same window fails with `AlreadyFundedThisInterval` and changes
    /// nothing. An exchange failure aborts before any state moves.
    pub fn execute_funding(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        stable_amount: u64,
        exchange: &dyn Exchange,
        collector: &mut RevenueCollector,
        now: i64,
    ) -> Result<FundingReceipt> {
        caps.require(actor, Role::Operator)?;
        if self.last_funded > 0 && now - self.last_funded < self.funding_interval_secs {
            return Err(RevenueError::AlreadyFundedThisInterval {
                last_funded: self.last_funded,
                interval_secs: self.funding_interval_secs,
            });
        }
        if stable_amount < self.min_funding_amount {
            return Err(RevenueError::BelowMinimumFunding {
                requested: stable_amount,
                minimum: self.min_funding_amount,
            });
        }
        if stable_amount > collector.staking_allocation_balance() {
            return Err(RevenueError::InsufficientStakingAllocation {
                requested: stable_amount,
                available: collector.staking_allocation_balance(),
            });
        }

        // convert first: a failed exchange must leave no partial effect
        let reward_amount = exchange
            .convert(stable_amount)
            .map_err(|e| RevenueError::Exchange(e.to_string()))?;

        collector.withdraw_staking(stable_amount)?;
        self.reserve += reward_amount;
        self.last_funded = now;

        info!(stable_amount, reward_amount, reserve = self.reserve, "reward pool funded");
        Ok(FundingReceipt {
            stable_amount,
            reward_amount,
            funded_at: now,
        })
    }

    /// Reduce the reserve as payouts accrue to stakers
    pub fn record_payout(&mut self, amount: u64) -> Result<()> {
        if amount > self.reserve {
            return Err(RevenueError::InvalidAmount(format!(
                "payout {} exceeds reserve {}",
                amount, self.reserve
            )));
        }
        self.reserve -= amount;
        Ok(())
    }
}
