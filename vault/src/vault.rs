//! Capital vault balances

use crate::error::{Result, VaultError};
use rwa_core::audit::AuditTrail;
use rwa_core::constants::BPS_DENOMINATOR;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSnapshot {
    pub total_staked: u64,
    pub total_deployed: u64,
    pub available: u64,
    pub utilization_bps: u64,
}

/// Shared reserve of staked capital.
///
/// Invariant: `available = total_staked - total_deployed >= 0`. Every
/// mutator re-validates this as the last step before committing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapitalVault {
    total_staked: u64,
    total_deployed: u64,
    deployed_by_pool: HashMap<String, u64>,
    stakes: HashMap<String, u64>,
    audit: AuditTrail,
}

impl CapitalVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_staked(&self) -> u64 {
        self.total_staked
    }

    pub fn total_deployed(&self) -> u64 {
        self.total_deployed
    }

    pub fn available(&self) -> u64 {
        self.total_staked - self.total_deployed
    }

    pub fn deployed_to(&self, pool_id: &str) -> u64 {
        self.deployed_by_pool.get(pool_id).copied().unwrap_or(0)
    }

    pub fn stake_of(&self, staker: &str) -> u64 {
        self.stakes.get(staker).copied().unwrap_or(0)
    }

    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    pub fn snapshot(&self) -> VaultSnapshot {
        let utilization_bps = if self.total_staked == 0 {
            0
        } else {
            self.total_deployed * BPS_DENOMINATOR / self.total_staked
        };
        VaultSnapshot {
            total_staked: self.total_staked,
            total_deployed: self.total_deployed,
            available: self.available(),
            utilization_bps,
        }
    }

    /// Add stake. Always succeeds for positive amounts; any identity may
    /// stake without a role grant.
    pub fn stake(&mut self, staker: &str, amount: u64, now: i64) -> Result<()> {
        if amount == 0 {
            return Err(VaultError::InvalidAmount("stake must be positive".to_string()));
        }
        let old = self.total_staked;
        self.total_staked += amount;
        *self.stakes.entry(staker.to_string()).or_default() += amount;
        self.audit.record(
            "vault",
            "staked",
            &old.to_string(),
            &self.total_staked.to_string(),
            staker,
            now,
        );
        info!(staker, amount, total_staked = self.total_staked, "stake added");
        Ok(())
    }

    /// Move capital into a pool. The amount is expected to be a grant
    /// already clamped by the capacity manager; availability is still
    /// re-checked here as the final step before commit so a stale grant
    /// fails instead of breaking the invariant.
    pub(crate) fn commit_deployment(&mut self, pool_id: &str, amount: u64, actor: &str, now: i64) -> Result<()> {
        if amount == 0 {
            return Err(VaultError::InvalidAmount("deployment must be positive".to_string()));
        }
        if amount > self.available() {
            return Err(VaultError::InsufficientCapacity {
                requested: amount,
                available: self.available(),
            });
        }
        let old = self.total_deployed;
        self.total_deployed += amount;
        *self.deployed_by_pool.entry(pool_id.to_string()).or_default() += amount;
        self.audit.record(
            "vault",
            pool_id,
            &old.to_string(),
            &self.total_deployed.to_string(),
            actor,
            now,
        );
        info!(pool_id, amount, available = self.available(), "capital deployed");
        Ok(())
    }

    /// Record a repayment from a pool. Never pushes `available` above
    /// `total_staked` because repayments are bounded by what the pool holds.
    pub fn repay(&mut self, pool_id: &str, amount: u64, actor: &str, now: i64) -> Result<()> {
        if amount == 0 {
            return Err(VaultError::InvalidAmount("repayment must be positive".to_string()));
        }
        let deployed = self.deployed_to(pool_id);
        if amount > deployed {
            return Err(VaultError::ExcessRepayment {
                pool_id: pool_id.to_string(),
                requested: amount,
                deployed,
            });
        }
        let old = self.total_deployed;
        self.total_deployed -= amount;
        *self.deployed_by_pool.get_mut(pool_id).unwrap() -= amount;
        self.audit.record(
            "vault",
            pool_id,
            &old.to_string(),
            &self.total_deployed.to_string(),
            actor,
            now,
        );
        info!(pool_id, amount, available = self.available(), "repayment recorded");
        Ok(())
    }
}
