//! Revenue Collector
//!
//! Every fee event pulls from the source's balance and splits into four
//! buckets by configured basis points. Integer remainder goes to the
//! treasury bucket, so `collected = staking + treasury + operations + burn`
//! holds after every call.

use crate::error::{Result, RevenueError};
use rwa_core::audit::AuditTrail;
use rwa_core::constants::BPS_DENOMINATOR;
use rwa_core::roles::{CapabilityTable, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Four-way split ratios in basis points; must sum to exactly 10_000.
/// Validated at configuration time, never re-checked at runtime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AllocationConfig {
    pub staking_bps: u64,
    pub treasury_bps: u64,
    pub operations_bps: u64,
    pub burn_bps: u64,
}

impl AllocationConfig {
    pub fn new(staking_bps: u64, treasury_bps: u64, operations_bps: u64, burn_bps: u64) -> Result<Self> {
        let total_bps = staking_bps + treasury_bps + operations_bps + burn_bps;
        if total_bps != BPS_DENOMINATOR {
            return Err(RevenueError::AllocationImbalance { total_bps });
        }
        Ok(Self {
            staking_bps,
            treasury_bps,
            operations_bps,
            burn_bps,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationTotals {
    pub collected: u64,
    pub staking: u64,
    pub treasury: u64,
    pub operations: u64,
    pub burn: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueCollector {
    config: AllocationConfig,
    source_balances: HashMap<String, u64>,
    collected_total: u64,
    staking_total: u64,
    treasury_total: u64,
    operations_total: u64,
    burn_total: u64,
    audit: AuditTrail,
}

impl RevenueCollector {
    pub fn new(config: AllocationConfig) -> Self {
        Self {
            config,
            source_balances: HashMap::new(),
            collected_total: 0,
            staking_total: 0,
            treasury_total: 0,
            operations_total: 0,
            burn_total: 0,
            audit: AuditTrail::new(),
        }
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    pub fn source_balance(&self, source: &str) -> u64 {
        self.source_balances.get(source).copied().unwrap_or(0)
    }

    /// Pure read of the staking-bound balance
    pub fn staking_allocation_balance(&self) -> u64 {
        self.staking_total
    }

    pub fn totals(&self) -> AllocationTotals {
        AllocationTotals {
            collected: self.collected_total,
            staking: self.staking_total,
            treasury: self.treasury_total,
            operations: self.operations_total,
            burn: self.burn_total,
        }
    }

    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    /// Credit a fee source so later `collect_fee` calls can pull from it
    pub fn fund_source(&mut self, source: &str, amount: u64) {
        *self.source_balances.entry(source.to_string()).or_default() += amount;
    }

    /// Pull `amount` from the source's balance and split it. Rounding
    /// remainder is assigned to treasury so no fee event loses a unit.
    pub fn collect_fee(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        amount: u64,
        source: &str,
        now: i64,
    ) -> Result<AllocationTotals> {
        caps.require(actor, Role::Collector)?;
        if amount == 0 {
            return Err(RevenueError::InvalidAmount("fee must be positive".to_string()));
        }
        let available = self.source_balance(source);
        if amount > available {
            return Err(RevenueError::InsufficientSourceBalance {
                source_name: source.to_string(),
                requested: amount,
                available,
            });
        }

        let staking = amount * self.config.staking_bps / BPS_DENOMINATOR;
        let treasury = amount * self.config.treasury_bps / BPS_DENOMINATOR;
        let operations = amount * self.config.operations_bps / BPS_DENOMINATOR;
        let burn = amount * self.config.burn_bps / BPS_DENOMINATOR;
        let remainder = amount - staking - treasury - operations - burn;

        *self.source_balances.get_mut(source).unwrap() -= amount;
        self.collected_total += amount;
        self.staking_total += staking;
        self.treasury_total += treasury + remainder;
        self.operations_total += operations;
        self.burn_total += burn;

        self.audit.record(
            "revenue",
            source,
            "",
            &amount.to_string(),
            actor,
            now,
        );
        info!(source, amount, staking, treasury = treasury + remainder, operations, burn, "fee collected");
        Ok(self.totals())
    }

    /// Move funds out of the staking bucket (reward funding)
    pub(crate) fn withdraw_staking(&mut self, amount: u64) -> Result<()> {
        if amount > self.staking_total {
            return Err(RevenueError::InsufficientStakingAllocation {
                requested: amount,
                available: self.staking_total,
            });
        }
        self.staking_total -= amount;
        self.collected_total -= amount;
        Ok(())
    }
}
