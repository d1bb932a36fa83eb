//! Pool Manager
//!
//! Owns all pools and tranches, gates membership on asset activation and
//! drives vault capital in and out of pools. Cross-component calls run
//! inside the caller's single borrow of the protocol state, so every
//! operation commits or rolls back as one unit.

use crate::error::{PoolsError, Result};
use crate::pool::{Pool, Tranche, TrancheTerms, TrancheType};
use rwa_core::audit::AuditTrail;
use rwa_core::ids::{new_pool_id, new_tranche_id};
use rwa_core::roles::{CapabilityTable, Role};
use rwa_registry::AssetRegistry;
use rwa_vault::{request_deployment, CapitalVault, DeploymentGrant, VaultCapacityManager, VaultError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// Outcome of the synchronous auto-deployment attempted at pool creation.
/// A missing vault grant is a warning, not a pool-creation failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DeploymentOutcome {
    Deployed(DeploymentGrant),
    SkippedUnauthorized,
    /// Pool had no investable value to deploy against
    SkippedEmpty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePoolResult {
    pub pool_id: String,
    pub deployment: DeploymentOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioEntry {
    pub pool_id: String,
    pub amount_invested: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolManager {
    pools: HashMap<String, Pool>,
    tranches: HashMap<String, Tranche>,
    /// investor -> pool -> amount
    investments: HashMap<String, HashMap<String, u64>>,
    audit: AuditTrail,
}

impl PoolManager {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- queries ----

    pub fn pool(&self, id: &str) -> Option<&Pool> {
        self.pools.get(id)
    }

    pub fn pools_paginated(&self, offset: usize, limit: usize) -> Vec<&Pool> {
        let mut all: Vec<&Pool> = self.pools.values().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        all.into_iter().skip(offset).take(limit).collect()
    }

    pub fn tranche(&self, id: &str) -> Option<&Tranche> {
        self.tranches.get(id)
    }

    pub fn pool_tranches(&self, pool_id: &str) -> Vec<&Tranche> {
        self.pools
            .get(pool_id)
            .map(|p| {
                p.tranche_ids
                    .iter()
                    .filter_map(|id| self.tranches.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn portfolio(&self, investor: &str) -> Vec<PortfolioEntry> {
        let mut entries: Vec<PortfolioEntry> = self
            .investments
            .get(investor)
            .map(|positions| {
                positions
                    .iter()
                    .map(|(pool_id, amount)| PortfolioEntry {
                        pool_id: pool_id.clone(),
                        amount_invested: *amount,
                    })
                    .collect()
            })
            .unwrap_or_default();
        entries.sort_by(|a, b| a.pool_id.cmp(&b.pool_id));
        entries
    }

    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    pub fn count(&self) -> usize {
        self.pools.len()
    }

    // ---- mutators ----

    /// Create a pool of activated assets and synchronously attempt capital
    /// auto-deployment up to the pool's investable value.
    #[allow(clippy::too_many_arguments)]
    pub fn create_pool(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        name: &str,
        description: &str,
        asset_ids: Vec<String>,
        tranche_spec: Option<Vec<(TrancheType, TrancheTerms)>>,
        registry: &AssetRegistry,
        capacity: &mut VaultCapacityManager,
        vault: &mut CapitalVault,
        now: i64,
    ) -> Result<CreatePoolResult> {
        caps.require(actor, Role::PoolManager)?;

        // every member must be in a terminal active status at addition time
        let mut total_value: u64 = 0;
        for asset_id in &asset_ids {
            let asset = registry
                .asset(asset_id)
                .filter(|a| a.is_active())
                .ok_or_else(|| PoolsError::AssetNotActive(asset_id.clone()))?;
            total_value += asset.investable_value();
        }

        let pool_id = new_pool_id();
        let mut pool = Pool::new(
            pool_id.clone(),
            actor.to_string(),
            name.to_string(),
            description.to_string(),
            total_value,
            asset_ids,
            now,
        );

        if let Some(spec) = tranche_spec {
            for (tranche_type, terms) in spec {
                let tranche_id = new_tranche_id();
                pool.tranche_ids.push(tranche_id.clone());
                pool.has_tranches = true;
                self.tranches.insert(
                    tranche_id.clone(),
                    Tranche::new(tranche_id, pool_id.clone(), tranche_type, terms, now),
                );
            }
        }

        // capital funding is decoupled from pool creation: a missing vault
        // grant skips the deployment with a warning outcome
        let deployment = if total_value == 0 {
            DeploymentOutcome::SkippedEmpty
        } else {
            match request_deployment(caps, actor, &pool_id, total_value, capacity, vault, now) {
                Ok(grant) => {
                    pool.deployed_capital = grant.granted;
                    DeploymentOutcome::Deployed(grant)
                }
                Err(VaultError::DeploymentNotAuthorized { actor }) => {
                    warn!(pool_id = %pool_id, actor, "vault grant missing, deployment skipped");
                    DeploymentOutcome::SkippedUnauthorized
                }
                Err(e) => return Err(e.into()),
            }
        };

        self.audit.record("pool", &pool_id, "", "Active", actor, now);
        info!(pool_id = %pool_id, total_value, "pool created");
        self.pools.insert(pool_id.clone(), pool);

        Ok(CreatePoolResult {
            pool_id,
            deployment,
        })
    }

    /// Add a tranche to an open pool. Inactive or finalized pools reject
    /// further tranches.
    pub fn add_tranche(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        pool_id: &str,
        tranche_type: TrancheType,
        terms: TrancheTerms,
        now: i64,
    ) -> Result<String> {
        caps.require(actor, Role::PoolManager)?;
        let pool = self
            .pools
            .get_mut(pool_id)
            .ok_or_else(|| PoolsError::PoolNotFound(pool_id.to_string()))?;
        if !pool.is_active {
            return Err(PoolsError::PoolNotActive(pool_id.to_string()));
        }
        if pool.is_finalized {
            return Err(PoolsError::PoolFinalized(pool_id.to_string()));
        }

        let tranche_id = new_tranche_id();
        pool.tranche_ids.push(tranche_id.clone());
        pool.has_tranches = true;
        self.tranches.insert(
            tranche_id.clone(),
            Tranche::new(tranche_id.clone(), pool_id.to_string(), tranche_type, terms, now),
        );
        self.audit
            .record("tranche", &tranche_id, "", tranche_type.as_str(), actor, now);
        Ok(tranche_id)
    }

    /// Close the tranche structure of a pool
    pub fn finalize_pool(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        pool_id: &str,
        now: i64,
    ) -> Result<()> {
        caps.require(actor, Role::PoolManager)?;
        let pool = self
            .pools
            .get_mut(pool_id)
            .ok_or_else(|| PoolsError::PoolNotFound(pool_id.to_string()))?;
        if pool.is_finalized {
            return Err(PoolsError::PoolFinalized(pool_id.to_string()));
        }
        pool.is_finalized = true;
        self.audit.record("pool", pool_id, "Active", "Finalized", actor, now);
        Ok(())
    }

    /// Record a direct investor contribution to an open pool. Feeds the
    /// user-portfolio query; tranched pools fill senior capacity first.
    pub fn invest(
        &mut self,
        investor: &str,
        pool_id: &str,
        amount: u64,
        now: i64,
    ) -> Result<()> {
        if amount == 0 {
            return Err(PoolsError::InvalidAmount("investment must be positive".to_string()));
        }
        let pool = self
            .pools
            .get_mut(pool_id)
            .ok_or_else(|| PoolsError::PoolNotFound(pool_id.to_string()))?;
        if !pool.is_active {
            return Err(PoolsError::PoolNotActive(pool_id.to_string()));
        }

        pool.total_value += amount;
        pool.total_shares += amount;
        let tranche_ids = pool.tranche_ids.clone();

        // senior tranches absorb shares before junior, up to capacity
        let mut remaining = amount;
        for tranche_type in [TrancheType::Senior, TrancheType::Junior] {
            for id in &tranche_ids {
                if remaining == 0 {
                    break;
                }
                let tranche = self.tranches.get_mut(id).unwrap();
                if tranche.tranche_type != tranche_type {
                    continue;
                }
                let room = tranche.capacity.saturating_sub(tranche.outstanding_shares);
                let fill = remaining.min(room);
                tranche.outstanding_shares += fill;
                remaining -= fill;
            }
        }

        *self
            .investments
            .entry(investor.to_string())
            .or_default()
            .entry(pool_id.to_string())
            .or_default() += amount;
        self.audit.record("investment", pool_id, "", &amount.to_string(), investor, now);
        Ok(())
    }

    /// Record a capital repayment from a pool back to the vault. Senior
    /// tranches are made whole before junior on every capital event.
    #[allow(clippy::too_many_arguments)]
    pub fn record_repayment(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        pool_id: &str,
        amount: u64,
        capacity: &mut VaultCapacityManager,
        vault: &mut CapitalVault,
        now: i64,
    ) -> Result<()> {
        caps.require(actor, Role::PoolManager)?;
        let pool = self
            .pools
            .get(pool_id)
            .ok_or_else(|| PoolsError::PoolNotFound(pool_id.to_string()))?;
        let tranche_ids = pool.tranche_ids.clone();

        vault.repay(pool_id, amount, actor, now)?;
        capacity.release(amount);

        let pool = self.pools.get_mut(pool_id).unwrap();
        pool.deployed_capital = pool.deployed_capital.saturating_sub(amount);

        let mut remaining = amount;
        for tranche_type in [TrancheType::Senior, TrancheType::Junior] {
            for id in &tranche_ids {
                if remaining == 0 {
                    break;
                }
                let tranche = self.tranches.get_mut(id).unwrap();
                if tranche.tranche_type != tranche_type {
                    continue;
                }
                let repaid = remaining.min(tranche.outstanding_shares);
                tranche.outstanding_shares -= repaid;
                remaining -= repaid;
            }
        }

        self.audit.record("repayment", pool_id, "", &amount.to_string(), actor, now);
        info!(pool_id, amount, "pool repayment recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rwa_registry::{AssetCategory, VerificationResult};

    fn caps() -> CapabilityTable {
        let mut caps = CapabilityTable::new();
        caps.grant("admin", Role::Admin);
        caps.grant("amc", Role::Authority);
        caps.grant("keeper", Role::Operator);
        caps.grant("pm", Role::PoolManager);
        caps.grant("pm", Role::VaultDeployer);
        caps
    }

    fn active_asset(registry: &mut AssetRegistry, caps: &CapabilityTable, value: u64) -> String {
        let id = registry.submit_asset(
            "owner",
            AssetCategory::RealEstate,
            value,
            None,
            2_000_000_000,
            vec![],
            1_000,
        );
        registry
            .apply_verification(
                caps,
                "keeper",
                &id,
                Ok(VerificationResult {
                    is_valid: true,
                    risk_score: 15,
                    rating: "A".to_string(),
                }),
                1_100,
            )
            .unwrap();
        registry.mark_digital_verified(caps, "amc", &id, 1_200).unwrap();
        registry.activate_digital(caps, "amc", &id, 1_300).unwrap();
        id
    }

    fn setup() -> (CapabilityTable, AssetRegistry, VaultCapacityManager, CapitalVault, PoolManager) {
        let caps = caps();
        let registry = AssetRegistry::new();
        let capacity = VaultCapacityManager::new(10_000_000);
        let mut vault = CapitalVault::new();
        vault.stake("whale", 10_000_000, 1).unwrap();
        (caps, registry, capacity, vault, PoolManager::new())
    }

    #[test]
    fn test_create_pool_with_active_assets() {
        let (caps, mut registry, mut capacity, mut vault, mut manager) = setup();
        let a = active_asset(&mut registry, &caps, 300_000);
        let b = active_asset(&mut registry, &caps, 200_000);

        let result = manager
            .create_pool(
                &caps,
                "pm",
                "Pool A",
                "",
                vec![a, b],
                None,
                &registry,
                &mut capacity,
                &mut vault,
                2_000,
            )
            .unwrap();

        let pool = manager.pool(&result.pool_id).unwrap();
        assert_eq!(pool.total_value, 500_000);
        assert!(pool.is_active);
        match result.deployment {
            DeploymentOutcome::Deployed(grant) => {
                assert_eq!(grant.granted, 500_000);
                assert_eq!(pool.deployed_capital, 500_000);
            }
            other => panic!("expected deployment, got {:?}", other),
        }
    }

    #[test]
    fn test_inactive_member_rejects_pool() {
        let (caps, mut registry, mut capacity, mut vault, mut manager) = setup();
        let active = active_asset(&mut registry, &caps, 300_000);
        let pending = registry.submit_asset(
            "owner",
            AssetCategory::Commodity,
            100_000,
            None,
            2_000_000_000,
            vec![],
            1_000,
        );

        let err = manager
            .create_pool(
                &caps,
                "pm",
                "Pool B",
                "",
                vec![active, pending.clone()],
                None,
                &registry,
                &mut capacity,
                &mut vault,
                2_000,
            )
            .unwrap_err();
        assert_eq!(err, PoolsError::AssetNotActive(pending));
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_missing_vault_grant_skips_deployment() {
        let (mut caps, mut registry, mut capacity, mut vault, mut manager) = setup();
        caps.revoke("pm", Role::VaultDeployer);
        let a = active_asset(&mut registry, &caps, 300_000);

        let result = manager
            .create_pool(
                &caps,
                "pm",
                "Pool C",
                "",
                vec![a],
                None,
                &registry,
                &mut capacity,
                &mut vault,
                2_000,
            )
            .unwrap();

        assert_eq!(result.deployment, DeploymentOutcome::SkippedUnauthorized);
        let pool = manager.pool(&result.pool_id).unwrap();
        assert!(pool.is_active);
        assert_eq!(pool.deployed_capital, 0);
        assert_eq!(vault.total_deployed(), 0);
    }

    #[test]
    fn test_add_tranche_and_finalize() {
        let (caps, mut registry, mut capacity, mut vault, mut manager) = setup();
        let a = active_asset(&mut registry, &caps, 300_000);
        let result = manager
            .create_pool(
                &caps, "pm", "Pool D", "", vec![a], None, &registry, &mut capacity, &mut vault, 2_000,
            )
            .unwrap();

        manager
            .add_tranche(
                &caps,
                "pm",
                &result.pool_id,
                TrancheType::Senior,
                TrancheTerms { capacity: 200_000, rate_bps: 500 },
                2_100,
            )
            .unwrap();
        assert!(manager.pool(&result.pool_id).unwrap().has_tranches);

        manager.finalize_pool(&caps, "pm", &result.pool_id, 2_200).unwrap();
        let err = manager
            .add_tranche(
                &caps,
                "pm",
                &result.pool_id,
                TrancheType::Junior,
                TrancheTerms { capacity: 100_000, rate_bps: 900 },
                2_300,
            )
            .unwrap_err();
        assert_eq!(err, PoolsError::PoolFinalized(result.pool_id));
    }

    #[test]
    fn test_invest_builds_portfolio() {
        let (caps, mut registry, mut capacity, mut vault, mut manager) = setup();
        let a = active_asset(&mut registry, &caps, 300_000);
        let result = manager
            .create_pool(
                &caps, "pm", "Pool E", "", vec![a], None, &registry, &mut capacity, &mut vault, 2_000,
            )
            .unwrap();

        manager.invest("carol", &result.pool_id, 50_000, 2_100).unwrap();
        manager.invest("carol", &result.pool_id, 25_000, 2_200).unwrap();

        assert_eq!(
            manager.portfolio("carol"),
            vec![PortfolioEntry {
                pool_id: result.pool_id.clone(),
                amount_invested: 75_000,
            }]
        );
        assert_eq!(manager.pool(&result.pool_id).unwrap().total_value, 375_000);
    }

    #[test]
    fn test_senior_repaid_before_junior() {
        let (caps, mut registry, mut capacity, mut vault, mut manager) = setup();
        let a = active_asset(&mut registry, &caps, 300_000);
        let spec = vec![
            (TrancheType::Junior, TrancheTerms { capacity: 100_000, rate_bps: 900 }),
            (TrancheType::Senior, TrancheTerms { capacity: 100_000, rate_bps: 500 }),
        ];
        let result = manager
            .create_pool(
                &caps, "pm", "Pool F", "", vec![a], Some(spec), &registry, &mut capacity, &mut vault, 2_000,
            )
            .unwrap();

        // fill senior first on the way in
        manager.invest("carol", &result.pool_id, 150_000, 2_100).unwrap();
        let tranches = manager.pool_tranches(&result.pool_id);
        let senior = tranches.iter().find(|t| t.tranche_type == TrancheType::Senior).unwrap();
        let junior = tranches.iter().find(|t| t.tranche_type == TrancheType::Junior).unwrap();
        assert_eq!(senior.outstanding_shares, 100_000);
        assert_eq!(junior.outstanding_shares, 50_000);

        // senior made whole first on the way out
        manager
            .record_repayment(&caps, "pm", &result.pool_id, 120_000, &mut capacity, &mut vault, 2_200)
            .unwrap();
        let tranches = manager.pool_tranches(&result.pool_id);
        let senior = tranches.iter().find(|t| t.tranche_type == TrancheType::Senior).unwrap();
        let junior = tranches.iter().find(|t| t.tranche_type == TrancheType::Junior).unwrap();
        assert_eq!(senior.outstanding_shares, 0);
        assert_eq!(junior.outstanding_shares, 30_000);
    }

    #[test]
    fn test_pagination_order() {
        let (caps, mut registry, mut capacity, mut vault, mut manager) = setup();
        for i in 0..3 {
            let a = active_asset(&mut registry, &caps, 100_000);
            manager
                .create_pool(
                    &caps,
                    "pm",
                    &format!("Pool {}", i),
                    "",
                    vec![a],
                    None,
                    &registry,
                    &mut capacity,
                    &mut vault,
                    2_000 + i,
                )
                .unwrap();
        }
        assert_eq!(manager.pools_paginated(0, 2).len(), 2);
        assert_eq!(manager.pools_paginated(2, 2).len(), 1);
        assert_eq!(manager.pools_paginated(0, 10)[0].name, "Pool 0");
    }
}
