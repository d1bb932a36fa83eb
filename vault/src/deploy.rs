//! Deployment composition
//!
//! `request_deployment` is the single unit of work the pool manager calls:
//! capability check, capacity grant and vault transfer all validate before
//! anything commits, so a failure at any step leaves no partial state.

use crate::capacity::VaultCapacityManager;
use crate::error::{Result, VaultError};
use crate::vault::CapitalVault;
use rwa_core::roles::{CapabilityTable, Role};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentGrant {
    pub pool_id: String,
    pub requested: u64,
    /// May be less than requested; partial deployment is a valid outcome
    pub granted: u64,
    /// Deficit recorded on the waitlist
    pub waitlisted: u64,
}

/// Grant up to `requested` capital to a pool, clamped by both the capacity
/// headroom and the vault's available balance. A zero grant is not an
/// error: the full request queues on the waitlist instead.
pub fn request_deployment(
    caps: &CapabilityTable,
    actor: &str,
    pool_id: &str,
    requested: u64,
    capacity: &mut VaultCapacityManager,
    vault: &mut CapitalVault,
    now: i64,
) -> Result<DeploymentGrant> {
    caps.require(actor, Role::VaultDeployer)
        .map_err(|_| VaultError::DeploymentNotAuthorized {
            actor: actor.to_string(),
        })?;
    if requested == 0 {
        return Err(VaultError::InvalidAmount("deployment request must be positive".to_string()));
    }

    let granted = requested.min(capacity.headroom()).min(vault.available());
    let waitlisted = requested - granted;

    if granted > 0 {
        capacity.commit(granted)?;
        vault.commit_deployment(pool_id, granted, actor, now)?;
    }
    if waitlisted > 0 {
        capacity.enqueue(pool_id, waitlisted, now);
    }

    info!(pool_id, requested, granted, waitlisted, "deployment request resolved");
    Ok(DeploymentGrant {
        pool_id: pool_id.to_string(),
        requested,
        granted,
        waitlisted,
    })
}

/// Retry waitlisted deficits in arrival order, typically after a repayment
/// freed capacity. Deficits that still cannot be granted re-queue.
pub fn process_waitlist(
    caps: &CapabilityTable,
    actor: &str,
    capacity: &mut VaultCapacityManager,
    vault: &mut CapitalVault,
    now: i64,
) -> Result<Vec<DeploymentGrant>> {
    caps.require(actor, Role::Operator)?;

    let pending = capacity.drain_waitlist();
    let mut grants = Vec::new();
    for entry in pending {
        let granted = entry.amount.min(capacity.headroom()).min(vault.available());
        let waitlisted = entry.amount - granted;
        if granted > 0 {
            capacity.commit(granted)?;
            vault.commit_deployment(&entry.pool_id, granted, actor, now)?;
        }
        if waitlisted > 0 {
            capacity.enqueue(&entry.pool_id, waitlisted, entry.queued_at);
        }
        if granted > 0 {
            grants.push(DeploymentGrant {
                pool_id: entry.pool_id,
                requested: entry.amount,
                granted,
                waitlisted,
            });
        }
    }
    Ok(grants)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(capacity: u64, staked: u64) -> (CapabilityTable, VaultCapacityManager, CapitalVault) {
        let mut caps = CapabilityTable::new();
        caps.grant("pm", Role::VaultDeployer);
        caps.grant("keeper", Role::Operator);
        let mgr = VaultCapacityManager::new(capacity);
        let mut vault = CapitalVault::new();
        if staked > 0 {
            vault.stake("whale", staked, 1).unwrap();
        }
        (caps, mgr, vault)
    }

    #[test]
    fn test_full_grant() {
        let (caps, mut mgr, mut vault) = setup(1_000_000, 1_000_000);
        let grant =
            request_deployment(&caps, "pm", "pool-1", 200_000, &mut mgr, &mut vault, 100).unwrap();

        assert_eq!(grant.granted, 200_000);
        assert_eq!(grant.waitlisted, 0);
        assert_eq!(vault.total_deployed(), 200_000);
        assert_eq!(mgr.deployed(), 200_000);
    }

    #[test]
    fn test_capacity_limited_partial_grant() {
        // capacity 1_000_000 with 900_000 already deployed: a 200_000
        // request grants 100_000 and waitlists the deficit
        let (caps, mut mgr, mut vault) = setup(1_000_000, 2_000_000);
        request_deployment(&caps, "pm", "pool-0", 900_000, &mut mgr, &mut vault, 99).unwrap();

        let grant =
            request_deployment(&caps, "pm", "pool-1", 200_000, &mut mgr, &mut vault, 100).unwrap();
        assert_eq!(grant.granted, 100_000);
        assert_eq!(grant.waitlisted, 100_000);
        assert_eq!(mgr.waitlisted_total(), 100_000);
    }

    #[test]
    fn test_zero_grant_waitlists_instead_of_erroring() {
        let (caps, mut mgr, mut vault) = setup(100, 1_000);
        request_deployment(&caps, "pm", "pool-0", 100, &mut mgr, &mut vault, 99).unwrap();

        let grant =
            request_deployment(&caps, "pm", "pool-1", 500, &mut mgr, &mut vault, 100).unwrap();
        assert_eq!(grant.granted, 0);
        assert_eq!(grant.waitlisted, 500);
        assert_eq!(vault.total_deployed(), 100);
    }

    #[test]
    fn test_missing_deployer_grant_is_detectable() {
        let (caps, mut mgr, mut vault) = setup(1_000, 1_000);
        let err = request_deployment(&caps, "stranger", "pool-1", 100, &mut mgr, &mut vault, 100)
            .unwrap_err();
        assert_eq!(
            err,
            VaultError::DeploymentNotAuthorized {
                actor: "stranger".to_string(),
            }
        );
    }

    #[test]
    fn test_vault_available_also_clamps() {
        let (caps, mut mgr, mut vault) = setup(10_000, 300);
        let grant =
            request_deployment(&caps, "pm", "pool-1", 500, &mut mgr, &mut vault, 100).unwrap();
        assert_eq!(grant.granted, 300);
        assert_eq!(grant.waitlisted, 200);
    }

    #[test]
    fn test_waitlist_processing_after_repayment() {
        let (caps, mut mgr, mut vault) = setup(1_000, 1_000);
        request_deployment(&caps, "pm", "pool-0", 1_000, &mut mgr, &mut vault, 99).unwrap();
        request_deployment(&caps, "pm", "pool-1", 400, &mut mgr, &mut vault, 100).unwrap();
        assert_eq!(mgr.waitlisted_total(), 400);

        vault.repay("pool-0", 250, "pm", 101).unwrap();
        mgr.release(250);

        let grants = process_waitlist(&caps, "keeper", &mut mgr, &mut vault, 102).unwrap();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].granted, 250);
        assert_eq!(grants[0].waitlisted, 150);
        assert_eq!(mgr.waitlisted_total(), 150);
    }
}
