//! API state management
//!
//! `Protocol` composes every component behind a single `RwLock`: each
//! request takes one write (or read) lock, so all cross-component calls
//! inside a request apply atomically with respect to other callers.

use rwa_core::roles::{CapabilityTable, Role};
use rwa_pools::PoolManager;
use rwa_registry::AssetRegistry;
use rwa_revenue::{AllocationConfig, Exchange, RevenueCollector, RewardsPoolManager};
use rwa_vault::{CapitalVault, VaultCapacityManager};
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct ProtocolConfig {
    /// Bootstrap admin identity, granted `Role::Admin` at startup
    pub admin: String,
    /// Deployment ceiling for the capacity manager
    pub vault_capacity: u64,
    pub allocation: AllocationConfig,
    pub funding_interval_secs: i64,
    pub min_funding_amount: u64,
    pub target_health_days: u64,
    pub reward_rate_bps: u64,
}

pub struct Protocol {
    pub caps: CapabilityTable,
    pub registry: AssetRegistry,
    pub capacity: VaultCapacityManager,
    pub vault: CapitalVault,
    pub pools: PoolManager,
    pub collector: RevenueCollector,
    pub rewards: RewardsPoolManager,
}

impl Protocol {
    pub fn new(config: &ProtocolConfig) -> Self {
        let mut caps = CapabilityTable::new();
        caps.grant(&config.admin, Role::Admin);
        Self {
            caps,
            registry: AssetRegistry::new(),
            capacity: VaultCapacityManager::new(config.vault_capacity),
            vault: CapitalVault::new(),
            pools: PoolManager::new(),
            collector: RevenueCollector::new(config.allocation),
            rewards: RewardsPoolManager::new(
                config.funding_interval_secs,
                config.min_funding_amount,
                config.target_health_days,
                config.reward_rate_bps,
            ),
        }
    }
}

#[derive(Clone)]
pub struct ApiState {
    pub protocol: Arc<RwLock<Protocol>>,
    /// Conversion collaborator used by reward funding
    pub exchange: Arc<dyn Exchange + Send + Sync>,
    pub start_time: std::time::Instant,
}

impl ApiState {
    pub fn new(config: &ProtocolConfig, exchange: Arc<dyn Exchange + Send + Sync>) -> Self {
        Self {
            protocol: Arc::new(RwLock::new(Protocol::new(config))),
            exchange,
            start_time: std::time::Instant::now(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_admin_granted() {
        let protocol = Protocol::new(&test_support::test_config());
        assert!(protocol.caps.has("admin", Role::Admin));
        assert!(!protocol.caps.has("admin", Role::Collector));
    }
}
