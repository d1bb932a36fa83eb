//! End-to-end: asset activation -> pool creation -> capital deployment

use rwa_core::roles::{CapabilityTable, Role};
use rwa_pools::*;
use rwa_registry::{AssetCategory, AssetRegistry, VerificationResult};
use rwa_vault::{CapitalVault, VaultCapacityManager};

fn caps() -> CapabilityTable {
    let mut caps = CapabilityTable::new();
    caps.grant("admin", Role::Admin);
    caps.grant("amc", Role::Authority);
    caps.grant("keeper", Role::Operator);
    caps.grant("pm", Role::PoolManager);
    caps.grant("pm", Role::VaultDeployer);
    caps
}

fn managed_asset(registry: &mut AssetRegistry, caps: &CapabilityTable, value: u64) -> String {
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
                risk_score: 25,
                rating: "A".to_string(),
            }),
            1_100,
        )
        .unwrap();
    registry.assign_authority(caps, "admin", &id, "amc", 1_200).unwrap();
    registry
        .schedule_inspection(caps, "amc", &id, "inspector", 50_000, 1_300)
        .unwrap();
    registry.complete_inspection(caps, "amc", &id, 50_100).unwrap();
    registry
        .initiate_legal_transfer(caps, "amc", &id, None, 50_200)
        .unwrap();
    registry.complete_legal_transfer(caps, "amc", &id, 50_300).unwrap();
    registry.activate_asset(caps, "amc", &id, 50_400).unwrap();
    id
}

#[test]
fn pool_over_fully_managed_assets_gets_capital() {
    let caps = caps();
    let mut registry = AssetRegistry::new();
    let mut capacity = VaultCapacityManager::new(1_000_000);
    let mut vault = CapitalVault::new();
    let mut manager = PoolManager::new();

    vault.stake("alice", 800_000, 100).unwrap();
    let a = managed_asset(&mut registry, &caps, 400_000);
    let b = managed_asset(&mut registry, &caps, 300_000);

    let result = manager
        .create_pool(
            &caps,
            "pm",
            "Industrial portfolio",
            "Two managed properties",
            vec![a.clone(), b],
            None,
            &registry,
            &mut capacity,
            &mut vault,
            60_000,
        )
        .unwrap();

    let pool = manager.pool(&result.pool_id).unwrap();
    assert_eq!(pool.total_value, 700_000);
    assert_eq!(pool.asset_ids.len(), 2);
    assert_eq!(pool.asset_ids[0], a);

    // vault had 800_000 available, capacity 1_000_000: full grant
    match result.deployment {
        DeploymentOutcome::Deployed(grant) => assert_eq!(grant.granted, 700_000),
        other => panic!("expected deployed, got {:?}", other),
    }
    assert_eq!(vault.available(), 100_000);
}

#[test]
fn pool_creation_survives_capital_shortage() {
    let caps = caps();
    let mut registry = AssetRegistry::new();
    let mut capacity = VaultCapacityManager::new(1_000_000);
    let mut vault = CapitalVault::new();
    let mut manager = PoolManager::new();

    // nothing staked: grant is zero and the full request waitlists
    let a = managed_asset(&mut registry, &caps, 250_000);
    let result = manager
        .create_pool(
            &caps,
            "pm",
            "Unfunded pool",
            "",
            vec![a],
            None,
            &registry,
            &mut capacity,
            &mut vault,
            60_000,
        )
        .unwrap();

    let pool = manager.pool(&result.pool_id).unwrap();
    assert!(pool.is_active);
    assert_eq!(pool.deployed_capital, 0);
    match result.deployment {
        DeploymentOutcome::Deployed(grant) => {
            assert_eq!(grant.granted, 0);
            assert_eq!(grant.waitlisted, 250_000);
        }
        other => panic!("expected zero-grant deployment, got {:?}", other),
    }
    assert_eq!(capacity.waitlisted_total(), 250_000);
}

#[test]
fn tranched_pool_creation_from_spec() {
    let caps = caps();
    let mut registry = AssetRegistry::new();
    let mut capacity = VaultCapacityManager::new(1_000_000);
    let mut vault = CapitalVault::new();
    let mut manager = PoolManager::new();
    vault.stake("alice", 500_000, 100).unwrap();

    let a = managed_asset(&mut registry, &caps, 200_000);
    let spec = vec![
        (TrancheType::Senior, TrancheTerms { capacity: 150_000, rate_bps: 450 }),
        (TrancheType::Junior, TrancheTerms { capacity: 50_000, rate_bps: 1_100 }),
    ];
    let result = manager
        .create_pool(
            &caps,
            "pm",
            "Tranched pool",
            "",
            vec![a],
            Some(spec),
            &registry,
            &mut capacity,
            &mut vault,
            60_000,
        )
        .unwrap();

    let pool = manager.pool(&result.pool_id).unwrap();
    assert!(pool.has_tranches);
    assert_eq!(pool.tranche_ids.len(), 2);
    let tranches = manager.pool_tranches(&result.pool_id);
    assert_eq!(tranches.len(), 2);
}
