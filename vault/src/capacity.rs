//! Vault capacity ceiling and deployment waitlist

use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaitlistEntry {
    pub pool_id: String,
    pub amount: u64,
    pub queued_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacitySnapshot {
    pub capacity: u64,
    pub deployed: u64,
    pub headroom: u64,
    pub waitlisted: u64,
}

/// Ceiling on how much vault capital may be exposed to pools at once.
/// Requests that exceed the headroom queue onto the waitlist instead of
/// being rejected outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultCapacityManager {
    capacity: u64,
    deployed: u64,
    waitlist: Vec<WaitlistEntry>,
}

impl VaultCapacityManager {
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            deployed: 0,
            waitlist: Vec::new(),
        }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn deployed(&self) -> u64 {
        self.deployed
    }

    pub fn headroom(&self) -> u64 {
        self.capacity.saturating_sub(self.deployed)
    }

    pub fn waitlist(&self) -> &[WaitlistEntry] {
        &self.waitlist
    }

    pub fn waitlisted_total(&self) -> u64 {
        self.waitlist.iter().map(|e| e.amount).sum()
    }

    pub fn snapshot(&self) -> CapacitySnapshot {
        CapacitySnapshot {
            capacity: self.capacity,
            deployed: self.deployed,
            headroom: self.headroom(),
            waitlisted: self.waitlisted_total(),
        }
    }

    /// Raise or lower the ceiling. Lowering below the currently deployed
    /// amount is rejected; existing deployments are never clawed back.
    pub fn set_capacity(&mut self, capacity: u64) -> Result<()> {
        if capacity < self.deployed {
            return Err(VaultError::InsufficientCapacity {
                requested: capacity,
                available: self.deployed,
            });
        }
        self.capacity = capacity;
        Ok(())
    }

    /// Count a granted amount against the ceiling. Re-checks the invariant
    /// `deployed <= capacity` as the final step before commit.
    pub(crate) fn commit(&mut self, amount: u64) -> Result<()> {
        if amount > self.headroom() {
            return Err(VaultError::InsufficientCapacity {
                requested: amount,
                available: self.headroom(),
            });
        }
        self.deployed += amount;
        Ok(())
    }

    /// Free ceiling on repayment
    pub fn release(&mut self, amount: u64) {
        self.deployed = self.deployed.saturating_sub(amount);
    }

    pub(crate) fn enqueue(&mut self, pool_id: &str, amount: u64, now: i64) {
        info!(pool_id, amount, "deployment deficit waitlisted");
        self.waitlist.push(WaitlistEntry {
            pool_id: pool_id.to_string(),
            amount,
            queued_at: now,
        });
    }

    pub(crate) fn drain_waitlist(&mut self) -> Vec<WaitlistEntry> {
        std::mem::take(&mut self.waitlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headroom() {
        let mut mgr = VaultCapacityManager::new(1_000_000);
        mgr.commit(900_000).unwrap();
        assert_eq!(mgr.headroom(), 100_000);
    }

    #[test]
    fn test_commit_beyond_headroom_fails() {
        let mut mgr = VaultCapacityManager::new(100);
        let err = mgr.commit(150).unwrap_err();
        assert_eq!(
            err,
            VaultError::InsufficientCapacity {
                requested: 150,
                available: 100,
            }
        );
        assert_eq!(mgr.deployed(), 0);
    }

    #[test]
    fn test_release_frees_headroom() {
        let mut mgr = VaultCapacityManager::new(1_000);
        mgr.commit(800).unwrap();
        mgr.release(300);
        assert_eq!(mgr.headroom(), 500);
    }

    #[test]
    fn test_cannot_lower_capacity_below_deployed() {
        let mut mgr = VaultCapacityManager::new(1_000);
        mgr.commit(600).unwrap();
        assert!(mgr.set_capacity(500).is_err());
        mgr.set_capacity(600).unwrap();
        assert_eq!(mgr.headroom(), 0);
    }

    #[test]
    fn test_waitlist_totals() {
        let mut mgr = VaultCapacityManager::new(100);
        mgr.enqueue("pool-1", 50, 1_000);
        mgr.enqueue("pool-2", 75, 1_001);
        assert_eq!(mgr.waitlisted_total(), 125);
        assert_eq!(mgr.waitlist().len(), 2);
    }
}
