//! Pool and tranche records

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrancheType {
    /// Repaid first on any capital event
    Senior,
    Junior,
}

impl TrancheType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrancheType::Senior => "Senior",
            TrancheType::Junior => "Junior",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrancheTerms {
    /// Maximum capital this tranche can absorb
    pub capacity: u64,
    /// Yield terms in basis points
    pub rate_bps: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tranche {
    pub id: String,
    pub pool_id: String,
    pub tranche_type: TrancheType,
    pub capacity: u64,
    pub rate_bps: u64,
    /// Shares issued against this tranche and not yet repaid
    pub outstanding_shares: u64,
    pub created_at: i64,
}

impl Tranche {
    pub fn new(id: String, pool_id: String, tranche_type: TrancheType, terms: TrancheTerms, now: i64) -> Self {
        Self {
            id,
            pool_id,
            tranche_type,
            capacity: terms.capacity,
            rate_bps: terms.rate_bps,
            outstanding_shares: 0,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    pub creator: String,
    pub name: String,
    pub description: String,
    /// Sum of contributed asset and capital value
    pub total_value: u64,
    pub total_shares: u64,
    pub is_active: bool,
    /// Finalized pools accept no further tranches
    pub is_finalized: bool,
    pub has_tranches: bool,
    /// Member assets, append-only while the pool is open
    pub asset_ids: Vec<String>,
    pub tranche_ids: Vec<String>,
    /// Vault capital currently deployed into this pool
    pub deployed_capital: u64,
    pub created_at: i64,
}

impl Pool {
    pub fn new(
        id: String,
        creator: String,
        name: String,
        description: String,
        total_value: u64,
        asset_ids: Vec<String>,
        now: i64,
    ) -> Self {
        Self {
            id,
            creator,
            name,
            description,
            total_value,
            // shares issued 1:1 with contributed value
            total_shares: total_value,
            is_active: true,
            is_finalized: false,
            has_tranches: false,
            asset_ids,
            tranche_ids: Vec::new(),
            deployed_capital: 0,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pool_defaults() {
        let pool = Pool::new(
            "pool-1".to_string(),
            "pm".to_string(),
            "Warehouse receivables".to_string(),
            "Q3 receivables".to_string(),
            500_000,
            vec!["asset-1".to_string()],
            1_000,
        );
        assert!(pool.is_active);
        assert!(!pool.is_finalized);
        assert!(!pool.has_tranches);
        assert_eq!(pool.total_shares, 500_000);
        assert_eq!(pool.deployed_capital, 0);
    }

    #[test]
    fn test_tranche_from_terms() {
        let t = Tranche::new(
            "tranche-1".to_string(),
            "pool-1".to_string(),
            TrancheType::Senior,
            TrancheTerms {
                capacity: 100_000,
                rate_bps: 600,
            },
            1_000,
        );
        assert_eq!(t.capacity, 100_000);
        assert_eq!(t.outstanding_shares, 0);
        assert_eq!(t.tranche_type.as_str(), "Senior");
    }
}
