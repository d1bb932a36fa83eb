//! String identifier constructors
//!
//! All protocol entities are keyed by prefixed uuid-v4 strings so that ids
//! are self-describing in audit records and API payloads.

use uuid::Uuid;

pub fn new_asset_id() -> String {
    format!("asset-{}", Uuid::new_v4())
}

pub fn new_pool_id() -> String {
    format!("pool-{}", Uuid::new_v4())
}

pub fn new_tranche_id() -> String {
    format!("tranche-{}", Uuid::new_v4())
}

pub fn new_record_id() -> String {
    format!("rec-{}", Uuid::new_v4())
}
