//! Legal Transfer Ledger
//!
//! One record per asset tracking custody/ownership transfer. This ledger is
//! authoritative: the registry reads the record at decision time instead of
//! caching a possibly-stale copy on the asset.

use crate::error::{RegistryError, Result};
use rwa_core::ids::new_record_id;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LegalTransferStatus {
    Pending,
    Initiated,
    Completed,
    Rejected,
}

impl LegalTransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegalTransferStatus::Pending => "Pending",
            LegalTransferStatus::Initiated => "Initiated",
            LegalTransferStatus::Completed => "Completed",
            LegalTransferStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalTransferRecord {
    pub id: String,
    pub asset_id: String,
    /// Authority responsible for executing the transfer
    pub authority: String,
    pub status: LegalTransferStatus,
    /// Opaque reference to the legal document, never parsed here
    pub document_ref: Option<String>,
    pub initiated_at: i64,
    pub completed_at: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegalTransferLedger {
    records: HashMap<String, LegalTransferRecord>,
}

impl LegalTransferLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, asset_id: &str) -> Option<&LegalTransferRecord> {
        self.records.get(asset_id)
    }

    /// Authoritative read of an asset's transfer status
    pub fn status(&self, asset_id: &str) -> Option<LegalTransferStatus> {
        self.records.get(asset_id).map(|r| r.status)
    }

    /// Create the record on first initiation; re-initiating an already
    /// initiated or completed transfer is rejected.
    pub fn initiate(
        &mut self,
        asset_id: &str,
        authority: &str,
        document_ref: Option<String>,
        now: i64,
    ) -> Result<&LegalTransferRecord> {
        if let Some(existing) = self.records.get(asset_id) {
            if !matches!(
                existing.status,
                LegalTransferStatus::Pending | LegalTransferStatus::Rejected
            ) {
                return Err(RegistryError::InvalidTransferStatus {
                    expected: "Pending".to_string(),
                    actual: existing.status.as_str().to_string(),
                });
            }
        }
        let record = LegalTransferRecord {
            id: new_record_id(),
            asset_id: asset_id.to_string(),
            authority: authority.to_string(),
            status: LegalTransferStatus::Initiated,
            document_ref,
            initiated_at: now,
            completed_at: None,
        };
        self.records.insert(asset_id.to_string(), record);
        Ok(self.records.get(asset_id).unwrap())
    }

    /// Complete an initiated transfer; any other record state is an error.
    pub fn complete(&mut self, asset_id: &str, now: i64) -> Result<&LegalTransferRecord> {
        let record = self
            .records
            .get_mut(asset_id)
            .ok_or_else(|| RegistryError::InvalidTransferStatus {
                expected: "Initiated".to_string(),
                actual: "missing".to_string(),
            })?;
        if record.status != LegalTransferStatus::Initiated {
            return Err(RegistryError::InvalidTransferStatus {
                expected: "Initiated".to_string(),
                actual: record.status.as_str().to_string(),
            });
        }
        record.status = LegalTransferStatus::Completed;
        record.completed_at = Some(now);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initiate_creates_record() {
        let mut ledger = LegalTransferLedger::new();
        let rec = ledger
            .initiate("asset-1", "amc-1", Some("ipfs://deed".to_string()), 1_000)
            .unwrap();
        assert_eq!(rec.status, LegalTransferStatus::Initiated);
        assert_eq!(ledger.status("asset-1"), Some(LegalTransferStatus::Initiated));
    }

    #[test]
    fn test_double_initiation_fails() {
        let mut ledger = LegalTransferLedger::new();
        ledger.initiate("asset-1", "amc-1", None, 1_000).unwrap();
        let err = ledger.initiate("asset-1", "amc-1", None, 1_100).unwrap_err();
        assert_eq!(
            err,
            RegistryError::InvalidTransferStatus {
                expected: "Pending".to_string(),
                actual: "Initiated".to_string(),
            }
        );
    }

    #[test]
    fn test_complete_requires_initiated() {
        let mut ledger = LegalTransferLedger::new();
        assert!(ledger.complete("asset-1", 1_000).is_err());

        ledger.initiate("asset-1", "amc-1", None, 1_000).unwrap();
        let rec = ledger.complete("asset-1", 2_000).unwrap();
        assert_eq!(rec.status, LegalTransferStatus::Completed);
        assert_eq!(rec.completed_at, Some(2_000));

        // completing twice fails
        assert!(ledger.complete("asset-1", 3_000).is_err());
    }
}
