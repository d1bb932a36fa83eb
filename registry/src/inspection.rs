//! Inspection Ledger
//!
//! Records physical inspection scheduling and outcomes per asset. The full
//! history is retained; the latest record is the one lifecycle transitions
//! consult.

use crate::error::{RegistryError, Result};
use rwa_core::ids::new_record_id;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InspectionStatus {
    Pending,
    Scheduled,
    Completed,
    Flagged,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub id: String,
    pub asset_id: String,
    pub inspector: String,
    pub scheduled_at: i64,
    pub completed_at: Option<i64>,
    pub status: InspectionStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectionLedger {
    records: HashMap<String, Vec<InspectionRecord>>,
}

impl InspectionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self, asset_id: &str) -> Option<&InspectionRecord> {
        self.records.get(asset_id).and_then(|v| v.last())
    }

    pub fn history(&self, asset_id: &str) -> &[InspectionRecord] {
        self.records.get(asset_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Create a record for a future inspection. Scheduling in the past or
    /// while another inspection is still open fails with `InvalidSchedule`.
    pub fn schedule(
        &mut self,
        asset_id: &str,
        inspector: &str,
        scheduled_at: i64,
        now: i64,
    ) -> Result<&InspectionRecord> {
        if scheduled_at <= now {
            return Err(RegistryError::InvalidSchedule(format!(
                "scheduled time {} is not in the future (now {})",
                scheduled_at, now
            )));
        }
        if let Some(open) = self.latest(asset_id) {
            if matches!(open.status, InspectionStatus::Pending | InspectionStatus::Scheduled) {
                return Err(RegistryError::InvalidSchedule(format!(
                    "inspection {} already open for asset {}",
                    open.id, asset_id
                )));
            }
        }
        let record = InspectionRecord {
            id: new_record_id(),
            asset_id: asset_id.to_string(),
            inspector: inspector.to_string(),
            scheduled_at,
            completed_at: None,
            status: InspectionStatus::Scheduled,
        };
        let entries = self.records.entry(asset_id.to_string()).or_default();
        entries.push(record);
        Ok(entries.last().unwrap())
    }

    /// Mark the open scheduled record completed. When no such record exists
    /// the ledger transparently creates one with an immediate timestamp and
    /// completes it - recovery path for ledgers that drifted apart.
    pub fn complete(&mut self, asset_id: &str, inspector: &str, now: i64) -> &InspectionRecord {
        let entries = self.records.entry(asset_id.to_string()).or_default();
        let needs_record = !matches!(
            entries.last().map(|r| r.status),
            Some(InspectionStatus::Scheduled)
        );
        if needs_record {
            entries.push(InspectionRecord {
                id: new_record_id(),
                asset_id: asset_id.to_string(),
                inspector: inspector.to_string(),
                scheduled_at: now,
                completed_at: None,
                status: InspectionStatus::Scheduled,
            });
        }
        let record = entries.last_mut().unwrap();
        record.status = InspectionStatus::Completed;
        record.completed_at = Some(now);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_future_succeeds() {
        let mut ledger = InspectionLedger::new();
        let rec = ledger.schedule("asset-1", "amc-1", 2_000, 1_000).unwrap();
        assert_eq!(rec.status, InspectionStatus::Scheduled);
        assert_eq!(rec.scheduled_at, 2_000);
    }

    #[test]
    fn test_schedule_in_past_fails() {
        let mut ledger = InspectionLedger::new();
        let err = ledger.schedule("asset-1", "amc-1", 500, 1_000).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSchedule(_)));
        assert!(ledger.latest("asset-1").is_none());
    }

    #[test]
    fn test_duplicate_schedule_fails() {
        let mut ledger = InspectionLedger::new();
        ledger.schedule("asset-1", "amc-1", 2_000, 1_000).unwrap();
        let err = ledger.schedule("asset-1", "amc-1", 3_000, 1_000).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSchedule(_)));
    }

    #[test]
    fn test_complete_scheduled_record() {
        let mut ledger = InspectionLedger::new();
        ledger.schedule("asset-1", "amc-1", 2_000, 1_000).unwrap();
        let rec = ledger.complete("asset-1", "amc-1", 2_500);
        assert_eq!(rec.status, InspectionStatus::Completed);
        assert_eq!(rec.completed_at, Some(2_500));
        assert_eq!(ledger.history("asset-1").len(), 1);
    }

    #[test]
    fn test_complete_without_record_autocreates() {
        let mut ledger = InspectionLedger::new();
        let rec = ledger.complete("asset-1", "amc-1", 2_500);
        assert_eq!(rec.status, InspectionStatus::Completed);
        assert_eq!(rec.scheduled_at, 2_500);
        assert_eq!(ledger.history("asset-1").len(), 1);
    }

    #[test]
    fn test_reschedule_after_completion() {
        let mut ledger = InspectionLedger::new();
        ledger.schedule("asset-1", "amc-1", 2_000, 1_000).unwrap();
        ledger.complete("asset-1", "amc-1", 2_500);
        ledger.schedule("asset-1", "amc-2", 5_000, 3_000).unwrap();
        assert_eq!(ledger.history("asset-1").len(), 2);
    }
}
