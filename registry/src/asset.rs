//! Asset records and the lifecycle state machine

use crate::error::{RegistryError, Result};
use rwa_core::constants::MAX_INVESTABLE_PCT;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssetCategory {
    RealEstate,
    Commodity,
    Agriculture,
    Infrastructure,
    Business,
    Other,
}

/// Lifecycle status of an asset.
///
/// Happy path:
/// `PendingVerification -> VerifiedPendingAuthority -> InspectionScheduled
///  -> InspectionCompleted -> LegalTransferPending -> LegalTransferCompleted
///  -> ActiveManaged`
///
/// Digitally-verifiable assets skip inspection and transfer:
/// `VerifiedPendingAuthority -> DigitalVerified -> DigitalActive`
///
/// `Rejected` and `Flagged` are terminal and reachable from every
/// non-terminal state via administrative override.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AssetStatus {
    PendingVerification,
    VerifiedPendingAuthority,
    InspectionScheduled,
    InspectionCompleted,
    LegalTransferPending,
    LegalTransferCompleted,
    ActiveManaged,
    DigitalVerified,
    DigitalActive,
    Rejected,
    Flagged,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::PendingVerification => "PendingVerification",
            AssetStatus::VerifiedPendingAuthority => "VerifiedPendingAuthority",
            AssetStatus::InspectionScheduled => "InspectionScheduled",
            AssetStatus::InspectionCompleted => "InspectionCompleted",
            AssetStatus::LegalTransferPending => "LegalTransferPending",
            AssetStatus::LegalTransferCompleted => "LegalTransferCompleted",
            AssetStatus::ActiveManaged => "ActiveManaged",
            AssetStatus::DigitalVerified => "DigitalVerified",
            AssetStatus::DigitalActive => "DigitalActive",
            AssetStatus::Rejected => "Rejected",
            AssetStatus::Flagged => "Flagged",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AssetStatus::Rejected | AssetStatus::Flagged)
    }

    /// Terminal active statuses that make an asset poolable
    pub fn is_active(&self) -> bool {
        matches!(self, AssetStatus::ActiveManaged | AssetStatus::DigitalActive)
    }

    /// Legality of a single step in the transition graph.
    ///
    /// Legal transfer initiation is deliberately reachable from
    /// `PendingVerification` and `VerifiedPendingAuthority` (assets whose
    /// custody moves before inspection), but never from
    /// `InspectionScheduled` - see `AssetRegistry::initiate_legal_transfer`.
    pub fn can_transition_to(&self, next: AssetStatus) -> bool {
        use AssetStatus::*;
        if self.is_terminal() {
            return false;
        }
        if matches!(next, Rejected | Flagged) {
            return true;
        }
        matches!(
            (self, next),
            (PendingVerification, VerifiedPendingAuthority)
                | (PendingVerification, LegalTransferPending)
                | (VerifiedPendingAuthority, InspectionScheduled)
                | (VerifiedPendingAuthority, DigitalVerified)
                | (VerifiedPendingAuthority, LegalTransferPending)
                | (InspectionScheduled, InspectionCompleted)
                | (InspectionCompleted, LegalTransferPending)
                | (LegalTransferPending, LegalTransferCompleted)
                | (LegalTransferCompleted, ActiveManaged)
                | (DigitalVerified, DigitalActive)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub category: AssetCategory,
    pub owner: String,
    /// Declared total value in smallest currency units
    pub total_value: u64,
    /// Percentage of declared value that may be pooled (0-100)
    pub max_investable_pct: u8,
    /// Maturity/due timestamp (unix seconds)
    pub maturity_at: i64,
    /// Opaque content-addressed evidence references, never parsed here
    pub evidence_refs: Vec<String>,
    pub status: AssetStatus,
    /// Responsible AMC/authority, assigned before inspection
    pub authority: Option<String>,
    pub risk_score: Option<u8>,
    pub rating: Option<String>,
    pub submitted_at: i64,
    pub updated_at: i64,
}

impl Asset {
    pub fn new(
        id: String,
        category: AssetCategory,
        owner: String,
        total_value: u64,
        max_investable_pct: Option<u8>,
        maturity_at: i64,
        evidence_refs: Vec<String>,
        now: i64,
    ) -> Self {
        Self {
            id,
            category,
            owner,
            total_value,
            max_investable_pct: max_investable_pct
                .unwrap_or(MAX_INVESTABLE_PCT)
                .min(MAX_INVESTABLE_PCT),
            maturity_at,
            evidence_refs,
            status: AssetStatus::PendingVerification,
            authority: None,
            risk_score: None,
            rating: None,
            submitted_at: now,
            updated_at: now,
        }
    }

    /// Portion of declared value eligible for pooling
    pub fn investable_value(&self) -> u64 {
        self.total_value / 100 * self.max_investable_pct as u64
            + self.total_value % 100 * self.max_investable_pct as u64 / 100
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Explicit transition function; illegal steps leave the asset
    /// unchanged and return the matching error.
    pub fn transition_to(&mut self, next: AssetStatus, now: i64) -> Result<AssetStatus> {
        if !self.status.can_transition_to(next) {
            return Err(RegistryError::InvalidStateTransition {
                from: self.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        let old = self.status;
        self.status = next;
        self.updated_at = now;
        Ok(old)
    }
}
