//! Asset Registry
//!
//! Orchestrates the asset lifecycle: submission, oracle verification,
//! authority assignment, inspection, legal transfer and activation. Every
//! transition appends one audit record; illegal transitions leave state
//! untouched and return the matching error.

use crate::asset::{Asset, AssetCategory, AssetStatus};
use crate::error::{RegistryError, Result};
use crate::inspection::{InspectionLedger, InspectionRecord};
use crate::legal::{LegalTransferLedger, LegalTransferRecord, LegalTransferStatus};
use crate::oracle::{
    OracleError, VerificationOracle, VerificationResult, ORACLE_FAILURE_RISK_SCORE,
    RISK_SCORE_THRESHOLD,
};
use rwa_core::audit::AuditTrail;
use rwa_core::ids::new_asset_id;
use rwa_core::roles::{CapabilityTable, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetRegistry {
    assets: HashMap<String, Asset>,
    inspections: InspectionLedger,
    legal: LegalTransferLedger,
    audit: AuditTrail,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- queries ----

    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.get(id)
    }

    pub fn assets_by_status(&self, status: AssetStatus) -> Vec<&Asset> {
        self.assets.values().filter(|a| a.status == status).collect()
    }

    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.assets.get(id).map(|a| a.is_active()).unwrap_or(false)
    }

    pub fn inspection(&self, asset_id: &str) -> Option<&InspectionRecord> {
        self.inspections.latest(asset_id)
    }

    pub fn legal_transfer(&self, asset_id: &str) -> Option<&LegalTransferRecord> {
        self.legal.record(asset_id)
    }

    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    pub fn count(&self) -> usize {
        self.assets.len()
    }

    // ---- lifecycle mutators ----

    /// Submit a new asset for verification. Open to any identity; the
    /// submitter becomes the recorded owner.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_asset(
        &mut self,
        owner: &str,
        category: AssetCategory,
        total_value: u64,
        max_investable_pct: Option<u8>,
        maturity_at: i64,
        evidence_refs: Vec<String>,
        now: i64,
    ) -> String {
        let id = new_asset_id();
        let asset = Asset::new(
            id.clone(),
            category,
            owner.to_string(),
            total_value,
            max_investable_pct,
            maturity_at,
            evidence_refs,
            now,
        );
        self.audit.record(
            "asset",
            &id,
            "",
            asset.status.as_str(),
            owner,
            now,
        );
        info!(asset_id = %id, owner, "asset submitted");
        self.assets.insert(id.clone(), asset);
        id
    }

    /// Apply an oracle verification outcome. A failed oracle call counts
    /// as a rejection with risk score 99.
    pub fn apply_verification(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        asset_id: &str,
        outcome: std::result::Result<VerificationResult, OracleError>,
        now: i64,
    ) -> Result<AssetStatus> {
        caps.require(actor, Role::Operator)?;
        let asset = self
            .assets
            .get(asset_id)
            .ok_or_else(|| RegistryError::AssetNotFound(asset_id.to_string()))?;
        if asset.status != AssetStatus::PendingVerification {
            return Err(RegistryError::InvalidStateTransition {
                from: asset.status.as_str().to_string(),
                to: AssetStatus::VerifiedPendingAuthority.as_str().to_string(),
            });
        }

        let (next, risk_score, rating) = match outcome {
            Ok(result) if result.is_valid && result.risk_score <= RISK_SCORE_THRESHOLD => (
                AssetStatus::VerifiedPendingAuthority,
                result.risk_score,
                result.rating,
            ),
            Ok(result) => (AssetStatus::Rejected, result.risk_score, result.rating),
            Err(e) => {
                warn!(asset_id, error = %e, "oracle call failed, rejecting");
                (
                    AssetStatus::Rejected,
                    ORACLE_FAILURE_RISK_SCORE,
                    "unrated".to_string(),
                )
            }
        };

        let asset = self.assets.get_mut(asset_id).unwrap();
        asset.risk_score = Some(risk_score);
        asset.rating = Some(rating);
        Self::commit_transition(&mut self.audit, asset, next, actor, now)
    }

    /// Convenience wrapper calling the oracle inline
    pub fn verify_asset(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        oracle: &dyn VerificationOracle,
        asset_id: &str,
        metadata: &str,
        now: i64,
    ) -> Result<AssetStatus> {
        let outcome = oracle.verify(asset_id, metadata);
        self.apply_verification(caps, actor, asset_id, outcome, now)
    }

    /// Assign the AMC/authority responsible for inspection and transfer
    pub fn assign_authority(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        asset_id: &str,
        authority: &str,
        now: i64,
    ) -> Result<()> {
        caps.require(actor, Role::Admin)?;
        let asset = self
            .assets
            .get_mut(asset_id)
            .ok_or_else(|| RegistryError::AssetNotFound(asset_id.to_string()))?;
        asset.authority = Some(authority.to_string());
        asset.updated_at = now;
        info!(asset_id, authority, "authority assigned");
        Ok(())
    }

    pub fn schedule_inspection(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        asset_id: &str,
        inspector: &str,
        scheduled_at: i64,
        now: i64,
    ) -> Result<()> {
        caps.require(actor, Role::Authority)?;
        let asset = self
            .assets
            .get(asset_id)
            .ok_or_else(|| RegistryError::AssetNotFound(asset_id.to_string()))?;
        if asset.status != AssetStatus::VerifiedPendingAuthority {
            return Err(RegistryError::InvalidStateTransition {
                from: asset.status.as_str().to_string(),
                to: AssetStatus::InspectionScheduled.as_str().to_string(),
            });
        }
        if asset.authority.is_none() {
            return Err(RegistryError::AuthorityNotAssigned(asset_id.to_string()));
        }
        self.inspections.schedule(asset_id, inspector, scheduled_at, now)?;
        let asset = self.assets.get_mut(asset_id).unwrap();
        Self::commit_transition(
            &mut self.audit,
            asset,
            AssetStatus::InspectionScheduled,
            actor,
            now,
        )?;
        Ok(())
    }

    /// Complete the scheduled inspection. A missing ledger record is
    /// repaired by creating one with an immediate timestamp and completing
    /// it, rather than failing the caller.
    pub fn complete_inspection(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        asset_id: &str,
        now: i64,
    ) -> Result<()> {
        caps.require(actor, Role::Authority)?;
        let asset = self
            .assets
            .get(asset_id)
            .ok_or_else(|| RegistryError::AssetNotFound(asset_id.to_string()))?;
        if asset.status != AssetStatus::InspectionScheduled {
            return Err(RegistryError::InvalidStateTransition {
                from: asset.status.as_str().to_string(),
                to: AssetStatus::InspectionCompleted.as_str().to_string(),
            });
        }
        if self.inspections.latest(asset_id).is_none() {
            warn!(asset_id, "no inspection record on file, auto-creating");
        }
        self.inspections.complete(asset_id, actor, now);
        let asset = self.assets.get_mut(asset_id).unwrap();
        Self::commit_transition(
            &mut self.audit,
            asset,
            AssetStatus::InspectionCompleted,
            actor,
            now,
        )?;
        Ok(())
    }

    /// Begin the custody transfer. Initiation from `InspectionScheduled`
    /// fails loudly: it usually means the completion step never committed.
    pub fn initiate_legal_transfer(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        asset_id: &str,
        document_ref: Option<String>,
        now: i64,
    ) -> Result<()> {
        caps.require(actor, Role::Authority)?;
        let asset = self
            .assets
            .get(asset_id)
            .ok_or_else(|| RegistryError::AssetNotFound(asset_id.to_string()))?;
        if !matches!(
            asset.status,
            AssetStatus::PendingVerification
                | AssetStatus::VerifiedPendingAuthority
                | AssetStatus::InspectionCompleted
        ) {
            return Err(RegistryError::InvalidStateForTransfer {
                status: asset.status.as_str().to_string(),
            });
        }
        let authority = asset
            .authority
            .clone()
            .ok_or_else(|| RegistryError::AuthorityNotAssigned(asset_id.to_string()))?;
        self.legal.initiate(asset_id, &authority, document_ref, now)?;
        let asset = self.assets.get_mut(asset_id).unwrap();
        Self::commit_transition(
            &mut self.audit,
            asset,
            AssetStatus::LegalTransferPending,
            actor,
            now,
        )?;
        Ok(())
    }

    /// Complete the custody transfer. The ledger record is the authority:
    /// it must read `Initiated` at decision time.
    pub fn complete_legal_transfer(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        asset_id: &str,
        now: i64,
    ) -> Result<()> {
        caps.require(actor, Role::Authority)?;
        let asset = self
            .assets
            .get(asset_id)
            .ok_or_else(|| RegistryError::AssetNotFound(asset_id.to_string()))?;
        if asset.status != AssetStatus::LegalTransferPending {
            return Err(RegistryError::InvalidStateTransition {
                from: asset.status.as_str().to_string(),
                to: AssetStatus::LegalTransferCompleted.as_str().to_string(),
            });
        }
        self.legal.complete(asset_id, now)?;
        let asset = self.assets.get_mut(asset_id).unwrap();
        Self::commit_transition(
            &mut self.audit,
            asset,
            AssetStatus::LegalTransferCompleted,
            actor,
            now,
        )?;
        Ok(())
    }

    /// Final activation of a physically managed asset. Activating twice is
    /// an `AlreadyActive` error, never a silent success.
    pub fn activate_asset(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        asset_id: &str,
        now: i64,
    ) -> Result<()> {
        caps.require(actor, Role::Authority)?;
        let asset = self
            .assets
            .get(asset_id)
            .ok_or_else(|| RegistryError::AssetNotFound(asset_id.to_string()))?;
        if asset.is_active() {
            return Err(RegistryError::AlreadyActive(asset_id.to_string()));
        }
        if asset.status != AssetStatus::LegalTransferCompleted {
            return Err(RegistryError::InvalidStateTransition {
                from: asset.status.as_str().to_string(),
                to: AssetStatus::ActiveManaged.as_str().to_string(),
            });
        }
        match self.legal.status(asset_id) {
            Some(LegalTransferStatus::Completed) => {}
            other => {
                return Err(RegistryError::InvalidTransferStatus {
                    expected: "Completed".to_string(),
                    actual: other.map(|s| s.as_str().to_string()).unwrap_or_else(|| "missing".to_string()),
                })
            }
        }
        let asset = self.assets.get_mut(asset_id).unwrap();
        Self::commit_transition(&mut self.audit, asset, AssetStatus::ActiveManaged, actor, now)?;
        Ok(())
    }

    /// Digital branch: no physical inspection or transfer required
    pub fn mark_digital_verified(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        asset_id: &str,
        now: i64,
    ) -> Result<()> {
        caps.require(actor, Role::Authority)?;
        let asset = self
            .assets
            .get_mut(asset_id)
            .ok_or_else(|| RegistryError::AssetNotFound(asset_id.to_string()))?;
        Self::commit_transition(&mut self.audit, asset, AssetStatus::DigitalVerified, actor, now)?;
        Ok(())
    }

    pub fn activate_digital(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        asset_id: &str,
        now: i64,
    ) -> Result<()> {
        caps.require(actor, Role::Authority)?;
        let asset = self
            .assets
            .get_mut(asset_id)
            .ok_or_else(|| RegistryError::AssetNotFound(asset_id.to_string()))?;
        if asset.is_active() {
            return Err(RegistryError::AlreadyActive(asset_id.to_string()));
        }
        Self::commit_transition(&mut self.audit, asset, AssetStatus::DigitalActive, actor, now)?;
        Ok(())
    }

    /// Administrative override, permitted from any non-terminal state
    pub fn reject_asset(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        asset_id: &str,
        now: i64,
    ) -> Result<()> {
        self.mark_terminal(caps, actor, asset_id, AssetStatus::Rejected, now)
    }

    /// Administrative override, permitted from any non-terminal state
    pub fn flag_asset(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        asset_id: &str,
        now: i64,
    ) -> Result<()> {
        self.mark_terminal(caps, actor, asset_id, AssetStatus::Flagged, now)
    }

    fn mark_terminal(
        &mut self,
        caps: &CapabilityTable,
        actor: &str,
        asset_id: &str,
        terminal: AssetStatus,
        now: i64,
    ) -> Result<()> {
        caps.require(actor, Role::Admin)?;
        let asset = self
            .assets
            .get_mut(asset_id)
            .ok_or_else(|| RegistryError::AssetNotFound(asset_id.to_string()))?;
        Self::commit_transition(&mut self.audit, asset, terminal, actor, now)?;
        Ok(())
    }

    /// Single commit point for status changes: validates graph legality as
    /// the last step, then writes the status and the audit record together.
    fn commit_transition(
        audit: &mut AuditTrail,
        asset: &mut Asset,
        next: AssetStatus,
        actor: &str,
        now: i64,
    ) -> Result<AssetStatus> {
        let old = asset.transition_to(next, now)?;
        audit.record("asset", &asset.id, old.as_str(), next.as_str(), actor, now);
        info!(
            asset_id = %asset.id,
            from = old.as_str(),
            to = next.as_str(),
            actor,
            "asset status transition"
        );
        Ok(next)
    }
}
