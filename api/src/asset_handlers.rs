//! Asset lifecycle API handlers

use crate::{ApiError, ApiResult, ApiState};
use axum::extract::{Path, Query, State};
use axum::Json;
use rwa_core::current_timestamp;
use rwa_registry::{Asset, AssetCategory, AssetStatus, VerificationResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct AssetResponse {
    pub id: String,
    pub category: String,
    pub owner: String,
    pub total_value: u64,
    pub max_investable_pct: u8,
    pub investable_value: u64,
    pub maturity_at: i64,
    pub status: String,
    pub authority: Option<String>,
    pub risk_score: Option<u8>,
    pub rating: Option<String>,
    pub evidence_refs: Vec<String>,
    pub submitted_at: i64,
    pub updated_at: i64,
}

impl From<&Asset> for AssetResponse {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.clone(),
            category: format!("{:?}", asset.category),
            owner: asset.owner.clone(),
            total_value: asset.total_value,
            max_investable_pct: asset.max_investable_pct,
            investable_value: asset.investable_value(),
            maturity_at: asset.maturity_at,
            status: asset.status.as_str().to_string(),
            authority: asset.authority.clone(),
            risk_score: asset.risk_score,
            rating: asset.rating.clone(),
            evidence_refs: asset.evidence_refs.clone(),
            submitted_at: asset.submitted_at,
            updated_at: asset.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitAssetRequest {
    pub owner: String,
    pub category: String,
    pub total_value: u64,
    pub max_investable_pct: Option<u8>,
    pub maturity_at: i64,
    #[serde(default)]
    pub evidence_refs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitAssetResponse {
    pub asset_id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyAssetRequest {
    pub actor: String,
    pub is_valid: bool,
    pub risk_score: u8,
    pub rating: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignAuthorityRequest {
    pub actor: String,
    pub authority: String,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleInspectionRequest {
    pub actor: String,
    pub inspector: String,
    pub scheduled_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    pub actor: String,
}

#[derive(Debug, Deserialize)]
pub struct InitiateTransferRequest {
    pub actor: String,
    pub document_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListAssetsQuery {
    pub status: Option<String>,
}

fn parse_category(s: &str) -> ApiResult<AssetCategory> {
    match s {
        "RealEstate" => Ok(AssetCategory::RealEstate),
        "Commodity" => Ok(AssetCategory::Commodity),
        "Agriculture" => Ok(AssetCategory::Agriculture),
        "Infrastructure" => Ok(AssetCategory::Infrastructure),
        "Business" => Ok(AssetCategory::Business),
        "Other" => Ok(AssetCategory::Other),
        other => Err(ApiError::BadRequest(format!("unknown category: {}", other))),
    }
}

fn parse_status(s: &str) -> ApiResult<AssetStatus> {
    match s {
        "PendingVerification" => Ok(AssetStatus::PendingVerification),
        "VerifiedPendingAuthority" => Ok(AssetStatus::VerifiedPendingAuthority),
        "InspectionScheduled" => Ok(AssetStatus::InspectionScheduled),
        "InspectionCompleted" => Ok(AssetStatus::InspectionCompleted),
        "LegalTransferPending" => Ok(AssetStatus::LegalTransferPending),
        "LegalTransferCompleted" => Ok(AssetStatus::LegalTransferCompleted),
        "ActiveManaged" => Ok(AssetStatus::ActiveManaged),
        "DigitalVerified" => Ok(AssetStatus::DigitalVerified),
        "DigitalActive" => Ok(AssetStatus::DigitalActive),
        "Rejected" => Ok(AssetStatus::Rejected),
        "Flagged" => Ok(AssetStatus::Flagged),
        other => Err(ApiError::BadRequest(format!("unknown status: {}", other))),
    }
}

pub async fn submit_asset(
    State(state): State<ApiState>,
    Json(request): Json<SubmitAssetRequest>,
) -> ApiResult<Json<SubmitAssetResponse>> {
    let category = parse_category(&request.category)?;
    let mut protocol = state.protocol.write().await;
    let asset_id = protocol.registry.submit_asset(
        &request.owner,
        category,
        request.total_value,
        request.max_investable_pct,
        request.maturity_at,
        request.evidence_refs,
        current_timestamp(),
    );
    Ok(Json(SubmitAssetResponse {
        asset_id,
        status: AssetStatus::PendingVerification.as_str().to_string(),
    }))
}

/// Apply an externally obtained verification outcome
pub async fn verify_asset(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<VerifyAssetRequest>,
) -> ApiResult<Json<AssetResponse>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    protocol.registry.apply_verification(
        &protocol.caps,
        &request.actor,
        &id,
        Ok(VerificationResult {
            is_valid: request.is_valid,
            risk_score: request.risk_score,
            rating: request.rating,
        }),
        current_timestamp(),
    )?;
    asset_response(&protocol.registry, &id)
}

pub async fn assign_authority(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<AssignAuthorityRequest>,
) -> ApiResult<Json<AssetResponse>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    protocol.registry.assign_authority(
        &protocol.caps,
        &request.actor,
        &id,
        &request.authority,
        current_timestamp(),
    )?;
    asset_response(&protocol.registry, &id)
}

pub async fn schedule_inspection(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<ScheduleInspectionRequest>,
) -> ApiResult<Json<AssetResponse>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    protocol.registry.schedule_inspection(
        &protocol.caps,
        &request.actor,
        &id,
        &request.inspector,
        request.scheduled_at,
        current_timestamp(),
    )?;
    asset_response(&protocol.registry, &id)
}

pub async fn complete_inspection(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<ActorRequest>,
) -> ApiResult<Json<AssetResponse>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    protocol
        .registry
        .complete_inspection(&protocol.caps, &request.actor, &id, current_timestamp())?;
    asset_response(&protocol.registry, &id)
}

pub async fn initiate_legal_transfer(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<InitiateTransferRequest>,
) -> ApiResult<Json<AssetResponse>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    protocol.registry.initiate_legal_transfer(
        &protocol.caps,
        &request.actor,
        &id,
        request.document_ref,
        current_timestamp(),
    )?;
    asset_response(&protocol.registry, &id)
}

pub async fn complete_legal_transfer(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<ActorRequest>,
) -> ApiResult<Json<AssetResponse>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    protocol
        .registry
        .complete_legal_transfer(&protocol.caps, &request.actor, &id, current_timestamp())?;
    asset_response(&protocol.registry, &id)
}

pub async fn activate_asset(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<ActorRequest>,
) -> ApiResult<Json<AssetResponse>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    protocol
        .registry
        .activate_asset(&protocol.caps, &request.actor, &id, current_timestamp())?;
    asset_response(&protocol.registry, &id)
}

pub async fn mark_digital_verified(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<ActorRequest>,
) -> ApiResult<Json<AssetResponse>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    protocol
        .registry
        .mark_digital_verified(&protocol.caps, &request.actor, &id, current_timestamp())?;
    asset_response(&protocol.registry, &id)
}

pub async fn activate_digital(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<ActorRequest>,
) -> ApiResult<Json<AssetResponse>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    protocol
        .registry
        .activate_digital(&protocol.caps, &request.actor, &id, current_timestamp())?;
    asset_response(&protocol.registry, &id)
}

pub async fn reject_asset(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<ActorRequest>,
) -> ApiResult<Json<AssetResponse>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    protocol
        .registry
        .reject_asset(&protocol.caps, &request.actor, &id, current_timestamp())?;
    asset_response(&protocol.registry, &id)
}

pub async fn flag_asset(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<ActorRequest>,
) -> ApiResult<Json<AssetResponse>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    protocol
        .registry
        .flag_asset(&protocol.caps, &request.actor, &id, current_timestamp())?;
    asset_response(&protocol.registry, &id)
}

pub async fn get_asset(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AssetResponse>> {
    let protocol = state.protocol.read().await;
    asset_response(&protocol.registry, &id)
}

pub async fn list_assets(
    State(state): State<ApiState>,
    Query(query): Query<ListAssetsQuery>,
) -> ApiResult<Json<Vec<AssetResponse>>> {
    let protocol = state.protocol.read().await;
    let assets: Vec<AssetResponse> = match query.status {
        Some(status) => {
            let status = parse_status(&status)?;
            protocol
                .registry
                .assets_by_status(status)
                .into_iter()
                .map(AssetResponse::from)
                .collect()
        }
        None => protocol.registry.assets().map(AssetResponse::from).collect(),
    };
    Ok(Json(assets))
}

fn asset_response(registry: &rwa_registry::AssetRegistry, id: &str) -> ApiResult<Json<AssetResponse>> {
    registry
        .asset(id)
        .map(|a| Json(AssetResponse::from(a)))
        .ok_or_else(|| ApiError::NotFound(format!("Asset not found: {}", id)))
}
