//! Vault API handlers

use crate::{ApiResult, ApiState};
use axum::extract::State;
use axum::Json;
use rwa_core::current_timestamp;
use rwa_vault::{process_waitlist, CapacitySnapshot, VaultSnapshot, WaitlistEntry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct StakeRequest {
    pub staker: String,
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    pub actor: String,
}

#[derive(Debug, Serialize)]
pub struct VaultStatusResponse {
    pub vault: VaultSnapshot,
    pub capacity: CapacitySnapshot,
}

#[derive(Debug, Serialize)]
pub struct ProcessWaitlistResponse {
    pub grants: usize,
    pub total_granted: u64,
    pub still_waitlisted: u64,
}

pub async fn stake(
    State(state): State<ApiState>,
    Json(request): Json<StakeRequest>,
) -> ApiResult<Json<VaultSnapshot>> {
    let mut protocol = state.protocol.write().await;
    protocol
        .vault
        .stake(&request.staker, request.amount, current_timestamp())?;
    Ok(Json(protocol.vault.snapshot()))
}

pub async fn get_vault_status(State(state): State<ApiState>) -> ApiResult<Json<VaultStatusResponse>> {
    let protocol = state.protocol.read().await;
    Ok(Json(VaultStatusResponse {
        vault: protocol.vault.snapshot(),
        capacity: protocol.capacity.snapshot(),
    }))
}

pub async fn get_waitlist(State(state): State<ApiState>) -> ApiResult<Json<Vec<WaitlistEntry>>> {
    let protocol = state.protocol.read().await;
    Ok(Json(protocol.capacity.waitlist().to_vec()))
}

/// Retry waitlisted deployment deficits, typically after repayments
pub async fn process_vault_waitlist(
    State(state): State<ApiState>,
    Json(request): Json<ActorRequest>,
) -> ApiResult<Json<ProcessWaitlistResponse>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    let grants = process_waitlist(
        &protocol.caps,
        &request.actor,
        &mut protocol.capacity,
        &mut protocol.vault,
        current_timestamp(),
    )?;
    Ok(Json(ProcessWaitlistResponse {
        grants: grants.len(),
        total_granted: grants.iter().map(|g| g.granted).sum(),
        still_waitlisted: protocol.capacity.waitlisted_total(),
    }))
}
