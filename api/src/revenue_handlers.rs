//! Revenue and reward-funding API handlers

use crate::{ApiResult, ApiState};
use axum::extract::State;
use axum::Json;
use rwa_core::current_timestamp;
use rwa_core::roles::Role;
use rwa_revenue::{AllocationTotals, FundingReceipt};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct FundSourceRequest {
    pub actor: String,
    pub source: String,
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
pub struct CollectFeeRequest {
    pub actor: String,
    pub amount: u64,
    pub source: String,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteFundingRequest {
    pub actor: String,
    pub stable_amount: u64,
}

#[derive(Debug, Serialize)]
pub struct PoolHealthResponse {
    pub pool_health_days: u64,
    pub target_health_days: u64,
    pub funding_due: bool,
    pub required_amount: u64,
    pub reserve: u64,
    pub last_funded: i64,
}

pub async fn fund_source(
    State(state): State<ApiState>,
    Json(request): Json<FundSourceRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    protocol.caps.require(&request.actor, Role::Admin)?;
    protocol.collector.fund_source(&request.source, request.amount);
    Ok(Json(serde_json::json!({
        "source": request.source,
        "balance": protocol.collector.source_balance(&request.source),
    })))
}

pub async fn collect_fee(
    State(state): State<ApiState>,
    Json(request): Json<CollectFeeRequest>,
) -> ApiResult<Json<AllocationTotals>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    let totals = protocol.collector.collect_fee(
        &protocol.caps,
        &request.actor,
        request.amount,
        &request.source,
        current_timestamp(),
    )?;
    Ok(Json(totals))
}

pub async fn get_allocations(State(state): State<ApiState>) -> ApiResult<Json<AllocationTotals>> {
    let protocol = state.protocol.read().await;
    Ok(Json(protocol.collector.totals()))
}

pub async fn get_pool_health(State(state): State<ApiState>) -> ApiResult<Json<PoolHealthResponse>> {
    let protocol = state.protocol.read().await;
    let total_staked = protocol.vault.total_staked();
    let now = current_timestamp();
    let (funding_due, required_amount) = protocol.rewards.should_fund(total_staked, now);
    Ok(Json(PoolHealthResponse {
        pool_health_days: protocol.rewards.check_pool_health(total_staked),
        target_health_days: protocol.rewards.target_health_days(),
        funding_due,
        required_amount,
        reserve: protocol.rewards.reserve(),
        last_funded: protocol.rewards.last_funded(),
    }))
}

pub async fn execute_funding(
    State(state): State<ApiState>,
    Json(request): Json<ExecuteFundingRequest>,
) -> ApiResult<Json<FundingReceipt>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    let receipt = protocol.rewards.execute_funding(
        &protocol.caps,
        &request.actor,
        request.stable_amount,
        state.exchange.as_ref(),
        &mut protocol.collector,
        current_timestamp(),
    )?;
    Ok(Json(receipt))
}
