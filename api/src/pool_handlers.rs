//! Pool API handlers

use crate::{ApiError, ApiResult, ApiState};
use axum::extract::{Path, Query, State};
use axum::Json;
use rwa_core::current_timestamp;
use rwa_pools::{DeploymentOutcome, Pool, PortfolioEntry, TrancheTerms, TrancheType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct PoolResponse {
    pub id: String,
    pub creator: String,
    pub name: String,
    pub description: String,
    pub total_value: u64,
    pub total_shares: u64,
    pub is_active: bool,
    pub is_finalized: bool,
    pub has_tranches: bool,
    pub asset_ids: Vec<String>,
    pub tranche_ids: Vec<String>,
    pub deployed_capital: u64,
    pub created_at: i64,
}

impl From<&Pool> for PoolResponse {
    fn from(pool: &Pool) -> Self {
        Self {
            id: pool.id.clone(),
            creator: pool.creator.clone(),
            name: pool.name.clone(),
            description: pool.description.clone(),
            total_value: pool.total_value,
            total_shares: pool.total_shares,
            is_active: pool.is_active,
            is_finalized: pool.is_finalized,
            has_tranches: pool.has_tranches,
            asset_ids: pool.asset_ids.clone(),
            tranche_ids: pool.tranche_ids.clone(),
            deployed_capital: pool.deployed_capital,
            created_at: pool.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TrancheSpecRequest {
    pub tranche_type: String,
    pub capacity: u64,
    pub rate_bps: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreatePoolRequest {
    pub actor: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub asset_ids: Vec<String>,
    pub tranches: Option<Vec<TrancheSpecRequest>>,
}

#[derive(Debug, Serialize)]
pub struct CreatePoolResponse {
    pub pool_id: String,
    /// "deployed", "skipped_unauthorized" or "skipped_empty"
    pub deployment: String,
    pub granted: u64,
    pub waitlisted: u64,
}

#[derive(Debug, Deserialize)]
pub struct AddTrancheRequest {
    pub actor: String,
    pub tranche_type: String,
    pub capacity: u64,
    pub rate_bps: u64,
}

#[derive(Debug, Deserialize)]
pub struct InvestRequest {
    pub investor: String,
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
pub struct RepayRequest {
    pub actor: String,
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    pub actor: String,
}

#[derive(Debug, Deserialize)]
pub struct ListPoolsQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

fn parse_tranche_type(s: &str) -> ApiResult<TrancheType> {
    match s {
        "Senior" => Ok(TrancheType::Senior),
        "Junior" => Ok(TrancheType::Junior),
        other => Err(ApiError::BadRequest(format!("unknown tranche type: {}", other))),
    }
}

pub async fn create_pool(
    State(state): State<ApiState>,
    Json(request): Json<CreatePoolRequest>,
) -> ApiResult<Json<CreatePoolResponse>> {
    let tranche_spec = match request.tranches {
        Some(specs) => {
            let mut parsed = Vec::with_capacity(specs.len());
            for spec in specs {
                parsed.push((
                    parse_tranche_type(&spec.tranche_type)?,
                    TrancheTerms {
                        capacity: spec.capacity,
                        rate_bps: spec.rate_bps,
                    },
                ));
            }
            Some(parsed)
        }
        None => None,
    };

    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    let result = protocol.pools.create_pool(
        &protocol.caps,
        &request.actor,
        &request.name,
        &request.description,
        request.asset_ids,
        tranche_spec,
        &protocol.registry,
        &mut protocol.capacity,
        &mut protocol.vault,
        current_timestamp(),
    )?;

    let (deployment, granted, waitlisted) = match result.deployment {
        DeploymentOutcome::Deployed(grant) => ("deployed", grant.granted, grant.waitlisted),
        DeploymentOutcome::SkippedUnauthorized => ("skipped_unauthorized", 0, 0),
        DeploymentOutcome::SkippedEmpty => ("skipped_empty", 0, 0),
    };
    Ok(Json(CreatePoolResponse {
        pool_id: result.pool_id,
        deployment: deployment.to_string(),
        granted,
        waitlisted,
    }))
}

pub async fn add_tranche(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<AddTrancheRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let tranche_type = parse_tranche_type(&request.tranche_type)?;
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    let tranche_id = protocol.pools.add_tranche(
        &protocol.caps,
        &request.actor,
        &id,
        tranche_type,
        TrancheTerms {
            capacity: request.capacity,
            rate_bps: request.rate_bps,
        },
        current_timestamp(),
    )?;
    Ok(Json(serde_json::json!({
        "tranche_id": tranche_id,
        "pool_id": id,
    })))
}

pub async fn finalize_pool(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<ActorRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    protocol
        .pools
        .finalize_pool(&protocol.caps, &request.actor, &id, current_timestamp())?;
    Ok(Json(serde_json::json!({ "pool_id": id, "finalized": true })))
}

pub async fn invest(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<InvestRequest>,
) -> ApiResult<Json<PoolResponse>> {
    let mut protocol = state.protocol.write().await;
    protocol
        .pools
        .invest(&request.investor, &id, request.amount, current_timestamp())?;
    pool_response(&protocol.pools, &id)
}

pub async fn record_repayment(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<RepayRequest>,
) -> ApiResult<Json<PoolResponse>> {
    let mut protocol = state.protocol.write().await;
    let protocol = &mut *protocol;
    protocol.pools.record_repayment(
        &protocol.caps,
        &request.actor,
        &id,
        request.amount,
        &mut protocol.capacity,
        &mut protocol.vault,
        current_timestamp(),
    )?;
    pool_response(&protocol.pools, &id)
}

pub async fn get_pool(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PoolResponse>> {
    let protocol = state.protocol.read().await;
    pool_response(&protocol.pools, &id)
}

pub async fn list_pools(
    State(state): State<ApiState>,
    Query(query): Query<ListPoolsQuery>,
) -> ApiResult<Json<Vec<PoolResponse>>> {
    let protocol = state.protocol.read().await;
    let pools = protocol
        .pools
        .pools_paginated(query.offset.unwrap_or(0), query.limit.unwrap_or(50))
        .into_iter()
        .map(PoolResponse::from)
        .collect();
    Ok(Json(pools))
}

pub async fn get_portfolio(
    State(state): State<ApiState>,
    Path(user): Path<String>,
) -> ApiResult<Json<Vec<PortfolioEntry>>> {
    let protocol = state.protocol.read().await;
    Ok(Json(protocol.pools.portfolio(&user)))
}

fn pool_response(pools: &rwa_pools::PoolManager, id: &str) -> ApiResult<Json<PoolResponse>> {
    pools
        .pool(id)
        .map(|p| Json(PoolResponse::from(p)))
        .ok_or_else(|| ApiError::NotFound(format!("Pool not found: {}", id)))
}
