use crate::admin_handlers::{get_audit_stream, grant_role, revoke_role};
use crate::asset_handlers::{
    activate_asset, activate_digital, assign_authority, complete_inspection,
    complete_legal_transfer, flag_asset, get_asset, initiate_legal_transfer, list_assets,
    mark_digital_verified, reject_asset, schedule_inspection, submit_asset, verify_asset,
};
use crate::pool_handlers::{
    add_tranche, create_pool, finalize_pool, get_pool, get_portfolio, invest, list_pools,
    record_repayment,
};
use crate::revenue_handlers::{
    collect_fee, execute_funding, fund_source, get_allocations, get_pool_health,
};
use crate::vault_handlers::{get_vault_status, get_waitlist, process_vault_waitlist, stake};
use crate::{ApiResult, ApiState};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

/// Create routes for every protocol operation plus the query surface
pub fn create_routes() -> Router<ApiState> {
    Router::new()
        // Asset lifecycle endpoints
        .route("/assets", post(submit_asset))
        .route("/assets", get(list_assets))
        .route("/assets/{id}", get(get_asset))
        .route("/assets/{id}/verify", post(verify_asset))
        .route("/assets/{id}/authority", post(assign_authority))
        .route("/assets/{id}/inspection/schedule", post(schedule_inspection))
        .route("/assets/{id}/inspection/complete", post(complete_inspection))
        .route("/assets/{id}/transfer/initiate", post(initiate_legal_transfer))
        .route("/assets/{id}/transfer/complete", post(complete_legal_transfer))
        .route("/assets/{id}/activate", post(activate_asset))
        .route("/assets/{id}/digital/verify", post(mark_digital_verified))
        .route("/assets/{id}/digital/activate", post(activate_digital))
        .route("/assets/{id}/reject", post(reject_asset))
        .route("/assets/{id}/flag", post(flag_asset))
        // Pool endpoints
        .route("/pools", post(create_pool))
        .route("/pools", get(list_pools))
        .route("/pools/{id}", get(get_pool))
        .route("/pools/{id}/tranches", post(add_tranche))
        .route("/pools/{id}/finalize", post(finalize_pool))
        .route("/pools/{id}/invest", post(invest))
        .route("/pools/{id}/repay", post(record_repayment))
        .route("/portfolio/{user}", get(get_portfolio))
        // Vault endpoints
        .route("/vault/stake", post(stake))
        .route("/vault/status", get(get_vault_status))
        .route("/vault/waitlist", get(get_waitlist))
        .route("/vault/waitlist/process", post(process_vault_waitlist))
        // Revenue and rewards endpoints
        .route("/revenue/fund", post(fund_source))
        .route("/revenue/collect", post(collect_fee))
        .route("/revenue/allocations", get(get_allocations))
        .route("/rewards/health", get(get_pool_health))
        .route("/rewards/fund", post(execute_funding))
        // Administration endpoints
        .route("/admin/grants", post(grant_role))
        .route("/admin/grants/revoke", post(revoke_role))
        .route("/audit", get(get_audit_stream))
        // Service endpoints
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/status", get(get_status))
}

async fn root() -> &'static str {
    "RWA Protocol API"
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(serde::Serialize)]
struct StatusResponse {
    assets: usize,
    pools: usize,
    total_staked: u64,
    total_deployed: u64,
    audit_records: usize,
    uptime_secs: u64,
}

async fn get_status(State(state): State<ApiState>) -> ApiResult<Json<StatusResponse>> {
    let protocol = state.protocol.read().await;
    Ok(Json(StatusResponse {
        assets: protocol.registry.count(),
        pools: protocol.pools.count(),
        total_staked: protocol.vault.total_staked(),
        total_deployed: protocol.vault.total_deployed(),
        audit_records: protocol.registry.audit().len()
            + protocol.pools.audit().len()
            + protocol.vault.audit().len()
            + protocol.collector.audit().len(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    }))
}
