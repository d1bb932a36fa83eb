//! Role-grant administration and the audit stream

use crate::{ApiError, ApiResult, ApiState};
use axum::extract::State;
use axum::Json;
use rwa_core::audit::AuditRecord;
use rwa_core::roles::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub actor: String,
    pub identity: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct AuditStreamResponse {
    pub assets: Vec<AuditRecord>,
    pub pools: Vec<AuditRecord>,
    pub vault: Vec<AuditRecord>,
    pub revenue: Vec<AuditRecord>,
}

fn parse_role(s: &str) -> ApiResult<Role> {
    match s {
        "admin" => Ok(Role::Admin),
        "authority" => Ok(Role::Authority),
        "pool-manager" => Ok(Role::PoolManager),
        "collector" => Ok(Role::Collector),
        "operator" => Ok(Role::Operator),
        "vault-deployer" => Ok(Role::VaultDeployer),
        other => Err(ApiError::BadRequest(format!("unknown role: {}", other))),
    }
}

pub async fn grant_role(
    State(state): State<ApiState>,
    Json(request): Json<GrantRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let role = parse_role(&request.role)?;
    let mut protocol = state.protocol.write().await;
    protocol.caps.require(&request.actor, Role::Admin)?;
    protocol.caps.grant(&request.identity, role);
    Ok(Json(serde_json::json!({
        "identity": request.identity,
        "role": request.role,
        "granted": true,
    })))
}

pub async fn revoke_role(
    State(state): State<ApiState>,
    Json(request): Json<GrantRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let role = parse_role(&request.role)?;
    let mut protocol = state.protocol.write().await;
    protocol.caps.require(&request.actor, Role::Admin)?;
    protocol.caps.revoke(&request.identity, role);
    Ok(Json(serde_json::json!({
        "identity": request.identity,
        "role": request.role,
        "granted": false,
    })))
}

/// Append-only transition records of every component, for monitoring
pub async fn get_audit_stream(State(state): State<ApiState>) -> ApiResult<Json<AuditStreamResponse>> {
    let protocol = state.protocol.read().await;
    Ok(Json(AuditStreamResponse {
        assets: protocol.registry.audit().records().to_vec(),
        pools: protocol.pools.audit().records().to_vec(),
        vault: protocol.vault.audit().records().to_vec(),
        revenue: protocol.collector.audit().records().to_vec(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;

    #[tokio::test]
    async fn test_grant_requires_admin() {
        let state = test_state();
        let err = grant_role(
            State(state.clone()),
            Json(GrantRequest {
                actor: "mallory".to_string(),
                identity: "mallory".to_string(),
                role: "admin".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        grant_role(
            State(state.clone()),
            Json(GrantRequest {
                actor: "admin".to_string(),
                identity: "amc".to_string(),
                role: "authority".to_string(),
            }),
        )
        .await
        .unwrap();
        let protocol = state.protocol.read().await;
        assert!(protocol.caps.has("amc", Role::Authority));
    }

    #[tokio::test]
    async fn test_unknown_role_is_bad_request() {
        let state = test_state();
        let err = grant_role(
            State(state),
            Json(GrantRequest {
                actor: "admin".to_string(),
                identity: "amc".to_string(),
                role: "superuser".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
