//! API error handling
//!
//! Maps every domain error to a structured HTTP response. Authorization
//! failures surface as 401, missing entities as 404, everything else a
//! caller can correct as 400.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = Json(json!({
            "error": error_type,
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<rwa_core::AuthError> for ApiError {
    fn from(e: rwa_core::AuthError) -> Self {
        ApiError::Unauthorized(e.to_string())
    }
}

impl From<rwa_registry::RegistryError> for ApiError {
    fn from(e: rwa_registry::RegistryError) -> Self {
        use rwa_registry::RegistryError as E;
        match e {
            E::AssetNotFound(_) => ApiError::NotFound(e.to_string()),
            E::Auth(inner) => inner.into(),
            _ => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<rwa_vault::VaultError> for ApiError {
    fn from(e: rwa_vault::VaultError) -> Self {
        use rwa_vault::VaultError as E;
        match e {
            E::Auth(inner) => inner.into(),
            E::DeploymentNotAuthorized { .. } => ApiError::Unauthorized(e.to_string()),
            _ => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<rwa_pools::PoolsError> for ApiError {
    fn from(e: rwa_pools::PoolsError) -> Self {
        use rwa_pools::PoolsError as E;
        match e {
            E::PoolNotFound(_) | E::TrancheNotFound(_) => ApiError::NotFound(e.to_string()),
            E::Auth(inner) => inner.into(),
            E::Vault(inner) => inner.into(),
            _ => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<rwa_revenue::RevenueError> for ApiError {
    fn from(e: rwa_revenue::RevenueError) -> Self {
        use rwa_revenue::RevenueError as E;
        match e {
            E::Auth(inner) => inner.into(),
            _ => ApiError::BadRequest(e.to_string()),
        }
    }
}
