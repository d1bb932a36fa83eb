//! RWA Protocol API
//!
//! HTTP surface mirroring every protocol operation with role-gated
//! authorization, plus the query endpoints the UI layer consumes. All
//! protocol state lives behind one `RwLock`, so each request commits or
//! fails as a single unit.

mod admin_handlers;
mod asset_handlers;
mod error;
mod pool_handlers;
mod revenue_handlers;
mod routes;
mod state;
mod vault_handlers;

pub use error::{ApiError, ApiResult};
pub use state::{ApiState, Protocol, ProtocolConfig};

use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Install the global tracing subscriber, honoring `RUST_LOG`
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

pub async fn start_server(addr: SocketAddr, state: ApiState) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let app = routes::create_routes()
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "protocol API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
