//! Role grants and the capability table
//!
//! Authorization is a table keyed by (identity, role). Every protocol
//! mutator validates exactly one capability before touching state, so the
//! check is uniform and testable instead of scattered boolean flags.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    /// Full administrative control, including reject/flag overrides
    Admin,
    /// AMC/authority responsible for inspections and legal transfers
    Authority,
    /// May create pools and request capital deployment
    PoolManager,
    /// May collect protocol fees into the revenue collector
    Collector,
    /// May run scheduled jobs (reward funding, waitlist processing)
    Operator,
    /// Capability the vault checks before executing a deployment
    VaultDeployer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Authority => "authority",
            Role::PoolManager => "pool-manager",
            Role::Collector => "collector",
            Role::Operator => "operator",
            Role::VaultDeployer => "vault-deployer",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization denied: {actor} lacks role {role}")]
    AuthorizationDenied { actor: String, role: String },
}

/// Grant table shared by all protocol components
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilityTable {
    grants: HashSet<(String, Role)>,
}

impl CapabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, identity: &str, role: Role) {
        self.grants.insert((identity.to_string(), role));
    }

    pub fn revoke(&mut self, identity: &str, role: Role) {
        self.grants.remove(&(identity.to_string(), role));
    }

    pub fn has(&self, identity: &str, role: Role) -> bool {
        self.grants.contains(&(identity.to_string(), role))
    }

    /// The single capability check every mutator runs first
    pub fn require(&self, identity: &str, role: Role) -> Result<(), AuthError> {
        if self.has(identity, role) {
            Ok(())
        } else {
            Err(AuthError::AuthorizationDenied {
                actor: identity.to_string(),
                role: role.as_str().to_string(),
            })
        }
    }
}
