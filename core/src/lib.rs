//! RWA Protocol Core Module
//!
//! Shared primitives used by every protocol crate:
//! - Currency and basis-point constants
//! - String identifier constructors
//! - Role grants and the capability table
//! - The append-only audit trail

pub mod audit;
pub mod constants;
pub mod ids;
pub mod roles;
pub mod time;

pub use audit::{AuditRecord, AuditTrail};
pub use constants::{BPS_DENOMINATOR, MAX_INVESTABLE_PCT, SECONDS_PER_DAY, UNIT};
pub use roles::{AuthError, CapabilityTable, Role};
pub use time::current_timestamp;
