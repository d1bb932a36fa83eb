//! RWA Asset Registry Module
//!
//! Single source of truth for tokenized real-world assets and their
//! lifecycle status. An asset may only enter a pool once it has passed
//! verification, inspection and legal transfer and reached a terminal
//! active status. The registry owns:
//! - The asset lifecycle state machine
//! - The Inspection Ledger (physical verification outcomes)
//! - The Legal Transfer Ledger (custody transfer progress, read through
//!   as the authoritative record for transfer transitions)

pub mod asset;
pub mod error;
pub mod inspection;
pub mod legal;
pub mod oracle;
pub mod registry;

pub use asset::{Asset, AssetCategory, AssetStatus};
pub use error::{RegistryError, Result};
pub use inspection::{InspectionLedger, InspectionRecord, InspectionStatus};
pub use legal::{LegalTransferLedger, LegalTransferRecord, LegalTransferStatus};
pub use oracle::{OracleError, VerificationOracle, VerificationResult, RISK_SCORE_THRESHOLD};
pub use registry::AssetRegistry;
