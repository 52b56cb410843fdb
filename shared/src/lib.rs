//! # Shared Deployment Descriptors
//!
//! This library defines the static description of a Cosmosium deployment: which farms,
//! pools, clusters (auto-compounding vaults) and indexes exist, and where their contracts
//! live on every supported chain. The sync core loads it from a JSON file at startup.
//!
//! ## Structure
//!
//! - **[`dto`]**: serde types for the deployment file
//!   - **[`dto::deployment`]**: farm/pool/vault/index descriptors, per-chain address maps
//! - **[`utils`]**: address display helpers
//!
//! ## Wire Format
//!
//! Field names are **camelCase** in JSON so that existing frontend config files
//! (`lpSymbol`, `tokenAddresses`, `quoteTokenSymbol`, ...) load unchanged. Per-chain
//! address maps are keyed by the decimal chain id as a string:
//!
//! ```json
//! {
//!   "pid": 4,
//!   "lpSymbol": "BNB-BUSD LP",
//!   "lpAddresses": { "56": "0x58f876857a02d6762e0101bb5c46a8c1ed44dc16" }
//! }
//! ```

pub mod dto;
pub mod utils;

pub use dto::*;
pub use utils::*;
