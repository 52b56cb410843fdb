//! # Core Abstractions
//!
//! Error taxonomy, the monetary quantity type and the service traits at the dependency
//! injection seams.
//!
//! - **[`error`]**: `ReadError`, `TxError`, `ConfigError`, `AppError`, `Result<T>`
//! - **[`amount`]**: `Amount`, arbitrary-precision descaled quantities
//! - **[`calls`]**: typed read/write contract calls
//! - **[`service`]**: `ContractClient` and `Wallet`
//!
//! ```rust,ignore
//! use cosmos_sync::core::service::ContractClient;
//!
//! // In production: JSON-RPC over HTTP
//! let client: Arc<dyn ContractClient> = Arc::new(JsonRpcClient::new(&config.rpc_url, config.receipt_timeout));
//!
//! // In tests: scripted in-memory chain
//! let client: Arc<dyn ContractClient> = Arc::new(MockChain::new());
//! ```

pub mod amount;
pub mod calls;
pub mod error;
pub mod service;

pub use amount::Amount;
pub use calls::{RawValue, ReadCall, Receipt, TxRequest, WriteCall};
pub use error::{AppError, ConfigError, ReadError, Result, TxError};
pub use service::{ContractClient, Wallet};
