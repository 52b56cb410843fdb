//! # Common Error Types
//!
//! Consolidated error handling for the sync core.
//!
//! ## Error Categories
//!
//! - [`ReadError`]: a single contract query failed. Recovered where it happens: the field it
//!   was feeding falls back to its default and the error is logged.
//! - [`TxError`]: a transaction request did not succeed. Returned to the caller of an
//!   orchestrator as a typed value, never raised past it.
//! - [`ConfigError`]: environment or deployment file problems, fatal at startup.
//! - [`AppError`]: umbrella type for startup and the headless runner.
//!
//! ```rust
//! use cosmos_sync::core::error::{AppError, TxError};
//!
//! let err: AppError = TxError::NotConnected.into();
//! assert_eq!(err.to_string(), "Transaction error: no wallet account connected");
//! ```

use thiserror::Error;

/// A contract read that produced no usable value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Transport failure (connection refused, timeout, HTTP status, RPC error object).
    #[error("network error: {0}")]
    Network(String),

    /// The call executed and reverted.
    #[error("call reverted: {0}")]
    Reverted(String),

    /// The node answered but the payload could not be decoded into the expected value.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A transaction request that did not settle successfully.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    /// No wallet account is connected; nothing was submitted.
    #[error("no wallet account connected")]
    NotConnected,

    /// The signer refused the request.
    #[error("rejected by signer: {0}")]
    Rejected(String),

    /// Mined with a failed status.
    #[error("transaction reverted: {0}")]
    Reverted(String),

    #[error("network error: {0}")]
    Network(String),

    /// User supplied amount could not be converted to an on-chain integer.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Submitted but no receipt appeared in time. The transaction may still land.
    #[error("timed out waiting for receipt: {0}")]
    Timeout(String),

    /// The identity key does not name a tracked entity.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
}

/// Startup configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to read deployment file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse deployment file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    #[error("Transaction error: {0}")]
    Tx(#[from] TxError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session lifecycle problems (channels closed, tasks gone).
    #[error("State error: {0}")]
    State(String),
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<ReadError> for TxError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::Reverted(msg) => TxError::Reverted(msg),
            ReadError::Network(msg) | ReadError::Malformed(msg) => TxError::Network(msg),
        }
    }
}
