//! # Service Traits
//!
//! The two external collaborators of the sync core, injected as trait objects so sessions can
//! run against a live node or an in-memory chain.

use crate::core::calls::{RawValue, ReadCall, Receipt, TxRequest};
use crate::core::error::{ReadError, TxError};
use alloy_primitives::Address;
use async_trait::async_trait;
use tokio::sync::watch;

/// Contract RPC client.
///
/// Addresses passed in are already resolved for the session's chain.
#[async_trait]
pub trait ContractClient: Send + Sync {
    /// Query one value. Every call is independently fallible.
    async fn read(&self, contract: Address, call: ReadCall) -> Result<RawValue, ReadError>;

    /// Submit a transaction and wait until it is mined.
    async fn write(&self, request: TxRequest) -> Result<Receipt, TxError>;
}

/// Wallet provider: the active account and its changes.
pub trait Wallet: Send + Sync {
    fn account(&self) -> Option<Address>;

    fn subscribe(&self) -> watch::Receiver<Option<Address>>;
}
