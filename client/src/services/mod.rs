//! # External Services
//!
//! - **[`reader`]**: RPC Read Client, one typed query per function
//! - **[`rpc`]**: JSON-RPC implementation of [`ContractClient`](crate::core::ContractClient)
//! - **[`wallet`]**: active-account holder implementing [`Wallet`](crate::core::Wallet)

pub mod reader;
pub mod rpc;
pub mod wallet;

pub use rpc::JsonRpcClient;
pub use wallet::{WalletService, WalletStatus};
