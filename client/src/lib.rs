//! # Cosmos Sync - Library Root
//!
//! Client-side sync layer for a BSC yield dapp: keeps a store of farms, pools, indexes
//! ("galaxies") and vaults ("clusters") in step with on-chain state, and drives the
//! approve / stake / unstake / mint / burn transactions a connected wallet requests.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              cosmos_sync (this crate)                  │
//! ├────────────────────────────────────────────────────────┤
//! │  app       - Session, store, refreshers, orchestrators │
//! │  services  - RPC read client, JSON-RPC, wallet         │
//! │  core      - Errors, Amount, service traits            │
//! │  debug     - Logging and task tracking                 │
//! │  utils     - Percentages, time periods, validation     │
//! │  config    - Environment and deployment file           │
//! └────────────────────────────────────────────────────────┘
//!          │                              │
//!          │ ContractClient               │ Wallet
//!          ▼                              ▼
//! ┌─────────────────┐          ┌─────────────────────────┐
//! │  BSC node       │          │  Injected signer        │
//! │  (JSON-RPC)     │          │  (active account)       │
//! └─────────────────┘          └─────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! let config = SyncConfig::from_env()?;
//! let deployment = load_deployment(&config.deployment_path)?;
//! let deployment = ResolvedDeployment::resolve(&deployment, config.chain_id)?;
//!
//! let client = Arc::new(JsonRpcClient::new(&config.rpc_url, config.receipt_timeout));
//! let wallet = Arc::new(WalletService::new());
//! let session = Session::start(client, wallet.clone(), deployment, config.fast_refresh, config.slow_refresh)?;
//!
//! wallet.connect(account);
//! session.orchestrator().approve_vault(1).await?;
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod debug;
pub mod services;
pub mod utils;

pub use app::Session;
pub use config::{load_deployment, ResolvedDeployment, SyncConfig};
