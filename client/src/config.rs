//! # Configuration
//!
//! Environment settings for a sync session and the deployment file describing every farm,
//! pool, index and vault. Chain-specific addresses are resolved once, here, so the rest of the
//! crate only ever sees plain [`Address`]es.

use crate::app::state::{
    FarmDescriptor, IndexComponent, IndexDescriptor, PoolDescriptor, Pricing, VaultDescriptor,
};
use crate::core::error::ConfigError;
use crate::core::Amount;
use crate::utils::validation::validate_address;
use alloy_primitives::Address;
use shared::{AddressMap, Deployment};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "https://bsc-dataseed.binance.org";
pub const DEFAULT_CHAIN_ID: u64 = 56;
pub const DEFAULT_FAST_REFRESH_MS: u64 = 10_000;
pub const DEFAULT_SLOW_REFRESH_MS: u64 = 60_000;
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_DEPLOYMENT_PATH: &str = "./deployment.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub fast_refresh: Duration,
    pub slow_refresh: Duration,
    pub deployment_path: PathBuf,
    pub receipt_timeout: Duration,
    /// Account the headless runner connects at startup.
    pub account: Option<Address>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            fast_refresh: Duration::from_millis(DEFAULT_FAST_REFRESH_MS),
            slow_refresh: Duration::from_millis(DEFAULT_SLOW_REFRESH_MS),
            deployment_path: PathBuf::from(DEFAULT_DEPLOYMENT_PATH),
            receipt_timeout: Duration::from_secs(DEFAULT_RECEIPT_TIMEOUT_SECS),
            account: None,
        }
    }
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let number = |key: &str, default: u64| -> Result<u64, ConfigError> {
            match lookup(key) {
                Some(v) => v
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid(format!("{} must be a valid number", key))),
                None => Ok(default),
            }
        };

        let account = match lookup("COSMOS_ACCOUNT") {
            Some(v) if !v.trim().is_empty() => Some(
                validate_address(&v)
                    .map_err(|e| ConfigError::Invalid(format!("COSMOS_ACCOUNT: {}", e)))?,
            ),
            _ => None,
        };

        Ok(Self {
            rpc_url: lookup("COSMOS_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            chain_id: number("COSMOS_CHAIN_ID", DEFAULT_CHAIN_ID)?,
            fast_refresh: Duration::from_millis(number("COSMOS_FAST_REFRESH_MS", DEFAULT_FAST_REFRESH_MS)?),
            slow_refresh: Duration::from_millis(number("COSMOS_SLOW_REFRESH_MS", DEFAULT_SLOW_REFRESH_MS)?),
            deployment_path: lookup("COSMOS_DEPLOYMENT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DEPLOYMENT_PATH)),
            receipt_timeout: Duration::from_secs(number(
                "COSMOS_RECEIPT_TIMEOUT_SECS",
                DEFAULT_RECEIPT_TIMEOUT_SECS,
            )?),
            account,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "COSMOS_RPC_URL must be an http(s) URL, got '{}'",
                self.rpc_url
            )));
        }
        if self.fast_refresh.is_zero() || self.slow_refresh.is_zero() {
            return Err(ConfigError::Invalid("Refresh intervals must be greater than zero".into()));
        }
        if self.fast_refresh > self.slow_refresh {
            return Err(ConfigError::Invalid(
                "COSMOS_FAST_REFRESH_MS must not exceed COSMOS_SLOW_REFRESH_MS".into(),
            ));
        }
        if self.receipt_timeout.is_zero() {
            return Err(ConfigError::Invalid("COSMOS_RECEIPT_TIMEOUT_SECS must be greater than zero".into()));
        }
        Ok(())
    }
}

pub fn load_deployment(path: &Path) -> Result<Deployment, ConfigError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// A deployment with every address resolved for one chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDeployment {
    pub chain_id: u64,
    pub farms: Vec<FarmDescriptor>,
    pub pools: Vec<PoolDescriptor>,
    pub indexes: Vec<IndexDescriptor>,
    pub vaults: Vec<VaultDescriptor>,
    pub pricing: Pricing,
}

impl ResolvedDeployment {
    pub fn resolve(deployment: &Deployment, chain_id: u64) -> Result<Self, ConfigError> {
        let pick = |map: &AddressMap, what: String| {
            map.get(chain_id)
                .ok_or_else(|| ConfigError::Missing(format!("{} on chain {}", what, chain_id)))
        };

        let chef = pick(&deployment.master_chef, "masterChef".into())?;

        let farms = deployment
            .farms
            .iter()
            .map(|f| -> Result<FarmDescriptor, ConfigError> {
                Ok(FarmDescriptor {
                    pid: f.pid,
                    lp_symbol: f.lp_symbol.clone(),
                    token_symbol: f.token_symbol.clone(),
                    quote_token: f.quote_token_symbol,
                    lp_address: pick(&f.lp_addresses, format!("farm {} lpAddresses", f.pid))?,
                    token_address: pick(&f.token_addresses, format!("farm {} tokenAddresses", f.pid))?,
                    quote_token_address: pick(
                        &f.quote_token_addresses,
                        format!("farm {} quoteTokenAddresses", f.pid),
                    )?,
                    token_decimals: f.token_decimals,
                    quote_token_decimals: f.quote_token_decimals,
                    is_token_only: f.is_token_only,
                    deposit_fee_bp: f.deposit_fee_bp,
                    chef,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let pools = deployment
            .pools
            .iter()
            .map(|p| -> Result<PoolDescriptor, ConfigError> {
                Ok(PoolDescriptor {
                    sous_id: p.sous_id,
                    token_name: p.token_name.clone(),
                    staking_token_name: p.staking_token_name.clone(),
                    staking_token: pick(
                        &p.staking_token_address,
                        format!("pool {} stakingTokenAddress", p.sous_id),
                    )?,
                    staking_token_decimals: p.staking_token_decimals,
                    contract: pick(&p.contract_address, format!("pool {} contractAddress", p.sous_id))?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let indexes = deployment
            .indexes
            .iter()
            .map(|i| -> Result<IndexDescriptor, ConfigError> {
                let components = i
                    .tokens
                    .iter()
                    .map(|t| -> Result<IndexComponent, ConfigError> {
                        Ok(IndexComponent {
                            name: t.name.clone(),
                            address: pick(&t.address, format!("index {} token {}", i.id, t.name))?,
                        })
                    })
                    .collect::<Result<Vec<_>, ConfigError>>()?;
                Ok(IndexDescriptor {
                    id: i.id,
                    name: i.name.clone(),
                    image: i.image.clone(),
                    creator: i.creator.clone(),
                    components,
                    contract: pick(&i.contract, format!("index {} contract", i.id))?,
                    base_token: pick(&i.base_token_address, format!("index {} baseTokenAddress", i.id))?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let vaults = deployment
            .vaults
            .iter()
            .map(|v| -> Result<VaultDescriptor, ConfigError> {
                Ok(VaultDescriptor {
                    id: v.id,
                    name: v.name.clone(),
                    token_symbol: v.token_symbol.clone(),
                    token: pick(&v.token_addresses, format!("vault {} tokenAddresses", v.id))?,
                    token_decimals: v.token_decimals,
                    contract: pick(&v.contract, format!("vault {} contract", v.id))?,
                    time_lock: v.time_lock,
                    deposit_fee_bp: v.deposit_fee_bp,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let pricing = Pricing {
            bnb_busd_pid: deployment.pricing.bnb_busd_pid,
            cake_bnb_pid: deployment.pricing.cake_bnb_pid,
            cake_fallback_price: deployment
                .pricing
                .cake_fallback_price
                .parse::<Amount>()
                .map_err(|e| ConfigError::Invalid(format!("pricing.cakeFallbackPrice: {}", e)))?,
        };

        Ok(Self {
            chain_id,
            farms,
            pools,
            indexes,
            vaults,
            pricing,
        })
    }
}
