//! # Deployment DTOs
//!
//! Static descriptors for every entity family the sync core tracks. Addresses are kept
//! per chain in an [`AddressMap`]; the core resolves them once for the selected chain.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contract or token addresses keyed by chain id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressMap(pub BTreeMap<u64, Address>);

impl AddressMap {
    /// Address on `chain_id`, if the deployment defines one.
    pub fn get(&self, chain_id: u64) -> Option<Address> {
        self.0.get(&chain_id).copied()
    }

    pub fn single(chain_id: u64, address: Address) -> Self {
        let mut map = BTreeMap::new();
        map.insert(chain_id, address);
        Self(map)
    }
}

/// Asset a farm's liquidity is quoted in.
///
/// Selects the USD multiplier applied to quote-denominated figures:
/// BNB and CAKE use their own USD price, `Busd` is already USD (multiplier 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteToken {
    #[serde(rename = "BNB")]
    Bnb,
    #[serde(rename = "CAKE")]
    Cake,
    #[serde(rename = "BUSD", alias = "USDT", alias = "UST")]
    Busd,
}

fn default_decimals() -> u8 {
    18
}

/// MasterChef farm (LP or single-token staking).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmConfig {
    pub pid: u32,
    pub lp_symbol: String,
    pub lp_addresses: AddressMap,
    pub token_symbol: String,
    pub token_addresses: AddressMap,
    #[serde(default = "default_decimals")]
    pub token_decimals: u8,
    pub quote_token_symbol: QuoteToken,
    #[serde(alias = "quoteTokenAdresses")]
    pub quote_token_addresses: AddressMap,
    #[serde(default = "default_decimals")]
    pub quote_token_decimals: u8,
    /// Stakes the bare token instead of an LP pair.
    #[serde(default)]
    pub is_token_only: bool,
    #[serde(default)]
    pub deposit_fee_bp: u16,
}

/// SousChef single-asset staking pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolConfig {
    pub sous_id: u32,
    pub token_name: String,
    pub staking_token_name: String,
    pub staking_token_address: AddressMap,
    #[serde(default = "default_decimals")]
    pub staking_token_decimals: u8,
    pub contract_address: AddressMap,
}

/// Auto-compounding "cluster" vault with a withdrawal time lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultConfig {
    pub id: u32,
    pub name: String,
    pub token_symbol: String,
    pub token_addresses: AddressMap,
    #[serde(default = "default_decimals")]
    pub token_decimals: u8,
    pub contract: AddressMap,
    /// Seconds a deposit stays locked after the user's last action.
    #[serde(default)]
    pub time_lock: u64,
    #[serde(default)]
    pub deposit_fee_bp: u16,
}

/// One component token of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexToken {
    pub name: String,
    pub address: AddressMap,
}

/// Index ("galaxy") basket token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConfig {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    pub tokens: Vec<IndexToken>,
    pub contract: AddressMap,
    /// Token spent when minting the index.
    pub base_token_address: AddressMap,
}

fn default_bnb_busd_pid() -> u32 {
    4
}

fn default_cake_bnb_pid() -> u32 {
    1
}

fn default_cake_fallback_price() -> String {
    "0.0285".to_string()
}

/// Farms used as price references.
///
/// The pids are deployment facts: the core cannot verify that `bnb_busd_pid` really is
/// the BNB-BUSD pair, it only reads whatever farm sits at that pid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    #[serde(default = "default_bnb_busd_pid")]
    pub bnb_busd_pid: u32,
    #[serde(default = "default_cake_bnb_pid")]
    pub cake_bnb_pid: u32,
    /// CAKE price shown before the CAKE farm has been fetched.
    #[serde(default = "default_cake_fallback_price")]
    pub cake_fallback_price: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            bnb_busd_pid: default_bnb_busd_pid(),
            cake_bnb_pid: default_cake_bnb_pid(),
            cake_fallback_price: default_cake_fallback_price(),
        }
    }
}

/// Whole deployment file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// MasterChef contract every farm stakes into.
    pub master_chef: AddressMap,
    #[serde(default)]
    pub farms: Vec<FarmConfig>,
    #[serde(default)]
    pub pools: Vec<PoolConfig>,
    #[serde(default)]
    pub vaults: Vec<VaultConfig>,
    #[serde(default)]
    pub indexes: Vec<IndexConfig>,
    #[serde(default)]
    pub pricing: PricingConfig,
}
