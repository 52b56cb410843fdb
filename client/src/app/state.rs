//! # Store State
//!
//! Plain data held by the [`Store`](crate::app::store::Store): one table per entity family,
//! the account whose `userData` the tables currently carry, and the pricing references.
//!
//! Every descriptor here is already resolved for the session's chain, so addresses are plain
//! [`Address`] values.

use crate::app::kinds::{EntityKind, Farms, Indexes, Pools, Vaults};
use crate::core::amount::DEFAULT_DECIMALS;
use crate::core::Amount;
use alloy_primitives::Address;
use shared::QuoteToken;

/// MasterChef farm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmDescriptor {
    pub pid: u32,
    pub lp_symbol: String,
    pub token_symbol: String,
    pub quote_token: QuoteToken,
    pub lp_address: Address,
    pub token_address: Address,
    pub quote_token_address: Address,
    pub token_decimals: u8,
    pub quote_token_decimals: u8,
    pub is_token_only: bool,
    pub deposit_fee_bp: u16,
    pub chef: Address,
}

impl FarmDescriptor {
    /// Token deposited into the chef: the bare token for token-only farms, else the LP token.
    pub fn staking_token(&self) -> Address {
        if self.is_token_only {
            self.token_address
        } else {
            self.lp_address
        }
    }

    pub fn staking_decimals(&self) -> u8 {
        if self.is_token_only {
            self.token_decimals
        } else {
            DEFAULT_DECIMALS
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolDescriptor {
    pub sous_id: u32,
    pub token_name: String,
    pub staking_token_name: String,
    pub staking_token: Address,
    pub staking_token_decimals: u8,
    pub contract: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexComponent {
    pub name: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    pub id: u32,
    pub name: String,
    pub image: Option<String>,
    pub creator: Option<String>,
    pub components: Vec<IndexComponent>,
    pub contract: Address,
    pub base_token: Address,
}

/// Auto-compounding cluster vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultDescriptor {
    pub id: u32,
    pub name: String,
    pub token_symbol: String,
    pub token: Address,
    pub token_decimals: u8,
    pub contract: Address,
    /// Lock duration in seconds.
    pub time_lock: u64,
    pub deposit_fee_bp: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FarmPublic {
    /// Staked token amount held by the chef.
    pub token_amount: Amount,
    pub quote_token_amount: Amount,
    /// Everything the chef holds, valued in the quote token.
    pub lp_total_in_quote_token: Amount,
    pub token_price_vs_quote: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FarmUser {
    pub allowance: Amount,
    pub token_balance: Amount,
    pub staked_balance: Amount,
    pub earnings: Amount,
    /// Unix seconds; zero when harvesting is not locked.
    pub next_harvest_until: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PoolPublic {
    pub total_staked: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PoolUser {
    pub allowance: Amount,
    pub staking_token_balance: Amount,
    pub staked_balance: Amount,
    pub pending_reward: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexPublic {
    pub total_supply: Amount,
    /// Unit price in the base token.
    pub price: Amount,
    /// Base-token value of each component per index unit, in component order.
    pub component_prices: Vec<Amount>,
    pub total_component_price: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexUser {
    /// Base token allowance towards the index contract.
    pub allowance: Amount,
    pub index_balance: Amount,
    pub base_token_balance: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VaultPublic {
    pub share_price: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VaultUser {
    pub allowance: Amount,
    pub token_balance: Amount,
    pub shares: Amount,
    /// `shares × share_price`.
    pub staked_value: Amount,
    pub last_user_action_time: u64,
}

/// One tracked entity. `public`/`user` stay `None` until their first successful merge.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<K: EntityKind> {
    pub descriptor: K::Descriptor,
    pub public: Option<K::Public>,
    pub user: Option<K::User>,
}

impl<K: EntityKind> Entity<K> {
    pub fn new(descriptor: K::Descriptor) -> Self {
        Self {
            descriptor,
            public: None,
            user: None,
        }
    }

    pub fn key(&self) -> K::Key {
        K::merge_key(&self.descriptor)
    }
}

/// Pricing references, resolved from the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pricing {
    pub bnb_busd_pid: u32,
    pub cake_bnb_pid: u32,
    pub cake_fallback_price: Amount,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            bnb_busd_pid: 4,
            cake_bnb_pid: 1,
            cake_fallback_price: Amount::from(285u64)
                .checked_div(&Amount::from(10_000u64))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoreState {
    /// Account the `user` fields belong to.
    pub account: Option<Address>,
    /// Bumped on every account change; user data fetched under an older epoch is discarded.
    pub account_epoch: u64,
    /// Bumped on every reset; public data fetched under an older generation is discarded.
    pub generation: u64,
    pub farms: Vec<Entity<Farms>>,
    pub pools: Vec<Entity<Pools>>,
    pub indexes: Vec<Entity<Indexes>>,
    pub vaults: Vec<Entity<Vaults>>,
    pub pricing: Pricing,
}

impl StoreState {
    pub(crate) fn clear_user_data(&mut self) {
        self.farms.iter_mut().for_each(|e| e.user = None);
        self.pools.iter_mut().for_each(|e| e.user = None);
        self.indexes.iter_mut().for_each(|e| e.user = None);
        self.vaults.iter_mut().for_each(|e| e.user = None);
    }
}
