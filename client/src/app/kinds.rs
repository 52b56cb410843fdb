//! # Entity Kinds
//!
//! The one refresh-and-merge capability shared by farms, pools, indexes and vaults. Each
//! family is a marker type implementing [`EntityKind`]; tasks, hooks and the store are
//! generic over it.
//!
//! Fetches never fail as a whole. Every contract read is independent: a failed read falls
//! back to zero for its own field, is logged, and does not stop its siblings.

use crate::app::state::{
    Entity, FarmDescriptor, FarmPublic, FarmUser, IndexDescriptor, IndexPublic, IndexUser,
    PoolDescriptor, PoolPublic, PoolUser, StoreState, VaultDescriptor, VaultPublic, VaultUser,
};
use crate::core::error::ReadError;
use crate::core::service::ContractClient;
use crate::core::Amount;
use crate::services::reader;
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use tracing::warn;

/// Raw amount of index units used to probe prices (0.000001 of a unit).
pub const INDEX_PRICE_PROBE: u64 = 1_000_000_000_000;

/// Factor bringing a probe-sized price back to one index unit.
const INDEX_PROBE_SCALE: u8 = 6;

#[async_trait]
pub trait EntityKind: Clone + Debug + PartialEq + Send + Sync + 'static {
    type Key: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static;
    type Descriptor: Clone + Debug + PartialEq + Send + Sync + 'static;
    type Public: Clone + Debug + PartialEq + Send + Sync + 'static;
    type User: Clone + Debug + PartialEq + Default + Send + Sync + 'static;

    /// Family name for logs and events.
    const NAME: &'static str;

    fn merge_key(descriptor: &Self::Descriptor) -> Self::Key;

    fn table(state: &StoreState) -> &[Entity<Self>];

    fn table_mut(state: &mut StoreState) -> &mut Vec<Entity<Self>>;

    async fn fetch_public(client: &dyn ContractClient, descriptor: &Self::Descriptor) -> Self::Public;

    async fn fetch_user(
        client: &dyn ContractClient,
        descriptor: &Self::Descriptor,
        account: Address,
    ) -> Self::User;
}

/// Unwrap a read, logging and defaulting on failure.
fn settle<T: Default>(
    result: Result<T, ReadError>,
    family: &'static str,
    key: impl Display,
    field: &'static str,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(family, key = %key, field, error = %e, "Read failed, field falls back to default");
            T::default()
        }
    }
}

fn ratio(numerator: &Amount, denominator: &Amount) -> Amount {
    numerator.checked_div(denominator).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Farms;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pools;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indexes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vaults;

#[async_trait]
impl EntityKind for Farms {
    type Key = u32;
    type Descriptor = FarmDescriptor;
    type Public = FarmPublic;
    type User = FarmUser;

    const NAME: &'static str = "farm";

    fn merge_key(descriptor: &FarmDescriptor) -> u32 {
        descriptor.pid
    }

    fn table(state: &StoreState) -> &[Entity<Self>] {
        &state.farms
    }

    fn table_mut(state: &mut StoreState) -> &mut Vec<Entity<Self>> {
        &mut state.farms
    }

    async fn fetch_public(client: &dyn ContractClient, farm: &FarmDescriptor) -> FarmPublic {
        let pid = farm.pid;
        let (token_in_lp, quote_in_lp, staked_in_chef, lp_supply) = tokio::join!(
            reader::balance_of(client, farm.token_address, farm.lp_address),
            reader::balance_of(client, farm.quote_token_address, farm.lp_address),
            reader::balance_of(client, farm.staking_token(), farm.chef),
            reader::total_supply(client, farm.lp_address),
        );

        let token_in_lp = Amount::from_raw(
            settle(token_in_lp, Self::NAME, pid, "tokenBalanceLP"),
            farm.token_decimals,
        );
        let quote_in_lp = Amount::from_raw(
            settle(quote_in_lp, Self::NAME, pid, "quoteTokenBalanceLP"),
            farm.quote_token_decimals,
        );
        let staked_in_chef = settle(staked_in_chef, Self::NAME, pid, "lpTokenBalanceMC");

        if farm.is_token_only {
            let token_amount = Amount::from_raw(staked_in_chef, farm.token_decimals);
            let token_price_vs_quote = if farm.token_address == farm.quote_token_address {
                Amount::one()
            } else {
                ratio(&quote_in_lp, &token_in_lp)
            };
            let lp_total_in_quote_token = &token_amount * &token_price_vs_quote;
            return FarmPublic {
                quote_token_amount: lp_total_in_quote_token.clone(),
                token_amount,
                lp_total_in_quote_token,
                token_price_vs_quote,
            };
        }

        let lp_supply = Amount::from_wei(settle(lp_supply, Self::NAME, pid, "lpTotalSupply"));
        let lp_ratio = ratio(&Amount::from_wei(staked_in_chef), &lp_supply);

        let quote_token_amount = &quote_in_lp * &lp_ratio;
        let token_amount = &token_in_lp * &lp_ratio;
        let lp_total_in_quote_token = &quote_token_amount * &Amount::from(2u64);
        let token_price_vs_quote = ratio(&quote_token_amount, &token_amount);

        FarmPublic {
            token_amount,
            quote_token_amount,
            lp_total_in_quote_token,
            token_price_vs_quote,
        }
    }

    async fn fetch_user(client: &dyn ContractClient, farm: &FarmDescriptor, account: Address) -> FarmUser {
        let pid = farm.pid;
        let token = farm.staking_token();
        let decimals = farm.staking_decimals();
        let (allowance, balance, info, earnings) = tokio::join!(
            reader::allowance(client, token, account, farm.chef),
            reader::balance_of(client, token, account),
            reader::chef_user_info(client, farm.chef, pid, account),
            reader::pending_reward_farm(client, farm.chef, pid, account),
        );

        let info = settle(info, Self::NAME, pid, "userInfo");
        FarmUser {
            allowance: Amount::from_raw(settle(allowance, Self::NAME, pid, "allowance"), decimals),
            token_balance: Amount::from_raw(settle(balance, Self::NAME, pid, "tokenBalance"), decimals),
            staked_balance: Amount::from_raw(info.amount, decimals),
            earnings: Amount::from_wei(settle(earnings, Self::NAME, pid, "earnings")),
            next_harvest_until: u64::try_from(info.next_harvest_until).unwrap_or(u64::MAX),
        }
    }
}

#[async_trait]
impl EntityKind for Pools {
    type Key = u32;
    type Descriptor = PoolDescriptor;
    type Public = PoolPublic;
    type User = PoolUser;

    const NAME: &'static str = "pool";

    fn merge_key(descriptor: &PoolDescriptor) -> u32 {
        descriptor.sous_id
    }

    fn table(state: &StoreState) -> &[Entity<Self>] {
        &state.pools
    }

    fn table_mut(state: &mut StoreState) -> &mut Vec<Entity<Self>> {
        &mut state.pools
    }

    async fn fetch_public(client: &dyn ContractClient, pool: &PoolDescriptor) -> PoolPublic {
        let staked = reader::balance_of(client, pool.staking_token, pool.contract).await;
        PoolPublic {
            total_staked: Amount::from_raw(
                settle(staked, Self::NAME, pool.sous_id, "totalStaked"),
                pool.staking_token_decimals,
            ),
        }
    }

    async fn fetch_user(client: &dyn ContractClient, pool: &PoolDescriptor, account: Address) -> PoolUser {
        let id = pool.sous_id;
        let decimals = pool.staking_token_decimals;
        let (allowance, balance, info, pending) = tokio::join!(
            reader::allowance(client, pool.staking_token, account, pool.contract),
            reader::balance_of(client, pool.staking_token, account),
            reader::sous_user_info(client, pool.contract, account),
            reader::sous_pending_reward(client, pool.contract, account),
        );

        PoolUser {
            allowance: Amount::from_raw(settle(allowance, Self::NAME, id, "allowance"), decimals),
            staking_token_balance: Amount::from_raw(settle(balance, Self::NAME, id, "stakingTokenBalance"), decimals),
            staked_balance: Amount::from_raw(settle(info, Self::NAME, id, "userInfo").amount, decimals),
            pending_reward: Amount::from_wei(settle(pending, Self::NAME, id, "pendingReward")),
        }
    }
}

#[async_trait]
impl EntityKind for Indexes {
    type Key = u32;
    type Descriptor = IndexDescriptor;
    type Public = IndexPublic;
    type User = IndexUser;

    const NAME: &'static str = "index";

    fn merge_key(descriptor: &IndexDescriptor) -> u32 {
        descriptor.id
    }

    fn table(state: &StoreState) -> &[Entity<Self>] {
        &state.indexes
    }

    fn table_mut(state: &mut StoreState) -> &mut Vec<Entity<Self>> {
        &mut state.indexes
    }

    async fn fetch_public(client: &dyn ContractClient, index: &IndexDescriptor) -> IndexPublic {
        let id = index.id;
        let probe = U256::from(INDEX_PRICE_PROBE);
        let (supply, price, components) = tokio::join!(
            reader::total_supply(client, index.contract),
            reader::index_price(client, index.contract, probe),
            reader::component_prices(client, index.contract, probe),
        );

        let scale = Amount::pow10(INDEX_PROBE_SCALE);
        let per_unit = |raw: U256| &Amount::from_wei(raw) * &scale;

        // Missing entries (short answer or failed read) count as zero so rows line up with
        // the configured components.
        let mut raw_components = settle(components, Self::NAME, id, "componentPrices");
        raw_components.resize(index.components.len(), U256::ZERO);
        let component_prices: Vec<Amount> = raw_components.into_iter().map(per_unit).collect();
        let total_component_price = component_prices.iter().sum();

        IndexPublic {
            total_supply: Amount::from_wei(settle(supply, Self::NAME, id, "totalSupply")),
            price: per_unit(settle(price, Self::NAME, id, "indexPrice")),
            component_prices,
            total_component_price,
        }
    }

    async fn fetch_user(client: &dyn ContractClient, index: &IndexDescriptor, account: Address) -> IndexUser {
        let id = index.id;
        let (allowance, index_balance, base_balance) = tokio::join!(
            reader::allowance(client, index.base_token, account, index.contract),
            reader::balance_of(client, index.contract, account),
            reader::balance_of(client, index.base_token, account),
        );

        IndexUser {
            allowance: Amount::from_wei(settle(allowance, Self::NAME, id, "allowance")),
            index_balance: Amount::from_wei(settle(index_balance, Self::NAME, id, "indexBalance")),
            base_token_balance: Amount::from_wei(settle(base_balance, Self::NAME, id, "baseTokenBalance")),
        }
    }
}

#[async_trait]
impl EntityKind for Vaults {
    type Key = u32;
    type Descriptor = VaultDescriptor;
    type Public = VaultPublic;
    type User = VaultUser;

    const NAME: &'static str = "vault";

    fn merge_key(descriptor: &VaultDescriptor) -> u32 {
        descriptor.id
    }

    fn table(state: &StoreState) -> &[Entity<Self>] {
        &state.vaults
    }

    fn table_mut(state: &mut StoreState) -> &mut Vec<Entity<Self>> {
        &mut state.vaults
    }

    async fn fetch_public(client: &dyn ContractClient, vault: &VaultDescriptor) -> VaultPublic {
        let price = reader::share_price(client, vault.contract).await;
        VaultPublic {
            share_price: Amount::from_wei(settle(price, Self::NAME, vault.id, "sharePrice")),
        }
    }

    async fn fetch_user(client: &dyn ContractClient, vault: &VaultDescriptor, account: Address) -> VaultUser {
        let id = vault.id;
        let decimals = vault.token_decimals;
        let (allowance, balance, info, price) = tokio::join!(
            reader::allowance(client, vault.token, account, vault.contract),
            reader::balance_of(client, vault.token, account),
            reader::vault_user_info(client, vault.contract, account),
            reader::share_price(client, vault.contract),
        );

        let info = settle(info, Self::NAME, id, "userInfo");
        let shares = Amount::from_wei(info.shares);
        let share_price = Amount::from_wei(settle(price, Self::NAME, id, "sharePrice"));

        VaultUser {
            allowance: Amount::from_raw(settle(allowance, Self::NAME, id, "allowance"), decimals),
            token_balance: Amount::from_raw(settle(balance, Self::NAME, id, "tokenBalance"), decimals),
            staked_value: &shares * &share_price,
            shares,
            last_user_action_time: u64::try_from(info.last_user_action_time).unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{addr, amt, farm, index, pool, vault, wei, MockChain};
    use crate::core::calls::{RawValue, ReadCall};

    #[tokio::test]
    async fn test_lp_farm_public_data() {
        let chain = MockChain::new();
        let farm = farm(4);
        // LP holds 100 token / 50 quote; chef holds half of the LP supply.
        chain.set_uint(farm.token_address, ReadCall::BalanceOf { owner: farm.lp_address }, wei("100"));
        chain.set_uint(farm.quote_token_address, ReadCall::BalanceOf { owner: farm.lp_address }, wei("50"));
        chain.set_uint(farm.lp_address, ReadCall::BalanceOf { owner: farm.chef }, wei("5"));
        chain.set_uint(farm.lp_address, ReadCall::TotalSupply, wei("10"));

        let public = Farms::fetch_public(&chain, &farm).await;
        assert_eq!(public.token_amount, amt("50"));
        assert_eq!(public.quote_token_amount, amt("25"));
        assert_eq!(public.lp_total_in_quote_token, amt("50"));
        assert_eq!(public.token_price_vs_quote, amt("0.5"));
    }

    #[tokio::test]
    async fn test_token_only_farm_priced_as_one_when_quote() {
        let chain = MockChain::new();
        let mut farm = farm(9);
        farm.is_token_only = true;
        farm.quote_token_address = farm.token_address;
        chain.set_uint(farm.token_address, ReadCall::BalanceOf { owner: farm.chef }, wei("12"));

        let public = Farms::fetch_public(&chain, &farm).await;
        assert_eq!(public.token_price_vs_quote, Amount::one());
        assert_eq!(public.lp_total_in_quote_token, amt("12"));
    }

    #[tokio::test]
    async fn test_failed_read_defaults_single_field() {
        let chain = MockChain::new();
        let farm = farm(1);
        let account = addr(0xaa);
        chain.set_uint(farm.lp_address, ReadCall::Allowance { owner: account, spender: farm.chef }, wei("1"));
        chain.fail(
            farm.lp_address,
            ReadCall::BalanceOf { owner: account },
            ReadError::Network("timeout".into()),
        );
        chain.set(
            farm.chef,
            ReadCall::ChefUserInfo { pid: 1, user: account },
            RawValue::StakeInfo {
                amount: wei("3"),
                reward_debt: U256::ZERO,
                next_harvest_until: U256::from(1_700_000_000u64),
            },
        );
        chain.set_uint(farm.chef, ReadCall::ChefPendingReward { pid: 1, user: account }, wei("0.25"));

        let user = Farms::fetch_user(&chain, &farm, account).await;
        assert_eq!(user.allowance, amt("1"));
        assert_eq!(user.token_balance, Amount::zero());
        assert_eq!(user.staked_balance, amt("3"));
        assert_eq!(user.earnings, amt("0.25"));
        assert_eq!(user.next_harvest_until, 1_700_000_000);
    }

    #[tokio::test]
    async fn test_index_public_scales_probe_prices() {
        let chain = MockChain::new();
        let index = index(1, 2);
        let probe = U256::from(INDEX_PRICE_PROBE);
        chain.set_uint(index.contract, ReadCall::TotalSupply, wei("1000"));
        // 0.000001 unit costs 0.000002 base tokens, so one unit costs 2.
        chain.set_uint(index.contract, ReadCall::IndexPrice { probe }, wei("0.000002"));
        chain.set(
            index.contract,
            ReadCall::ComponentPrices { probe },
            RawValue::Uints(vec![wei("0.0000015")]),
        );

        let public = Indexes::fetch_public(&chain, &index).await;
        assert_eq!(public.total_supply, amt("1000"));
        assert_eq!(public.price, amt("2"));
        assert_eq!(public.component_prices, vec![amt("1.5"), Amount::zero()]);
        assert_eq!(public.total_component_price, amt("1.5"));
    }

    #[tokio::test]
    async fn test_pool_public_uses_staking_decimals() {
        let chain = MockChain::new();
        let mut pool = pool(2);
        pool.staking_token_decimals = 6;
        chain.set_uint(
            pool.staking_token,
            ReadCall::BalanceOf { owner: pool.contract },
            U256::from(2_500_000u64),
        );

        let public = Pools::fetch_public(&chain, &pool).await;
        assert_eq!(public.total_staked, amt("2.5"));
    }

    #[tokio::test]
    async fn test_pool_user_fields() {
        let chain = MockChain::new();
        let mut pool = pool(1);
        pool.staking_token_decimals = 6;
        let account = addr(0xcc);
        chain.set_uint(
            pool.staking_token,
            ReadCall::Allowance { owner: account, spender: pool.contract },
            U256::from(7_000_000u64),
        );
        chain.set_uint(pool.staking_token, ReadCall::BalanceOf { owner: account }, U256::from(1_500_000u64));
        chain.set(
            pool.contract,
            ReadCall::SousUserInfo { user: account },
            RawValue::StakeInfo {
                amount: U256::from(3_000_000u64),
                reward_debt: U256::ZERO,
                next_harvest_until: U256::ZERO,
            },
        );
        // Rewards are always 18 decimals regardless of the staking token.
        chain.set_uint(pool.contract, ReadCall::SousPendingReward { user: account }, wei("0.75"));

        let user = Pools::fetch_user(&chain, &pool, account).await;
        assert_eq!(user.allowance, amt("7"));
        assert_eq!(user.staking_token_balance, amt("1.5"));
        assert_eq!(user.staked_balance, amt("3"));
        assert_eq!(user.pending_reward, amt("0.75"));
    }

    #[tokio::test]
    async fn test_index_user_fields() {
        let chain = MockChain::new();
        let index = index(1, 2);
        let account = addr(0xdd);
        chain.set_uint(
            index.base_token,
            ReadCall::Allowance { owner: account, spender: index.contract },
            wei("100"),
        );
        chain.set_uint(index.contract, ReadCall::BalanceOf { owner: account }, wei("2.5"));
        chain.fail(
            index.base_token,
            ReadCall::BalanceOf { owner: account },
            ReadError::Network("timeout".into()),
        );

        let user = Indexes::fetch_user(&chain, &index, account).await;
        assert_eq!(user.allowance, amt("100"));
        assert_eq!(user.index_balance, amt("2.5"));
        assert_eq!(user.base_token_balance, Amount::zero());
    }

    #[tokio::test]
    async fn test_vault_staked_value() {
        let chain = MockChain::new();
        let vault = vault(3);
        let account = addr(0xbb);
        chain.set(
            vault.contract,
            ReadCall::VaultUserInfo { user: account },
            RawValue::VaultShares {
                shares: wei("4"),
                last_user_action_time: U256::from(1_600_000_000u64),
            },
        );
        chain.set_uint(vault.contract, ReadCall::PricePerFullShare, wei("1.25"));

        let user = Vaults::fetch_user(&chain, &vault, account).await;
        assert_eq!(user.staked_value, amt("5"));
        assert_eq!(user.last_user_action_time, 1_600_000_000);
        assert_eq!(user.allowance, Amount::zero());
    }
}
