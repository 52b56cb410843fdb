//! # RPC Read Client
//!
//! Stateless single-value queries. No caching: every call goes to the [`ContractClient`].
//! Results are still raw on-chain integers; descaling into [`Amount`] happens where the
//! token's decimals are known.
//!
//! [`Amount`]: crate::core::Amount

use crate::core::calls::{RawValue, ReadCall};
use crate::core::error::ReadError;
use crate::core::service::ContractClient;
use alloy_primitives::{Address, U256};

/// Staked position in a chef contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StakeInfo {
    pub amount: U256,
    pub reward_debt: U256,
    /// Unix seconds before which harvesting is locked; zero when the contract has no lockup.
    pub next_harvest_until: U256,
}

/// Vault position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VaultUserInfo {
    pub shares: U256,
    pub last_user_action_time: U256,
}

async fn read_uint(
    client: &dyn ContractClient,
    contract: Address,
    call: ReadCall,
) -> Result<U256, ReadError> {
    let method = call.method();
    match client.read(contract, call).await? {
        RawValue::Uint(value) => Ok(value),
        other => Err(unexpected(method, &other)),
    }
}

fn unexpected(method: &str, value: &RawValue) -> ReadError {
    ReadError::Malformed(format!("{} returned unexpected value {:?}", method, value))
}

pub async fn allowance(
    client: &dyn ContractClient,
    token: Address,
    owner: Address,
    spender: Address,
) -> Result<U256, ReadError> {
    read_uint(client, token, ReadCall::Allowance { owner, spender }).await
}

pub async fn balance_of(
    client: &dyn ContractClient,
    token: Address,
    owner: Address,
) -> Result<U256, ReadError> {
    read_uint(client, token, ReadCall::BalanceOf { owner }).await
}

pub async fn total_supply(client: &dyn ContractClient, token: Address) -> Result<U256, ReadError> {
    read_uint(client, token, ReadCall::TotalSupply).await
}

pub async fn chef_user_info(
    client: &dyn ContractClient,
    chef: Address,
    pid: u32,
    user: Address,
) -> Result<StakeInfo, ReadError> {
    stake_info(client, chef, ReadCall::ChefUserInfo { pid, user }).await
}

pub async fn pending_reward_farm(
    client: &dyn ContractClient,
    chef: Address,
    pid: u32,
    user: Address,
) -> Result<U256, ReadError> {
    read_uint(client, chef, ReadCall::ChefPendingReward { pid, user }).await
}

pub async fn sous_user_info(
    client: &dyn ContractClient,
    sous_chef: Address,
    user: Address,
) -> Result<StakeInfo, ReadError> {
    stake_info(client, sous_chef, ReadCall::SousUserInfo { user }).await
}

pub async fn sous_pending_reward(
    client: &dyn ContractClient,
    sous_chef: Address,
    user: Address,
) -> Result<U256, ReadError> {
    read_uint(client, sous_chef, ReadCall::SousPendingReward { user }).await
}

async fn stake_info(
    client: &dyn ContractClient,
    contract: Address,
    call: ReadCall,
) -> Result<StakeInfo, ReadError> {
    let method = call.method();
    match client.read(contract, call).await? {
        RawValue::StakeInfo {
            amount,
            reward_debt,
            next_harvest_until,
        } => Ok(StakeInfo {
            amount,
            reward_debt,
            next_harvest_until,
        }),
        other => Err(unexpected(method, &other)),
    }
}

pub async fn vault_user_info(
    client: &dyn ContractClient,
    vault: Address,
    user: Address,
) -> Result<VaultUserInfo, ReadError> {
    match client.read(vault, ReadCall::VaultUserInfo { user }).await? {
        RawValue::VaultShares {
            shares,
            last_user_action_time,
        } => Ok(VaultUserInfo {
            shares,
            last_user_action_time,
        }),
        other => Err(unexpected("userInfo", &other)),
    }
}

/// Timestamp of the user's last deposit or withdrawal in the vault.
pub async fn user_stake_time(
    client: &dyn ContractClient,
    vault: Address,
    user: Address,
) -> Result<u64, ReadError> {
    let info = vault_user_info(client, vault, user).await?;
    u64::try_from(info.last_user_action_time)
        .map_err(|_| ReadError::Malformed("lastUserActionTime does not fit in u64".into()))
}

/// Vault share price, 18-decimal scaled.
pub async fn share_price(client: &dyn ContractClient, vault: Address) -> Result<U256, ReadError> {
    read_uint(client, vault, ReadCall::PricePerFullShare).await
}

/// Base-token cost of `probe` raw index units.
pub async fn index_price(
    client: &dyn ContractClient,
    index: Address,
    probe: U256,
) -> Result<U256, ReadError> {
    read_uint(client, index, ReadCall::IndexPrice { probe }).await
}

/// Base-token value of each component backing `probe` raw index units, in component order.
pub async fn component_prices(
    client: &dyn ContractClient,
    index: Address,
    probe: U256,
) -> Result<Vec<U256>, ReadError> {
    match client.read(index, ReadCall::ComponentPrices { probe }).await? {
        RawValue::Uints(values) => Ok(values),
        other => Err(unexpected("getComponentPrices", &other)),
    }
}
