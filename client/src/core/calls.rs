//! # Contract Calls
//!
//! Typed descriptions of every contract method the core reads or writes. A [`ContractClient`]
//! turns them into wire calls; tests answer them from a table.
//!
//! [`ContractClient`]: crate::core::service::ContractClient

use alloy_primitives::{Address, B256, U256};

/// A single-value contract query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReadCall {
    /// ERC-20 `allowance(owner, spender)`.
    Allowance { owner: Address, spender: Address },
    /// ERC-20 `balanceOf(owner)`.
    BalanceOf { owner: Address },
    /// ERC-20 `totalSupply()`.
    TotalSupply,
    /// MasterChef `userInfo(pid, user)`.
    ChefUserInfo { pid: u32, user: Address },
    /// MasterChef `pendingCake(pid, user)`.
    ChefPendingReward { pid: u32, user: Address },
    /// SousChef `userInfo(user)`.
    SousUserInfo { user: Address },
    /// SousChef `pendingReward(user)`.
    SousPendingReward { user: Address },
    /// Vault `userInfo(user)`.
    VaultUserInfo { user: Address },
    /// Vault `getPricePerFullShare()`.
    PricePerFullShare,
    /// Index `getIndexPrice(probe)`: cost of `probe` index units in the base token.
    IndexPrice { probe: U256 },
    /// Index `getComponentPrices(probe)`.
    ComponentPrices { probe: U256 },
}

impl ReadCall {
    /// Contract method name, for logs.
    pub fn method(&self) -> &'static str {
        match self {
            ReadCall::Allowance { .. } => "allowance",
            ReadCall::BalanceOf { .. } => "balanceOf",
            ReadCall::TotalSupply => "totalSupply",
            ReadCall::ChefUserInfo { .. } | ReadCall::SousUserInfo { .. } => "userInfo",
            ReadCall::ChefPendingReward { .. } => "pendingCake",
            ReadCall::SousPendingReward { .. } => "pendingReward",
            ReadCall::VaultUserInfo { .. } => "userInfo",
            ReadCall::PricePerFullShare => "getPricePerFullShare",
            ReadCall::IndexPrice { .. } => "getIndexPrice",
            ReadCall::ComponentPrices { .. } => "getComponentPrices",
        }
    }
}

/// Raw, still-scaled result of a [`ReadCall`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Uint(U256),
    /// Chef/SousChef `userInfo`. `next_harvest_until` is zero for contracts without a lockup.
    StakeInfo {
        amount: U256,
        reward_debt: U256,
        next_harvest_until: U256,
    },
    /// Vault `userInfo`.
    VaultShares {
        shares: U256,
        last_user_action_time: U256,
    },
    Uints(Vec<U256>),
}

/// A state-changing contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    Approve { spender: Address, amount: U256 },
    ChefDeposit { pid: u32, amount: U256 },
    ChefWithdraw { pid: u32, amount: U256 },
    SousDeposit { amount: U256 },
    SousWithdraw { amount: U256 },
    VaultDeposit { amount: U256 },
    VaultWithdrawAll,
    IndexMint { amount: U256 },
    IndexBurn { amount: U256 },
}

impl WriteCall {
    pub fn method(&self) -> &'static str {
        match self {
            WriteCall::Approve { .. } => "approve",
            WriteCall::ChefDeposit { .. } | WriteCall::SousDeposit { .. } | WriteCall::VaultDeposit { .. } => {
                "deposit"
            }
            WriteCall::ChefWithdraw { .. } | WriteCall::SousWithdraw { .. } => "withdraw",
            WriteCall::VaultWithdrawAll => "withdrawAll",
            WriteCall::IndexMint { .. } => "mint",
            WriteCall::IndexBurn { .. } => "burn",
        }
    }
}

/// One user gesture's transaction. Submitted once, never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRequest {
    pub contract: Address,
    pub call: WriteCall,
    pub sender: Address,
}

/// Mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
}
