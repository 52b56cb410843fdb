//! ABI bindings and the mapping between typed calls and calldata.

use crate::core::calls::{RawValue, ReadCall, WriteCall};
use crate::core::error::ReadError;
use alloy_primitives::U256;
use alloy_sol_types::{sol, SolCall};

sol! {
    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// MasterChef with harvest lockup.
    interface IMasterChef {
        function userInfo(uint256 pid, address user) external view returns (
            uint256 amount,
            uint256 rewardDebt,
            uint256 rewardLockedUp,
            uint256 nextHarvestUntil
        );
        function pendingCake(uint256 pid, address user) external view returns (uint256);
        function deposit(uint256 pid, uint256 amount) external;
        function withdraw(uint256 pid, uint256 amount) external;
    }

    interface ISousChef {
        function userInfo(address user) external view returns (uint256 amount, uint256 rewardDebt);
        function pendingReward(address user) external view returns (uint256);
        function deposit(uint256 amount) external;
        function withdraw(uint256 amount) external;
    }

    /// Auto-compounding share vault ("cluster").
    interface IClusterVault {
        function userInfo(address user) external view returns (
            uint256 shares,
            uint256 lastDepositedTime,
            uint256 cakeAtLastUserAction,
            uint256 lastUserActionTime
        );
        function getPricePerFullShare() external view returns (uint256);
        function deposit(uint256 amount) external;
        function withdrawAll() external;
    }

    /// Index basket ("galaxy").
    interface IGalaxy {
        struct ComponentPrice {
            address token;
            uint256 amount;
        }
        function getIndexPrice(uint256 amount) external view returns (uint256);
        function getComponentPrices(uint256 amount) external view returns (ComponentPrice[] memory);
        function mint(uint256 amount) external;
        function burn(uint256 amount) external;
    }
}

/// Calldata for a read.
pub fn encode_read(call: &ReadCall) -> Vec<u8> {
    match call {
        ReadCall::Allowance { owner, spender } => IERC20::allowanceCall {
            owner: *owner,
            spender: *spender,
        }
        .abi_encode(),
        ReadCall::BalanceOf { owner } => IERC20::balanceOfCall { owner: *owner }.abi_encode(),
        ReadCall::TotalSupply => IERC20::totalSupplyCall {}.abi_encode(),
        ReadCall::ChefUserInfo { pid, user } => IMasterChef::userInfoCall {
            pid: U256::from(*pid),
            user: *user,
        }
        .abi_encode(),
        ReadCall::ChefPendingReward { pid, user } => IMasterChef::pendingCakeCall {
            pid: U256::from(*pid),
            user: *user,
        }
        .abi_encode(),
        ReadCall::SousUserInfo { user } => ISousChef::userInfoCall { user: *user }.abi_encode(),
        ReadCall::SousPendingReward { user } => {
            ISousChef::pendingRewardCall { user: *user }.abi_encode()
        }
        ReadCall::VaultUserInfo { user } => {
            IClusterVault::userInfoCall { user: *user }.abi_encode()
        }
        ReadCall::PricePerFullShare => IClusterVault::getPricePerFullShareCall {}.abi_encode(),
        ReadCall::IndexPrice { probe } => IGalaxy::getIndexPriceCall { amount: *probe }.abi_encode(),
        ReadCall::ComponentPrices { probe } => {
            IGalaxy::getComponentPricesCall { amount: *probe }.abi_encode()
        }
    }
}

/// Decode `eth_call` return data for `call`.
pub fn decode_read(call: &ReadCall, data: &[u8]) -> Result<RawValue, ReadError> {
    let malformed = |e: alloy_sol_types::Error| ReadError::Malformed(format!("{}: {}", call.method(), e));

    let value = match call {
        ReadCall::Allowance { .. } => {
            RawValue::Uint(IERC20::allowanceCall::abi_decode_returns(data).map_err(malformed)?)
        }
        ReadCall::BalanceOf { .. } => {
            RawValue::Uint(IERC20::balanceOfCall::abi_decode_returns(data).map_err(malformed)?)
        }
        ReadCall::TotalSupply => {
            RawValue::Uint(IERC20::totalSupplyCall::abi_decode_returns(data).map_err(malformed)?)
        }
        ReadCall::ChefUserInfo { .. } => {
            let info = IMasterChef::userInfoCall::abi_decode_returns(data).map_err(malformed)?;
            RawValue::StakeInfo {
                amount: info.amount,
                reward_debt: info.rewardDebt,
                next_harvest_until: info.nextHarvestUntil,
            }
        }
        ReadCall::ChefPendingReward { .. } => RawValue::Uint(
            IMasterChef::pendingCakeCall::abi_decode_returns(data).map_err(malformed)?,
        ),
        ReadCall::SousUserInfo { .. } => {
            let info = ISousChef::userInfoCall::abi_decode_returns(data).map_err(malformed)?;
            RawValue::StakeInfo {
                amount: info.amount,
                reward_debt: info.rewardDebt,
                next_harvest_until: U256::ZERO,
            }
        }
        ReadCall::SousPendingReward { .. } => RawValue::Uint(
            ISousChef::pendingRewardCall::abi_decode_returns(data).map_err(malformed)?,
        ),
        ReadCall::VaultUserInfo { .. } => {
            let info = IClusterVault::userInfoCall::abi_decode_returns(data).map_err(malformed)?;
            RawValue::VaultShares {
                shares: info.shares,
                last_user_action_time: info.lastUserActionTime,
            }
        }
        ReadCall::PricePerFullShare => RawValue::Uint(
            IClusterVault::getPricePerFullShareCall::abi_decode_returns(data).map_err(malformed)?,
        ),
        ReadCall::IndexPrice { .. } => RawValue::Uint(
            IGalaxy::getIndexPriceCall::abi_decode_returns(data).map_err(malformed)?,
        ),
        ReadCall::ComponentPrices { .. } => {
            let prices =
                IGalaxy::getComponentPricesCall::abi_decode_returns(data).map_err(malformed)?;
            RawValue::Uints(prices.into_iter().map(|p| p.amount).collect())
        }
    };
    Ok(value)
}

/// Calldata for a write.
pub fn encode_write(call: &WriteCall) -> Vec<u8> {
    match call {
        WriteCall::Approve { spender, amount } => IERC20::approveCall {
            spender: *spender,
            amount: *amount,
        }
        .abi_encode(),
        WriteCall::ChefDeposit { pid, amount } => IMasterChef::depositCall {
            pid: U256::from(*pid),
            amount: *amount,
        }
        .abi_encode(),
        WriteCall::ChefWithdraw { pid, amount } => IMasterChef::withdrawCall {
            pid: U256::from(*pid),
            amount: *amount,
        }
        .abi_encode(),
        WriteCall::SousDeposit { amount } => ISousChef::depositCall { amount: *amount }.abi_encode(),
        WriteCall::SousWithdraw { amount } => {
            ISousChef::withdrawCall { amount: *amount }.abi_encode()
        }
        WriteCall::VaultDeposit { amount } => {
            IClusterVault::depositCall { amount: *amount }.abi_encode()
        }
        WriteCall::VaultWithdrawAll => IClusterVault::withdrawAllCall {}.abi_encode(),
        WriteCall::IndexMint { amount } => IGalaxy::mintCall { amount: *amount }.abi_encode(),
        WriteCall::IndexBurn { amount } => IGalaxy::burnCall { amount: *amount }.abi_encode(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use alloy_sol_types::SolValue;

    #[test]
    fn test_approve_selector() {
        let data = encode_write(&WriteCall::Approve {
            spender: Address::ZERO,
            amount: U256::MAX,
        });
        assert_eq!(&data[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(data.len(), 4 + 64);
    }

    #[test]
    fn test_balance_of_selector() {
        let data = encode_read(&ReadCall::BalanceOf { owner: Address::ZERO });
        assert_eq!(&data[..4], &[0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn test_decode_uint() {
        let data = U256::from(42u64).abi_encode();
        assert_eq!(
            decode_read(&ReadCall::TotalSupply, &data),
            Ok(RawValue::Uint(U256::from(42u64)))
        );
    }

    #[test]
    fn test_decode_vault_user_info() {
        let data = (U256::from(5u64), U256::from(1u64), U256::from(2u64), U256::from(1_700_000_000u64))
            .abi_encode_params();
        let value = decode_read(&ReadCall::VaultUserInfo { user: Address::ZERO }, &data).unwrap();
        assert_eq!(
            value,
            RawValue::VaultShares {
                shares: U256::from(5u64),
                last_user_action_time: U256::from(1_700_000_000u64),
            }
        );
    }

    #[test]
    fn test_decode_short_data_is_malformed() {
        let err = decode_read(&ReadCall::TotalSupply, &[0u8; 3]).unwrap_err();
        assert!(matches!(err, ReadError::Malformed(_)));
    }
}
