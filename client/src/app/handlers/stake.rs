//! Stake, unstake, withdraw, mint and burn.
//!
//! Amounts arrive as the decimal strings a user typed and are scaled with the staked token's
//! decimals before anything is submitted.

use super::{Refetch, TxOrchestrator};
use crate::core::amount::DEFAULT_DECIMALS;
use crate::core::calls::{Receipt, WriteCall};
use crate::core::error::TxError;
use crate::utils::validation::parse_amount;

impl TxOrchestrator {
    pub async fn stake_farm(&self, pid: u32, amount: &str) -> Result<Receipt, TxError> {
        let sender = self.sender("stake_farm")?;
        let farm = self.farm(pid)?;
        let amount = parse_amount(amount, farm.staking_decimals())?;
        self.submit(
            "stake_farm",
            sender,
            farm.chef,
            WriteCall::ChefDeposit { pid, amount },
            Refetch::Farm(pid),
        )
        .await
    }

    pub async fn unstake_farm(&self, pid: u32, amount: &str) -> Result<Receipt, TxError> {
        let sender = self.sender("unstake_farm")?;
        let farm = self.farm(pid)?;
        let amount = parse_amount(amount, farm.staking_decimals())?;
        self.submit(
            "unstake_farm",
            sender,
            farm.chef,
            WriteCall::ChefWithdraw { pid, amount },
            Refetch::Farm(pid),
        )
        .await
    }

    pub async fn stake_pool(&self, sous_id: u32, amount: &str) -> Result<Receipt, TxError> {
        let sender = self.sender("stake_pool")?;
        let pool = self.pool(sous_id)?;
        let amount = parse_amount(amount, pool.staking_token_decimals)?;
        self.submit(
            "stake_pool",
            sender,
            pool.contract,
            WriteCall::SousDeposit { amount },
            Refetch::Pool(sous_id),
        )
        .await
    }

    pub async fn unstake_pool(&self, sous_id: u32, amount: &str) -> Result<Receipt, TxError> {
        let sender = self.sender("unstake_pool")?;
        let pool = self.pool(sous_id)?;
        let amount = parse_amount(amount, pool.staking_token_decimals)?;
        self.submit(
            "unstake_pool",
            sender,
            pool.contract,
            WriteCall::SousWithdraw { amount },
            Refetch::Pool(sous_id),
        )
        .await
    }

    /// Deposit into a vault ("cluster"). Resets its time lock on chain.
    pub async fn stake_vault(&self, id: u32, amount: &str) -> Result<Receipt, TxError> {
        let sender = self.sender("stake_vault")?;
        let vault = self.vault(id)?;
        let amount = parse_amount(amount, vault.token_decimals)?;
        self.submit(
            "stake_vault",
            sender,
            vault.contract,
            WriteCall::VaultDeposit { amount },
            Refetch::Vault(id),
        )
        .await
    }

    /// Redeem every share of the vault.
    pub async fn withdraw_all_vault(&self, id: u32) -> Result<Receipt, TxError> {
        let sender = self.sender("withdraw_all_vault")?;
        let vault = self.vault(id)?;
        self.submit(
            "withdraw_all_vault",
            sender,
            vault.contract,
            WriteCall::VaultWithdrawAll,
            Refetch::Vault(id),
        )
        .await
    }

    /// Mint `amount` index units, paid in the base token.
    pub async fn mint_index(&self, id: u32, amount: &str) -> Result<Receipt, TxError> {
        let sender = self.sender("mint_index")?;
        let index = self.index(id)?;
        let amount = parse_amount(amount, DEFAULT_DECIMALS)?;
        self.submit(
            "mint_index",
            sender,
            index.contract,
            WriteCall::IndexMint { amount },
            Refetch::Index(id),
        )
        .await
    }

    pub async fn burn_index(&self, id: u32, amount: &str) -> Result<Receipt, TxError> {
        let sender = self.sender("burn_index")?;
        let index = self.index(id)?;
        let amount = parse_amount(amount, DEFAULT_DECIMALS)?;
        self.submit(
            "burn_index",
            sender,
            index.contract,
            WriteCall::IndexBurn { amount },
            Refetch::Index(id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::harness;
    use super::*;
    use crate::app::testing::{addr, amt, farm, index, pool, vault, wei};
    use crate::core::calls::ReadCall;
    use alloy_primitives::U256;

    #[tokio::test]
    async fn test_no_account_never_writes() {
        let h = harness();
        assert_eq!(h.orchestrator.stake_farm(1, "1").await, Err(TxError::NotConnected));
        assert_eq!(h.orchestrator.unstake_pool(1, "1").await, Err(TxError::NotConnected));
        assert_eq!(h.orchestrator.withdraw_all_vault(1).await, Err(TxError::NotConnected));
        assert_eq!(h.orchestrator.mint_index(1, "bogus").await, Err(TxError::NotConnected));
        assert!(h.chain.writes().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_amount_never_writes() {
        let h = harness();
        h.wallet.connect(addr(0xa1));
        assert!(matches!(
            h.orchestrator.stake_pool(1, "0").await,
            Err(TxError::InvalidAmount(_))
        ));
        assert!(matches!(
            h.orchestrator.burn_index(1, "").await,
            Err(TxError::InvalidAmount(_))
        ));
        assert!(h.chain.writes().is_empty());
    }

    #[tokio::test]
    async fn test_stake_calls() {
        let h = harness();
        h.wallet.connect(addr(0xa1));

        h.orchestrator.stake_farm(1, "2.5").await.unwrap();
        h.orchestrator.unstake_farm(1, "1").await.unwrap();
        h.orchestrator.stake_pool(1, "3").await.unwrap();
        h.orchestrator.stake_vault(1, "4").await.unwrap();
        h.orchestrator.withdraw_all_vault(1).await.unwrap();
        h.orchestrator.mint_index(1, "0.5").await.unwrap();

        let calls: Vec<_> = h.chain.writes().into_iter().map(|w| (w.contract, w.call)).collect();
        assert_eq!(
            calls,
            vec![
                (farm(1).chef, WriteCall::ChefDeposit { pid: 1, amount: wei("2.5") }),
                (farm(1).chef, WriteCall::ChefWithdraw { pid: 1, amount: wei("1") }),
                (pool(1).contract, WriteCall::SousDeposit { amount: wei("3") }),
                (vault(1).contract, WriteCall::VaultDeposit { amount: wei("4") }),
                (vault(1).contract, WriteCall::VaultWithdrawAll),
                (index(1, 2).contract, WriteCall::IndexMint { amount: wei("0.5") }),
            ]
        );
    }

    #[tokio::test]
    async fn test_token_decimals_scale_amount() {
        let h = harness();
        h.wallet.connect(addr(0xa1));
        let mut six_decimals = pool(2);
        six_decimals.staking_token_decimals = 6;
        h.store.seed::<crate::app::kinds::Pools>(vec![six_decimals]);

        h.orchestrator.unstake_pool(2, "1.25").await.unwrap();
        assert_eq!(
            h.chain.writes()[0].call,
            WriteCall::SousWithdraw { amount: U256::from(1_250_000u64) }
        );
    }

    #[tokio::test]
    async fn test_successful_stake_refetches_farm() {
        let h = harness();
        let account = addr(0xa1);
        h.wallet.connect(account);
        h.store.set_account(Some(account));
        let f = farm(1);
        h.chain.set(
            f.chef,
            ReadCall::ChefUserInfo { pid: 1, user: account },
            crate::core::calls::RawValue::StakeInfo {
                amount: wei("2.5"),
                reward_debt: U256::ZERO,
                next_harvest_until: U256::ZERO,
            },
        );

        h.orchestrator.stake_farm(1, "2.5").await.unwrap();
        assert_eq!(
            h.store.read(|s| s.farms[0].user.as_ref().map(|u| u.staked_balance.clone())),
            Some(amt("2.5"))
        );
    }

    #[tokio::test]
    async fn test_failed_burn_leaves_store_unchanged() {
        let h = harness();
        let account = addr(0xa1);
        h.wallet.connect(account);
        h.store.set_account(Some(account));
        h.chain.fail_writes(TxError::Reverted("burn amount exceeds balance".into()));
        let before = h.store.snapshot();

        assert!(matches!(
            h.orchestrator.burn_index(1, "1").await,
            Err(TxError::Reverted(_))
        ));
        assert_eq!(h.store.snapshot(), before);
    }
}
