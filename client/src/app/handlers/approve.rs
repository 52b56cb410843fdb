//! Approvals.
//!
//! Every approval requests the maximum allowance (`U256::MAX`) so a user approves each
//! spender once. Reads still treat any positive allowance as approved.

use super::{Refetch, TxOrchestrator};
use crate::core::calls::{Receipt, WriteCall};
use crate::core::error::TxError;
use alloy_primitives::{Address, U256};

impl TxOrchestrator {
    /// Let the chef spend the farm's staking token (LP, or the token itself for token-only farms).
    pub async fn approve_farm(&self, pid: u32) -> Result<Receipt, TxError> {
        let sender = self.sender("approve_farm")?;
        let farm = self.farm(pid)?;
        self.submit(
            "approve_farm",
            sender,
            farm.staking_token(),
            unlimited(farm.chef),
            Refetch::Farm(pid),
        )
        .await
    }

    /// Approve an arbitrary spender for `token`, refetching `refetch` on success.
    pub async fn approve_address(
        &self,
        token: Address,
        spender: Address,
        refetch: Refetch,
    ) -> Result<Receipt, TxError> {
        let sender = self.sender("approve_address")?;
        self.submit("approve_address", sender, token, unlimited(spender), refetch)
            .await
    }

    pub async fn approve_pool(&self, sous_id: u32) -> Result<Receipt, TxError> {
        let sender = self.sender("approve_pool")?;
        let pool = self.pool(sous_id)?;
        self.submit(
            "approve_pool",
            sender,
            pool.staking_token,
            unlimited(pool.contract),
            Refetch::Pool(sous_id),
        )
        .await
    }

    pub async fn approve_vault(&self, id: u32) -> Result<Receipt, TxError> {
        let sender = self.sender("approve_vault")?;
        let vault = self.vault(id)?;
        self.submit(
            "approve_vault",
            sender,
            vault.token,
            unlimited(vault.contract),
            Refetch::Vault(id),
        )
        .await
    }

    /// Let the index pull base tokens when minting.
    pub async fn approve_index(&self, id: u32) -> Result<Receipt, TxError> {
        let sender = self.sender("approve_index")?;
        let index = self.index(id)?;
        self.submit(
            "approve_index",
            sender,
            index.base_token,
            unlimited(index.contract),
            Refetch::Index(id),
        )
        .await
    }
}

fn unlimited(spender: Address) -> WriteCall {
    WriteCall::Approve {
        spender,
        amount: U256::MAX,
    }
}
