//! Store projections published through [`derive`](super::derive).

use crate::app::selectors::{index_by_id, index_user, index_weights, vault_by_id, vault_user};
use crate::app::state::StoreState;
use crate::core::Amount;
use crate::utils::math::is_approved;
use crate::utils::time::time_lock_remaining;

/// Everything an index ("galaxy") card shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexCard {
    pub id: u32,
    pub name: String,
    pub total_supply: Amount,
    pub price: Amount,
    pub allowance: Amount,
    pub index_balance: Amount,
    pub base_token_balance: Amount,
    /// Component names in configuration order, aligned with the price and weight vectors.
    pub component_names: Vec<String>,
    pub component_prices: Vec<Amount>,
    pub percentages: Vec<Amount>,
    pub total_component_price: Amount,
}

pub fn index_card(id: u32) -> impl Fn(&StoreState) -> Option<IndexCard> + Send + Sync + 'static {
    move |state| {
        let index = index_by_id(state, id)?;
        let user = index_user(state, id);
        let public = index.public.clone().unwrap_or_default();
        let mut component_prices = public.component_prices;
        component_prices.resize(index.descriptor.components.len(), Amount::zero());
        Some(IndexCard {
            id,
            name: index.descriptor.name.clone(),
            total_supply: public.total_supply,
            price: public.price,
            allowance: user.allowance,
            index_balance: user.index_balance,
            base_token_balance: user.base_token_balance,
            component_names: index.descriptor.components.iter().map(|c| c.name.clone()).collect(),
            component_prices,
            percentages: index_weights(state, id),
            total_component_price: public.total_component_price,
        })
    }
}

/// The connected account's position in a vault ("cluster").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterPosition {
    pub id: u32,
    pub allowance: Amount,
    pub approved: bool,
    pub token_balance: Amount,
    pub shares: Amount,
    pub staked_value: Amount,
    /// Last deposit or withdrawal, unix seconds.
    pub stake_time: u64,
    pub time_lock: u64,
}

impl ClusterPosition {
    pub fn time_left(&self, now: u64) -> u64 {
        time_lock_remaining(self.stake_time, self.time_lock, now)
    }
}

pub fn cluster_position(id: u32) -> impl Fn(&StoreState) -> Option<ClusterPosition> + Send + Sync + 'static {
    move |state| {
        let vault = vault_by_id(state, id)?;
        let user = vault_user(state, id);
        Some(ClusterPosition {
            id,
            approved: is_approved(&user.allowance),
            allowance: user.allowance,
            token_balance: user.token_balance,
            shares: user.shares,
            staked_value: user.staked_value,
            stake_time: user.last_user_action_time,
            time_lock: vault.descriptor.time_lock,
        })
    }
}

/// `allowance > 0` for the vault, false while unknown.
pub fn vault_approved(id: u32) -> impl Fn(&StoreState) -> bool + Send + Sync + 'static {
    move |state| is_approved(&vault_user(state, id).allowance)
}
