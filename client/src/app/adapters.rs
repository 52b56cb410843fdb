//! # Presentation Adapters
//!
//! Thin glue turning store projections into what a card renders: which action is available
//! and preformatted labels. No state, no I/O.

use crate::app::hooks::{ClusterPosition, IndexCard};
use crate::core::Amount;
use crate::utils::math::is_approved;
use crate::utils::time::{format_time_period, get_time_periods, time_lock_remaining};
use alloy_primitives::Address;

/// The one action a card offers right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    /// No wallet connected.
    Unlock,
    /// Allowance is zero. Disabled while an approval request is in flight.
    Approve { disabled: bool },
    /// Approved, nothing staked yet.
    Stake,
    /// Approved with a position: add or withdraw.
    Manage,
}

pub fn card_action(
    account: Option<Address>,
    allowance: &Amount,
    staked: &Amount,
    requested_approval: bool,
) -> CardAction {
    if account.is_none() {
        CardAction::Unlock
    } else if !is_approved(allowance) {
        CardAction::Approve {
            disabled: requested_approval,
        }
    } else if staked.is_positive() {
        CardAction::Manage
    } else {
        CardAction::Stake
    }
}

/// Time past the lock end as `"3 day 4 hrs"`, `None` while the lock still runs.
pub fn time_left_label(stake_time: u64, time_lock: u64, now: u64) -> Option<String> {
    format_time_period(&get_time_periods(time_lock_remaining(stake_time, time_lock, now)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRow {
    pub name: String,
    /// Weight in percent with two decimals, e.g. `"33.33"`.
    pub percent: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCardView {
    pub name: String,
    pub supply: String,
    pub price: String,
    pub balance: String,
    pub rows: Vec<ComponentRow>,
}

impl From<&IndexCard> for IndexCardView {
    fn from(card: &IndexCard) -> Self {
        let rows = card
            .component_names
            .iter()
            .zip(&card.percentages)
            .zip(&card.component_prices)
            .map(|((name, percent), price)| ComponentRow {
                name: name.clone(),
                percent: percent.to_fixed(2),
                price: price.to_string(),
            })
            .collect();
        Self {
            name: card.name.clone(),
            supply: card.total_supply.to_string(),
            price: card.price.to_string(),
            balance: card.index_balance.to_fixed(4),
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterView {
    pub action: CardAction,
    pub staked: String,
    pub time_left: Option<String>,
}

impl ClusterView {
    pub fn new(
        position: &ClusterPosition,
        account: Option<Address>,
        requested_approval: bool,
        now: u64,
    ) -> Self {
        Self {
            action: card_action(account, &position.allowance, &position.staked_value, requested_approval),
            staked: position.staked_value.to_fixed(4),
            time_left: time_left_label(position.stake_time, position.time_lock, now),
        }
    }
}
