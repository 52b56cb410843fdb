//! # Sync Events
//!
//! Notifications sent from background tasks to whoever drives the session (the headless
//! runner logs them; a UI would repaint on them).

use alloy_primitives::Address;

/// Capacity of the session event channel. Events are dropped, not awaited, when it is full.
pub const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    PublicDataMerged { family: &'static str, count: usize },
    UserDataMerged { family: &'static str, account: Address },
    /// A user-data fetch resolved after the account changed and was thrown away.
    UserDataDiscarded { family: &'static str, account: Address },
    AccountChanged(Option<Address>),
    TxSettled { action: &'static str, success: bool },
}
