//! # Store
//!
//! The single mutable shared resource of a session. All writes go through the merge actions
//! below; readers take short read locks (see [`Store::read`]) or subscribe to the revision
//! counter to recompute projections.
//!
//! ## Account switching
//!
//! The store owns the account its `userData` belongs to. [`Store::set_account`] clears every
//! entity's `userData` and bumps an epoch under the same write lock that
//! [`Store::merge_user_data`] takes, and a merge is only applied if it carries the current
//! epoch. A fetch for account A that resolves after the switch to B is therefore discarded, no
//! matter how the network interleaves.

use crate::app::kinds::EntityKind;
use crate::app::state::{Entity, Pricing, StoreState};
use alloy_primitives::Address;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Proof of which account (and which connection of it) a user-data fetch was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserTicket {
    pub account: Address,
    pub epoch: u64,
}

struct StoreInner {
    state: RwLock<StoreState>,
    revision: watch::Sender<u64>,
    account: watch::Sender<Option<Address>>,
}

/// Cheap to clone handle to the shared store.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    pub fn new(pricing: Pricing) -> Self {
        let state = StoreState {
            pricing,
            ..StoreState::default()
        };
        let (revision, _) = watch::channel(0);
        let (account, _) = watch::channel(None);
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(state),
                revision,
                account,
            }),
        }
    }

    /// Register descriptors without data. Keys already present are left alone.
    pub fn seed<K: EntityKind>(&self, descriptors: Vec<K::Descriptor>) {
        {
            let mut state = self.inner.state.write();
            let table = K::table_mut(&mut state);
            for descriptor in descriptors {
                let key = K::merge_key(&descriptor);
                if !table.iter().any(|e| e.key() == key) {
                    table.push(Entity::new(descriptor));
                }
            }
        }
        self.bump();
    }

    /// Run `f` against the current state under a read lock.
    ///
    /// Keep `f` short and never await inside it.
    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.inner.state.read())
    }

    pub fn snapshot(&self) -> StoreState {
        self.read(StoreState::clone)
    }

    /// Replace public data of matching entities, append new ones, leave the rest untouched.
    pub fn merge_public_data<K: EntityKind>(&self, entities: Vec<(K::Descriptor, K::Public)>) -> usize {
        let count = entities.len();
        apply_public::<K>(&mut self.inner.state.write(), entities);
        debug!(family = K::NAME, count, "Public data merged");
        self.bump();
        count
    }

    /// Reset generation a public-data fetch was started under.
    pub fn generation(&self) -> u64 {
        self.read(|s| s.generation)
    }

    /// [`merge_public_data`](Self::merge_public_data) for a fetch started under `generation`.
    ///
    /// Returns `None` (and changes nothing) when the store was reset since, so a fetch that
    /// outlives a reset cannot bring wiped entities back.
    pub fn merge_fetched_public<K: EntityKind>(
        &self,
        generation: u64,
        entities: Vec<(K::Descriptor, K::Public)>,
    ) -> Option<usize> {
        let count = entities.len();
        {
            let mut state = self.inner.state.write();
            if state.generation != generation {
                return None;
            }
            apply_public::<K>(&mut state, entities);
        }
        debug!(family = K::NAME, count, "Public data merged");
        self.bump();
        Some(count)
    }

    /// Ticket for a user-data fetch, or `None` when no account is set.
    pub fn user_ticket(&self) -> Option<UserTicket> {
        self.read(|s| {
            s.account.map(|account| UserTicket {
                account,
                epoch: s.account_epoch,
            })
        })
    }

    /// Merge `userData` fetched under `ticket`.
    ///
    /// Returns `false` (and changes nothing) when the account changed since the ticket was
    /// issued. Keys without a tracked entity are ignored.
    pub fn merge_user_data<K: EntityKind>(
        &self,
        ticket: UserTicket,
        entities: Vec<(K::Key, K::User)>,
    ) -> bool {
        {
            let mut state = self.inner.state.write();
            if state.account != Some(ticket.account) || state.account_epoch != ticket.epoch {
                return false;
            }
            let table = K::table_mut(&mut state);
            for (key, user) in entities {
                if let Some(entity) = table.iter_mut().find(|e| e.key() == key) {
                    entity.user = Some(user);
                }
            }
        }
        self.bump();
        true
    }

    /// Switch the active account. Any change clears all `userData` before anything for the
    /// new account can land.
    pub fn set_account(&self, account: Option<Address>) -> bool {
        let changed = {
            let mut state = self.inner.state.write();
            if state.account == account {
                false
            } else {
                state.clear_user_data();
                state.account = account;
                state.account_epoch += 1;
                true
            }
        };
        if changed {
            self.inner.account.send_replace(account);
            self.bump();
        }
        changed
    }

    pub fn account(&self) -> Option<Address> {
        self.read(|s| s.account)
    }

    /// Drop every entity and the account.
    pub fn reset(&self) {
        {
            let mut state = self.inner.state.write();
            let pricing = state.pricing.clone();
            let epoch = state.account_epoch + 1;
            let generation = state.generation + 1;
            *state = StoreState {
                pricing,
                account_epoch: epoch,
                generation,
                ..StoreState::default()
            };
        }
        self.inner.account.send_replace(None);
        self.bump();
    }

    /// Revision counter, bumped after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Account changes as seen by the store (already cleared when observed).
    pub fn subscribe_account(&self) -> watch::Receiver<Option<Address>> {
        self.inner.account.subscribe()
    }

    fn bump(&self) {
        self.inner.revision.send_modify(|r| *r = r.wrapping_add(1));
    }
}

fn apply_public<K: EntityKind>(state: &mut StoreState, entities: Vec<(K::Descriptor, K::Public)>) {
    let table = K::table_mut(state);
    let positions: HashMap<K::Key, usize> =
        table.iter().enumerate().map(|(i, e)| (e.key(), i)).collect();

    for (descriptor, public) in entities {
        match positions.get(&K::merge_key(&descriptor)) {
            Some(&i) => {
                table[i].descriptor = descriptor;
                table[i].public = Some(public);
            }
            None => {
                let mut entity = Entity::new(descriptor);
                entity.public = Some(public);
                table.push(entity);
            }
        }
    }
}
