//! # Sync Session
//!
//! A [`Session`] is everything that lives between wallet connection and teardown: the store,
//! the refresh clock, the background refreshers and the transaction orchestrator. It is built
//! from injected collaborators (a [`ContractClient`] and a [`Wallet`]) and passed around as
//! explicit context; nothing here is global.
//!
//! ```text
//! RefreshClock ──slow──▶ refresh_public::<K> ──┐
//!              ──fast──▶ refresh_user::<K>  ───┤  fetch via ContractClient
//! Wallet ──account──▶ account sync ─▶ Store::set_account
//!                                              ▼
//!                                    Store::merge_*  ──revision──▶ derive(projection)
//!                                              ▲
//! TxOrchestrator ── write ── on success ── fetch_user_entity::<K>
//! ```
//!
//! ## Key Components
//!
//! - **[`store`]**: the single mutable shared resource and its merge actions
//! - **[`selectors`]**: pure projections (prices, TVL, per-entity lookups)
//! - **[`kinds`]**: the refresh-and-merge capability for farms, pools, indexes and vaults
//! - **[`tasks`]**: async fetch-and-merge dispatch
//! - **[`hooks`]**: tick-driven refreshers and watchable projections
//! - **[`handlers`]**: transaction orchestrators
//! - **[`adapters`]**: card actions and labels

pub mod adapters;
pub mod clock;
pub mod events;
pub mod handlers;
pub mod hooks;
pub mod kinds;
pub mod selectors;
pub mod state;
pub mod store;
pub mod tasks;

#[cfg(test)]
pub(crate) mod testing;

pub use clock::RefreshClock;
pub use events::SyncEvent;
pub use handlers::{BusyFlag, TxOrchestrator, TxStatus};
pub use hooks::Subscription;
pub use store::Store;
pub use tasks::SyncContext;

use crate::config::ResolvedDeployment;
use crate::core::error::ConfigError;
use crate::core::service::{ContractClient, Wallet};
use crate::debug::spawn_tracked;
use alloy_primitives::Address;
use events::EVENT_CAPACITY;
use kinds::{EntityKind, Farms, Indexes, Pools, Vaults};
use state::StoreState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

pub struct Session {
    ctx: SyncContext,
    events: async_channel::Receiver<SyncEvent>,
    clock: RefreshClock,
    orchestrator: TxOrchestrator,
    subscriptions: Vec<Subscription>,
}

impl Session {
    /// Seed the store, start the clock and spawn the refreshers for every family.
    pub fn start(
        client: Arc<dyn ContractClient>,
        wallet: Arc<dyn Wallet>,
        deployment: ResolvedDeployment,
        fast: Duration,
        slow: Duration,
    ) -> Result<Self, ConfigError> {
        let clock = RefreshClock::start(fast, slow)?;

        let store = Store::new(deployment.pricing);
        store.seed::<Farms>(deployment.farms);
        store.seed::<Pools>(deployment.pools);
        store.seed::<Indexes>(deployment.indexes);
        store.seed::<Vaults>(deployment.vaults);
        store.set_account(wallet.account());

        let (events_tx, events) = async_channel::bounded(EVENT_CAPACITY);
        let ctx = SyncContext {
            client,
            store,
            events: events_tx,
        };

        let mut subscriptions = vec![sync_account(ctx.clone(), wallet.subscribe())];
        spawn_family::<Farms>(&ctx, &clock, &mut subscriptions);
        spawn_family::<Pools>(&ctx, &clock, &mut subscriptions);
        spawn_family::<Indexes>(&ctx, &clock, &mut subscriptions);
        spawn_family::<Vaults>(&ctx, &clock, &mut subscriptions);

        info!(
            chain_id = deployment.chain_id,
            refreshers = subscriptions.len(),
            "Sync session started"
        );

        Ok(Self {
            orchestrator: TxOrchestrator::new(ctx.clone(), wallet),
            ctx,
            events,
            clock,
            subscriptions,
        })
    }

    pub fn store(&self) -> &Store {
        &self.ctx.store
    }

    pub fn context(&self) -> &SyncContext {
        &self.ctx
    }

    pub fn orchestrator(&self) -> &TxOrchestrator {
        &self.orchestrator
    }

    pub fn events(&self) -> async_channel::Receiver<SyncEvent> {
        self.events.clone()
    }

    pub fn fast_ticks(&self) -> watch::Receiver<u64> {
        self.clock.fast()
    }

    pub fn slow_ticks(&self) -> watch::Receiver<u64> {
        self.clock.slow()
    }

    /// Watch a projection of this session's store. See [`hooks::derive`].
    pub fn derive<T, F>(&self, projection: F) -> (watch::Receiver<T>, Subscription)
    where
        T: Clone + PartialEq + Send + Sync + 'static,
        F: Fn(&StoreState) -> T + Send + Sync + 'static,
    {
        hooks::derive(&self.ctx.store, projection)
    }

    /// Keep one entity's user data fresh while the returned subscription lives.
    pub fn track_entity<K: EntityKind>(&self, key: watch::Receiver<K::Key>) -> Subscription {
        hooks::refresh_entity::<K>(self.ctx.clone(), key, self.clock.fast())
    }

    /// Stop every refresher and the clock. In-flight fetches are dropped unmerged.
    pub fn shutdown(mut self) {
        self.subscriptions.clear();
        self.clock.stop();
        self.events.close();
        info!("Sync session stopped");
    }
}

fn spawn_family<K: EntityKind>(ctx: &SyncContext, clock: &RefreshClock, subs: &mut Vec<Subscription>) {
    subs.push(hooks::refresh_public::<K>(ctx.clone(), clock.slow()));
    subs.push(hooks::refresh_user::<K>(ctx.clone(), clock.fast()));
}

/// Mirror the wallet's account into the store. User data is cleared on every change.
fn sync_account(ctx: SyncContext, mut accounts: watch::Receiver<Option<Address>>) -> Subscription {
    let handle = spawn_tracked("account_sync", async move {
        loop {
            let account = *accounts.borrow_and_update();
            if ctx.store.set_account(account) {
                match account {
                    Some(a) => info!(account = %a, "Account changed, user data cleared"),
                    None => info!("Wallet disconnected, user data cleared"),
                }
                ctx.emit(SyncEvent::AccountChanged(account));
            }
            if accounts.changed().await.is_err() {
                break;
            }
        }
    });
    Subscription::new(handle)
}
