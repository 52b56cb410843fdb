//! # Derived Read Hooks
//!
//! Background loops that re-run the fetch tasks on refresh ticks and account changes, plus
//! [`derive`], which turns a pure projection of the store into a watchable value.
//!
//! Hooks never keep fetched data of their own. Everything goes through the store's merge
//! actions, and what a consumer observes is always a projection of the store.
//!
//! Every loop is owned by a [`Subscription`]. Dropping it aborts the loop together with any
//! fetch still in flight, so nothing resolves into the store after unmount.

pub mod projections;

pub use projections::{cluster_position, index_card, vault_approved, ClusterPosition, IndexCard};

use crate::app::kinds::EntityKind;
use crate::app::state::StoreState;
use crate::app::store::Store;
use crate::app::tasks::{fetch_public, fetch_user, fetch_user_entity, SyncContext};
use crate::debug::spawn_tracked;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info_span, Instrument};

/// Handle to a running hook. The loop stops when this is dropped.
#[must_use = "dropping a Subscription stops the loop immediately"]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Fetch public data of every `K` now and again on each slow tick.
pub fn refresh_public<K: EntityKind>(ctx: SyncContext, mut slow: watch::Receiver<u64>) -> Subscription {
    let span = info_span!("refresh_public", family = K::NAME);
    let handle = spawn_tracked(
        "refresh_public",
        async move {
            loop {
                slow.borrow_and_update();
                fetch_public::<K>(&ctx).await;
                if slow.changed().await.is_err() {
                    debug!("Slow clock stopped");
                    break;
                }
            }
        }
        .instrument(span),
    );
    Subscription::new(handle)
}

/// Fetch the current account's data for every `K` now, on each fast tick and whenever the
/// account changes.
pub fn refresh_user<K: EntityKind>(ctx: SyncContext, mut fast: watch::Receiver<u64>) -> Subscription {
    let span = info_span!("refresh_user", family = K::NAME);
    let mut account = ctx.store.subscribe_account();
    let handle = spawn_tracked(
        "refresh_user",
        async move {
            loop {
                fast.borrow_and_update();
                account.borrow_and_update();
                fetch_user::<K>(&ctx).await;
                tokio::select! {
                    tick = fast.changed() => if tick.is_err() { break },
                    change = account.changed() => if change.is_err() { break },
                }
            }
        }
        .instrument(span),
    );
    Subscription::new(handle)
}

/// Refresh one entity's user data, following whichever key `key` currently names.
///
/// Reruns on fast ticks, on account change and when the key itself changes.
pub fn refresh_entity<K: EntityKind>(
    ctx: SyncContext,
    mut key: watch::Receiver<K::Key>,
    mut fast: watch::Receiver<u64>,
) -> Subscription {
    let span = info_span!("refresh_entity", family = K::NAME);
    let mut account = ctx.store.subscribe_account();
    let handle = spawn_tracked(
        "refresh_entity",
        async move {
            loop {
                fast.borrow_and_update();
                account.borrow_and_update();
                let current = *key.borrow_and_update();
                fetch_user_entity::<K>(&ctx, current).await;
                tokio::select! {
                    tick = fast.changed() => if tick.is_err() { break },
                    change = account.changed() => if change.is_err() { break },
                    change = key.changed() => if change.is_err() { break },
                }
            }
        }
        .instrument(span),
    );
    Subscription::new(handle)
}

/// Recompute `projection` after every store mutation and publish it when it changed.
pub fn derive<T, F>(store: &Store, projection: F) -> (watch::Receiver<T>, Subscription)
where
    T: Clone + PartialEq + Send + Sync + 'static,
    F: Fn(&StoreState) -> T + Send + Sync + 'static,
{
    let (tx, rx) = watch::channel(store.read(&projection));
    let mut revisions = store.subscribe();
    revisions.borrow_and_update();
    let store = store.clone();

    let handle = spawn_tracked("derive", async move {
        while revisions.changed().await.is_ok() {
            if tx.is_closed() {
                break;
            }
            let next = store.read(&projection);
            tx.send_if_modified(|current| {
                if *current == next {
                    false
                } else {
                    *current = next;
                    true
                }
            });
        }
    });
    (rx, Subscription::new(handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::{SyncEvent, EVENT_CAPACITY};
    use crate::app::kinds::Vaults;
    use crate::app::state::{Pricing, VaultUser};
    use crate::app::testing::{addr, amt, vault, wei, MockChain};
    use crate::core::calls::ReadCall;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn context(chain: Arc<MockChain>) -> SyncContext {
        let (events, _rx) = async_channel::bounded::<SyncEvent>(EVENT_CAPACITY);
        SyncContext {
            client: chain,
            store: Store::new(Pricing::default()),
            events,
        }
    }

    /// Wait until `pred` holds for the store, failing after a (virtual) minute.
    async fn wait_until(store: &Store, pred: impl Fn(&StoreState) -> bool) {
        let mut revisions = store.subscribe();
        let result = timeout(Duration::from_secs(60), async {
            while !store.read(&pred) {
                if revisions.changed().await.is_err() {
                    break;
                }
            }
        })
        .await;
        assert!(result.is_ok(), "store never reached the expected state");
    }

    fn share_price(s: &StoreState) -> Option<String> {
        s.vaults[0].public.as_ref().map(|p| p.share_price.to_string())
    }

    fn token_balance(s: &StoreState) -> Option<String> {
        s.vaults[0].user.as_ref().map(|u| u.token_balance.to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_public_on_mount_and_tick() {
        let chain = Arc::new(MockChain::new());
        let ctx = context(chain.clone());
        let v = vault(1);
        ctx.store.seed::<Vaults>(vec![v.clone()]);
        chain.set_uint(v.contract, ReadCall::PricePerFullShare, wei("1"));

        let (slow_tx, slow_rx) = watch::channel(0u64);
        let _sub = refresh_public::<Vaults>(ctx.clone(), slow_rx);
        wait_until(&ctx.store, |s| share_price(s).as_deref() == Some("1")).await;

        chain.set_uint(v.contract, ReadCall::PricePerFullShare, wei("1.2"));
        slow_tx.send_modify(|n| *n += 1);
        wait_until(&ctx.store, |s| share_price(s).as_deref() == Some("1.2")).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_discards_in_flight_read() {
        let chain = Arc::new(MockChain::new());
        let ctx = context(chain.clone());
        let v = vault(1);
        ctx.store.seed::<Vaults>(vec![v.clone()]);
        chain.set_uint(v.contract, ReadCall::PricePerFullShare, wei("1"));
        let gate = chain.hold(v.contract, ReadCall::PricePerFullShare);

        let (_slow_tx, slow_rx) = watch::channel(0u64);
        let sub = refresh_public::<Vaults>(ctx.clone(), slow_rx);
        while chain.read_count() < 1 {
            tokio::task::yield_now().await;
        }
        drop(sub);
        gate.notify_one();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(ctx.store.read(|s| s.vaults[0].public.is_none()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_user_follows_account() {
        let chain = Arc::new(MockChain::new());
        let ctx = context(chain.clone());
        let v = vault(1);
        ctx.store.seed::<Vaults>(vec![v.clone()]);
        let (a, b) = (addr(0xa1), addr(0xb2));
        chain.set_uint(v.token, ReadCall::BalanceOf { owner: a }, wei("1"));
        chain.set_uint(v.token, ReadCall::BalanceOf { owner: b }, wei("2"));

        let (_fast_tx, fast_rx) = watch::channel(0u64);
        let _sub = refresh_user::<Vaults>(ctx.clone(), fast_rx);

        ctx.store.set_account(Some(a));
        wait_until(&ctx.store, |s| token_balance(s).as_deref() == Some("1")).await;
        ctx.store.set_account(Some(b));
        wait_until(&ctx.store, |s| token_balance(s).as_deref() == Some("2")).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_entity_follows_key() {
        let chain = Arc::new(MockChain::new());
        let ctx = context(chain.clone());
        let account = addr(0xa1);
        ctx.store.seed::<Vaults>(vec![vault(1), vault(2)]);
        ctx.store.set_account(Some(account));
        chain.set_uint(vault(2).contract, ReadCall::PricePerFullShare, wei("1"));

        let (key_tx, key_rx) = watch::channel(1u32);
        let (_fast_tx, fast_rx) = watch::channel(0u64);
        let _sub = refresh_entity::<Vaults>(ctx.clone(), key_rx, fast_rx);
        wait_until(&ctx.store, |s| s.vaults[0].user.is_some()).await;
        assert!(ctx.store.read(|s| s.vaults[1].user.is_none()));

        key_tx.send_replace(2);
        wait_until(&ctx.store, |s| s.vaults[1].user.is_some()).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_derive_publishes_on_change_only() {
        let store = Store::new(Pricing::default());
        store.seed::<Vaults>(vec![vault(1)]);
        store.set_account(Some(addr(1)));
        let (mut approved, _sub) = derive(&store, vault_approved(1));
        assert!(!*approved.borrow_and_update());

        let ticket = store.user_ticket().unwrap();
        store.merge_user_data::<Vaults>(ticket, vec![(1, VaultUser::default())]);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!approved.has_changed().unwrap());

        let user = VaultUser {
            allowance: amt("0.000000000000000001"),
            ..VaultUser::default()
        };
        store.merge_user_data::<Vaults>(ticket, vec![(1, user)]);
        timeout(Duration::from_secs(1), approved.changed()).await.unwrap().unwrap();
        assert!(*approved.borrow());
    }
}
