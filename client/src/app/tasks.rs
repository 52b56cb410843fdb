//! # Fetch Tasks
//!
//! The store's async dispatch surface: fetch every entity of a family (public or user data)
//! through the [`ContractClient`], then hand the results to the matching merge action.

use crate::app::events::SyncEvent;
use crate::app::kinds::EntityKind;
use crate::app::store::Store;
use crate::core::service::ContractClient;
use async_channel::Sender;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// What every task, hook and orchestrator of a session shares.
#[derive(Clone)]
pub struct SyncContext {
    pub client: Arc<dyn ContractClient>,
    pub store: Store,
    pub events: Sender<SyncEvent>,
}

impl SyncContext {
    pub fn emit(&self, event: SyncEvent) {
        if let Err(e) = self.events.try_send(event) {
            debug!(error = %e, "Sync event dropped");
        }
    }
}

/// Fetch public data for every entity of `K` and merge it.
///
/// Returns how many entities were merged, zero when the store was reset mid-fetch.
#[instrument(skip(ctx), fields(family = K::NAME))]
pub async fn fetch_public<K: EntityKind>(ctx: &SyncContext) -> usize {
    let (generation, descriptors): (u64, Vec<K::Descriptor>) = ctx.store.read(|s| {
        let descriptors = K::table(s).iter().map(|e| e.descriptor.clone()).collect();
        (s.generation, descriptors)
    });
    if descriptors.is_empty() {
        return 0;
    }

    let start = Instant::now();
    let client = ctx.client.as_ref();
    let results = join_all(descriptors.into_iter().map(|descriptor| async move {
        let public = K::fetch_public(client, &descriptor).await;
        (descriptor, public)
    }))
    .await;

    let Some(count) = ctx.store.merge_fetched_public::<K>(generation, results) else {
        info!("Store was reset during fetch, public data discarded");
        return 0;
    };
    debug!(count, duration_ms = start.elapsed().as_millis(), "Public data fetched");
    ctx.emit(SyncEvent::PublicDataMerged {
        family: K::NAME,
        count,
    });
    count
}

/// Fetch the current account's user data for every entity of `K`.
///
/// Returns `true` when the result was merged, `false` when there is no account or the account
/// changed while the fetch was in flight.
#[instrument(skip(ctx), fields(family = K::NAME))]
pub async fn fetch_user<K: EntityKind>(ctx: &SyncContext) -> bool {
    let Some(ticket) = ctx.store.user_ticket() else {
        return false;
    };
    let descriptors: Vec<K::Descriptor> =
        ctx.store.read(|s| K::table(s).iter().map(|e| e.descriptor.clone()).collect());

    let client = ctx.client.as_ref();
    let results = join_all(descriptors.into_iter().map(|descriptor| async move {
        let user = K::fetch_user(client, &descriptor, ticket.account).await;
        (K::merge_key(&descriptor), user)
    }))
    .await;

    merge_user::<K>(ctx, ticket, results)
}

/// Targeted refetch of one entity's user data, used after a successful transaction.
#[instrument(skip(ctx), fields(family = K::NAME))]
pub async fn fetch_user_entity<K: EntityKind>(ctx: &SyncContext, key: K::Key) -> bool {
    let Some(ticket) = ctx.store.user_ticket() else {
        return false;
    };
    let descriptor = ctx.store.read(|s| {
        K::table(s)
            .iter()
            .find(|e| e.key() == key)
            .map(|e| e.descriptor.clone())
    });
    let Some(descriptor) = descriptor else {
        return false;
    };

    let user = K::fetch_user(ctx.client.as_ref(), &descriptor, ticket.account).await;
    merge_user::<K>(ctx, ticket, vec![(key, user)])
}

fn merge_user<K: EntityKind>(
    ctx: &SyncContext,
    ticket: crate::app::store::UserTicket,
    results: Vec<(K::Key, K::User)>,
) -> bool {
    let merged = ctx.store.merge_user_data::<K>(ticket, results);
    if merged {
        ctx.emit(SyncEvent::UserDataMerged {
            family: K::NAME,
            account: ticket.account,
        });
    } else {
        info!(account = %ticket.account, "Account changed during fetch, user data discarded");
        ctx.emit(SyncEvent::UserDataDiscarded {
            family: K::NAME,
            account: ticket.account,
        });
    }
    merged
}
