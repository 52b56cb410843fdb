//! # Transaction Orchestrators
//!
//! Approve, stake, unstake, mint and burn requests. Each operation resolves the entity from
//! the store, checks the wallet, submits exactly one transaction and, on success, refetches
//! the affected entity's user data so the store shows the new allowance or balance without
//! waiting for the next fast tick.
//!
//! Failures come back as `Err(TxError)` and leave the store untouched. The orchestrator does
//! not deduplicate concurrent calls; callers gate repeated gestures with a [`BusyFlag`].

pub mod approve;
pub mod stake;

use crate::app::events::SyncEvent;
use crate::app::kinds::{Farms, Indexes, Pools, Vaults};
use crate::app::selectors;
use crate::app::state::{FarmDescriptor, IndexDescriptor, PoolDescriptor, VaultDescriptor};
use crate::app::tasks::{fetch_user_entity, SyncContext};
use crate::core::calls::{Receipt, TxRequest, WriteCall};
use crate::core::error::TxError;
use crate::core::service::Wallet;
use alloy_primitives::Address;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(Receipt),
    Failure(TxError),
}

/// Lifecycle of this orchestrator's requests.
///
/// Each settled request publishes `Settled`, then `Idle` once nothing else is in flight, or
/// `Submitting` for the newest request still running.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TxStatus {
    #[default]
    Idle,
    Submitting { action: &'static str },
    Settled { action: &'static str, outcome: Outcome },
}

/// Whose user data to refetch after a successful transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refetch {
    Farm(u32),
    Pool(u32),
    Index(u32),
    Vault(u32),
    Nothing,
}

pub struct TxOrchestrator {
    ctx: SyncContext,
    wallet: Arc<dyn Wallet>,
    status: watch::Sender<TxStatus>,
    in_flight: Mutex<Vec<&'static str>>,
}

impl TxOrchestrator {
    pub fn new(ctx: SyncContext, wallet: Arc<dyn Wallet>) -> Self {
        let (status, _) = watch::channel(TxStatus::Idle);
        Self {
            ctx,
            wallet,
            status,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe_status(&self) -> watch::Receiver<TxStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> TxStatus {
        self.status.borrow().clone()
    }

    /// The acting account, or `NotConnected` before anything else happens.
    fn sender(&self, action: &'static str) -> Result<Address, TxError> {
        match self.wallet.account() {
            Some(account) => Ok(account),
            None => {
                warn!(action, "No account connected, transaction not attempted");
                Err(TxError::NotConnected)
            }
        }
    }

    fn farm(&self, pid: u32) -> Result<FarmDescriptor, TxError> {
        self.ctx
            .store
            .read(|s| selectors::farm_by_pid(s, pid).map(|f| f.descriptor.clone()))
            .ok_or_else(|| TxError::UnknownEntity(format!("farm pid {}", pid)))
    }

    fn pool(&self, sous_id: u32) -> Result<PoolDescriptor, TxError> {
        self.ctx
            .store
            .read(|s| selectors::pool_by_sous_id(s, sous_id).map(|p| p.descriptor.clone()))
            .ok_or_else(|| TxError::UnknownEntity(format!("pool sousId {}", sous_id)))
    }

    fn index(&self, id: u32) -> Result<IndexDescriptor, TxError> {
        self.ctx
            .store
            .read(|s| selectors::index_by_id(s, id).map(|i| i.descriptor.clone()))
            .ok_or_else(|| TxError::UnknownEntity(format!("index {}", id)))
    }

    fn vault(&self, id: u32) -> Result<VaultDescriptor, TxError> {
        self.ctx
            .store
            .read(|s| selectors::vault_by_id(s, id).map(|v| v.descriptor.clone()))
            .ok_or_else(|| TxError::UnknownEntity(format!("vault {}", id)))
    }

    /// Submit one transaction and settle it.
    async fn submit(
        &self,
        action: &'static str,
        sender: Address,
        contract: Address,
        call: WriteCall,
        refetch: Refetch,
    ) -> Result<Receipt, TxError> {
        let mut in_flight = self.begin(action);
        info!(
            action,
            sender = %sender,
            contract = %contract,
            method = call.method(),
            "Submitting transaction"
        );

        let result = self
            .ctx
            .client
            .write(TxRequest {
                contract,
                call,
                sender,
            })
            .await;

        let outcome = match &result {
            Ok(receipt) => {
                info!(
                    action,
                    tx_hash = %receipt.tx_hash,
                    block = ?receipt.block_number,
                    "Transaction confirmed"
                );
                self.refetch(sender, refetch).await;
                Outcome::Success(receipt.clone())
            }
            Err(e) => {
                warn!(action, error = %e, "Transaction failed");
                Outcome::Failure(e.clone())
            }
        };

        self.ctx.emit(SyncEvent::TxSettled {
            action,
            success: result.is_ok(),
        });
        in_flight.outcome = Some(outcome);
        drop(in_flight);
        result
    }

    fn begin(&self, action: &'static str) -> InFlight<'_> {
        let mut pending = self.in_flight.lock();
        pending.push(action);
        self.status.send_replace(TxStatus::Submitting { action });
        InFlight {
            orchestrator: self,
            action,
            outcome: None,
        }
    }

    /// Refetch `target` for `sender`, unless the store already follows another account.
    async fn refetch(&self, sender: Address, target: Refetch) {
        if self.ctx.store.account() != Some(sender) {
            debug!(
                sender = %sender,
                target = ?target,
                "Store follows another account, leaving the refetch to the account switch"
            );
            return;
        }
        let merged = match target {
            Refetch::Farm(pid) => fetch_user_entity::<Farms>(&self.ctx, pid).await,
            Refetch::Pool(sous_id) => fetch_user_entity::<Pools>(&self.ctx, sous_id).await,
            Refetch::Index(id) => fetch_user_entity::<Indexes>(&self.ctx, id).await,
            Refetch::Vault(id) => fetch_user_entity::<Vaults>(&self.ctx, id).await,
            Refetch::Nothing => return,
        };
        if !merged {
            warn!(target = ?target, "Post-transaction refetch was not merged");
        }
    }
}

/// One submitted request. Dropping it (settled or cancelled) publishes the next status.
struct InFlight<'a> {
    orchestrator: &'a TxOrchestrator,
    action: &'static str,
    outcome: Option<Outcome>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut pending = self.orchestrator.in_flight.lock();
        if let Some(i) = pending.iter().position(|a| *a == self.action) {
            pending.remove(i);
        }
        let status = &self.orchestrator.status;
        if let Some(outcome) = self.outcome.take() {
            status.send_replace(TxStatus::Settled {
                action: self.action,
                outcome,
            });
        }
        status.send_replace(match pending.last() {
            Some(&action) => TxStatus::Submitting { action },
            None => TxStatus::Idle,
        });
    }
}

/// Caller-side guard against submitting the same action twice.
///
/// Share one flag per button (or per entity and action); hold the guard for the duration of
/// the request.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another guard from this flag is alive.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(self.0.clone()))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Clears its [`BusyFlag`] when dropped.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
