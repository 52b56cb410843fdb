//! Scripted in-memory chain and fixtures for tests.

use crate::app::state::{FarmDescriptor, IndexComponent, IndexDescriptor, PoolDescriptor, VaultDescriptor};
use crate::core::calls::{RawValue, ReadCall, Receipt, TxRequest};
use crate::core::error::{ReadError, TxError};
use crate::core::service::ContractClient;
use crate::core::Amount;
use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::QuoteToken;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

type ReadKey = (Address, ReadCall);

/// [`ContractClient`] answering reads from a table.
///
/// Reads with no scripted answer revert. A held read parks until its `Notify` fires and then
/// answers with whatever the table holds at that moment.
#[derive(Default)]
pub struct MockChain {
    reads: Mutex<HashMap<ReadKey, Result<RawValue, ReadError>>>,
    holds: Mutex<HashMap<ReadKey, Arc<Notify>>>,
    write_holds: Mutex<HashMap<Address, Arc<Notify>>>,
    writes: Mutex<Vec<TxRequest>>,
    write_failure: Mutex<Option<TxError>>,
    read_count: AtomicUsize,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, contract: Address, call: ReadCall, value: RawValue) {
        self.reads.lock().insert((contract, call), Ok(value));
    }

    pub fn set_uint(&self, contract: Address, call: ReadCall, value: U256) {
        self.set(contract, call, RawValue::Uint(value));
    }

    pub fn fail(&self, contract: Address, call: ReadCall, err: ReadError) {
        self.reads.lock().insert((contract, call), Err(err));
    }

    /// Park this read until the returned handle is notified.
    pub fn hold(&self, contract: Address, call: ReadCall) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.holds.lock().insert((contract, call), notify.clone());
        notify
    }

    /// Park the next write to `contract` (after it is recorded) until notified.
    pub fn hold_write(&self, contract: Address) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.write_holds.lock().insert(contract, notify.clone());
        notify
    }

    pub fn fail_writes(&self, err: TxError) {
        *self.write_failure.lock() = Some(err);
    }

    pub fn writes(&self) -> Vec<TxRequest> {
        self.writes.lock().clone()
    }

    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContractClient for MockChain {
    async fn read(&self, contract: Address, call: ReadCall) -> Result<RawValue, ReadError> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        let key = (contract, call);
        let hold = self.holds.lock().remove(&key);
        if let Some(notify) = hold {
            notify.notified().await;
        }
        self.reads
            .lock()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(ReadError::Reverted(format!("{} not scripted", key.1.method()))))
    }

    async fn write(&self, request: TxRequest) -> Result<Receipt, TxError> {
        let contract = request.contract;
        self.writes.lock().push(request);
        let hold = self.write_holds.lock().remove(&contract);
        if let Some(notify) = hold {
            notify.notified().await;
        }
        if let Some(err) = self.write_failure.lock().clone() {
            return Err(err);
        }
        let n = self.writes.lock().len() as u64;
        Ok(Receipt {
            tx_hash: B256::with_last_byte(n as u8),
            block_number: Some(n),
        })
    }
}

pub fn addr(n: u8) -> Address {
    Address::with_last_byte(n)
}

pub fn amt(s: &str) -> Amount {
    s.parse().unwrap()
}

/// 18-decimal raw integer for a decimal string.
pub fn wei(s: &str) -> U256 {
    amt(s).to_raw(18).unwrap()
}

pub fn chef() -> Address {
    addr(0xc0)
}

pub fn farm(pid: u32) -> FarmDescriptor {
    let base = (pid as u8).wrapping_mul(4);
    FarmDescriptor {
        pid,
        lp_symbol: format!("LP-{}", pid),
        token_symbol: format!("TKN{}", pid),
        quote_token: QuoteToken::Busd,
        lp_address: addr(base.wrapping_add(0x10)),
        token_address: addr(base.wrapping_add(0x11)),
        quote_token_address: addr(base.wrapping_add(0x12)),
        token_decimals: 18,
        quote_token_decimals: 18,
        is_token_only: false,
        deposit_fee_bp: 0,
        chef: chef(),
    }
}

pub fn pool(sous_id: u32) -> PoolDescriptor {
    PoolDescriptor {
        sous_id,
        token_name: "REWARD".into(),
        staking_token_name: "CAKE".into(),
        staking_token: addr(0x60),
        staking_token_decimals: 18,
        contract: addr(0x70u8.wrapping_add(sous_id as u8)),
    }
}

pub fn index(id: u32, components: usize) -> IndexDescriptor {
    IndexDescriptor {
        id,
        name: format!("Galaxy {}", id),
        image: None,
        creator: None,
        components: (0..components)
            .map(|i| IndexComponent {
                name: format!("C{}", i),
                address: addr(0x90u8.wrapping_add(i as u8)),
            })
            .collect(),
        contract: addr(0x80u8.wrapping_add(id as u8)),
        base_token: addr(0x7f),
    }
}

pub fn vault(id: u32) -> VaultDescriptor {
    VaultDescriptor {
        id,
        name: format!("Cluster {}", id),
        token_symbol: "CAKE".into(),
        token: addr(0x60),
        token_decimals: 18,
        contract: addr(0xa0u8.wrapping_add(id as u8)),
        time_lock: 72 * 3600,
        deposit_fee_bp: 0,
    }
}
