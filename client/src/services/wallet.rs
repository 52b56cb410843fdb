//! # Wallet Service
//!
//! Holds the active account of an injected wallet provider and broadcasts its changes.
//! Signing itself stays with the provider: transactions are submitted from this account and
//! the node-side signer approves or rejects them.

use crate::core::service::Wallet;
use alloy_primitives::Address;
use shared::truncate_address;
use tokio::sync::watch;
use tracing::info;

/// Wallet connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletStatus {
    Disconnected,
    Connected(Address),
}

impl WalletStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, WalletStatus::Connected(_))
    }

    pub fn address(&self) -> Option<Address> {
        match self {
            WalletStatus::Connected(addr) => Some(*addr),
            WalletStatus::Disconnected => None,
        }
    }
}

/// Concrete [`Wallet`] backed by a `watch` channel.
pub struct WalletService {
    account_tx: watch::Sender<Option<Address>>,
}

impl WalletService {
    pub fn new() -> Self {
        let (account_tx, _) = watch::channel(None);
        Self { account_tx }
    }

    /// Start with `account` already connected.
    pub fn connected(account: Address) -> Self {
        let wallet = Self::new();
        wallet.connect(account);
        wallet
    }

    /// Connect or switch to `account`.
    pub fn connect(&self, account: Address) {
        let previous = self.account_tx.send_replace(Some(account));
        if previous != Some(account) {
            info!(account = %truncate_address(&account), "Wallet connected");
        }
    }

    pub fn disconnect(&self) {
        if self.account_tx.send_replace(None).is_some() {
            info!("Wallet disconnected");
        }
    }

    pub fn status(&self) -> WalletStatus {
        match *self.account_tx.borrow() {
            Some(addr) => WalletStatus::Connected(addr),
            None => WalletStatus::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status().is_connected()
    }
}

impl Default for WalletService {
    fn default() -> Self {
        Self::new()
    }
}

impl Wallet for WalletService {
    fn account(&self) -> Option<Address> {
        *self.account_tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Address>> {
        self.account_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::addr;

    #[test]
    fn test_wallet_creation() {
        let wallet = WalletService::new();
        assert!(!wallet.is_connected());
        assert_eq!(wallet.status(), WalletStatus::Disconnected);
        assert_eq!(wallet.account(), None);
    }

    #[test]
    fn test_connect_and_disconnect() {
        let wallet = WalletService::new();
        wallet.connect(addr(7));
        assert_eq!(wallet.status(), WalletStatus::Connected(addr(7)));

        wallet.disconnect();
        assert!(!wallet.is_connected());
    }

    #[test]
    fn test_wallet_status_methods() {
        let status = WalletStatus::Connected(addr(1));
        assert!(status.is_connected());
        assert_eq!(status.address(), Some(addr(1)));

        let status = WalletStatus::Disconnected;
        assert!(!status.is_connected());
        assert_eq!(status.address(), None);
    }

    #[tokio::test]
    async fn test_subscribers_see_account_switch() {
        let wallet = WalletService::connected(addr(1));
        let mut rx = wallet.subscribe();
        assert_eq!(*rx.borrow_and_update(), Some(addr(1)));

        wallet.connect(addr(2));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Some(addr(2)));
    }
}
