//! Follows wallet account changes for as long as the subscription lives.

use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::events::SessionEvent;
use crate::session::WalletSession;
use crate::wallet::WalletProvider;

/// Live account listener. Dropping it stops the listener task.
#[derive(Debug)]
pub struct AccountSubscription {
    task: JoinHandle<()>,
}

impl AccountSubscription {
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for AccountSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Subscribe to the provider's account stream and apply every change to the
/// session. When `events` is given, each change is also forwarded there.
///
/// Must be called from within a tokio runtime.
pub fn watch_accounts(
    provider: &dyn WalletProvider,
    session: Arc<Mutex<WalletSession>>,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
) -> AccountSubscription {
    let mut rx = provider.subscribe_accounts();

    let task = tokio::spawn(async move {
        loop {
            let accounts = match rx.recv().await {
                Ok(accounts) => accounts,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "account watcher lagged behind wallet events");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("wallet account stream closed");
                    break;
                }
            };

            let applied = match session.lock() {
                Ok(mut guard) => guard.apply_accounts(&accounts),
                Err(_) => {
                    error!("session lock poisoned, stopping account watcher");
                    break;
                }
            };

            match applied {
                Ok(active) => {
                    info!(account = ?active.as_ref().map(|a| a.short()), "wallet account changed");
                    if let Some(tx) = &events {
                        let _ = tx.send(SessionEvent::AccountChanged(active));
                    }
                }
                Err(e) => error!(error = %e, "failed to persist wallet account"),
            }
        }
    });

    AccountSubscription { task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;
    use crate::wallet::memory::MemoryWallet;
    use hostel_shared::Address;

    const ALICE: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";

    fn session(dir: &tempfile::TempDir) -> Arc<Mutex<WalletSession>> {
        let storage = LocalStorage::open(dir.path().join("storage.json")).unwrap();
        Arc::new(Mutex::new(WalletSession::load(storage).unwrap()))
    }

    #[tokio::test]
    async fn test_account_switch_updates_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(&dir);
        session
            .lock()
            .unwrap()
            .set_account(Address::parse(ALICE).unwrap())
            .unwrap();

        let wallet = MemoryWallet::new(&[ALICE]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _sub = watch_accounts(&wallet, session.clone(), Some(tx));

        wallet.emit_accounts(&[BOB]);
        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            SessionEvent::AccountChanged(Some(Address::parse(BOB).unwrap()))
        );
        assert!(session.lock().unwrap().account().unwrap().matches(BOB));

        wallet.emit_accounts(&[]);
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::AccountChanged(None));
        assert!(!session.lock().unwrap().is_connected());
    }

    #[tokio::test]
    async fn test_dropping_subscription_stops_listener() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(&dir);
        let wallet = MemoryWallet::new(&[]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let sub = watch_accounts(&wallet, session.clone(), Some(tx));
        assert!(sub.is_active());
        drop(sub);
        tokio::task::yield_now().await;

        wallet.emit_accounts(&[ALICE]);
        // the aborted task dropped its sender, so the channel closes empty
        assert_eq!(rx.recv().await, None);
        assert!(!session.lock().unwrap().is_connected());
    }
}
