use hostel_shared::Address;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::ClientError;
use crate::events::SessionEvent;
use crate::state::AppState;
use crate::watcher::watch_accounts;

/// Ask the wallet for account access and make the first account active.
pub async fn connect_wallet(state: &AppState) -> Result<Address, ClientError> {
    let wallet = state.wallet.as_ref().ok_or(ClientError::NoWalletProvider)?;

    let accounts = wallet.request_accounts().await.map_err(|e| {
        warn!(error = %e, "wallet connection failed");
        ClientError::from(e)
    })?;

    let mut guard = state.session.lock().map_err(|_| ClientError::LockPoisoned)?;
    let account = guard
        .apply_accounts(&accounts)?
        .ok_or(ClientError::NotConnected)?;

    info!(account = %account.short(), "wallet connected");
    Ok(account)
}

pub fn disconnect_wallet(state: &AppState) -> Result<(), ClientError> {
    state
        .session
        .lock()
        .map_err(|_| ClientError::LockPoisoned)?
        .clear()?;
    info!("wallet disconnected");
    Ok(())
}

/// Startup restore: the persisted account is already loaded; an account the
/// wallet reports without prompting takes precedence over it.
pub async fn restore_wallet(state: &AppState) -> Result<Option<Address>, ClientError> {
    if let Some(wallet) = &state.wallet {
        match wallet.accounts().await {
            Ok(accounts) if !accounts.is_empty() => {
                let mut guard = state.session.lock().map_err(|_| ClientError::LockPoisoned)?;
                guard.apply_accounts(&accounts)?;
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "could not query wallet accounts"),
        }
    }

    let account = state.account()?;
    info!(account = ?account.as_ref().map(Address::short), "wallet session restored");
    Ok(account)
}

/// Start following wallet account changes. Replaces any earlier listener.
pub fn start_account_watcher(state: &mut AppState, events: mpsc::UnboundedSender<SessionEvent>) {
    let Some(wallet) = state.wallet.clone() else {
        return;
    };
    state.subscription = Some(watch_accounts(
        wallet.as_ref(),
        state.session.clone(),
        Some(events),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use crate::testing::{ALICE, BOB};
    use crate::wallet::memory::MemoryWallet;
    use crate::wallet::WalletError;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_connect_without_provider() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir, None);
        assert!(matches!(
            connect_wallet(&state).await,
            Err(ClientError::NoWalletProvider)
        ));
    }

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir, Some(Arc::new(MemoryWallet::new(&[ALICE, BOB]))));

        let account = connect_wallet(&state).await.unwrap();
        assert!(account.matches(ALICE));
        assert!(state.require_account().unwrap().matches(ALICE));

        disconnect_wallet(&state).unwrap();
        assert!(matches!(
            state.require_account(),
            Err(ClientError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_failed_disconnect_stays_connected() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir, Some(Arc::new(MemoryWallet::new(&[ALICE]))));
        connect_wallet(&state).await.unwrap();

        std::fs::create_dir(dir.path().join("storage.json.tmp")).unwrap();
        assert!(matches!(
            disconnect_wallet(&state),
            Err(ClientError::Storage(_))
        ));
        assert!(state.require_account().unwrap().matches(ALICE));
    }

    #[tokio::test]
    async fn test_rejected_connect_leaves_session_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let wallet = Arc::new(MemoryWallet::new(&[ALICE]));
        wallet.reject_requests(true);
        let state = test_state(&dir, Some(wallet));

        assert!(matches!(
            connect_wallet(&state).await,
            Err(ClientError::Wallet(WalletError::Rejected))
        ));
        assert_eq!(state.account().unwrap(), None);
    }

    #[tokio::test]
    async fn test_restore_prefers_wallet_account() {
        let dir = tempfile::tempdir().unwrap();
        {
            let state = test_state(&dir, Some(Arc::new(MemoryWallet::new(&[ALICE]))));
            connect_wallet(&state).await.unwrap();
        }

        let state = test_state(&dir, Some(Arc::new(MemoryWallet::new(&[BOB]))));
        let restored = restore_wallet(&state).await.unwrap();
        assert!(restored.unwrap().matches(BOB));
    }

    #[tokio::test]
    async fn test_restore_keeps_persisted_when_wallet_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        {
            let state = test_state(&dir, Some(Arc::new(MemoryWallet::new(&[ALICE]))));
            connect_wallet(&state).await.unwrap();
        }

        let state = test_state(&dir, Some(Arc::new(MemoryWallet::new(&[]))));
        let restored = restore_wallet(&state).await.unwrap();
        assert!(restored.unwrap().matches(ALICE));
    }
}
