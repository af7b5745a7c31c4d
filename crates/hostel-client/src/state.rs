//! Application state shared by every shell command.

use std::sync::{Arc, Mutex};

use hostel_shared::Address;

use crate::auth::AuthState;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::gateway::ContractGateway;
use crate::records_api::RecordsClient;
use crate::session::WalletSession;
use crate::wallet::WalletProvider;
use crate::watcher::AccountSubscription;

/// Central application state.
pub struct AppState {
    pub config: ClientConfig,

    /// Active wallet identity. Written by the connect/disconnect commands
    /// and by the account watcher task.
    pub session: Arc<Mutex<WalletSession>>,

    /// OAuth identity; transient and unrelated to the wallet.
    pub auth: AuthState,

    /// `None` when no wallet bridge is configured.
    pub wallet: Option<Arc<dyn WalletProvider>>,

    pub gateway: ContractGateway,

    pub records: RecordsClient,

    /// Live account-change listener, if started.
    pub subscription: Option<AccountSubscription>,
}

impl AppState {
    pub fn new(
        config: ClientConfig,
        session: WalletSession,
        wallet: Option<Arc<dyn WalletProvider>>,
    ) -> Self {
        let gateway = ContractGateway::new(
            config.abi_url(),
            config.contract_address.clone(),
            wallet.clone(),
        );
        let records = RecordsClient::new(config.api_url.clone(), config.admin_token.clone());

        Self {
            config,
            session: Arc::new(Mutex::new(session)),
            auth: AuthState::default(),
            wallet,
            gateway,
            records,
            subscription: None,
        }
    }

    pub fn account(&self) -> Result<Option<Address>, ClientError> {
        let guard = self.session.lock().map_err(|_| ClientError::LockPoisoned)?;
        Ok(guard.account().cloned())
    }

    pub fn require_account(&self) -> Result<Address, ClientError> {
        self.account()?.ok_or(ClientError::NotConnected)
    }
}

#[cfg(test)]
pub(crate) fn test_state(
    dir: &tempfile::TempDir,
    wallet: Option<Arc<dyn WalletProvider>>,
) -> AppState {
    let storage = crate::storage::LocalStorage::open(dir.path().join("storage.json")).unwrap();
    let session = WalletSession::load(storage).unwrap();
    let config = ClientConfig {
        api_url: "http://127.0.0.1:9".into(),
        ..Default::default()
    };
    AppState::new(config, session, wallet)
}
