//! The active wallet identity.
//!
//! [`WalletSession`] is the single owner of the connected address. Setting
//! or clearing it also writes through to [`LocalStorage`] under
//! `walletAccount`, so a restart comes back with the last known account.

use hostel_shared::constants::WALLET_STORAGE_KEY;
use hostel_shared::Address;
use tracing::{debug, warn};

use crate::storage::{LocalStorage, StorageError};

#[derive(Debug)]
pub struct WalletSession {
    account: Option<Address>,
    storage: LocalStorage,
}

impl WalletSession {
    /// Restore the persisted account, if any. A value that is not a valid
    /// address is discarded.
    pub fn load(mut storage: LocalStorage) -> Result<Self, StorageError> {
        let account = match storage.get(WALLET_STORAGE_KEY).map(Address::parse) {
            Some(Ok(address)) => Some(address),
            Some(Err(e)) => {
                warn!(error = %e, "discarding invalid persisted wallet account");
                storage.remove(WALLET_STORAGE_KEY)?;
                None
            }
            None => None,
        };

        debug!(restored = account.is_some(), "wallet session loaded");
        Ok(Self { account, storage })
    }

    pub fn account(&self) -> Option<&Address> {
        self.account.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn set_account(&mut self, account: Address) -> Result<(), StorageError> {
        self.storage.set(WALLET_STORAGE_KEY, account.as_str())?;
        self.account = Some(account);
        Ok(())
    }

    /// Forget the account. The in-memory value only changes once storage
    /// has been updated.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(WALLET_STORAGE_KEY)?;
        self.account = None;
        Ok(())
    }

    /// Apply an account list reported by the wallet: the first entry becomes
    /// active, an empty list disconnects. Entries that are not addresses are
    /// skipped.
    pub fn apply_accounts(&mut self, accounts: &[String]) -> Result<Option<Address>, StorageError> {
        let first = accounts.iter().find_map(|raw| match Address::parse(raw) {
            Ok(address) => Some(address),
            Err(e) => {
                warn!(value = %raw, error = %e, "wallet reported an invalid account");
                None
            }
        });

        match first {
            Some(address) => self.set_account(address.clone())?,
            None => self.clear()?,
        }
        Ok(self.account.clone())
    }
}
