use std::sync::Mutex;

use async_trait::async_trait;
use hostel_shared::Address;
use serde_json::Value;
use tokio::sync::broadcast;

use super::{TxReceipt, WalletError, WalletProvider};

/// One recorded contract call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub from: Option<String>,
    pub function: String,
    pub args: Vec<Value>,
}

/// In-process wallet for tests.
pub struct MemoryWallet {
    accounts: Mutex<Vec<String>>,
    reject: Mutex<bool>,
    fail_sends: Mutex<bool>,
    complaints: Mutex<Value>,
    calls: Mutex<Vec<RecordedCall>>,
    accounts_tx: broadcast::Sender<Vec<String>>,
}

impl MemoryWallet {
    pub fn new(accounts: &[&str]) -> Self {
        let (accounts_tx, _) = broadcast::channel(16);
        Self {
            accounts: Mutex::new(accounts.iter().map(|a| a.to_string()).collect()),
            reject: Mutex::new(false),
            fail_sends: Mutex::new(false),
            complaints: Mutex::new(Value::Array(Vec::new())),
            calls: Mutex::new(Vec::new()),
            accounts_tx,
        }
    }

    pub fn reject_requests(&self, reject: bool) {
        *self.reject.lock().unwrap() = reject;
    }

    pub fn fail_sends(&self, fail: bool) {
        *self.fail_sends.lock().unwrap() = fail;
    }

    pub fn set_complaints(&self, tuples: Value) {
        *self.complaints.lock().unwrap() = tuples;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sends(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.from.is_some())
            .collect()
    }

    /// Simulate the user switching or locking accounts in the wallet.
    pub fn emit_accounts(&self, accounts: &[&str]) {
        let accounts: Vec<String> = accounts.iter().map(|a| a.to_string()).collect();
        *self.accounts.lock().unwrap() = accounts.clone();
        let _ = self.accounts_tx.send(accounts);
    }
}

#[async_trait]
impl WalletProvider for MemoryWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        if *self.reject.lock().unwrap() {
            return Err(WalletError::Rejected);
        }
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn accounts(&self) -> Result<Vec<String>, WalletError> {
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn call(
        &self,
        _contract: &Address,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, WalletError> {
        self.calls.lock().unwrap().push(RecordedCall {
            from: None,
            function: function.to_string(),
            args,
        });
        Ok(self.complaints.lock().unwrap().clone())
    }

    async fn send(
        &self,
        from: &Address,
        _contract: &Address,
        function: &str,
        args: Vec<Value>,
    ) -> Result<TxReceipt, WalletError> {
        self.calls.lock().unwrap().push(RecordedCall {
            from: Some(from.to_string()),
            function: function.to_string(),
            args,
        });
        if *self.fail_sends.lock().unwrap() {
            return Err(WalletError::Rpc {
                code: -32000,
                message: "execution reverted".into(),
            });
        }
        Ok(TxReceipt {
            transaction_hash: format!("0x{:064x}", self.calls.lock().unwrap().len()),
        })
    }

    fn subscribe_accounts(&self) -> broadcast::Receiver<Vec<String>> {
        self.accounts_tx.subscribe()
    }
}
