//! JSON-RPC 2.0 wallet bridge.
//!
//! Account methods are the standard `eth_requestAccounts` / `eth_accounts`.
//! Contract calls go through the bridge's `contract_call` and
//! `contract_send` methods, which take `{from?, to, function, args}` and do
//! the ABI encoding and signing on the wallet side. Account changes are
//! picked up by polling `eth_accounts`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hostel_shared::Address;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{TxReceipt, WalletError, WalletProvider, USER_REJECTED_CODE};

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Clone)]
struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: Arc<AtomicU64>,
}

impl RpcClient {
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(WalletError::Transport(format!(
                "wallet bridge responded {}",
                resp.status()
            )));
        }

        let parsed: RpcResponse = resp
            .json()
            .await
            .map_err(|e| WalletError::InvalidResponse(e.to_string()))?;

        match (parsed.result, parsed.error) {
            (_, Some(err)) if err.code == USER_REJECTED_CODE => Err(WalletError::Rejected),
            (_, Some(err)) => Err(WalletError::Rpc {
                code: err.code,
                message: err.message,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Ok(Value::Null),
        }
    }

    async fn accounts(&self, method: &str) -> Result<Vec<String>, WalletError> {
        let value = self.request(method, json!([])).await?;
        parse_accounts(value)
    }
}

fn parse_accounts(value: Value) -> Result<Vec<String>, WalletError> {
    serde_json::from_value(value).map_err(|e| WalletError::InvalidResponse(e.to_string()))
}

pub struct HttpWallet {
    rpc: RpcClient,
    accounts_tx: broadcast::Sender<Vec<String>>,
    poll_interval: Duration,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl HttpWallet {
    pub fn new(url: impl Into<String>, poll_interval: Duration) -> Self {
        let (accounts_tx, _) = broadcast::channel(16);
        Self {
            rpc: RpcClient {
                http: reqwest::Client::new(),
                url: url.into(),
                next_id: Arc::new(AtomicU64::new(1)),
            },
            accounts_tx,
            poll_interval,
            poller: Mutex::new(None),
        }
    }

    fn ensure_poller(&self) {
        let mut poller = self.poller.lock().unwrap_or_else(|e| e.into_inner());
        if poller.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime; wallet account changes will not be observed");
            return;
        };

        *poller = Some(runtime.spawn(poll_accounts(
            self.rpc.clone(),
            self.accounts_tx.clone(),
            self.poll_interval,
        )));
    }
}

impl Drop for HttpWallet {
    fn drop(&mut self) {
        if let Ok(mut poller) = self.poller.lock() {
            if let Some(handle) = poller.take() {
                handle.abort();
            }
        }
    }
}

/// Poll `eth_accounts` and broadcast whenever the list changes. The first
/// successful poll only records a baseline. Stops once nobody listens.
async fn poll_accounts(
    rpc: RpcClient,
    tx: broadcast::Sender<Vec<String>>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    let mut last: Option<Vec<String>> = None;

    loop {
        ticker.tick().await;

        if tx.receiver_count() == 0 {
            debug!("no account listeners left, stopping wallet poller");
            break;
        }

        match rpc.accounts("eth_accounts").await {
            Ok(accounts) => {
                if last.as_ref() != Some(&accounts) {
                    if last.is_some() {
                        debug!(count = accounts.len(), "wallet accounts changed");
                        let _ = tx.send(accounts.clone());
                    }
                    last = Some(accounts);
                }
            }
            Err(e) => warn!(error = %e, "polling wallet accounts failed"),
        }
    }
}

#[async_trait]
impl WalletProvider for HttpWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        self.rpc.accounts("eth_requestAccounts").await
    }

    async fn accounts(&self) -> Result<Vec<String>, WalletError> {
        self.rpc.accounts("eth_accounts").await
    }

    async fn call(
        &self,
        contract: &Address,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, WalletError> {
        self.rpc
            .request(
                "contract_call",
                json!([{ "to": contract.as_str(), "function": function, "args": args }]),
            )
            .await
    }

    async fn send(
        &self,
        from: &Address,
        contract: &Address,
        function: &str,
        args: Vec<Value>,
    ) -> Result<TxReceipt, WalletError> {
        let value = self
            .rpc
            .request(
                "contract_send",
                json!([{
                    "from": from.as_str(),
                    "to": contract.as_str(),
                    "function": function,
                    "args": args,
                }]),
            )
            .await?;

        // bridges may answer with the bare hash or a receipt object
        match value {
            Value::String(hash) => Ok(TxReceipt {
                transaction_hash: hash,
            }),
            other => serde_json::from_value(other)
                .map_err(|e| WalletError::InvalidResponse(e.to_string())),
        }
    }

    fn subscribe_accounts(&self) -> broadcast::Receiver<Vec<String>> {
        let rx = self.accounts_tx.subscribe();
        self.ensure_poller();
        rx
    }
}
