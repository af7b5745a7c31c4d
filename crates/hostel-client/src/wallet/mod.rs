//! Wallet provider seam.
//!
//! The wallet is a black box that hands out account addresses and signs
//! contract calls on the user's behalf. [`WalletProvider`] is the fixed call
//! contract the rest of the client relies on; [`http::HttpWallet`] talks to a
//! JSON-RPC wallet bridge.

pub mod http;
#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;
use hostel_shared::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

pub use http::HttpWallet;

/// EIP-1193 "user rejected the request" code.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Request rejected by the user")]
    Rejected,

    #[error("Wallet RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Wallet transport error: {0}")]
    Transport(String),

    #[error("Invalid wallet response: {0}")]
    InvalidResponse(String),
}

/// Result of a state-changing contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: String,
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the user to grant account access (`eth_requestAccounts`).
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

    /// Accounts already granted, without prompting (`eth_accounts`).
    async fn accounts(&self) -> Result<Vec<String>, WalletError>;

    /// Read-only contract call.
    async fn call(
        &self,
        contract: &Address,
        function: &str,
        args: Vec<Value>,
    ) -> Result<Value, WalletError>;

    /// State-changing contract call attributed to `from`.
    async fn send(
        &self,
        from: &Address,
        contract: &Address,
        function: &str,
        args: Vec<Value>,
    ) -> Result<TxReceipt, WalletError>;

    /// Stream of account lists, one item per change reported by the wallet.
    fn subscribe_accounts(&self) -> broadcast::Receiver<Vec<String>>;
}
