//! Client configuration loaded from environment variables.
//!
//! All settings have defaults matching a local development setup (backend
//! on port 4000, contract on a local chain).

use std::path::PathBuf;
use std::time::Duration;

use hostel_shared::constants::{CONTRACT_ABI_PATH, DEFAULT_CONTRACT_ADDRESS, DEFAULT_HTTP_PORT};
use hostel_shared::Address;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend serving the ABI, OAuth entry and records.
    /// Env: `HOSTEL_API_URL`
    /// Default: `http://localhost:4000`
    pub api_url: String,

    /// Address the complaint contract is deployed at.
    /// Env: `CONTRACT_ADDRESS`
    pub contract_address: Address,

    /// JSON-RPC endpoint of the wallet bridge. Unset means no wallet
    /// provider is available.
    /// Env: `WALLET_RPC_URL`
    pub wallet_rpc_url: Option<String>,

    /// How often the wallet is polled for account changes.
    /// Env: `WALLET_POLL_INTERVAL_MS`
    /// Default: 2000
    pub wallet_poll_interval: Duration,

    /// Local storage file. Defaults to the platform config directory.
    /// Env: `HOSTEL_STORAGE_PATH`
    pub storage_path: Option<PathBuf>,

    /// Bearer token for admin-only record endpoints.
    /// Env: `HOSTEL_ADMIN_TOKEN`
    pub admin_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: format!("http://localhost:{DEFAULT_HTTP_PORT}"),
            contract_address: default_contract_address(),
            wallet_rpc_url: None,
            wallet_poll_interval: Duration::from_millis(2000),
            storage_path: None,
            admin_token: None,
        }
    }
}

fn default_contract_address() -> Address {
    Address::parse(DEFAULT_CONTRACT_ADDRESS).expect("built-in contract address is valid")
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("HOSTEL_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }

        if let Some(addr) = lookup("CONTRACT_ADDRESS") {
            match Address::parse(&addr) {
                Ok(parsed) => config.contract_address = parsed,
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid CONTRACT_ADDRESS, using default");
                }
            }
        }

        if let Some(url) = lookup("WALLET_RPC_URL") {
            if !url.trim().is_empty() {
                config.wallet_rpc_url = Some(url.trim().to_string());
            }
        }

        if let Some(val) = lookup("WALLET_POLL_INTERVAL_MS") {
            match val.parse::<u64>() {
                Ok(ms) if ms > 0 => config.wallet_poll_interval = Duration::from_millis(ms),
                _ => tracing::warn!(value = %val, "Invalid WALLET_POLL_INTERVAL_MS, using default"),
            }
        }

        if let Some(path) = lookup("HOSTEL_STORAGE_PATH") {
            config.storage_path = Some(PathBuf::from(path));
        }

        if let Some(token) = lookup("HOSTEL_ADMIN_TOKEN") {
            if !token.is_empty() {
                config.admin_token = Some(token);
            }
        }

        config
    }

    pub fn abi_url(&self) -> String {
        format!("{}{}", self.api_url, CONTRACT_ABI_PATH)
    }
}
