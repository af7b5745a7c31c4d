pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod forms;
pub mod gateway;
pub mod records_api;
pub mod render;
pub mod routes;
pub mod session;
pub mod shell;
pub mod state;
pub mod storage;
pub mod view;
pub mod wallet;
pub mod watcher;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ClientConfig;
use crate::session::WalletSession;
use crate::shell::Shell;
use crate::state::AppState;
use crate::storage::LocalStorage;
use crate::wallet::{HttpWallet, WalletProvider};

pub async fn run() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hostel_client_lib=info,hostel_shared=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    tracing::info!("Starting Hostel Complaint System client");

    let config = ClientConfig::from_env();
    let storage = match &config.storage_path {
        Some(path) => LocalStorage::open(path)?,
        None => LocalStorage::open_default()?,
    };
    let session = WalletSession::load(storage)?;

    let wallet: Option<Arc<dyn WalletProvider>> = config.wallet_rpc_url.as_ref().map(|url| {
        tracing::info!(url = %url, "using wallet bridge");
        Arc::new(HttpWallet::new(url.clone(), config.wallet_poll_interval)) as Arc<dyn WalletProvider>
    });
    if wallet.is_none() {
        tracing::warn!("WALLET_RPC_URL not set, running without a wallet provider");
    }

    let mut state = AppState::new(config, session, wallet);
    commands::session::restore_wallet(&state).await?;
    state.gateway.load_interface().await;

    Shell::new(state).run().await
}
