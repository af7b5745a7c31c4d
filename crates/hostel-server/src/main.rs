//! # hostel-server
//!
//! Backend for the Hostel Complaint System.
//!
//! This binary provides:
//! - the contract interface descriptor (`/api/contract/abi`) clients bind to
//! - the entry point of the Google sign-in flow (`/auth/google`)
//! - complaint image records with admin feedback, stored in SQLite
//! - announcements
//!
//! Complaints themselves live in the contract and never pass through here.

mod abi;
mod api;
mod config;
mod error;

use std::sync::{Arc, Mutex};

use hostel_store::Database;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,hostel_server=debug")),
        )
        .init();

    info!("Starting hostel complaint backend v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env();
    info!(http_addr = %config.http_addr, abi = %config.abi_path.display(), "Loaded configuration");
    info!(
        oauth_enabled = config.oauth_authorize_url.is_some(),
        admin_enabled = config.admin_token.is_some(),
        max_image_size = config.max_image_size,
        "Instance settings"
    );

    let db = match &config.database_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            Database::open_at(path)?
        }
        None => Database::new()?,
    };
    info!(path = ?db.path(), "Database ready");

    // without an artifact only /api/contract/abi is unavailable
    let abi = match abi::load_descriptor(&config.abi_path) {
        Ok(descriptor) => {
            info!(functions = descriptor.functions().count(), "Contract ABI loaded");
            Some(Arc::new(descriptor))
        }
        Err(e) => {
            warn!(path = %config.abi_path.display(), error = %e, "Contract ABI unavailable");
            None
        }
    };

    let http_addr = config.http_addr;
    let app_state = AppState {
        db: Arc::new(Mutex::new(db)),
        abi,
        config: Arc::new(config),
    };

    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
