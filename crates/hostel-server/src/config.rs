//! Server configuration loaded from environment variables.
//!
//! All settings have defaults so the backend starts with zero configuration
//! for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use hostel_shared::constants::{DEFAULT_HTTP_PORT, MAX_IMAGE_SIZE};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:4000`
    pub http_addr: SocketAddr,

    /// SQLite database file. Defaults to the platform data directory.
    /// Env: `DATABASE_PATH`
    pub database_path: Option<PathBuf>,

    /// Contract build artifact (Truffle JSON) or a bare ABI array.
    /// Env: `ABI_PATH`
    /// Default: `build/contracts/HostelComplaintSystem.json`
    pub abi_path: PathBuf,

    /// Google OAuth authorize URL that `/auth/google` redirects to.
    /// Env: `OAUTH_AUTHORIZE_URL`
    /// Default: unset (sign-in disabled).
    pub oauth_authorize_url: Option<String>,

    /// Bearer token for admin-only endpoints.
    /// Env: `ADMIN_TOKEN`
    /// Default: unset (admin endpoints disabled).
    pub admin_token: Option<String>,

    /// Maximum decoded image size in bytes.
    /// Env: `MAX_IMAGE_SIZE`
    /// Default: 5 MiB
    pub max_image_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: None,
            abi_path: PathBuf::from("build/contracts/HostelComplaintSystem.json"),
            oauth_authorize_url: None,
            admin_token: None,
            max_image_size: MAX_IMAGE_SIZE,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Some(path) = lookup("DATABASE_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("ABI_PATH") {
            config.abi_path = PathBuf::from(path);
        }

        if let Some(url) = lookup("OAUTH_AUTHORIZE_URL") {
            if !url.is_empty() {
                config.oauth_authorize_url = Some(url);
            }
        }

        if let Some(token) = lookup("ADMIN_TOKEN") {
            if !token.is_empty() {
                config.admin_token = Some(token);
            }
        }

        if let Some(val) = lookup("MAX_IMAGE_SIZE") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.max_image_size = n,
                _ => tracing::warn!(value = %val, "Invalid MAX_IMAGE_SIZE, using default"),
            }
        }

        config
    }
}
