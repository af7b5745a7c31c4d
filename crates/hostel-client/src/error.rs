use hostel_shared::{AbiError, DecodeError, SharedError};
use thiserror::Error;

use crate::auth::AuthError;
use crate::storage::StorageError;
use crate::wallet::WalletError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("No wallet provider available")]
    NoWalletProvider,

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Contract interface not loaded")]
    GatewayNotReady,

    #[error("Contract cannot run {function}: {reason}")]
    UnsupportedOperation { function: String, reason: String },

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend responded {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Interface descriptor error: {0}")]
    Abi(#[from] AbiError),

    #[error(transparent)]
    Shared(#[from] SharedError),

    #[error("Local storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session lock poisoned")]
    LockPoisoned,
}

/// Input rejected before anything is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Floor No must be a number!")]
    FloorNotNumeric(String),

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Feedback is required when you are not satisfied")]
    FeedbackRequired,

    #[error("Image too large: {size} bytes (max {max})")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Unsupported image type '{0}'")]
    UnsupportedImage(String),
}

impl ClientError {
    /// Errors caught before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}
