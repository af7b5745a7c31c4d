use hostel_shared::Address;

use crate::error::ClientError;

pub const MSG_INSTALL_WALLET: &str = "Please install a wallet provider!";
pub const MSG_CONNECT_WALLET: &str = "Please connect your wallet first!";
pub const MSG_CONTRACT_NOT_LOADED: &str = "Contract not loaded yet.";
pub const MSG_COMPLAINT_SUBMITTED: &str = "Complaint submitted successfully!";
pub const MSG_REVIEW_SUBMITTED: &str = "Review submitted successfully!";
pub const MSG_TRANSACTION_FAILED: &str = "Transaction failed.";

/// Background events delivered to the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The wallet switched to another account, or `None` when it was locked
    /// or disconnected.
    AccountChanged(Option<Address>),
}

/// Outcome of a user action, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub success: bool,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Map an error to the message a user sees. Details beyond the
    /// precondition and validation cases stay in the logs.
    pub fn from_error(err: &ClientError) -> Self {
        let message = match err {
            ClientError::NoWalletProvider => MSG_INSTALL_WALLET.to_string(),
            ClientError::NotConnected => MSG_CONNECT_WALLET.to_string(),
            ClientError::GatewayNotReady => MSG_CONTRACT_NOT_LOADED.to_string(),
            ClientError::Validation(e) => e.to_string(),
            ClientError::NotAuthorized(_) | ClientError::Storage(_) => err.to_string(),
            _ => MSG_TRANSACTION_FAILED.to_string(),
        };
        Self::failure(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::storage::StorageError;
    use crate::wallet::WalletError;

    #[test]
    fn test_precondition_messages() {
        assert_eq!(
            Notice::from_error(&ClientError::NoWalletProvider).message,
            MSG_INSTALL_WALLET
        );
        assert_eq!(
            Notice::from_error(&ClientError::NotConnected).message,
            MSG_CONNECT_WALLET
        );
        assert_eq!(
            Notice::from_error(&ClientError::GatewayNotReady).message,
            MSG_CONTRACT_NOT_LOADED
        );
    }

    #[test]
    fn test_validation_message_is_shown() {
        let notice = Notice::from_error(&ValidationError::FloorNotNumeric("abc".into()).into());
        assert!(!notice.success);
        assert_eq!(notice.message, "Floor No must be a number!");
    }

    #[test]
    fn test_storage_failure_is_explained() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let notice = Notice::from_error(&StorageError::from(io).into());
        assert!(!notice.success);
        assert_eq!(notice.message, "Local storage error: IO error: read-only");
    }

    #[test]
    fn test_wallet_failure_is_generic() {
        let notice = Notice::from_error(&WalletError::Rejected.into());
        assert_eq!(notice.message, MSG_TRANSACTION_FAILED);
    }
}
