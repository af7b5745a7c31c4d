use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Interface descriptor error: {0}")]
    Abi(#[from] AbiError),
}

/// Failure to turn a contract-returned tuple into a [`crate::Complaint`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected a tuple (JSON array), got {0}")]
    NotATuple(String),

    #[error("expected at least {expected} tuple fields, got {got}")]
    Arity { expected: usize, got: usize },

    #[error("field {index} ({name}): {reason}")]
    Field {
        index: usize,
        name: &'static str,
        reason: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("descriptor has no 'abi' array")]
    MissingAbi,

    #[error("malformed descriptor entry: {0}")]
    Malformed(String),
}
