use thiserror::Error;

/// Rejected user input. Raised before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Enter a transaction digest or explorer URL.")]
    EmptyInput,

    #[error("Invalid transaction digest format.")]
    InvalidDigest(String),

    #[error("Invalid link: {0}")]
    InvalidUrl(String),
}

/// Failure to turn a ledger response into a [`crate::TransactionRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Missing data: {0}")]
    MissingData(String),
}
