use billed_core::BilledError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewBillError {
    #[error("no receipt staged: select a png or jpeg file before submitting")]
    NoStagedReceipt,

    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error(transparent)]
    Submission(#[from] BilledError),

    #[error("no async runtime to send the bill on")]
    NoRuntime,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("malformed user record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("user record has no email")]
    MissingEmail,
}
