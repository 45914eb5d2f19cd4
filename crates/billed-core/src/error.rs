use thiserror::Error;

#[derive(Debug, Error)]
pub enum BilledError {
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),
}
