use async_trait::async_trait;
use billed_core::{Bill, BillSubmission};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// The remote bill store the client containers talk to.
///
/// `HttpBillStore` posts to a running API server.
/// `LocalBillStore` keeps bills in process, for offline use and tests.
#[async_trait]
pub trait BillStore: Send + Sync {
    /// Upload the receipt and record a new bill.
    async fn create(&self, submission: &BillSubmission) -> Result<Bill, ServiceError>;

    /// All bills visible to the current user, in store order.
    async fn list(&self) -> Result<Vec<Bill>, ServiceError>;
}
