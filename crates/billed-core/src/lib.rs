pub mod bill;
pub mod error;
pub mod format;
pub mod receipt;
pub mod submission;

pub use bill::{Bill, BillStatus, BillView, ExpenseType};
pub use error::BilledError;
pub use receipt::{ReceiptFile, ReceiptKind, StagedReceipt};
pub use submission::{BillSubmission, BillSubmissionBuilder};
