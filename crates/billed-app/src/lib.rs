pub mod bills;
pub mod config;
pub mod error;
pub mod file_input;
pub mod new_bill;
pub mod routes;
pub mod session;

pub use bills::{Bills, BillsPage, PreviewModal};
pub use error::{NewBillError, SessionError};
pub use new_bill::{BillForm, CreateTask, FileSelection, NewBill, SubmitOutcome};
pub use routes::{Navigator, Route, Router};
pub use session::{Session, UserKind};
