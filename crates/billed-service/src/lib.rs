mod http;
mod local;
mod traits;

pub use http::HttpBillStore;
pub use local::{LocalBillStore, BILL_INDEX_KEY};
pub use traits::{BillStore, ServiceError};
