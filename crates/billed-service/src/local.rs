use std::sync::Arc;

use async_trait::async_trait;
use billed_core::{Bill, BillSubmission};
use billed_store::{receipt_key, ObjectStore, StoreError};
use tokio::sync::RwLock;

use crate::{BillStore, ServiceError};

/// Key of the bill list in the object store, next to the receipts.
pub const BILL_INDEX_KEY: &str = "bills.json";

/// In-process implementation. Bills live in memory; when an `ObjectStore`
/// is attached, receipts and the bill list are written to it.
pub struct LocalBillStore {
    bills: RwLock<Vec<Bill>>,
    receipts: Option<Arc<dyn ObjectStore>>,
    failure: Option<String>,
}

impl LocalBillStore {
    pub fn new() -> Self {
        Self {
            bills: RwLock::new(Vec::new()),
            receipts: None,
            failure: None,
        }
    }

    pub fn with_receipts(receipts: Arc<dyn ObjectStore>) -> Self {
        Self {
            receipts: Some(receipts),
            ..Self::new()
        }
    }

    /// Open a store backed by `receipts`, loading the bills saved by
    /// earlier runs. A missing index is an empty list.
    pub async fn open(receipts: Arc<dyn ObjectStore>) -> Result<Self, ServiceError> {
        let bills = match receipts.get_opt(BILL_INDEX_KEY).await? {
            Some(data) => serde_json::from_slice(&data)
                .map_err(|e| ServiceError::Internal(format!("decode {BILL_INDEX_KEY}: {e}")))?,
            None => Vec::new(),
        };
        Ok(Self::with_receipts(receipts).with_bills(bills))
    }

    /// Pre-populate with existing bills, kept in the given order.
    pub fn with_bills(mut self, bills: Vec<Bill>) -> Self {
        self.bills = RwLock::new(bills);
        self
    }

    /// A store whose every call fails with `ServiceError::Internal(msg)`.
    pub fn failing(msg: impl Into<String>) -> Self {
        Self {
            failure: Some(msg.into()),
            ..Self::new()
        }
    }

    fn check_failure(&self) -> Result<(), ServiceError> {
        match &self.failure {
            Some(msg) => Err(ServiceError::Internal(msg.clone())),
            None => Ok(()),
        }
    }
}

impl Default for LocalBillStore {
    fn default() -> Self {
        Self::new()
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(msg) => ServiceError::NotFound(msg),
            StoreError::InvalidKey(msg) => ServiceError::InvalidInput(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

async fn save_index(receipts: &dyn ObjectStore, bills: &[Bill]) -> Result<(), ServiceError> {
    let index = serde_json::to_vec(bills)
        .map_err(|e| ServiceError::Internal(format!("encode {BILL_INDEX_KEY}: {e}")))?;
    receipts.put(BILL_INDEX_KEY, index.into()).await?;
    Ok(())
}

#[async_trait]
impl BillStore for LocalBillStore {
    async fn create(&self, submission: &BillSubmission) -> Result<Bill, ServiceError> {
        self.check_failure()?;
        let id = uuid::Uuid::new_v4().to_string();
        let file_url = match &self.receipts {
            Some(receipts) => {
                let key = receipt_key(&id, submission.file_name());
                receipts.put(&key, submission.file().data.clone()).await?;
                Some(key)
            }
            None => None,
        };
        let bill = submission.to_bill(id, file_url);

        let mut bills = self.bills.write().await;
        bills.push(bill.clone());
        if let Some(receipts) = &self.receipts {
            if let Err(e) = save_index(receipts.as_ref(), &bills).await {
                bills.pop();
                return Err(e);
            }
        }
        tracing::debug!(bill_id = %bill.id, "stored bill");
        Ok(bill)
    }

    async fn list(&self) -> Result<Vec<Bill>, ServiceError> {
        self.check_failure()?;
        Ok(self.bills.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billed_core::{ReceiptFile, StagedReceipt};
    use billed_store::{LocalStore, StoreConfig};

    fn submission(name: &str) -> BillSubmission {
        let receipt =
            StagedReceipt::try_from(ReceiptFile::new("ticket.jpg", "image/jpeg", &b"jpeg"[..]))
                .unwrap();
        BillSubmission::builder(receipt)
            .email("employee@test.tld")
            .name(name)
            .amount(42)
            .date("2022-02-02")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn create_then_list_keeps_insertion_order() {
        let store = LocalBillStore::new();
        let first = store.create(&submission("first")).await.unwrap();
        let second = store.create(&submission("second")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert!(first.file_url.is_none());

        let bills = store.list().await.unwrap();
        let names: Vec<&str> = bills.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn create_writes_receipt_to_object_store() {
        let tmp = tempfile::tempdir().unwrap();
        let receipts: Arc<dyn ObjectStore> = Arc::new(LocalStore::new(&StoreConfig {
            local_data_dir: Some(tmp.path().to_string_lossy().to_string()),
        }));
        let store = LocalBillStore::with_receipts(receipts.clone());

        let bill = store.create(&submission("hotel")).await.unwrap();
        let key = bill.file_url.clone().unwrap();
        assert_eq!(key, format!("bills/{}/ticket.jpg", bill.id));
        assert_eq!(receipts.get(&key).await.unwrap().as_ref(), b"jpeg");
    }

    #[tokio::test]
    async fn failing_store_errors_on_every_call() {
        let store = LocalBillStore::failing("Erreur 500");
        let err = store.create(&submission("x")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Internal(ref m) if m == "Erreur 500"));
        assert!(store.list().await.is_err());
    }

    #[tokio::test]
    async fn reopened_store_lists_earlier_bills() {
        let tmp = tempfile::tempdir().unwrap();
        let receipts: Arc<dyn ObjectStore> = Arc::new(LocalStore::new(&StoreConfig {
            local_data_dir: Some(tmp.path().to_string_lossy().to_string()),
        }));

        let first_run = LocalBillStore::open(receipts.clone()).await.unwrap();
        assert!(first_run.list().await.unwrap().is_empty());
        let created = first_run.create(&submission("taxi")).await.unwrap();
        drop(first_run);

        let second_run = LocalBillStore::open(receipts).await.unwrap();
        let bills = second_run.list().await.unwrap();
        assert_eq!(bills, vec![created]);
    }

    #[tokio::test]
    async fn corrupted_index_fails_to_open() {
        let tmp = tempfile::tempdir().unwrap();
        let receipts: Arc<dyn ObjectStore> = Arc::new(LocalStore::new(&StoreConfig {
            local_data_dir: Some(tmp.path().to_string_lossy().to_string()),
        }));
        receipts
            .put(BILL_INDEX_KEY, b"not json".to_vec().into())
            .await
            .unwrap();

        let err = LocalBillStore::open(receipts).await.err().unwrap();
        assert!(matches!(err, ServiceError::Internal(_)));
    }
}
