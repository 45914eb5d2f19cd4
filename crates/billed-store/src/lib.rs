mod local;

pub use local::LocalStore;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("store error: {0}")]
    Internal(String),
}

/// A store for receipt files and the bill index, keyed by string paths.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write (create or overwrite) an object.
    async fn put(&self, key: &str, data: Bytes) -> Result<(), StoreError>;

    /// Read an object. Returns `StoreError::NotFound` if absent.
    async fn get(&self, key: &str) -> Result<Bytes, StoreError>;

    /// Read an object, returning `None` if it does not exist.
    async fn get_opt(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        match self.get(key).await {
            Ok(data) => Ok(Some(data)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// -- Key helpers --

/// Key of a bill's receipt. Path separators in the file name are replaced
/// so a name can never escape the bill's directory.
pub fn receipt_key(bill_id: &str, file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("bills/{bill_id}/{safe}")
}

// -- Configuration --

/// Configuration for the receipt store.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Base directory for receipt files. `None` uses the XDG data dir.
    pub local_data_dir: Option<String>,
}

impl StoreConfig {
    /// Build from environment variables (`BILLED_DATA_DIR`).
    pub fn from_env() -> Self {
        Self {
            local_data_dir: std::env::var("BILLED_DATA_DIR").ok(),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.local_data_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir)
    }
}

fn default_data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("billed")
}

// -- Factory --

/// Create an `ObjectStore` from configuration.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn ObjectStore>, StoreError> {
    let store = LocalStore::new(config);
    tracing::debug!("receipt store at {}", store.base_dir().display());
    Ok(Arc::new(store))
}
