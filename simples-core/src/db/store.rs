use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// String key/value storage the ledger is persisted into.
///
/// Shaped after browser local storage: one opaque string per key, no
/// transactions, last write wins.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Returns `None` when nothing has been stored under `key`.
    async fn get_item(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError>;

    async fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    async fn remove_item(
        &self,
        key: &str,
    ) -> Result<(), StoreError>;
}
