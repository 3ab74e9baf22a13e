use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::factory::{StoreConfig, StoreFactory};
use super::store::{LedgerStore, StoreError};

/// Process-local store. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn get_item(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(
        &self,
        key: &str,
    ) -> Result<(), StoreError> {
        self.items.write().await.remove(key);
        Ok(())
    }
}

/// [`StoreFactory`] for the `"memory"` backend. The connection string is
/// ignored.
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn LedgerStore>, StoreError> {
        Ok(Box::new(MemoryStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let store = MemoryStore::new();

        let result = store.get_item("absent").await.unwrap();

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = MemoryStore::new();

        store.set_item("ledger", "[]").await.unwrap();

        assert_eq!(store.get_item("ledger").await.unwrap(), Some("[]".to_string()));
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let store = MemoryStore::new();

        store.set_item("ledger", "first").await.unwrap();
        store.set_item("ledger", "second").await.unwrap();

        assert_eq!(
            store.get_item("ledger").await.unwrap(),
            Some("second".to_string())
        );
    }

    #[tokio::test]
    async fn remove_deletes_value_and_tolerates_missing_key() {
        let store = MemoryStore::new();
        store.set_item("ledger", "[]").await.unwrap();

        store.remove_item("ledger").await.unwrap();
        store.remove_item("ledger").await.unwrap();

        assert_eq!(store.get_item("ledger").await.unwrap(), None);
    }
}
