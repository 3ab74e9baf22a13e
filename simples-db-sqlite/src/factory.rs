use async_trait::async_trait;
use simples_core::db::{LedgerStore, StoreConfig, StoreError, StoreFactory};
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

use crate::store::SqliteStore;

/// Maps a connection string onto a sqlx URL.
///
/// * `":memory:"` becomes `sqlite::memory:`
/// * a value already starting with `sqlite:` is used as-is
/// * anything else is a file path, created if missing
fn database_url(connection_string: &str) -> String {
    if connection_string == ":memory:" {
        "sqlite::memory:".to_string()
    } else if connection_string.starts_with("sqlite:") {
        connection_string.to_string()
    } else {
        format!("sqlite:{}?mode=rwc", connection_string)
    }
}

/// Opens ledgers kept in a SQLite file. Registered as `sqlite`.
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Runs the embedded migrations before handing out the store.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn LedgerStore>, StoreError> {
        let url = database_url(&config.connection_string);

        let store = if url == "sqlite::memory:" {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect(&url)
                .await
                .map_err(|e| StoreError::Connection(e.to_string()))?;
            SqliteStore::new_with_pool(pool).await
        } else {
            SqliteStore::new(&url)
                .await
                .map_err(|e| StoreError::Connection(format!("{e:#}")))?
        };

        store
            .run_migrations()
            .await
            .map_err(|e| StoreError::Storage(format!("{e:#}")))?;

        info!(%url, "sqlite store ready");
        Ok(Box::new(store))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use simples_core::db::{StoreConfig, StoreFactory};

    use super::*;

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqliteStoreFactory.backend_name(), "sqlite");
    }

    #[test]
    fn connection_strings_map_to_sqlx_urls() {
        assert_eq!(database_url(":memory:"), "sqlite::memory:");
        assert_eq!(database_url("simples.db"), "sqlite:simples.db?mode=rwc");
        assert_eq!(database_url("sqlite:other.db"), "sqlite:other.db");
    }

    #[tokio::test]
    async fn creates_in_memory_store() {
        let config = StoreConfig {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        };

        let store = match SqliteStoreFactory.create(&config).await {
            Ok(store) => store,
            Err(e) => panic!("failed to create in-memory store: {e}"),
        };

        store.set_item("k", "v").await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap().as_deref(), Some("v"));
    }
}
