use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use simples_core::db::{LedgerStore, StoreError};
use sqlx::{Row, sqlite::SqlitePool};
use tracing::debug;

/// [`LedgerStore`] over a single `local_storage` table.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl LedgerStore for SqliteStore {
    async fn get_item(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value FROM local_storage WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        row.map(|row| {
            row.try_get::<String, _>("value")
                .map_err(|e| StoreError::Storage(e.to_string()))
        })
        .transpose()
    }

    async fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?;

        debug!(key, bytes = value.len(), "stored item");
        Ok(())
    }

    async fn remove_item(
        &self,
        key: &str,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM local_storage WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use simples_core::calculations::SimplesCalculator;
    use simples_core::ledger::persistence::{DEFAULT_STORAGE_KEY, load_ledger, save_ledger};
    use simples_core::{Annex, BracketTables, Caps, MonthEntry};
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn setup_test_db() -> SqliteStore {
        // A second connection would open a separate in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let store = SqliteStore::new_with_pool(pool).await;
        store
            .run_migrations()
            .await
            .expect("Failed to run migrations");
        store
    }

    // ===== item access =====

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let store = setup_test_db().await;

        assert_eq!(store.get_item("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_item_overwrites_previous_value() {
        let store = setup_test_db().await;

        store.set_item("k", "first").await.unwrap();
        store.set_item("k", "second").await.unwrap();

        assert_eq!(store.get_item("k").await.unwrap().as_deref(), Some("second"));
        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM local_storage")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn remove_item_is_idempotent() {
        let store = setup_test_db().await;
        store.set_item("k", "v").await.unwrap();

        store.remove_item("k").await.unwrap();
        store.remove_item("k").await.unwrap();

        assert_eq!(store.get_item("k").await.unwrap(), None);
    }

    // ===== ledger persistence =====

    #[tokio::test]
    async fn ledger_survives_save_and_load() {
        let store = setup_test_db().await;
        let tables = BracketTables::reference();
        let calculator = SimplesCalculator::new(&tables, Caps::default());
        let entries = vec![
            MonthEntry::new("01/2025", dec!(100000), dec!(0), Annex::AnnexI),
            MonthEntry::new("02/2025", dec!(90000.10), dec!(10000), Annex::AnnexII),
        ];

        save_ledger(&store, DEFAULT_STORAGE_KEY, &calculator.calculate(&entries))
            .await
            .unwrap();
        let ledger = load_ledger(&store, DEFAULT_STORAGE_KEY).await.unwrap();

        assert_eq!(ledger.entries(), entries.as_slice());
    }
}
