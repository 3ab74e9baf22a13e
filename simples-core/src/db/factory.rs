use std::collections::HashMap;

use async_trait::async_trait;

use super::store::{LedgerStore, StoreError};

/// Where the ledger lives.
///
/// The `sqlite` backend reads `connection_string` as a database path
/// (`:memory:` works too); the `memory` backend ignores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: "simples.db".to_string(),
        }
    }
}

/// Opens a [`LedgerStore`] for one backend.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn LedgerStore>, StoreError>;
}

/// Backends the CLI can open, looked up by `--backend`.
#[derive(Default)]
pub struct StoreRegistry {
    factories: HashMap<&'static str, Box<dyn StoreFactory>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A later factory with the same name wins.
    pub fn register(
        &mut self,
        factory: Box<dyn StoreFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens the ledger store named by `config.backend`. An unregistered
    /// name is a [`StoreError::Configuration`].
    pub async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn LedgerStore>, StoreError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(StoreError::Configuration(format!(
                "no ledger backend named '{}' (known: {})",
                config.backend,
                self.available_backends().join(", ")
            )));
        };

        factory.create(config).await
    }
}
