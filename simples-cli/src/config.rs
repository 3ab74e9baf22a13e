//! `simples.toml` handling.
//!
//! ```toml
//! [storage]
//! backend = "sqlite"
//! connection_string = "simples.db"
//! key = "simples-nacional-ledger"
//!
//! [caps]
//! monthly = 400000
//! annual = 4800000
//!
//! [logging]
//! level = "info"
//! file = "simples.log"
//!
//! [brackets]
//! file = "brackets-2025.csv"
//! ```
//!
//! Every section and field is optional. Command-line flags win over the file.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use simples_core::Caps;
use simples_core::db::StoreConfig;
use simples_core::ledger::persistence::DEFAULT_STORAGE_KEY;
use thiserror::Error;
use tracing::debug;

use crate::cli::Cli;

pub const DEFAULT_CONFIG_FILE: &str = "simples.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub storage: StorageSettings,
    pub caps: CapsSettings,
    pub logging: LoggingSettings,
    pub brackets: BracketSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSettings {
    pub backend: String,
    pub connection_string: String,
    pub key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        let store = StoreConfig::default();
        Self {
            backend: store.backend,
            connection_string: store.connection_string,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapsSettings {
    pub monthly: Decimal,
    pub annual: Decimal,
}

impl Default for CapsSettings {
    fn default() -> Self {
        Self {
            monthly: Caps::DEFAULT_MONTHLY_CAP,
            annual: Caps::DEFAULT_ANNUAL_CAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// Any `EnvFilter` directive.
    pub level: String,
    /// Appended to when set.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BracketSettings {
    /// Replaces the built-in tables when set.
    pub file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_toml_str(
        path: &Path,
        contents: &str,
    ) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading configuration");
        Self::from_toml_str(path, &contents)
    }

    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_FILE`] is
    /// read if present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    debug!("no configuration file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Loads the file selected by `cli` and applies its flags on top.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::load(cli.config.as_deref())?;
        config.apply_overrides(cli);
        Ok(config)
    }

    pub fn apply_overrides(
        &mut self,
        cli: &Cli,
    ) {
        if let Some(backend) = &cli.backend {
            self.storage.backend = backend.clone();
        }
        if let Some(db) = &cli.db {
            self.storage.connection_string = db.clone();
        }
        if let Some(key) = &cli.key {
            self.storage.key = key.clone();
        }
        if let Some(brackets) = &cli.brackets {
            self.brackets.file = Some(brackets.clone());
        }
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            backend: self.storage.backend.clone(),
            connection_string: self.storage.connection_string.clone(),
        }
    }

    pub fn caps(&self) -> Caps {
        Caps {
            monthly_cap: self.caps.monthly,
            annual_cap: self.caps.annual,
        }
    }
}
