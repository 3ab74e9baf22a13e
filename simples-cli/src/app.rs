use anyhow::{Context, Result, bail};
use chrono::Local;
use simples_core::db::{LedgerStore, MemoryStoreFactory, StoreError, StoreRegistry};
use simples_core::ledger::persistence::{load_ledger, save_ledger};
use simples_core::ledger::{self, MonthForm};
use simples_core::{BracketTables, Caps, ComputedMonth, Ledger, LedgerAction, SimulationSummary};
use simples_data::{BracketTableLoader, write_export_file};
use simples_db_sqlite::SqliteStoreFactory;
use tracing::{debug, info};

use crate::cli::Command;
use crate::config::AppConfig;
use crate::render::{BracketsView, LedgerView, SummaryView};

/// Registry with every backend this binary ships.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(SqliteStoreFactory));
    registry.register(Box::new(MemoryStoreFactory));
    registry
}

/// The configured bracket file, or the built-in tables.
pub fn load_tables(config: &AppConfig) -> Result<BracketTables> {
    match &config.brackets.file {
        Some(path) => {
            let tables = BracketTableLoader::load_file(path)
                .with_context(|| format!("failed to load brackets from '{}'", path.display()))?;
            info!(path = %path.display(), "using custom bracket tables");
            Ok(tables)
        }
        None => Ok(BracketTables::reference()),
    }
}

/// A ledger bound to its storage key.
///
/// Reads always recompute from the full ledger. Mutations reduce first and
/// persist afterwards; a failed write leaves the new in-memory ledger in
/// place and returns the error.
pub struct Session {
    store: Box<dyn LedgerStore>,
    key: String,
    tables: BracketTables,
    caps: Caps,
    ledger: Ledger,
}

impl Session {
    pub async fn open(
        store: Box<dyn LedgerStore>,
        key: impl Into<String>,
        tables: BracketTables,
        caps: Caps,
    ) -> Result<Self, StoreError> {
        let key = key.into();
        let ledger = load_ledger(store.as_ref(), &key).await?;
        Ok(Self {
            store,
            key,
            tables,
            caps,
            ledger,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn tables(&self) -> &BracketTables {
        &self.tables
    }

    pub fn months(&self) -> Vec<ComputedMonth> {
        ledger::compute(&self.ledger, &self.tables, self.caps)
    }

    pub fn summary(&self) -> SimulationSummary {
        ledger::summarize(&self.months(), &self.tables, self.caps)
    }

    /// Applies `action`, then writes the recomputed ledger back.
    pub async fn dispatch(
        &mut self,
        action: LedgerAction,
    ) -> Result<Vec<ComputedMonth>, StoreError> {
        let current = std::mem::take(&mut self.ledger);
        self.ledger = ledger::reduce(current, action);

        let months = self.months();
        save_ledger(self.store.as_ref(), &self.key, &months).await?;
        Ok(months)
    }
}

/// Runs one command and returns the text to print.
pub async fn execute(
    session: &mut Session,
    command: Command,
) -> Result<String> {
    debug!(?command, "executing");

    match command {
        Command::Add {
            month_year,
            without_st,
            with_st,
            annex,
        } => {
            let mut form = MonthForm {
                month_year,
                revenue_without_tax_substitution: without_st,
                revenue_with_tax_substitution: with_st,
                annex,
            };
            let entry = match form.submit() {
                Ok(entry) => entry,
                Err(error) => bail!("month not added: {error}"),
            };
            let header = format!("Added {} ({})", entry.month_year, entry.id);

            let months = session.dispatch(LedgerAction::Add(entry)).await?;
            Ok(format!("{header}\n\n{}", LedgerView(&months)))
        }
        Command::Remove { id } => {
            let existed = session.ledger().contains(&id);
            let months = session
                .dispatch(LedgerAction::Remove { id: id.clone() })
                .await?;
            let header = if existed {
                format!("Removed {id}")
            } else {
                format!("No month with id {id}; ledger unchanged")
            };
            Ok(format!("{header}\n\n{}", LedgerView(&months)))
        }
        Command::Clear => {
            let removed = session.ledger().len();
            session.dispatch(LedgerAction::Clear).await?;
            Ok(format!("Removed {removed} month(s)"))
        }
        Command::List => Ok(LedgerView(&session.months()).to_string()),
        Command::Summary => Ok(SummaryView(&session.summary()).to_string()),
        Command::Export { dir } => {
            let months = session.months();
            let path = write_export_file(&dir, &months, Local::now().naive_local())
                .with_context(|| format!("failed to export into '{}'", dir.display()))?;
            Ok(format!("Exported {} month(s) to {}", months.len(), path.display()))
        }
        Command::Brackets => Ok(BracketsView(session.tables()).to_string()),
    }
}
