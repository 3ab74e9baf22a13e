//! The month ledger and the reducer that evolves it.
//!
//! A [`Ledger`] only holds user input. Derived figures come from
//! [`crate::calculations::SimplesCalculator::calculate`] and storage happens
//! after reduction (see [`persistence`]), so [`reduce`] stays pure.

pub mod form;
pub mod persistence;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::SimplesCalculator;
use crate::models::{BracketTables, Caps, ComputedMonth, MonthEntry, SimulationSummary};

pub use form::{MonthForm, ValidationError, parse_amount, validate_month_year};

/// Ordered month entries. Insertion order is chronological order; entries
/// are never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: Vec<MonthEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<MonthEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[MonthEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(
        &self,
        id: &str,
    ) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }
}

/// A change requested against the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerAction {
    /// Append a validated entry at the end.
    Add(MonthEntry),
    /// Drop the entry with this id. Unknown ids leave the ledger unchanged.
    Remove { id: String },
    /// Drop every entry.
    Clear,
}

/// `(ledger, action) -> ledger`.
pub fn reduce(
    ledger: Ledger,
    action: LedgerAction,
) -> Ledger {
    let mut entries = ledger.entries;

    match action {
        LedgerAction::Add(entry) => {
            debug!(id = %entry.id, month = %entry.month_year, "adding month");
            entries.push(entry);
        }
        LedgerAction::Remove { id } => {
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            if entries.len() == before {
                debug!(%id, "remove ignored, no such month");
            }
        }
        LedgerAction::Clear => {
            debug!(removed = entries.len(), "clearing ledger");
            entries.clear();
        }
    }

    Ledger { entries }
}

/// Derives every computed field from the whole ledger.
pub fn compute(
    ledger: &Ledger,
    tables: &BracketTables,
    caps: Caps,
) -> Vec<ComputedMonth> {
    SimplesCalculator::new(tables, caps).calculate(ledger.entries())
}

pub fn summarize(
    months: &[ComputedMonth],
    tables: &BracketTables,
    caps: Caps,
) -> SimulationSummary {
    SimplesCalculator::new(tables, caps).summarize(months)
}
