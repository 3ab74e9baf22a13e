//! Simples Nacional tax estimation engine.
//!
//! - [`models`]: month entries, bracket tables, caps and summaries
//! - [`calculations`]: bracket lookup, trailing windows, effective rates
//! - [`ledger`]: the pure ledger reducer, input validation and persistence
//! - [`db`]: the key/value storage seam and backend registry

pub mod calculations;
pub mod db;
pub mod ledger;
pub mod models;

pub use db::{LedgerStore, StoreError};
pub use ledger::{Ledger, LedgerAction, compute, reduce, summarize};
pub use models::*;
