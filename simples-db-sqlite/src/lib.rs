//! SQLite backend for the ledger's key/value storage.

mod factory;
mod store;

pub use factory::SqliteStoreFactory;
pub use store::SqliteStore;
