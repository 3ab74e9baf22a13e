//! CSV surfaces of the estimator: the ledger export and the bracket-table
//! loader.

pub mod export;
pub mod loader;

pub use export::{
    EXPORT_HEADERS, ExportDocument, ExportError, export_csv, export_file_name, export_row,
    format_currency, format_percentage, parse_brl_currency, parse_export, parse_percentage,
    write_export_file,
};
pub use loader::{BracketLoaderError, BracketRecord, BracketTableLoader};
