use std::path::PathBuf;

use clap::{Parser, Subcommand};
use simples_core::Annex;

/// Simples Nacional tax estimator.
///
/// Keeps a ledger of monthly revenue, derives the trailing 12-month figures,
/// effective rate and tax due for every month, and exports the result as CSV.
#[derive(Debug, Parser)]
#[command(name = "simples", version, about)]
pub struct Cli {
    /// TOML configuration file. Defaults to `simples.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend (`sqlite` or `memory`).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Storage connection string.
    /// For SQLite this is a file path (e.g. `simples.db`) or `:memory:`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Storage key holding the ledger.
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// CSV file replacing the built-in bracket tables.
    #[arg(long, global = true)]
    pub brackets: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `simples_core=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Append a month to the ledger.
    Add {
        /// Month in MM/YYYY form.
        month_year: String,

        /// Revenue not subject to tax substitution.
        #[arg(long = "without-st", default_value = "", allow_hyphen_values = true)]
        without_st: String,

        /// Revenue already subject to tax substitution.
        #[arg(long = "with-st", default_value = "", allow_hyphen_values = true)]
        with_st: String,

        /// Annex the month is taxed under (I or II).
        #[arg(long, default_value = "I", value_parser = parse_annex)]
        annex: Annex,
    },

    /// Remove the month with the given id.
    Remove { id: String },

    /// Remove every month.
    Clear,

    /// Print every month with its derived figures.
    List,

    /// Print the ledger totals.
    Summary,

    /// Write the ledger as a timestamped CSV file.
    Export {
        /// Directory the file is written to.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Print the active bracket tables.
    Brackets,
}

fn parse_annex(s: &str) -> Result<Annex, String> {
    Annex::parse(s).ok_or_else(|| format!("unknown annex '{s}', expected I or II"))
}
