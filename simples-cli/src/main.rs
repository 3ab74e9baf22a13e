use anyhow::Context;
use clap::Parser;
use tracing::debug;

use simples_cli::app::{self, Session};
use simples_cli::cli::Cli;
use simples_cli::config::AppConfig;
use simples_cli::logging;

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log = logging::init_logging()?;

    let config = AppConfig::resolve(&cli)?;
    if cli.log_level.is_some() || !logging::env_filter_present() {
        log.set_level(&config.logging.level)?;
    }
    if let Some(path) = &config.logging.file {
        log.enable_file(path)?;
    }

    let store_config = config.store_config();
    debug!("opening {} backend", store_config.backend);
    let store = app::build_registry()
        .create(&store_config)
        .await
        .with_context(|| format!("cannot open '{}' storage", store_config.backend))?;

    let tables = app::load_tables(&config)?;
    let mut session = Session::open(store, config.storage.key.clone(), tables, config.caps())
        .await
        .context("cannot load ledger")?;

    let output = app::execute(&mut session, cli.command).await?;
    println!("{output}");

    Ok(())
}
