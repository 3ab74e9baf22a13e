//! Ledger round trips through the SQLite backend, the way the binary wires
//! it up.

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use simples_cli::app::{Session, build_registry, execute};
use simples_cli::cli::Command;
use simples_core::db::StoreConfig;
use simples_core::{Annex, BracketTables, Caps};

async fn open_session(path: &std::path::Path) -> Session {
    let config = StoreConfig {
        backend: "sqlite".to_string(),
        connection_string: path.display().to_string(),
    };
    let store = match build_registry().create(&config).await {
        Ok(store) => store,
        Err(e) => panic!("failed to open sqlite store: {e}"),
    };
    Session::open(store, "ledger", BracketTables::reference(), Caps::default())
        .await
        .expect("Failed to load ledger")
}

fn add(
    month_year: &str,
    without_st: &str,
    with_st: &str,
    annex: Annex,
) -> Command {
    Command::Add {
        month_year: month_year.to_string(),
        without_st: without_st.to_string(),
        with_st: with_st.to_string(),
        annex,
    }
}

#[tokio::test]
async fn test_ledger_survives_reopen() {
    let dir = std::env::temp_dir().join(format!("simples-session-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let db = dir.join("simples.db");
    let _ = std::fs::remove_file(&db);

    {
        let mut session = open_session(&db).await;
        execute(&mut session, add("01/2025", "200000", "0", Annex::AnnexI))
            .await
            .unwrap();
        execute(&mut session, add("02/2025", "80000", "20000", Annex::AnnexII))
            .await
            .unwrap();
    }

    let session = open_session(&db).await;
    let months = session.months();

    assert_eq!(months.len(), 2);
    assert_eq!(months[1].entry.month_year, "02/2025");
    assert_eq!(months[1].trailing_12_month_revenue, dec!(300000));
    // Annex II, second bracket: (300000 * 0.078 - 5940) / 300000
    assert_eq!(months[1].effective_rate, dec!(0.0582));
    assert_eq!(months[1].tax_without_substitution, dec!(4656));
    // 20000 * 0.0582 * (1 - 0.32)
    assert_eq!(months[1].tax_with_substitution, dec!(791.52));

    let summary = execute(&mut open_session(&db).await, Command::Summary)
        .await
        .unwrap();
    assert!(summary.starts_with("Months:                2\n"), "{summary}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_corrupted_payload_loads_empty() {
    let config = StoreConfig {
        backend: "sqlite".to_string(),
        connection_string: ":memory:".to_string(),
    };
    let store = match build_registry().create(&config).await {
        Ok(store) => store,
        Err(e) => panic!("failed to open sqlite store: {e}"),
    };
    store.set_item("ledger", "{not a ledger").await.unwrap();

    let mut session = Session::open(store, "ledger", BracketTables::reference(), Caps::default())
        .await
        .expect("Failed to load ledger");

    assert!(session.ledger().is_empty());
    let listing = execute(&mut session, Command::List).await.unwrap();
    assert_eq!(listing, "No months recorded.");
}
