//! JSON layout of the persisted ledger.
//!
//! A single storage key holds a JSON array of computed months with the
//! derived fields flattened next to the input fields. Only the input fields
//! are read back; derived ones are recomputed after loading. There is no
//! schema version.

use tracing::{debug, warn};

use super::Ledger;
use crate::db::{LedgerStore, StoreError};
use crate::models::{ComputedMonth, MonthEntry};

pub const DEFAULT_STORAGE_KEY: &str = "simples-nacional-ledger";

pub fn encode(months: &[ComputedMonth]) -> Result<String, StoreError> {
    serde_json::to_string(months).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Reads a stored payload back into a ledger.
///
/// A payload that is not a JSON array of months, or that holds a revenue
/// outside `0..=MonthEntry::MAX_REVENUE`, is logged and yields an empty
/// ledger.
pub fn decode(payload: &str) -> Ledger {
    match serde_json::from_str::<Vec<MonthEntry>>(payload) {
        Ok(entries) => match entries.iter().find(|e| !e.revenue_in_range()) {
            Some(entry) => {
                warn!(
                    id = %entry.id,
                    month = %entry.month_year,
                    "discarding ledger payload with out-of-range revenue"
                );
                Ledger::new()
            }
            None => Ledger::from_entries(entries),
        },
        Err(error) => {
            warn!(%error, "discarding malformed ledger payload");
            Ledger::new()
        }
    }
}

/// Loads the ledger under `key`. A missing key is an empty ledger; only
/// backend failures are returned as errors.
pub async fn load_ledger(
    store: &dyn LedgerStore,
    key: &str,
) -> Result<Ledger, StoreError> {
    let ledger = match store.get_item(key).await? {
        Some(payload) => decode(&payload),
        None => Ledger::new(),
    };
    debug!(key, entries = ledger.len(), "ledger loaded");
    Ok(ledger)
}

pub async fn save_ledger(
    store: &dyn LedgerStore,
    key: &str,
    months: &[ComputedMonth],
) -> Result<(), StoreError> {
    let payload = encode(months)?;
    store.set_item(key, &payload).await?;
    debug!(key, entries = months.len(), bytes = payload.len(), "ledger saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::SimplesCalculator;
    use crate::db::MemoryStore;
    use crate::models::{Annex, BracketTables, Caps};

    fn sample_entries() -> Vec<MonthEntry> {
        vec![
            MonthEntry::new("01/2025", dec!(100000), dec!(0), Annex::AnnexI),
            MonthEntry::new("02/2025", dec!(150000), dec!(20000.55), Annex::AnnexII),
        ]
    }

    fn computed(entries: &[MonthEntry]) -> Vec<ComputedMonth> {
        let tables = BracketTables::reference();
        SimplesCalculator::new(&tables, Caps::default()).calculate(entries)
    }

    #[test]
    fn encode_flattens_derived_fields() {
        let months = computed(&sample_entries());

        let payload = encode(&months).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

        let first = &value[0];
        assert_eq!(first["monthYear"], "01/2025");
        assert_eq!(first["annex"], "I");
        assert!(first.get("entry").is_none());
        for key in [
            "id",
            "revenueWithoutTaxSubstitution",
            "revenueWithTaxSubstitution",
            "totalRevenue",
            "cumulativeRevenue",
            "trailing12MonthRevenue",
            "trailing12MonthAverage",
            "availableUnderMonthlyCap",
            "availableUnderAnnualCap",
            "effectiveRate",
            "icmsSharePercent",
            "taxWithoutSubstitution",
            "taxWithSubstitution",
            "totalTaxDue",
        ] {
            assert!(first.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn decode_restores_input_fields() {
        let entries = sample_entries();
        let payload = encode(&computed(&entries)).unwrap();

        let ledger = decode(&payload);

        assert_eq!(ledger.entries(), entries.as_slice());
    }

    #[test]
    fn decode_accepts_numeric_amounts() {
        let payload = r#"[{"id":"a","monthYear":"01/2025","revenueWithoutTaxSubstitution":1000.5,"revenueWithTaxSubstitution":0,"annex":"II"}]"#;

        let ledger = decode(payload);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].revenue_without_tax_substitution, dec!(1000.5));
        assert_eq!(ledger.entries()[0].annex, Annex::AnnexII);
    }

    #[test]
    fn decode_malformed_payload_yields_empty_ledger() {
        assert!(decode("not json").is_empty());
        assert!(decode("{\"monthYear\":\"01/2025\"}").is_empty());
        assert!(decode("[{\"id\":\"x\"}]").is_empty());
    }

    #[test]
    fn decode_out_of_range_revenue_yields_empty_ledger() {
        let oversized = r#"[{"id":"a","monthYear":"01/2025","revenueWithoutTaxSubstitution":"50000000000000000000000000000","revenueWithTaxSubstitution":"0","annex":"I"},{"id":"b","monthYear":"02/2025","revenueWithoutTaxSubstitution":"50000000000000000000000000000","revenueWithTaxSubstitution":"0","annex":"I"}]"#;
        let negative = r#"[{"id":"a","monthYear":"01/2025","revenueWithoutTaxSubstitution":"-1","revenueWithTaxSubstitution":"0","annex":"I"}]"#;

        assert!(decode(oversized).is_empty());
        assert!(decode(negative).is_empty());
    }

    #[tokio::test]
    async fn load_missing_key_is_empty() {
        let store = MemoryStore::new();

        let ledger = load_ledger(&store, DEFAULT_STORAGE_KEY).await.unwrap();

        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips_entries() {
        let store = MemoryStore::new();
        let entries = sample_entries();

        save_ledger(&store, DEFAULT_STORAGE_KEY, &computed(&entries))
            .await
            .unwrap();
        let ledger = load_ledger(&store, DEFAULT_STORAGE_KEY).await.unwrap();

        assert_eq!(ledger.entries(), entries.as_slice());
    }

    #[tokio::test]
    async fn load_corrupted_payload_fails_open() {
        let store = MemoryStore::new();
        store.set_item(DEFAULT_STORAGE_KEY, "[{broken").await.unwrap();

        let ledger = load_ledger(&store, DEFAULT_STORAGE_KEY).await.unwrap();

        assert!(ledger.is_empty());
    }
}
