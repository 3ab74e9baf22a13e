use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use simples_core::{Annex, BracketRow, BracketTableError, BracketTables};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading bracket tables.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Unknown annex '{value}' on line {line}")]
    UnknownAnnex { line: usize, value: String },

    #[error("Invalid bracket table: {0}")]
    Table(#[from] BracketTableError),

    #[error("Failed to read bracket file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the bracket CSV file.
///
/// - `annex`: `I` or `II` (anything [`Annex::parse`] accepts)
/// - `threshold_from`: lowest RBT12 the row applies to
/// - `nominal_rate`: fraction, e.g. `0.073`
/// - `deduction_amount`: amount deducted before dividing by RBT12
/// - `icms_share`: ICMS portion of the tax, as a fraction
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub annex: String,
    pub threshold_from: Decimal,
    pub nominal_rate: Decimal,
    pub deduction_amount: Decimal,
    pub icms_share: Decimal,
}

/// Loads replacement bracket tables from CSV, so another year's table can
/// be used without rebuilding.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records by annex and validate each table. Rows keep their file
    /// order within an annex.
    pub fn to_tables(records: Vec<BracketRecord>) -> Result<BracketTables, BracketLoaderError> {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                // Line 1 is the header.
                let annex = Annex::parse(&record.annex).ok_or_else(|| {
                    BracketLoaderError::UnknownAnnex {
                        line: i + 2,
                        value: record.annex.clone(),
                    }
                })?;
                let row = BracketRow {
                    threshold_from: record.threshold_from,
                    nominal_rate: record.nominal_rate,
                    deduction_amount: record.deduction_amount,
                    icms_share_percent: record.icms_share,
                };
                Ok((annex, row))
            })
            .collect::<Result<Vec<_>, BracketLoaderError>>()?;

        debug!(rows = rows.len(), "building bracket tables");
        Ok(BracketTables::from_rows(rows)?)
    }

    pub fn load<R: Read>(reader: R) -> Result<BracketTables, BracketLoaderError> {
        Self::to_tables(Self::parse(reader)?)
    }

    pub fn load_file(path: &Path) -> Result<BracketTables, BracketLoaderError> {
        let file = File::open(path)?;
        let tables = Self::load(file)?;
        debug!(path = %path.display(), "bracket tables loaded");
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const HEADER: &str = "annex,threshold_from,nominal_rate,deduction_amount,icms_share";

    fn csv_of(rows: &[&str]) -> String {
        std::iter::once(HEADER)
            .chain(rows.iter().copied())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_parse_single_record() {
        let csv = csv_of(&["II, 180000, 0.078, 5940, 0.32"]);

        let records = BracketTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![BracketRecord {
                annex: "II".to_string(),
                threshold_from: dec!(180000),
                nominal_rate: dec!(0.078),
                deduction_amount: dec!(5940),
                icms_share: dec!(0.32),
            }]
        );
    }

    #[test]
    fn test_load_builds_both_tables() {
        let csv = csv_of(&[
            "I,0,0.05,0,0.30",
            "II,0,0.06,0,0.25",
            "I,100000,0.08,3000,0.30",
        ]);

        let tables = BracketTableLoader::load(csv.as_bytes()).expect("Failed to load tables");

        let annex_i = tables.table(Annex::AnnexI).rows();
        assert_eq!(annex_i.len(), 2);
        assert_eq!(annex_i[1].threshold_from, dec!(100000));
        assert_eq!(annex_i[1].deduction_amount, dec!(3000));
        assert_eq!(tables.table(Annex::AnnexII).lowest().nominal_rate, dec!(0.06));
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "annex,threshold_from\nI,0";

        let err = BracketTableLoader::parse(csv.as_bytes()).expect_err("Should fail");

        let BracketLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_parse_invalid_decimal() {
        let csv = csv_of(&["I,abc,0.04,0,0.34"]);

        let err = BracketTableLoader::parse(csv.as_bytes()).expect_err("Should fail");

        assert!(matches!(err, BracketLoaderError::CsvParse(_)), "got: {:?}", err);
    }

    #[test]
    fn test_unknown_annex_reports_line() {
        let csv = csv_of(&["I,0,0.04,0,0.34", "III,0,0.06,0,0.30"]);

        let err = BracketTableLoader::load(csv.as_bytes()).expect_err("Should fail");

        let BracketLoaderError::UnknownAnnex { line, value } = err else {
            panic!("Expected UnknownAnnex error, got: {:?}", err);
        };
        assert_eq!(line, 3);
        assert_eq!(value, "III");
    }

    #[test]
    fn test_missing_annex_is_rejected() {
        let csv = csv_of(&["I,0,0.04,0,0.34"]);

        let err = BracketTableLoader::load(csv.as_bytes()).expect_err("Should fail");

        assert!(
            matches!(
                err,
                BracketLoaderError::Table(BracketTableError::MissingAnnex(Annex::AnnexII))
            ),
            "got: {:?}",
            err
        );
    }

    #[test]
    fn test_non_ascending_thresholds_are_rejected() {
        let csv = csv_of(&[
            "I,0,0.04,0,0.34",
            "I,0,0.05,0,0.34",
            "II,0,0.045,0,0.32",
        ]);

        let err = BracketTableLoader::load(csv.as_bytes()).expect_err("Should fail");

        assert!(
            matches!(
                err,
                BracketLoaderError::Table(BracketTableError::NotAscending {
                    annex: Annex::AnnexI,
                    row: 1
                })
            ),
            "got: {:?}",
            err
        );
    }

    #[test]
    fn test_percent_style_rates_are_rejected() {
        let csv = csv_of(&["I,0,4,0,34", "II,0,0.045,0,0.32"]);

        let err = BracketTableLoader::load(csv.as_bytes()).expect_err("Should fail");

        assert!(
            matches!(
                err,
                BracketLoaderError::Table(BracketTableError::RateOutOfRange {
                    annex: Annex::AnnexI,
                    row: 0
                })
            ),
            "got: {:?}",
            err
        );
    }
}
