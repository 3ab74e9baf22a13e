use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Annex;

/// One row of an annex's progressive table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketRow {
    /// Lowest trailing 12-month revenue this row applies to.
    pub threshold_from: Decimal,
    /// Nominal rate as a fraction (`0.073` for 7.3%).
    pub nominal_rate: Decimal,
    /// Amount subtracted before dividing by RBT12.
    pub deduction_amount: Decimal,
    /// Share of the tax that is ICMS, as a fraction.
    pub icms_share_percent: Decimal,
}

impl BracketRow {
    const fn new(
        threshold_from: Decimal,
        nominal_rate: Decimal,
        deduction_amount: Decimal,
        icms_share_percent: Decimal,
    ) -> Self {
        Self {
            threshold_from,
            nominal_rate,
            deduction_amount,
            icms_share_percent,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table for {0} has no rows")]
    Empty(Annex),

    #[error("bracket thresholds for {annex} must be strictly ascending (row {row})")]
    NotAscending { annex: Annex, row: usize },

    #[error("no bracket table provided for {0}")]
    MissingAnnex(Annex),

    #[error("bracket rates for {annex} must be fractions between 0 and 1 (row {row})")]
    RateOutOfRange { annex: Annex, row: usize },
}

/// Rows for a single annex, ascending by `threshold_from`.
///
/// Construction guarantees at least one row, so [`BracketTable::lowest`]
/// never fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTable {
    annex: Annex,
    rows: Vec<BracketRow>,
}

impl BracketTable {
    pub fn new(
        annex: Annex,
        rows: Vec<BracketRow>,
    ) -> Result<Self, BracketTableError> {
        if rows.is_empty() {
            return Err(BracketTableError::Empty(annex));
        }

        if let Some(position) = rows
            .windows(2)
            .position(|pair| pair[1].threshold_from <= pair[0].threshold_from)
        {
            return Err(BracketTableError::NotAscending {
                annex,
                row: position + 1,
            });
        }

        let fraction = Decimal::ZERO..=Decimal::ONE;
        if let Some(row) = rows.iter().position(|r| {
            !fraction.contains(&r.nominal_rate) || !fraction.contains(&r.icms_share_percent)
        }) {
            return Err(BracketTableError::RateOutOfRange { annex, row });
        }

        Ok(Self { annex, rows })
    }

    pub fn annex(&self) -> Annex {
        self.annex
    }

    pub fn rows(&self) -> &[BracketRow] {
        &self.rows
    }

    pub fn lowest(&self) -> &BracketRow {
        &self.rows[0]
    }
}

/// The pair of tables the calculator looks brackets up in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTables {
    annex_i: BracketTable,
    annex_ii: BracketTable,
}

impl BracketTables {
    pub fn new(
        annex_i: BracketTable,
        annex_ii: BracketTable,
    ) -> Self {
        Self { annex_i, annex_ii }
    }

    /// Builds the tables from rows grouped by annex, in any order.
    pub fn from_rows(rows: Vec<(Annex, BracketRow)>) -> Result<Self, BracketTableError> {
        let (annex_i, annex_ii): (Vec<_>, Vec<_>) = rows
            .into_iter()
            .partition(|(annex, _)| *annex == Annex::AnnexI);

        let collect = |annex: Annex, rows: Vec<(Annex, BracketRow)>| {
            if rows.is_empty() {
                return Err(BracketTableError::MissingAnnex(annex));
            }
            BracketTable::new(annex, rows.into_iter().map(|(_, row)| row).collect())
        };

        Ok(Self {
            annex_i: collect(Annex::AnnexI, annex_i)?,
            annex_ii: collect(Annex::AnnexII, annex_ii)?,
        })
    }

    /// Built-in Anexo I and Anexo II tables (first five ranges).
    pub fn reference() -> Self {
        Self {
            annex_i: BracketTable {
                annex: Annex::AnnexI,
                rows: vec![
                    BracketRow::new(dec!(0), dec!(0.04), dec!(0), dec!(0.34)),
                    BracketRow::new(dec!(180000), dec!(0.073), dec!(5940), dec!(0.34)),
                    BracketRow::new(dec!(360000), dec!(0.095), dec!(13860), dec!(0.335)),
                    BracketRow::new(dec!(720000), dec!(0.107), dec!(22500), dec!(0.335)),
                    BracketRow::new(dec!(1800000), dec!(0.143), dec!(87300), dec!(0.335)),
                ],
            },
            annex_ii: BracketTable {
                annex: Annex::AnnexII,
                rows: vec![
                    BracketRow::new(dec!(0), dec!(0.045), dec!(0), dec!(0.32)),
                    BracketRow::new(dec!(180000), dec!(0.078), dec!(5940), dec!(0.32)),
                    BracketRow::new(dec!(360000), dec!(0.10), dec!(13860), dec!(0.32)),
                    BracketRow::new(dec!(720000), dec!(0.112), dec!(22500), dec!(0.32)),
                    BracketRow::new(dec!(1800000), dec!(0.147), dec!(85500), dec!(0.32)),
                ],
            },
        }
    }

    pub fn table(
        &self,
        annex: Annex,
    ) -> &BracketTable {
        match annex {
            Annex::AnnexI => &self.annex_i,
            Annex::AnnexII => &self.annex_ii,
        }
    }
}

impl Default for BracketTables {
    fn default() -> Self {
        Self::reference()
    }
}
