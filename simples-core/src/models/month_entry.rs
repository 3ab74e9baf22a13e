use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Annex;

/// One month of revenue as submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthEntry {
    pub id: String,
    /// `MM/YYYY`.
    pub month_year: String,
    pub revenue_without_tax_substitution: Decimal,
    pub revenue_with_tax_substitution: Decimal,
    pub annex: Annex,
}

impl MonthEntry {
    /// Largest revenue a single field may hold. Keeps running sums over any
    /// realistic ledger well inside `Decimal`'s range.
    pub const MAX_REVENUE: Decimal = dec!(1000000000000);

    /// Creates an entry with a fresh opaque id. Callers are expected to
    /// have validated the inputs (see [`crate::ledger::MonthForm`]).
    pub fn new(
        month_year: impl Into<String>,
        revenue_without_tax_substitution: Decimal,
        revenue_with_tax_substitution: Decimal,
        annex: Annex,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            month_year: month_year.into(),
            revenue_without_tax_substitution,
            revenue_with_tax_substitution,
            annex,
        }
    }

    pub fn total_revenue(&self) -> Decimal {
        self.revenue_without_tax_substitution + self.revenue_with_tax_substitution
    }

    /// `true` when both revenue fields lie in `0..=MAX_REVENUE`.
    pub fn revenue_in_range(&self) -> bool {
        let range = Decimal::ZERO..=Self::MAX_REVENUE;
        range.contains(&self.revenue_without_tax_substitution)
            && range.contains(&self.revenue_with_tax_substitution)
    }
}

/// A ledger entry together with every value derived from the ledger.
///
/// Serialized flat: the entry's own fields sit beside the derived ones.
/// Only the entry half is ever read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedMonth {
    #[serde(flatten)]
    pub entry: MonthEntry,

    pub total_revenue: Decimal,
    /// Running sum of `total_revenue` from the first ledger entry.
    pub cumulative_revenue: Decimal,
    /// RBT12: sum over this entry and up to eleven preceding ones.
    pub trailing_12_month_revenue: Decimal,
    /// RBT12 divided by the number of entries actually in the window.
    pub trailing_12_month_average: Decimal,
    pub available_under_monthly_cap: Decimal,
    pub available_under_annual_cap: Decimal,
    pub effective_rate: Decimal,
    pub icms_share_percent: Decimal,
    pub tax_without_substitution: Decimal,
    pub tax_with_substitution: Decimal,
    pub total_tax_due: Decimal,
}

impl ComputedMonth {
    pub fn exceeds_monthly_cap(&self) -> bool {
        self.available_under_monthly_cap < Decimal::ZERO
    }

    pub fn exceeds_annual_cap(&self) -> bool {
        self.available_under_annual_cap < Decimal::ZERO
    }
}
