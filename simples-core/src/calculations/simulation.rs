//! Full-ledger Simples Nacional simulation.
//!
//! Every derived field of every month is recomputed from the whole ledger on
//! each call. Ledgers are small (tens of entries) and the trailing window is
//! positional, so there is no incremental path to keep consistent.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use simples_core::calculations::SimplesCalculator;
//! use simples_core::{Annex, BracketTables, Caps, MonthEntry};
//!
//! let tables = BracketTables::reference();
//! let calculator = SimplesCalculator::new(&tables, Caps::default());
//!
//! let entries = vec![
//!     MonthEntry::new("01/2025", dec!(100000), dec!(0), Annex::AnnexI),
//!     MonthEntry::new("02/2025", dec!(200000), dec!(0), Annex::AnnexI),
//! ];
//! let months = calculator.calculate(&entries);
//!
//! assert_eq!(months[0].total_tax_due, dec!(4000));
//! assert_eq!(months[1].trailing_12_month_revenue, dec!(300000));
//! assert_eq!(months[1].effective_rate, dec!(0.0532));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::bracket::resolve_bracket;
use crate::calculations::headroom::headroom;
use crate::calculations::rate::{effective_rate, tax_split};
use crate::calculations::window::{cumulative_sums, trailing_window};
use crate::models::{BracketTables, Caps, ComputedMonth, MonthEntry, SimulationSummary};

/// Calculator over a fixed pair of bracket tables and caps.
#[derive(Debug, Clone)]
pub struct SimplesCalculator<'a> {
    tables: &'a BracketTables,
    caps: Caps,
}

impl<'a> SimplesCalculator<'a> {
    pub fn new(
        tables: &'a BracketTables,
        caps: Caps,
    ) -> Self {
        Self { tables, caps }
    }

    /// Derives every computed field for `entries`, in ledger order.
    pub fn calculate(
        &self,
        entries: &[MonthEntry],
    ) -> Vec<ComputedMonth> {
        let totals: Vec<Decimal> = entries.iter().map(MonthEntry::total_revenue).collect();
        let cumulative = cumulative_sums(&totals);

        let months: Vec<ComputedMonth> = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let window = trailing_window(&totals, index);
                let bracket = resolve_bracket(self.tables.table(entry.annex), window.sum);
                let rate = effective_rate(window.sum, bracket);
                let tax = tax_split(
                    entry.revenue_without_tax_substitution,
                    entry.revenue_with_tax_substitution,
                    rate,
                    bracket,
                );
                let room = headroom(&self.caps, window.sum, window.average);

                ComputedMonth {
                    entry: entry.clone(),
                    total_revenue: totals[index],
                    cumulative_revenue: cumulative[index],
                    trailing_12_month_revenue: window.sum,
                    trailing_12_month_average: window.average,
                    available_under_monthly_cap: room.monthly,
                    available_under_annual_cap: room.annual,
                    effective_rate: rate,
                    icms_share_percent: bracket.icms_share_percent,
                    tax_without_substitution: tax.without_substitution,
                    tax_with_substitution: tax.with_substitution,
                    total_tax_due: tax.total,
                }
            })
            .collect();

        debug!(entries = months.len(), "ledger recomputed");
        months
    }

    /// Aggregates a computed ledger.
    pub fn summarize(
        &self,
        months: &[ComputedMonth],
    ) -> SimulationSummary {
        let Some(latest) = months.last() else {
            return SimulationSummary::default();
        };

        let total_tax: Decimal = months.iter().map(|m| m.total_tax_due).sum();
        let total_revenue: Decimal = months.iter().map(|m| m.total_revenue).sum();
        let blended_rate = if total_revenue.is_zero() {
            Decimal::ZERO
        } else {
            total_tax / total_revenue
        };

        SimulationSummary {
            entry_count: months.len(),
            latest_trailing_12_month_revenue: latest.trailing_12_month_revenue,
            latest_trailing_12_month_average: latest.trailing_12_month_average,
            total_tax,
            total_revenue,
            blended_rate,
            latest_available_under_monthly_cap: latest.available_under_monthly_cap,
            latest_available_under_annual_cap: latest.available_under_annual_cap,
        }
    }
}
