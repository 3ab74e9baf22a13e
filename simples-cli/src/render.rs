//! Plain-text views printed by the commands.

use std::fmt;

use rust_decimal::Decimal;
use simples_core::calculations::effective_rate;
use simples_core::{Annex, BracketTables, ComputedMonth, SimulationSummary};
use simples_data::{format_currency, format_percentage};

const OVER_CAP: &str = "  (over cap)";

fn headroom(
    value: Decimal,
    over_cap: bool,
) -> String {
    if over_cap {
        format!("{}{}", format_currency(value), OVER_CAP)
    } else {
        format_currency(value)
    }
}

/// Every month with all derived figures, one block per month.
pub struct LedgerView<'a>(pub &'a [ComputedMonth]);

impl fmt::Display for LedgerView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No months recorded.");
        }

        for (i, month) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(
                f,
                "#{:<3} {}  {}  id {}",
                i + 1,
                month.entry.month_year,
                month.entry.annex.label(),
                month.entry.id
            )?;
            writeln!(
                f,
                "  Revenue without ST:      {}",
                format_currency(month.entry.revenue_without_tax_substitution)
            )?;
            writeln!(
                f,
                "  Revenue with ST:         {}",
                format_currency(month.entry.revenue_with_tax_substitution)
            )?;
            writeln!(f, "  Total revenue:           {}", format_currency(month.total_revenue))?;
            writeln!(f, "  Cumulative revenue:      {}", format_currency(month.cumulative_revenue))?;
            writeln!(
                f,
                "  RBT12:                   {}",
                format_currency(month.trailing_12_month_revenue)
            )?;
            writeln!(
                f,
                "  12-month average:        {}",
                format_currency(month.trailing_12_month_average)
            )?;
            writeln!(
                f,
                "  Monthly cap headroom:    {}",
                headroom(month.available_under_monthly_cap, month.exceeds_monthly_cap())
            )?;
            writeln!(
                f,
                "  Annual cap headroom:     {}",
                headroom(month.available_under_annual_cap, month.exceeds_annual_cap())
            )?;
            writeln!(f, "  Effective rate:          {}", format_percentage(month.effective_rate))?;
            writeln!(
                f,
                "  ICMS share:              {}",
                format_percentage(month.icms_share_percent)
            )?;
            writeln!(
                f,
                "  Tax without ST:          {}",
                format_currency(month.tax_without_substitution)
            )?;
            writeln!(
                f,
                "  Tax with ST:             {}",
                format_currency(month.tax_with_substitution)
            )?;
            write!(f, "  Total tax due:           {}", format_currency(month.total_tax_due))?;
        }
        Ok(())
    }
}

pub struct SummaryView<'a>(pub &'a SimulationSummary);

impl fmt::Display for SummaryView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let s = self.0;
        writeln!(f, "Months:                {}", s.entry_count)?;
        writeln!(f, "Total revenue:         {}", format_currency(s.total_revenue))?;
        writeln!(f, "Total tax:             {}", format_currency(s.total_tax))?;
        writeln!(f, "Blended rate:          {}", format_percentage(s.blended_rate))?;
        writeln!(
            f,
            "Latest RBT12:          {}",
            format_currency(s.latest_trailing_12_month_revenue)
        )?;
        writeln!(
            f,
            "Latest 12-month avg:   {}",
            format_currency(s.latest_trailing_12_month_average)
        )?;
        writeln!(
            f,
            "Monthly cap headroom:  {}",
            headroom(
                s.latest_available_under_monthly_cap,
                s.latest_available_under_monthly_cap < Decimal::ZERO,
            )
        )?;
        write!(
            f,
            "Annual cap headroom:   {}",
            headroom(
                s.latest_available_under_annual_cap,
                s.latest_available_under_annual_cap < Decimal::ZERO,
            )
        )
    }
}

/// Bracket rows per annex with the effective rate at each threshold.
pub struct BracketsView<'a>(pub &'a BracketTables);

impl fmt::Display for BracketsView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for (i, annex) in Annex::all().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", annex.label())?;
            write!(
                f,
                "  {:>18}  {:>8}  {:>16}  {:>8}  {:>9}",
                "From", "Nominal", "Deduction", "ICMS", "Effective"
            )?;
            for row in self.0.table(*annex).rows() {
                write!(
                    f,
                    "\n  {:>18}  {:>8}  {:>16}  {:>8}  {:>9}",
                    format_currency(row.threshold_from),
                    format_percentage(row.nominal_rate),
                    format_currency(row.deduction_amount),
                    format_percentage(row.icms_share_percent),
                    format_percentage(effective_rate(row.threshold_from, row)),
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
