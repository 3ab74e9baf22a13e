//! Bracket lookup for the progressive Simples Nacional tables.

use rust_decimal::Decimal;

use crate::models::{BracketRow, BracketTable};

/// Returns the row whose range contains `trailing_revenue`.
///
/// Scans from the highest threshold downward and stops at the first row
/// with `threshold_from <= trailing_revenue`. Revenue below every threshold
/// falls back to the lowest row, so zero revenue always resolves to the
/// first bracket.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use simples_core::calculations::resolve_bracket;
/// use simples_core::{Annex, BracketTables};
///
/// let tables = BracketTables::reference();
/// let table = tables.table(Annex::AnnexI);
///
/// assert_eq!(resolve_bracket(table, dec!(100000)).nominal_rate, dec!(0.04));
/// assert_eq!(resolve_bracket(table, dec!(300000)).nominal_rate, dec!(0.073));
/// ```
pub fn resolve_bracket(
    table: &BracketTable,
    trailing_revenue: Decimal,
) -> &BracketRow {
    table
        .rows()
        .iter()
        .rev()
        .find(|row| row.threshold_from <= trailing_revenue)
        .unwrap_or_else(|| table.lowest())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{Annex, BracketTables};

    fn row(
        threshold: Decimal,
        rate: Decimal,
    ) -> BracketRow {
        BracketRow {
            threshold_from: threshold,
            nominal_rate: rate,
            deduction_amount: dec!(0),
            icms_share_percent: dec!(0),
        }
    }

    #[test]
    fn zero_revenue_resolves_to_first_bracket() {
        let tables = BracketTables::reference();

        let bracket = resolve_bracket(tables.table(Annex::AnnexI), dec!(0));

        assert_eq!(bracket.threshold_from, dec!(0));
        assert_eq!(bracket.nominal_rate, dec!(0.04));
    }

    #[test]
    fn exact_threshold_belongs_to_upper_bracket() {
        let tables = BracketTables::reference();

        let bracket = resolve_bracket(tables.table(Annex::AnnexI), dec!(180000));

        assert_eq!(bracket.nominal_rate, dec!(0.073));
        assert_eq!(bracket.deduction_amount, dec!(5940));
    }

    #[test]
    fn just_below_threshold_stays_in_lower_bracket() {
        let tables = BracketTables::reference();

        let bracket = resolve_bracket(tables.table(Annex::AnnexII), dec!(179999.99));

        assert_eq!(bracket.nominal_rate, dec!(0.045));
    }

    #[test]
    fn revenue_above_last_threshold_uses_last_bracket() {
        let tables = BracketTables::reference();

        let bracket = resolve_bracket(tables.table(Annex::AnnexI), dec!(9000000));

        assert_eq!(bracket.nominal_rate, dec!(0.143));
    }

    #[test]
    fn revenue_below_lowest_threshold_falls_back_to_lowest() {
        let table = BracketTable::new(
            Annex::AnnexI,
            vec![row(dec!(1000), dec!(0.01)), row(dec!(2000), dec!(0.02))],
        )
        .unwrap();

        let bracket = resolve_bracket(&table, dec!(10));

        assert_eq!(bracket.nominal_rate, dec!(0.01));
    }

    #[test]
    fn supports_tables_of_arbitrary_length() {
        let rows: Vec<_> = (0..12)
            .map(|i| row(Decimal::from(i * 100), Decimal::new(i, 2)))
            .collect();
        let table = BracketTable::new(Annex::AnnexII, rows).unwrap();

        assert_eq!(resolve_bracket(&table, dec!(1150)).nominal_rate, dec!(0.11));
        assert_eq!(resolve_bracket(&table, dec!(550)).nominal_rate, dec!(0.05));
        assert_eq!(resolve_bracket(&table, dec!(99.99)).nominal_rate, dec!(0.00));
    }
}
