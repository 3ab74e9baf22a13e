//! Effective-rate resolution and the per-month tax split.

use rust_decimal::Decimal;

use crate::models::BracketRow;

/// Tax owed on one month, split by tax-substitution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxSplit {
    pub without_substitution: Decimal,
    pub with_substitution: Decimal,
    pub total: Decimal,
}

/// `(rbt12 * nominal_rate - deduction_amount) / rbt12`, or zero when there
/// is no trailing revenue.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use simples_core::calculations::{effective_rate, resolve_bracket};
/// use simples_core::{Annex, BracketTables};
///
/// let tables = BracketTables::reference();
/// let bracket = resolve_bracket(tables.table(Annex::AnnexI), dec!(300000));
///
/// assert_eq!(effective_rate(dec!(300000), bracket), dec!(0.0532));
/// ```
pub fn effective_rate(
    trailing_revenue: Decimal,
    bracket: &BracketRow,
) -> Decimal {
    if trailing_revenue.is_zero() {
        return Decimal::ZERO;
    }

    (trailing_revenue * bracket.nominal_rate - bracket.deduction_amount) / trailing_revenue
}

/// Applies `rate` to both revenue fields.
///
/// Revenue already under tax substitution excludes the ICMS share, which
/// was collected upstream.
pub fn tax_split(
    revenue_without_substitution: Decimal,
    revenue_with_substitution: Decimal,
    rate: Decimal,
    bracket: &BracketRow,
) -> TaxSplit {
    let without_substitution = revenue_without_substitution * rate;
    let with_substitution =
        revenue_with_substitution * rate * (Decimal::ONE - bracket.icms_share_percent);

    TaxSplit {
        without_substitution,
        with_substitution,
        total: without_substitution + with_substitution,
    }
}
