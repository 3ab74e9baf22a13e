//! Rounding shared by presentation and export.
//!
//! Calculations keep full `Decimal` precision; values are rounded only when
//! they are shown or written out.

use rust_decimal::{Decimal, RoundingStrategy};

/// Two decimal places, midpoints away from zero (`0.005` becomes `0.01`,
/// `-0.005` becomes `-0.01`).
///
/// ```
/// use rust_decimal_macros::dec;
/// use simples_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(4000.005)), dec!(4000.01));
/// assert_eq!(round_half_up(dec!(-2.675)), dec!(-2.68));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
