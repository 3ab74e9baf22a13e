//! Positional trailing-window aggregation over ledger revenue.

use rust_decimal::Decimal;

/// Number of ledger entries in a full trailing window.
pub const WINDOW_SIZE: usize = 12;

/// Trailing-window figures for one ledger position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWindow {
    pub sum: Decimal,
    /// Entries actually included, `min(index + 1, 12)`.
    pub count: usize,
    pub average: Decimal,
}

/// Aggregates `totals[max(0, index - 11)..=index]`.
///
/// The window is positional: it counts ledger entries, not calendar months,
/// and only ever looks at the prefix ending at `index`. The average divides
/// by the number of entries present, so early months are not diluted by
/// missing ones.
///
/// # Panics
///
/// Panics if `index` is out of bounds for `totals`.
pub fn trailing_window(
    totals: &[Decimal],
    index: usize,
) -> TrailingWindow {
    let start = (index + 1).saturating_sub(WINDOW_SIZE);
    let window = &totals[start..=index];
    let sum: Decimal = window.iter().copied().sum();
    let count = window.len();

    TrailingWindow {
        sum,
        count,
        average: sum / Decimal::from(count),
    }
}

/// Running sums of `totals`, one per position.
pub fn cumulative_sums(totals: &[Decimal]) -> Vec<Decimal> {
    totals
        .iter()
        .scan(Decimal::ZERO, |running, total| {
            *running += *total;
            Some(*running)
        })
        .collect()
}
