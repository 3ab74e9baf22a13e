use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Revenue ceilings used for the headroom columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caps {
    /// Compared against the trailing 12-month average.
    pub monthly_cap: Decimal,
    /// Compared against the trailing 12-month revenue (RBT12).
    pub annual_cap: Decimal,
}

impl Caps {
    pub const DEFAULT_ANNUAL_CAP: Decimal = dec!(4800000);
    pub const DEFAULT_MONTHLY_CAP: Decimal = dec!(400000);
}

impl Default for Caps {
    fn default() -> Self {
        Self {
            monthly_cap: Self::DEFAULT_MONTHLY_CAP,
            annual_cap: Self::DEFAULT_ANNUAL_CAP,
        }
    }
}
