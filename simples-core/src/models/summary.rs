use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate over a computed ledger. Recomputed on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub entry_count: usize,
    pub latest_trailing_12_month_revenue: Decimal,
    pub latest_trailing_12_month_average: Decimal,
    pub total_tax: Decimal,
    pub total_revenue: Decimal,
    /// `total_tax / total_revenue`, zero when there is no revenue.
    pub blended_rate: Decimal,
    pub latest_available_under_monthly_cap: Decimal,
    pub latest_available_under_annual_cap: Decimal,
}
