//! Distance to the Simples Nacional revenue ceilings.

use rust_decimal::Decimal;

use crate::models::Caps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Headroom {
    pub monthly: Decimal,
    pub annual: Decimal,
}

/// Remaining room under both caps. Negative values mean the cap has been
/// exceeded and are returned unclamped.
pub fn headroom(
    caps: &Caps,
    trailing_revenue: Decimal,
    trailing_average: Decimal,
) -> Headroom {
    Headroom {
        monthly: caps.monthly_cap - trailing_average,
        annual: caps.annual_cap - trailing_revenue,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn headroom_subtracts_from_default_caps() {
        let result = headroom(&Caps::default(), dec!(300000), dec!(150000));

        assert_eq!(result.monthly, dec!(250000));
        assert_eq!(result.annual, dec!(4500000));
    }

    #[test]
    fn headroom_is_not_clamped_when_over_cap() {
        let caps = Caps {
            monthly_cap: dec!(1000),
            annual_cap: dec!(12000),
        };

        let result = headroom(&caps, dec!(15000), dec!(1250));

        assert_eq!(result.monthly, dec!(-250));
        assert_eq!(result.annual, dec!(-3000));
    }
}
