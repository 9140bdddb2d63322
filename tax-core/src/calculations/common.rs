//! Common utility functions for bracket calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Calculations keep full precision; this is applied only when an amount is
/// shown to a user.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a percentage as printed on a page (`12`, `39.6`) to a fraction.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::rate_from_percent;
///
/// assert_eq!(rate_from_percent(dec!(39.6)), dec!(0.396));
/// ```
pub fn rate_from_percent(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(7988.754)), dec!(7988.75));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(932.505)), dec!(932.51));
    }

    #[test]
    fn round_half_up_pads_whole_amounts() {
        let result = round_half_up(dec!(6417.5));

        assert_eq!(format!("{result:.2}"), "6417.50");
    }

    #[test]
    fn round_half_up_handles_zero() {
        assert_eq!(round_half_up(Decimal::ZERO), dec!(0.00));
    }

    // =========================================================================
    // rate_from_percent tests
    // =========================================================================

    #[test]
    fn rate_from_percent_handles_whole_percentages() {
        assert_eq!(rate_from_percent(dec!(10)), dec!(0.10));
    }

    #[test]
    fn rate_from_percent_handles_fractional_percentages() {
        assert_eq!(rate_from_percent(dec!(39.6)), dec!(0.396));
    }
}
