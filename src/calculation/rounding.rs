//! Rounding helpers.
//!
//! Values are rounded only when they are finalized for output; intermediate
//! sums stay unrounded so small credits do not compound rounding error.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimal places, halves away from zero.
///
/// # Example
///
/// ```
/// use leave_engine::calculation::round_2dp;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_2dp(Decimal::from_str("11.685").unwrap()), Decimal::from_str("11.69").unwrap());
/// ```
pub fn round_2dp(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to the nearest whole day, halves away from zero.
pub fn round_whole_days(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
