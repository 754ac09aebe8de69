//! Monetary rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places money is stored with.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounds an amount to cents, half up.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("31.505").unwrap()), Decimal::from_str("31.51").unwrap());
/// assert_eq!(round_money(Decimal::from_str("31.504").unwrap()), Decimal::from_str("31.50").unwrap());
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(
        MONEY_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    )
}
