//! Net pay calculation.

use rust_decimal::Decimal;

/// Computes take-home pay from gross pay and the deducted amounts.
///
/// `net = max(gross - tax - nssa - pension, 0)`. Employer contributions are
/// not deducted and must not be passed here.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::compute_net_pay;
/// use rust_decimal::Decimal;
///
/// let net = compute_net_pay(Decimal::new(100000, 2), Decimal::new(5150, 2), Decimal::new(3150, 2), Decimal::ZERO);
/// assert_eq!(net, Decimal::new(91700, 2));
/// ```
pub fn compute_net_pay(gross: Decimal, tax: Decimal, nssa: Decimal, pension: Decimal) -> Decimal {
    (gross - tax - nssa - pension).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_net_pay_subtracts_deductions() {
        assert_eq!(
            compute_net_pay(dec("1000.00"), dec("51.50"), dec("31.50"), dec("50.00")),
            dec("867.00")
        );
    }

    #[test]
    fn test_net_pay_floored_at_zero() {
        assert_eq!(
            compute_net_pay(dec("10.00"), dec("5.00"), dec("4.50"), dec("5.00")),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_zero_gross_is_zero_net() {
        assert_eq!(
            compute_net_pay(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
            Decimal::ZERO
        );
    }
}
