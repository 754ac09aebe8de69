//! PAYE and AIDS levy calculation.
//!
//! This module applies a progressive bracket table to a taxable amount and
//! adds the AIDS levy surcharge on top of the bracket tax.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::round_money;
use crate::models::{AuditStep, Currency, TaxBracket};

/// AIDS levy rate applied to positive bracket tax (3%).
///
/// The levy has no income threshold: any positive base tax attracts it.
pub const AIDS_LEVY_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 2);

/// The result of a tax calculation, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Bracket tax before the levy, floored at zero.
    pub base_tax: Decimal,
    /// AIDS levy on the base tax.
    pub levy: Decimal,
    /// Total tax payable, rounded to cents half up.
    pub tax: Decimal,
    /// The bracket the amount fell into, if any.
    pub bracket: Option<TaxBracket>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes PAYE plus AIDS levy for a taxable amount.
///
/// Brackets are walked in ascending `min_income` order and the first bracket
/// whose upper bound is at least the amount is used (an amount equal to a
/// boundary stays in the lower bracket). Then:
///
/// - `base_tax = max(amount * rate - deduction, 0)`
/// - `levy = base_tax * 3%` when `base_tax > 0`
/// - `tax = round_half_up(base_tax + levy, 2)`
///
/// An empty table, or a table whose top bracket does not reach the amount,
/// yields zero tax.
///
/// # Arguments
///
/// * `taxable` - The taxable amount (gross monthly salary)
/// * `currency` - The currency being taxed, recorded in the audit step
/// * `brackets` - The active bracket vintage for the currency
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::compute_tax;
/// use payroll_engine::models::{Currency, TaxBracket};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let brackets = vec![
///     TaxBracket { currency: Currency::Usd, min_income: dec("0"), max_income: Some(dec("750.00")),
///                  rate: dec("0"), deduction: dec("0"), active_from: from },
///     TaxBracket { currency: Currency::Usd, min_income: dec("750.01"), max_income: Some(dec("2500.00")),
///                  rate: dec("0.20"), deduction: dec("150.00"), active_from: from },
/// ];
///
/// let result = compute_tax(dec("1000.00"), Currency::Usd, &brackets, 1);
/// assert_eq!(result.base_tax, dec("50.00"));
/// assert_eq!(result.levy, dec("1.50"));
/// assert_eq!(result.tax, dec("51.50"));
/// ```
pub fn compute_tax(
    taxable: Decimal,
    currency: Currency,
    brackets: &[TaxBracket],
    step_number: u32,
) -> TaxResult {
    let mut ordered: Vec<&TaxBracket> = brackets.iter().collect();
    ordered.sort_by(|a, b| a.min_income.cmp(&b.min_income));

    let vintage = ordered
        .first()
        .map(|b| b.active_from.to_string())
        .unwrap_or_else(|| "none".to_string());
    let rule_ref = format!("tax_brackets:{}:{}", currency, vintage);

    let Some(bracket) = ordered.into_iter().find(|b| b.covers(taxable)) else {
        let reasoning = if brackets.is_empty() {
            format!("No {} tax brackets in force; tax is 0", currency)
        } else {
            format!(
                "No {} bracket reaches {}; top bracket is not open-ended, tax is 0",
                currency, taxable
            )
        };
        return TaxResult {
            base_tax: Decimal::ZERO,
            levy: Decimal::ZERO,
            tax: Decimal::ZERO,
            bracket: None,
            audit_step: AuditStep {
                step_number,
                rule_id: "paye".to_string(),
                rule_name: "PAYE and AIDS Levy".to_string(),
                rule_ref,
                input: serde_json::json!({
                    "currency": currency,
                    "taxable": taxable.to_string(),
                    "brackets": brackets.len()
                }),
                output: serde_json::json!({
                    "base_tax": "0",
                    "levy": "0",
                    "tax": "0"
                }),
                reasoning,
            },
        };
    };

    let base_tax = (taxable * bracket.rate - bracket.deduction).max(Decimal::ZERO);
    let levy = if base_tax > Decimal::ZERO {
        base_tax * AIDS_LEVY_RATE
    } else {
        Decimal::ZERO
    };
    let tax = round_money(base_tax + levy);

    let audit_step = AuditStep {
        step_number,
        rule_id: "paye".to_string(),
        rule_name: "PAYE and AIDS Levy".to_string(),
        rule_ref,
        input: serde_json::json!({
            "currency": currency,
            "taxable": taxable.to_string(),
            "bracket_min": bracket.min_income.to_string(),
            "bracket_max": bracket.max_income.map(|m| m.to_string()),
            "rate": bracket.rate.to_string(),
            "deduction": bracket.deduction.to_string()
        }),
        output: serde_json::json!({
            "base_tax": base_tax.normalize().to_string(),
            "levy": levy.normalize().to_string(),
            "tax": tax.to_string()
        }),
        reasoning: format!(
            "{} x {} - {} = {}; levy {} x {} = {}; tax {}",
            taxable,
            bracket.rate.normalize(),
            bracket.deduction,
            base_tax.normalize(),
            base_tax.normalize(),
            AIDS_LEVY_RATE,
            levy.normalize(),
            tax
        ),
    };

    TaxResult {
        base_tax,
        levy,
        tax,
        bracket: Some(bracket.clone()),
        audit_step,
    }
}
