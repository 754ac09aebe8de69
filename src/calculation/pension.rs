//! Employee pension contribution calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::round_money;
use crate::models::{AuditStep, Currency, EmployeeDeductionProfile, PensionFund};

/// The result of a pension calculation, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionResult {
    /// Employee contribution deducted from gross pay.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the employee pension contribution for one currency.
///
/// The contribution is zero when the employee has no deduction profile, the
/// profile names no fund, the employee has opted out of contributing, or the
/// fund does not deduct from salaries in `currency`. Otherwise it is
/// `round(salary * employee_rate, 2)`.
///
/// # Arguments
///
/// * `profile` - The employee's active deduction profile, if any
/// * `fund` - The fund the profile names, if it resolved
/// * `salary` - Gross salary in `currency`
/// * `currency` - The currency the salary is paid in
/// * `step_number` - The step number for audit trail sequencing
pub fn compute_pension(
    profile: Option<&EmployeeDeductionProfile>,
    fund: Option<&PensionFund>,
    salary: Decimal,
    currency: Currency,
    step_number: u32,
) -> PensionResult {
    let skip_reason = match (profile, fund) {
        (None, _) => Some("no active deduction profile".to_string()),
        (Some(_), None) => Some("no pension fund".to_string()),
        (Some(p), Some(_)) if !p.pension_employee_contribution => {
            Some("employee contribution disabled".to_string())
        }
        (Some(_), Some(f)) if !f.currency_scope.matches(currency) => Some(format!(
            "fund '{}' does not deduct from {} salaries",
            f.id, currency
        )),
        _ => None,
    };

    let rule_ref = match fund {
        Some(f) => format!("pension_funds:{}", f.id),
        None => "pension_funds:none".to_string(),
    };

    let (amount, reasoning) = match (skip_reason, fund) {
        (None, Some(f)) => {
            let amount = round_money(salary * f.employee_rate);
            let reasoning = format!(
                "{} x {} ({}) = {}",
                salary,
                f.employee_rate.normalize(),
                f.name,
                amount
            );
            (amount, reasoning)
        }
        (reason, _) => (
            Decimal::ZERO,
            format!(
                "Pension is 0: {}",
                reason.unwrap_or_else(|| "no pension fund".to_string())
            ),
        ),
    };

    PensionResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "pension".to_string(),
            rule_name: "Pension Contribution".to_string(),
            rule_ref,
            input: serde_json::json!({
                "currency": currency,
                "salary": salary.to_string(),
                "employee_rate": fund.map(|f| f.employee_rate.to_string())
            }),
            output: serde_json::json!({
                "pension": amount.to_string()
            }),
            reasoning,
        },
    }
}
